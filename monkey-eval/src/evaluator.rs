use std::rc::Rc;

use indexmap::IndexMap;
use monkey_syntax::ast;
use monkey_syntax::ast::{Expression, InfixOperationKind, PrefixOperationKind};

use crate::builtins;
use crate::environment::Environment;
use crate::object::{object_to_key, EvaluationError, Function, Object};

/// Returns early with `$object` if it is an error or a return value,
/// otherwise evaluates to it.
macro_rules! propagate {
    ($object:expr) => {{
        let object = $object;
        if object.is_signal() {
            return object;
        }
        object
    }};
}

/// Evaluates a whole program. A `return` at the top level ends the program
/// with its value; the wrapper itself is never handed back.
pub fn eval_program(program: &ast::Program, environment: &mut Environment) -> Rc<Object> {
    let mut output = Object::null();
    for statement in &program.statements {
        output = eval_statement(statement, environment);

        match output.as_ref() {
            Object::ReturnValue(value) => return value.clone(),
            Object::Error(error) => {
                log::debug!("evaluation failed: {}", error);
                return output;
            }
            _ => {}
        }
    }
    output
}

pub fn eval_statement(statement: &ast::Statement, environment: &mut Environment) -> Rc<Object> {
    match statement {
        ast::Statement::Expression(expression) => eval_expression(expression, environment),
        ast::Statement::Return(statement) => eval_return_statement(statement, environment),
        ast::Statement::Let(statement) => eval_let_statement(statement, environment),
    }
}

fn eval_let_statement(statement: &ast::LetStatement, environment: &mut Environment) -> Rc<Object> {
    let value = propagate!(eval_expression(&statement.value, environment));
    environment.set(statement.identifier.name.clone(), value);
    Object::null()
}

fn eval_return_statement(
    statement: &ast::ReturnStatement,
    environment: &mut Environment,
) -> Rc<Object> {
    let value = match &statement.value {
        Some(value) => propagate!(eval_expression(value, environment)),
        None => Object::null(),
    };
    Object::return_value(value)
}

/// Evaluates the statements of a block in order. Errors and return values
/// stop the block and are passed up as they are, so a `return` nested in
/// several blocks reaches the enclosing call intact.
pub fn eval_block_statement(
    block: &ast::BlockStatement,
    environment: &mut Environment,
) -> Rc<Object> {
    let mut result = Object::null();
    for statement in &block.statements {
        result = propagate!(eval_statement(statement, environment));
    }
    result
}

pub fn eval_expression(expression: &Expression, environment: &mut Environment) -> Rc<Object> {
    match expression {
        Expression::IntegerLiteral(value) => Object::integer(*value),
        Expression::BooleanLiteral(value) => Object::boolean(*value),
        Expression::StringLiteral(value) => Object::string(value.clone()),
        Expression::ArrayLiteral(array) => match eval_expressions(array, environment) {
            Ok(elements) => Object::array(elements),
            Err(signal) => signal,
        },
        Expression::HashLiteral(literal) => eval_hash_literal(literal, environment),
        Expression::Identifier(identifier) => eval_identifier(identifier, environment),
        Expression::PrefixOperation(kind, right) => {
            let right = propagate!(eval_expression(right, environment));
            eval_prefix_operation(*kind, &right)
        }
        Expression::InfixOperation(kind, left, right) => {
            let left = propagate!(eval_expression(left, environment));
            let right = propagate!(eval_expression(right, environment));
            eval_infix_operation(*kind, &left, &right)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
        } => {
            let condition = propagate!(eval_expression(condition, environment));
            if condition.is_truthy() {
                eval_block_statement(consequence, environment)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, environment)
            } else {
                Object::null()
            }
        }
        Expression::FunctionLiteral { parameters, body } => Object::function(
            parameters.clone(),
            body.clone(),
            environment.clone(),
        ),
        Expression::CallExpression {
            function,
            arguments,
        } => {
            let function = propagate!(eval_expression(function, environment));
            if !matches!(function.as_ref(), Object::Function(_) | Object::Builtin(_)) {
                return Object::error(EvaluationError::CallNonFunction(function.type_name()));
            }
            match eval_expressions(arguments, environment) {
                Ok(arguments) => apply_function(&function, arguments),
                Err(signal) => signal,
            }
        }
        Expression::IndexExpression { left, index } => {
            let left = propagate!(eval_expression(left, environment));
            let index = propagate!(eval_expression(index, environment));
            eval_index_expression(&left, &index)
        }
    }
}

fn eval_identifier(identifier: &ast::Identifier, environment: &Environment) -> Rc<Object> {
    environment
        .get(&identifier.name)
        .or_else(|| builtins::lookup(&identifier.name))
        .unwrap_or_else(|| {
            Object::error(EvaluationError::UnknownIdentifier(identifier.name.clone()))
        })
}

/// Evaluates `expressions` left to right, stopping at the first error.
fn eval_expressions(
    expressions: &[Expression],
    environment: &mut Environment,
) -> Result<Vec<Rc<Object>>, Rc<Object>> {
    let mut result = Vec::with_capacity(expressions.len());
    for expression in expressions {
        let object = eval_expression(expression, environment);
        if object.is_signal() {
            return Err(object);
        }
        result.push(object);
    }
    Ok(result)
}

fn eval_hash_literal(
    literal: &[(Expression, Expression)],
    environment: &mut Environment,
) -> Rc<Object> {
    let mut hash = IndexMap::with_capacity(literal.len());
    for (key, value) in literal {
        let key = propagate!(eval_expression(key, environment));
        let hashed_key = match object_to_key(&key) {
            Ok(hashed_key) => hashed_key,
            Err(error) => return Object::error(error),
        };
        let value = propagate!(eval_expression(value, environment));
        hash.insert(hashed_key, (key, value));
    }
    Object::hash(hash)
}

fn apply_function(function: &Rc<Object>, arguments: Vec<Rc<Object>>) -> Rc<Object> {
    match function.as_ref() {
        Object::Function(function) => {
            log::trace!(
                "calling fn with {} argument(s) for {} parameter(s)",
                arguments.len(),
                function.parameters.len()
            );
            let mut environment = extend_function_environment(function, arguments);
            let result = eval_block_statement(&function.body, &mut environment);
            if let Object::ReturnValue(value) = result.as_ref() {
                return value.clone();
            }
            result
        }
        Object::Builtin(builtin) => {
            log::trace!("calling builtin {}", builtin.name);
            (builtin.func)(arguments)
        }
        other => Object::error(EvaluationError::CallNonFunction(other.type_name())),
    }
}

/// Creates the scope a call runs in: enclosed by the scope the function was
/// defined in, with each parameter bound to its argument. Missing arguments
/// are bound to `null`, extra ones are dropped.
fn extend_function_environment(function: &Function, arguments: Vec<Rc<Object>>) -> Environment {
    let mut environment = Environment::new_enclosed(function.env.clone());
    let mut arguments = arguments.into_iter();
    for parameter in &function.parameters {
        let argument = arguments.next().unwrap_or_else(Object::null);
        environment.set(parameter.name.clone(), argument);
    }
    environment
}

fn eval_prefix_operation(kind: PrefixOperationKind, right: &Rc<Object>) -> Rc<Object> {
    match (kind, right.as_ref()) {
        (PrefixOperationKind::Bang, _) => Object::boolean(!right.is_truthy()),
        (PrefixOperationKind::Minus, Object::Integer(value)) => {
            Object::integer(value.wrapping_neg())
        }
        (PrefixOperationKind::Minus, _) => {
            Object::error(EvaluationError::UnknownPrefixOperator {
                operation: kind,
                right: right.type_name(),
            })
        }
    }
}

fn eval_infix_operation(
    kind: InfixOperationKind,
    left: &Rc<Object>,
    right: &Rc<Object>,
) -> Rc<Object> {
    match (left.as_ref(), right.as_ref()) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(kind, *left, *right)
        }
        (Object::String(left_value), Object::String(right_value)) => {
            // strings also compare by value, beyond plain concatenation
            match kind {
                InfixOperationKind::Plus => Object::string(format!("{}{}", left_value, right_value)),
                InfixOperationKind::Equal => Object::boolean(left_value == right_value),
                InfixOperationKind::NotEqual => Object::boolean(left_value != right_value),
                _ => unknown_infix_operator(kind, left, right),
            }
        }
        _ => match kind {
            InfixOperationKind::Equal => Object::boolean(is_same_object(left, right)),
            InfixOperationKind::NotEqual => Object::boolean(!is_same_object(left, right)),
            _ if left.type_name() != right.type_name() => {
                Object::error(EvaluationError::TypeMismatch {
                    left: left.type_name(),
                    operation: kind,
                    right: right.type_name(),
                })
            }
            _ => unknown_infix_operator(kind, left, right),
        },
    }
}

fn unknown_infix_operator(kind: InfixOperationKind, left: &Object, right: &Object) -> Rc<Object> {
    Object::error(EvaluationError::UnknownInfixOperator {
        left: left.type_name(),
        operation: kind,
        right: right.type_name(),
    })
}

/// Booleans and null compare by value, being interned; any other pair is
/// only equal when both sides are the same object.
fn is_same_object(left: &Rc<Object>, right: &Rc<Object>) -> bool {
    match (left.as_ref(), right.as_ref()) {
        (Object::Boolean(left), Object::Boolean(right)) => left == right,
        (Object::Null, Object::Null) => true,
        _ => Rc::ptr_eq(left, right),
    }
}

fn eval_integer_infix_operation(kind: InfixOperationKind, left: i64, right: i64) -> Rc<Object> {
    match kind {
        InfixOperationKind::Plus => Object::integer(left.wrapping_add(right)),
        InfixOperationKind::Minus => Object::integer(left.wrapping_sub(right)),
        InfixOperationKind::Multiply => Object::integer(left.wrapping_mul(right)),
        InfixOperationKind::Divide if right == 0 => {
            Object::error(EvaluationError::DivisionByZero(left))
        }
        InfixOperationKind::Divide => Object::integer(left.wrapping_div(right)),
        InfixOperationKind::LessThan => Object::boolean(left < right),
        InfixOperationKind::GreaterThan => Object::boolean(left > right),
        InfixOperationKind::Equal => Object::boolean(left == right),
        InfixOperationKind::NotEqual => Object::boolean(left != right),
    }
}

fn eval_index_expression(left: &Rc<Object>, index: &Rc<Object>) -> Rc<Object> {
    match (left.as_ref(), index.as_ref()) {
        (Object::Array(array), Object::Integer(index)) => usize::try_from(*index)
            .ok()
            .and_then(|index| array.get(index))
            .cloned()
            .unwrap_or_else(Object::null),
        (Object::Hash(hash), _) => match object_to_key(index) {
            Ok(key) => hash
                .get(&key)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(Object::null),
            Err(error) => Object::error(error),
        },
        _ => Object::error(EvaluationError::IndexNotSupported(left.type_name())),
    }
}
