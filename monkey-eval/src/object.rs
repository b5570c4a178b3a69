use std::fmt::Display;
use std::rc::Rc;

use indexmap::IndexMap;
use monkey_syntax::ast;
use thiserror::Error;

use crate::environment::Environment;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Array(Vec<Rc<Object>>),
    /// Keeps the original key object next to the value so the hash renders
    /// with its keys in insertion order.
    Hash(IndexMap<HashKey, (Rc<Object>, Rc<Object>)>),
    Function(Function),
    Builtin(BuiltinFunction),
    /// Wraps the value of a `return` until the enclosing call unwraps it.
    ReturnValue(Rc<Object>),
    Error(EvaluationError),
}

thread_local! {
    static NULL: Rc<Object> = Rc::new(Object::Null);
    static TRUE: Rc<Object> = Rc::new(Object::Boolean(true));
    static FALSE: Rc<Object> = Rc::new(Object::Boolean(false));
}

impl Object {
    pub fn null() -> Rc<Object> {
        NULL.with(|x| x.clone())
    }
    pub fn boolean(value: bool) -> Rc<Object> {
        if value {
            TRUE.with(|x| x.clone())
        } else {
            FALSE.with(|x| x.clone())
        }
    }
    pub fn integer(value: i64) -> Rc<Object> {
        Rc::new(Object::Integer(value))
    }
    pub fn string(value: impl Into<String>) -> Rc<Object> {
        Rc::new(Object::String(value.into()))
    }
    pub fn array(array: Vec<Rc<Object>>) -> Rc<Object> {
        Rc::new(Object::Array(array))
    }
    pub fn hash(hash: IndexMap<HashKey, (Rc<Object>, Rc<Object>)>) -> Rc<Object> {
        Rc::new(Object::Hash(hash))
    }
    pub fn function(
        parameters: Vec<ast::Identifier>,
        body: ast::BlockStatement,
        env: Environment,
    ) -> Rc<Object> {
        Rc::new(Object::Function(Function {
            parameters,
            body,
            env,
        }))
    }
    pub fn builtin(func: BuiltinFunction) -> Rc<Object> {
        Rc::new(Object::Builtin(func))
    }
    pub fn return_value(value: Rc<Object>) -> Rc<Object> {
        Rc::new(Object::ReturnValue(value))
    }
    pub fn error(error: EvaluationError) -> Rc<Object> {
        Rc::new(Object::Error(error))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Null => "NULL",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_) => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::ReturnValue(_) => "RETURN_VALUE",
            Object::Error(_) => "ERROR",
        }
    }

    /// `false` and `null` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Boolean(false) | Object::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// Errors and return values stop the evaluation of whatever encloses
    /// them and travel up unchanged.
    pub fn is_signal(&self) -> bool {
        matches!(self, Object::Error(_) | Object::ReturnValue(_))
    }

    /// The canonical text of the value, as shown by the REPL.
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Object::Hash(hash) => {
                write!(f, "{{")?;
                for (i, (key, value)) in hash.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Object::Function(function) => {
                let parameters = function
                    .parameters
                    .iter()
                    .map(|id| id.name.as_ref())
                    .collect::<Vec<&str>>()
                    .join(", ");
                write!(f, "fn({}) {}", parameters, function.body)
            }
            Object::Builtin(function) => write!(f, "builtin function {}", function.name),
            Object::ReturnValue(value) => write!(f, "{}", value),
            Object::Error(error) => write!(f, "ERROR: {}", error),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

impl TryFrom<&Object> for HashKey {
    type Error = EvaluationError;

    fn try_from(value: &Object) -> Result<Self, Self::Error> {
        match value {
            Object::Integer(int) => Ok(HashKey::Integer(*int)),
            Object::String(str) => Ok(HashKey::String(str.clone())),
            Object::Boolean(bool) => Ok(HashKey::Boolean(*bool)),
            _ => Err(EvaluationError::InvalidHashKey(value.type_name())),
        }
    }
}

#[derive(Clone)]
pub struct Function {
    pub parameters: Vec<ast::Identifier>,
    pub body: ast::BlockStatement,
    /// Scope the function literal was evaluated in. Calls run in a fresh
    /// scope enclosed by this one.
    pub env: Environment,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters && self.body == other.body && self.env == other.env
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub func: fn(Vec<Rc<Object>>) -> Rc<Object>,
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// Runtime errors. They are values: an evaluation that fails produces an
/// `Object::Error` carrying one of these.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum EvaluationError {
    #[error("unknown operator: {operation}{right}")]
    UnknownPrefixOperator {
        operation: ast::PrefixOperationKind,
        right: &'static str,
    },
    #[error("unknown operator: {left} {operation} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operation: ast::InfixOperationKind,
        right: &'static str,
    },
    #[error("type mismatch: {left} {operation} {right}")]
    TypeMismatch {
        left: &'static str,
        operation: ast::InfixOperationKind,
        right: &'static str,
    },
    #[error("identifier not found: {0}")]
    UnknownIdentifier(Rc<str>),
    #[error("not a function: {0}")]
    CallNonFunction(&'static str),
    #[error("index operator not supported: {0}")]
    IndexNotSupported(&'static str),
    #[error("unusable as hash key: {0}")]
    InvalidHashKey(&'static str),
    #[error("division by zero: {0} / 0")]
    DivisionByZero(i64),
    #[error("wrong number of arguments. got={actual}, want={expected}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("argument to `{function}` not supported, got {got}")]
    UnsupportedArgument {
        function: &'static str,
        got: &'static str,
    },
    #[error("argument to `{function}` must be {expected}, got {got}")]
    WrongArgumentType {
        function: &'static str,
        expected: &'static str,
        got: &'static str,
    },
}

pub fn object_to_key(object: &Rc<Object>) -> Result<HashKey, EvaluationError> {
    HashKey::try_from(object.as_ref())
}
