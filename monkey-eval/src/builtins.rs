use std::rc::Rc;

use crate::object::{BuiltinFunction, EvaluationError, Object};

fn check_argument_count(expected: usize, args: &[Rc<Object>]) -> Result<(), Rc<Object>> {
    if args.len() != expected {
        return Err(Object::error(EvaluationError::WrongArgumentCount {
            expected,
            actual: args.len(),
        }));
    }
    Ok(())
}

fn expect_array<'a>(
    function: &'static str,
    object: &'a Rc<Object>,
) -> Result<&'a Vec<Rc<Object>>, Rc<Object>> {
    match object.as_ref() {
        Object::Array(arr) => Ok(arr),
        other => Err(Object::error(EvaluationError::WrongArgumentType {
            function,
            expected: "ARRAY",
            got: other.type_name(),
        })),
    }
}

fn builtin_len(args: Vec<Rc<Object>>) -> Rc<Object> {
    if let Err(error) = check_argument_count(1, &args) {
        return error;
    }
    match args[0].as_ref() {
        Object::String(s) => Object::integer(s.len() as i64),
        Object::Array(arr) => Object::integer(arr.len() as i64),
        other => Object::error(EvaluationError::UnsupportedArgument {
            function: "len",
            got: other.type_name(),
        }),
    }
}

fn builtin_first(args: Vec<Rc<Object>>) -> Rc<Object> {
    let arr = match check_argument_count(1, &args).and_then(|_| expect_array("first", &args[0])) {
        Ok(arr) => arr,
        Err(error) => return error,
    };
    arr.first().cloned().unwrap_or_else(Object::null)
}

fn builtin_last(args: Vec<Rc<Object>>) -> Rc<Object> {
    let arr = match check_argument_count(1, &args).and_then(|_| expect_array("last", &args[0])) {
        Ok(arr) => arr,
        Err(error) => return error,
    };
    arr.last().cloned().unwrap_or_else(Object::null)
}

fn builtin_rest(args: Vec<Rc<Object>>) -> Rc<Object> {
    let arr = match check_argument_count(1, &args).and_then(|_| expect_array("rest", &args[0])) {
        Ok(arr) => arr,
        Err(error) => return error,
    };
    if arr.is_empty() {
        return Object::null();
    }
    Object::array(arr[1..].to_owned())
}

fn builtin_push(args: Vec<Rc<Object>>) -> Rc<Object> {
    let arr = match check_argument_count(2, &args).and_then(|_| expect_array("push", &args[0])) {
        Ok(arr) => arr,
        Err(error) => return error,
    };
    let mut new_arr = arr.clone();
    new_arr.push(args[1].clone());
    Object::array(new_arr)
}

fn builtin_puts(args: Vec<Rc<Object>>) -> Rc<Object> {
    for arg in args {
        println!("{}", arg);
    }
    Object::null()
}

const BUILTINS: &[BuiltinFunction] = &[
    BuiltinFunction {
        name: "len",
        func: builtin_len,
    },
    BuiltinFunction {
        name: "first",
        func: builtin_first,
    },
    BuiltinFunction {
        name: "last",
        func: builtin_last,
    },
    BuiltinFunction {
        name: "rest",
        func: builtin_rest,
    },
    BuiltinFunction {
        name: "push",
        func: builtin_push,
    },
    BuiltinFunction {
        name: "puts",
        func: builtin_puts,
    },
];

thread_local! {
    static BUILTIN_OBJECTS: Vec<Rc<Object>> =
        BUILTINS.iter().cloned().map(Object::builtin).collect();
}

/// Resolves a builtin by name. Bindings in the environment take priority,
/// so this is only consulted once the scope chain has no match.
///
/// Every lookup of a name hands out the same object.
pub fn lookup(name: &str) -> Option<Rc<Object>> {
    BUILTIN_OBJECTS.with(|builtins| {
        builtins
            .iter()
            .find(|builtin| {
                matches!(builtin.as_ref(), Object::Builtin(func) if func.name == name)
            })
            .cloned()
    })
}
