use std::process::ExitCode;
use std::rc::Rc;

use monkey_eval::environment::Environment;
use monkey_eval::evaluator;
use monkey_eval::object::Object;
use monkey_syntax::parser::ParseError;

#[derive(Debug)]
pub enum RunError {
    Parse(Vec<ParseError>),
    Runtime(Rc<Object>),
}

/// Parses and evaluates a whole script in a fresh environment.
pub fn execute(source: &str) -> Result<Rc<Object>, RunError> {
    let (program, errors) = monkey_syntax::parse(source);
    if !errors.is_empty() {
        return Err(RunError::Parse(errors));
    }

    let mut env = Environment::new();
    let evaluated = evaluator::eval_program(&program, &mut env);
    if evaluated.is_error() {
        return Err(RunError::Runtime(evaluated));
    }
    Ok(evaluated)
}

pub fn run(source: &str) -> ExitCode {
    match execute(source) {
        Ok(value) => {
            if !value.is_null() {
                println!("{}", value);
            }
            ExitCode::SUCCESS
        }
        Err(RunError::Parse(errors)) => {
            for error in errors {
                eprintln!("{}", error);
            }
            ExitCode::FAILURE
        }
        Err(RunError::Runtime(error)) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}
