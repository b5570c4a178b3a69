use std::rc::Rc;

use monkey_eval::environment::Environment;
use monkey_eval::evaluator;
use monkey_eval::object::Object;
use monkey_syntax::ast::Program;

/// Evaluates each line of a session in the same environment.
pub struct Evaluator {
    environment: Environment,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
        }
    }

    pub fn evaluate(&mut self, program: &Program) -> Rc<Object> {
        evaluator::eval_program(program, &mut self.environment)
    }
}

#[cfg(test)]
mod tests {
    use super::Evaluator;

    #[test]
    fn test_bindings_outlive_the_line() {
        let mut evaluator = Evaluator::new();
        let lines = vec![
            ("let x = 2;", "null"),
            ("let double = fn(n) { n * x };", "null"),
            ("double(21)", "42"),
            ("y", "ERROR: identifier not found: y"),
            ("x", "2"),
        ];

        for (line, expected) in lines {
            let (program, errors) = monkey_syntax::parse(line);
            assert!(errors.is_empty());
            assert_eq!(evaluator.evaluate(&program).to_string(), expected, "line: {}", line);
        }
    }
}
