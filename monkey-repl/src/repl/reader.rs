use monkey_syntax::ast::Program;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

const PROMPT: &str = ">> ";

pub enum ReadOutput {
    Exit,
    Clear,
    Value(Program),
}

pub struct Reader {
    rl: Editor<(), DefaultHistory>,
}

impl Reader {
    pub fn new(rl: Editor<(), DefaultHistory>) -> Self {
        Self { rl }
    }

    pub fn read(&mut self) -> Result<ReadOutput, ReadlineError> {
        let line = match self.rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                return Ok(ReadOutput::Clear);
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                return Ok(ReadOutput::Exit);
            }
            Err(err) => return Err(err),
            Ok(line) => line,
        };
        if line.trim().is_empty() {
            return Ok(ReadOutput::Clear);
        }
        self.rl.add_history_entry(line.as_str())?;

        Ok(parse_line(&line))
    }
}

/// Parse errors are reported here; a line with any of them is dropped.
fn parse_line(line: &str) -> ReadOutput {
    let (program, errors) = monkey_syntax::parse(line);
    if errors.is_empty() {
        return ReadOutput::Value(program);
    }
    for error in &errors {
        println!("{}", error);
    }
    ReadOutput::Clear
}
