mod evaluator;
mod printer;
mod reader;

use rustyline::DefaultEditor;

use evaluator::Evaluator;
use printer::Printer;
use reader::{ReadOutput, Reader};

struct Repl {
    reader: Reader,
    evaluator: Evaluator,
    printer: Printer<std::io::Stdout>,
}

impl Repl {
    fn run(mut self) -> anyhow::Result<()> {
        loop {
            match self.reader.read()? {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Value(program) => {
                    let result = self.evaluator.evaluate(&program);
                    self.printer.print(&result)?;
                }
            }
        }
        Ok(())
    }
}

/// Runs an interactive session until end of input. Bindings made by one
/// line stay visible to the following ones.
pub fn start() -> anyhow::Result<()> {
    let rl = DefaultEditor::new()?;

    Repl {
        reader: Reader::new(rl),
        evaluator: Evaluator::new(),
        printer: Printer::new(std::io::stdout()),
    }
    .run()
}
