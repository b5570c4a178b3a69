use std::io::Write;

use monkey_eval::object::Object;

pub struct Printer<W: Write> {
    out: W,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes the value of a line. `null` results are not shown.
    pub fn print(&mut self, object: &Object) -> std::io::Result<()> {
        if object.is_null() {
            return Ok(());
        }
        writeln!(self.out, "{}", object)?;
        self.out.flush()
    }
}
