use crate::command::Stdout;
use std::cell::RefCell;
use std::io::{self, Result as IoResult, Write};
use std::process::Stdio;
use std::rc::Rc;

/// Memory-backed writer for capturing output of builtins.
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// Writer appending to an existing shared buffer.
    pub fn shared(buf: Rc<RefCell<Vec<u8>>>) -> Self {
        Self { buf }
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

impl Stdout for MemWriter {
    /// Child processes cannot write into process memory; their output is discarded.
    fn stdio(self: Box<Self>) -> Stdio {
        Stdio::null()
    }
}

/// Destination of the interpreter's standard output or diagnostics.
#[derive(Clone, Default)]
pub enum Sink {
    /// The shell's own standard stream.
    #[default]
    Inherit,
    /// An in-memory buffer, for embedding and tests.
    Memory(Rc<RefCell<Vec<u8>>>),
}

impl Sink {
    /// New in-memory sink together with a handle to read what was written.
    pub fn memory() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let buf = Rc::new(RefCell::new(Vec::new()));
        (Sink::Memory(buf.clone()), buf)
    }

    /// Output stream handed to a command.
    pub fn stdout(&self) -> Box<dyn Stdout> {
        match self {
            Sink::Inherit => Box::new(io::stdout()),
            Sink::Memory(buf) => Box::new(MemWriter::shared(buf.clone())),
        }
    }

    /// Write one full line to the error stream this sink stands for.
    pub fn write_line(&self, line: &dyn std::fmt::Display) -> IoResult<()> {
        match self {
            Sink::Inherit => writeln!(io::stderr().lock(), "{}", line),
            Sink::Memory(buf) => writeln!(buf.borrow_mut(), "{}", line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_output_and_lines() {
        let (sink, buf) = Sink::memory();

        let mut out = sink.stdout();
        write!(out, "a").unwrap();
        sink.write_line(&"b").unwrap();

        assert_eq!(String::from_utf8(buf.borrow().clone()).unwrap(), "ab\n");
    }
}
