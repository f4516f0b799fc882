//! Line sources for the execution loop.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::path::Path;

/// Prompt printed before every interactive line.
pub const PROMPT: &str = "$ ";

/// Where command lines come from.
pub enum Input {
    /// A live terminal: prompt and line editor.
    Terminal(DefaultEditor),
    /// Standard input that is not a terminal (a pipe or redirected file).
    Piped(io::Stdin),
    /// A script file, or any other buffered reader.
    Script(Box<dyn BufRead>),
}

impl Input {
    /// Standard input, interactive if it is attached to a terminal.
    pub fn stdin() -> Result<Self> {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            Ok(Input::Terminal(DefaultEditor::new()?))
        } else {
            Ok(Input::Piped(stdin))
        }
    }

    /// Commands read from the file at `path`.
    pub fn script(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Input::Script(Box::new(BufReader::new(file))))
    }

    pub fn from_reader(reader: impl BufRead + 'static) -> Self {
        Input::Script(Box::new(reader))
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Input::Terminal(_))
    }

    /// Next line without its terminator, or `None` once the source is exhausted.
    ///
    /// Ctrl-C at the prompt discards the line being typed and yields an empty one.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self {
            Input::Terminal(editor) => match editor.readline(PROMPT) {
                Ok(line) => Ok(Some(line)),
                Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
                Err(ReadlineError::Eof) => Ok(None),
                Err(err) => Err(err.into()),
            },
            Input::Piped(stdin) => read_raw_line(&mut stdin.lock()),
            Input::Script(reader) => read_raw_line(reader),
        }
    }
}

fn read_raw_line(reader: &mut dyn BufRead) -> Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
