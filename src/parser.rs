//! Line classification and control operator parsing.
//!
//! A raw line is first classified (blank, comment or command). Command lines are
//! then cut at every control operator into a flat [`Chain`] of segments, which the
//! interpreter walks left to right applying the short-circuit rules.

use crate::command::ExitCode;
use crate::lexer::DELIMITERS;

/// Marker that starts a comment running to the end of the line.
pub const COMMENT: char = '#';

/// Kind of a raw input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Nothing but delimiters.
    Blank,
    /// First non-blank character is the comment marker.
    Comment,
    /// Anything else, with a trailing comment (if any) removed.
    Command(&'a str),
}

/// Control operator joining two commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `;` - always run the next command.
    Sequence,
    /// `&&` - run the rest of the line only after a success.
    And,
    /// `||` - run the rest of the line only after a failure.
    Or,
}

impl Operator {
    /// Whether the rest of the line after this operator runs, given the status of
    /// the command before it.
    pub fn should_run(self, status: ExitCode) -> bool {
        match self {
            Operator::Sequence => true,
            Operator::And => status == 0,
            Operator::Or => status != 0,
        }
    }

    fn len(self) -> usize {
        match self {
            Operator::Sequence => 1,
            Operator::And | Operator::Or => 2,
        }
    }
}

/// A command line cut at its control operators.
///
/// Segments are raw, untokenized text and may be blank (e.g. `; ls` or `ls &&`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain<'a> {
    pub first: &'a str,
    pub rest: Vec<(Operator, &'a str)>,
}

/// Classifies a raw line and strips a trailing comment.
///
/// A `#` only starts a comment at the beginning of a word, so `echo a#b` keeps its
/// argument intact.
pub fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim_start_matches(DELIMITERS);
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed.starts_with(COMMENT) {
        return Line::Comment;
    }

    let mut prev_is_delimiter = false;
    for (pos, ch) in line.char_indices() {
        if ch == COMMENT && prev_is_delimiter {
            return Line::Command(&line[..pos]);
        }
        prev_is_delimiter = DELIMITERS.contains(&ch);
    }
    Line::Command(line)
}

/// Cuts `line` at every control operator.
pub fn split_operators(line: &str) -> Chain<'_> {
    let (first, mut tail) = match find_operator(line) {
        Some((pos, op)) => (&line[..pos], Some((op, &line[pos + op.len()..]))),
        None => (line, None),
    };

    let mut rest = Vec::new();
    while let Some((op, remaining)) = tail {
        match find_operator(remaining) {
            Some((pos, next)) => {
                rest.push((op, &remaining[..pos]));
                tail = Some((next, &remaining[pos + next.len()..]));
            }
            None => {
                rest.push((op, remaining));
                tail = None;
            }
        }
    }

    Chain { first, rest }
}

/// Finds the leftmost control operator. Lone `&` and `|` are ordinary characters.
fn find_operator(line: &str) -> Option<(usize, Operator)> {
    let bytes = line.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        let next = bytes.get(pos + 1).copied();
        match (bytes[pos], next) {
            (b';', _) => return Some((pos, Operator::Sequence)),
            (b'&', Some(b'&')) => return Some((pos, Operator::And)),
            (b'|', Some(b'|')) => return Some((pos, Operator::Or)),
            _ => pos += 1,
        }
    }
    None
}
