//! Splitting of a single command into words.

/// Characters that separate words.
pub const DELIMITERS: &[char] = &[' ', '\t', '\n'];

/// Splits a command into an argument vector.
///
/// Runs of delimiters collapse, so no empty word is ever produced. A line made only
/// of delimiters yields an empty vector; callers must not dispatch it.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    line.split(DELIMITERS)
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .collect()
}
