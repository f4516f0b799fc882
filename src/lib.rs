//! A small, line-oriented command interpreter.
//!
//! Lines are read from a terminal, a pipe or a script file. Each line may chain
//! several commands with `;`, `&&` and `||`; every command is split on whitespace,
//! its first word is checked against the alias table, and it is then run either as
//! a built-in (`exit`, `env`, `setenv`, `unsetenv`, `alias`, `unalias`, `cd`) or as
//! an external program found through `PATH`.
//!
//! The main entry point is [`Interpreter`], which owns the session [`Context`]
//! (environment, aliases, last exit status) and drives the read-execute loop over an
//! [`Input`].

pub mod alias;
mod builtin;
pub mod command;
pub mod context;
pub mod env;
pub mod error;
mod external;
pub mod input;
mod interpreter;
pub mod io_adapters;
mod lexer;
mod parser;

pub use context::Context;
pub use env::Environment;
pub use error::{Diagnostic, ShellError};
pub use input::Input;
pub use interpreter::Interpreter;
pub use io_adapters::Sink;

/// Serializes tests that change or depend on the process working directory.
#[cfg(test)]
pub(crate) fn lock_current_dir() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
