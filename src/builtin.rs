use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Stdout};
use crate::context::Context;
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use regex::Regex;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "exit" or "cd".
    fn name() -> &'static str;

    /// Executes the command against the session state.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    /// Errors are reported by the interpreter; a [`ShellError`] decides the exit status.
    fn execute(self, stdout: &mut dyn Write, ctx: &mut Context) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, mut stdout: Box<dyn Stdout>, ctx: &mut Context) -> Result<ExitCode> {
        let code = <T as BuiltinCommand>::execute(*self, &mut stdout, ctx)?;
        stdout.flush()?;
        Ok(code)
    }
}

/// Outcome of a failed `argh` parse: `--help` output or a usage error.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, mut stdout: Box<dyn Stdout>, _ctx: &mut Context) -> Result<ExitCode> {
        if self.is_error {
            return Err(ShellError::Usage(self.output.trim_end().to_string()).into());
        }
        stdout.write_all(self.output.as_bytes())?;
        Ok(0)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

#[derive(FromArgs)]
/// Exit the shell.
/// Without a status, the status of the last command is used.
pub struct Exit {
    #[argh(positional)]
    /// non-negative exit status, taken modulo 256.
    pub status: Option<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, ctx: &mut Context) -> Result<ExitCode> {
        let code = match self.status {
            None => ctx.status,
            Some(arg) => parse_status(arg)?,
        };
        ctx.request_exit(code);
        Ok(code)
    }
}

fn parse_status(arg: String) -> Result<ExitCode, ShellError> {
    match arg.parse::<ExitCode>() {
        Ok(n) if n >= 0 => Ok(n % 256),
        _ => Err(ShellError::IllegalNumber(arg)),
    }
}

#[derive(FromArgs)]
/// Print the environment, one KEY=VALUE entry per line.
pub struct Env {}

impl BuiltinCommand for Env {
    fn name() -> &'static str {
        "env"
    }

    fn execute(self, stdout: &mut dyn Write, ctx: &mut Context) -> Result<ExitCode> {
        for entry in ctx.env.entries() {
            writeln!(stdout, "{}", entry)?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Set an environment variable, overwriting any previous value.
pub struct Setenv {
    #[argh(positional, greedy)]
    /// variable name followed by an optional value (empty when omitted).
    pub args: Vec<String>,
}

impl BuiltinCommand for Setenv {
    fn name() -> &'static str {
        "setenv"
    }

    fn execute(self, _stdout: &mut dyn Write, ctx: &mut Context) -> Result<ExitCode> {
        match self.args.as_slice() {
            [name] => ctx.env.set_var(name.as_str(), "")?,
            [name, value] => ctx.env.set_var(name.as_str(), value.as_str())?,
            _ => return Err(ShellError::Environment.into()),
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Remove a variable from the environment.
pub struct Unsetenv {
    #[argh(positional, greedy)]
    /// name of the variable to remove.
    pub args: Vec<String>,
}

impl BuiltinCommand for Unsetenv {
    fn name() -> &'static str {
        "unsetenv"
    }

    fn execute(self, _stdout: &mut dyn Write, ctx: &mut Context) -> Result<ExitCode> {
        match self.args.as_slice() {
            [name] => ctx.env.unset_var(name)?,
            _ => return Err(ShellError::Environment.into()),
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Define or print aliases.
/// Without arguments, every alias is printed as name='value'.
pub struct Alias {
    #[argh(positional, greedy)]
    /// name=value to define an alias, or name to print it.
    pub definitions: Vec<String>,
}

impl BuiltinCommand for Alias {
    fn name() -> &'static str {
        "alias"
    }

    fn execute(self, stdout: &mut dyn Write, ctx: &mut Context) -> Result<ExitCode> {
        if self.definitions.is_empty() {
            for alias in ctx.aliases().into_iter().flat_map(|table| table.iter()) {
                writeln!(stdout, "{}", alias)?;
            }
            return Ok(0);
        }

        let mut missing = Vec::new();
        for word in join_quoted(&self.definitions) {
            if let Some((name, value)) = parse_definition(&word) {
                ctx.aliases_mut().define(name, value);
                continue;
            }
            match ctx.aliases().and_then(|table| table.get(&word)) {
                Some(alias) => writeln!(stdout, "{}", alias)?,
                None => missing.push(word),
            }
        }

        if missing.is_empty() {
            Ok(0)
        } else {
            Err(ShellError::AliasNotFound(missing.join(" ")).into())
        }
    }
}

/// Re-joins a single-quoted alias value that the tokenizer split on whitespace,
/// e.g. `ll='ls` `-l'` becomes `ll='ls -l'`.
fn join_quoted(words: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut open: Option<String> = None;

    for word in words {
        if let Some(mut acc) = open.take() {
            acc.push(' ');
            acc.push_str(word);
            if word.ends_with('\'') {
                out.push(acc);
            } else {
                open = Some(acc);
            }
            continue;
        }

        let opens_quote = word
            .split_once("='")
            .is_some_and(|(_, value)| !value.ends_with('\''));
        if opens_quote {
            open = Some(word.clone());
        } else {
            out.push(word.clone());
        }
    }

    // unterminated quote: keep what we have
    out.extend(open);
    out
}

/// Splits `name=value`, dropping the single quotes around the value.
fn parse_definition(word: &str) -> Option<(&str, &str)> {
    static DEFINITION: OnceLock<Regex> = OnceLock::new();
    let re = DEFINITION.get_or_init(|| Regex::new(r"^([^=]+)=(.*)$").expect("valid regex"));

    let caps = re.captures(word)?;
    let name = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str();
    let value = match value.strip_prefix('\'') {
        Some(inner) => inner.strip_suffix('\'').unwrap_or(inner),
        None => value,
    };
    Some((name, value))
}

#[derive(FromArgs)]
/// Remove aliases.
pub struct Unalias {
    #[argh(positional, greedy)]
    /// names of the aliases to remove.
    pub names: Vec<String>,
}

impl BuiltinCommand for Unalias {
    fn name() -> &'static str {
        "unalias"
    }

    fn execute(self, _stdout: &mut dyn Write, ctx: &mut Context) -> Result<ExitCode> {
        if self.names.is_empty() {
            return Err(ShellError::Usage("usage: unalias name [name ...]".to_string()).into());
        }

        let mut missing = Vec::new();
        for name in self.names {
            if ctx.aliases_mut().remove(&name).is_none() {
                missing.push(name);
            }
        }

        if missing.is_empty() {
            Ok(0)
        } else {
            Err(ShellError::AliasNotFound(missing.join(" ")).into())
        }
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory. Defaults to $HOME when omitted.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, ctx: &mut Context) -> Result<ExitCode> {
        let target = match self.target {
            Some(t) if !t.is_empty() => t,
            _ => match ctx.env.get_var("HOME") {
                Some(home) => home.to_string(),
                // nothing to do, like sh
                None => return Ok(0),
            },
        };

        let path = PathBuf::from(&target);
        let new_dir = if path.is_absolute() {
            path
        } else {
            ctx.env.current_dir.join(path)
        };

        let canonical = fs::canonicalize(&new_dir)
            .and_then(|dir| env::set_current_dir(&dir).map(|_| dir))
            .map_err(|e| {
                log::debug!("cd to {} failed: {}", new_dir.display(), e);
                ShellError::CannotCd(target)
            })?;

        let pwd = canonical.to_string_lossy().into_owned();
        let previous = std::mem::replace(&mut ctx.env.current_dir, canonical);
        ctx.env.set_var("OLDPWD", previous.to_string_lossy())?;
        ctx.env.set_var("PWD", pwd)?;
        Ok(0)
    }
}
