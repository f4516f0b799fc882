use crate::command::{CommandFactory, ExitCode};
use crate::context::Context;
use crate::env::Environment;
use crate::error::{self, Diagnostic, ShellError};
use crate::input::Input;
use crate::io_adapters::Sink;
use crate::lexer;
use crate::parser::{self, Line};
use std::io::Write;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: built-ins and `ExternalCommand`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A line-oriented shell that executes built-in and external commands.
///
/// The interpreter owns the session [`Context`] and a list of [`CommandFactory`] objects
/// that are queried, in order, to create commands by name. Built-ins come first, so
/// they shadow executables of the same name found on `PATH`.
///
/// Example
/// ```
/// use hsh::Interpreter;
/// let mut sh = Interpreter::default();
/// sh.execute_line("setenv GREETING hello && unsetenv GREETING");
/// assert_eq!(sh.context().status, 0);
/// assert_eq!(sh.context().env.get_var("GREETING"), None);
/// ```
pub struct Interpreter {
    ctx: Context,
    commands: Vec<Box<dyn CommandFactory>>,
    stdout: Sink,
    stderr: Sink,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(ctx: Context, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            ctx,
            commands,
            stdout: Sink::Inherit,
            stderr: Sink::Inherit,
        }
    }

    /// Create an interpreter with the default commands:
    /// - built-ins: `exit`, `env`, `setenv`, `unsetenv`, `alias`, `unalias`, `cd`
    /// - external command launcher
    pub fn with_context(ctx: Context) -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self::new(
            ctx,
            vec![
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<Env>::default()),
                Box::new(Factory::<Setenv>::default()),
                Box::new(Factory::<Unsetenv>::default()),
                Box::new(Factory::<Alias>::default()),
                Box::new(Factory::<Unalias>::default()),
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<ExternalCommand>::default()),
            ],
        )
    }

    /// Redirect command output and diagnostics, e.g. into memory.
    pub fn with_output(mut self, stdout: Sink, stderr: Sink) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// No alias substitution happens here, and the exit status is not recorded.
    /// Fails with [`ShellError::NotFound`] when no factory knows `name`.
    pub fn run(&mut self, name: &str, args: &[&str]) -> anyhow::Result<ExitCode> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.ctx.env, name, args) {
                log::debug!("dispatching {} {:?}", name, args);
                return cmd.execute(self.stdout.stdout(), &mut self.ctx);
            }
        }
        Err(ShellError::NotFound.into())
    }

    /// Execute one argument vector: alias substitution, dispatch, then record the
    /// exit status. Failures are reported as diagnostics, never propagated.
    pub fn execute_tokens(&mut self, tokens: Vec<String>) -> ExitCode {
        let tokens = self.substitute_alias(tokens);
        let Some((name, args)) = tokens.split_first() else {
            // an alias with an empty value
            return self.ctx.status;
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let status = match self.run(name, &args) {
            Ok(code) => code,
            Err(err) => {
                self.report(Some(name), &err);
                error::status_of(&err)
            }
        };
        self.ctx.status = status;
        status
    }

    /// Replaces the first word by its alias value, once. The expansion result is
    /// never looked up again, so aliases referring to aliases cannot loop.
    fn substitute_alias(&self, mut tokens: Vec<String>) -> Vec<String> {
        let alias = match (self.ctx.aliases(), tokens.first()) {
            (Some(table), Some(first)) => table.get(first),
            _ => None,
        };
        let Some(alias) = alias else {
            return tokens;
        };

        log::debug!("alias {} -> {}", alias.name, alias.value);
        let mut expanded = lexer::split_into_tokens(&alias.value);
        expanded.extend(tokens.drain(1..));
        expanded
    }

    /// Execute one raw input line.
    ///
    /// Blank and comment lines are ignored without touching the command index. Other
    /// lines are cut at their control operators and the segments run left to right.
    /// `&&` continues with the rest of the line only if the status so far is zero,
    /// `||` only if it is non-zero; otherwise the rest of the line is dropped. Blank
    /// segments are skipped and leave the status alone.
    pub fn execute_line(&mut self, line: &str) {
        let command = match parser::classify(line) {
            Line::Blank | Line::Comment => return,
            Line::Command(command) => command,
        };
        self.ctx.index += 1;

        let chain = parser::split_operators(command);
        log::trace!("line {}: {:?}", self.ctx.index, chain);

        self.execute_segment(chain.first);
        for (op, segment) in chain.rest {
            if self.ctx.exit_requested().is_some() {
                break;
            }
            if !op.should_run(self.ctx.status) {
                log::trace!("{:?} short-circuits the rest of line {}", op, self.ctx.index);
                break;
            }
            self.execute_segment(segment);
        }
    }

    fn execute_segment(&mut self, segment: &str) {
        let tokens = lexer::split_into_tokens(segment);
        if !tokens.is_empty() {
            self.execute_tokens(tokens);
        }
    }

    /// The execution loop: read lines from `input` until it is exhausted or `exit`
    /// runs, and return the status the shell should terminate with.
    pub fn repl(&mut self, input: &mut Input) -> ExitCode {
        loop {
            let line = match input.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    if input.is_interactive() {
                        if let Err(e) = self.stdout.stdout().write_all(b"\n") {
                            log::warn!("cannot finish the prompt line: {}", e);
                        }
                    }
                    break;
                }
                Err(err) => {
                    log::error!("reading input failed: {:#}", err);
                    self.report(None, &err);
                    break;
                }
            };

            self.execute_line(&line);
            if let Some(code) = self.ctx.exit_requested() {
                log::info!("exit requested with status {}", code);
                return code;
            }
        }

        log::info!("end of input, status {}", self.ctx.status);
        self.ctx.status
    }

    fn report(&self, command: Option<&str>, err: &anyhow::Error) {
        let diagnostic = Diagnostic {
            shell_name: &self.ctx.shell_name,
            index: self.ctx.index,
            command,
            cause: err,
        };
        if let Err(e) = self.stderr.write_line(&diagnostic) {
            log::warn!("cannot write diagnostic: {}", e);
        }
    }
}

impl Default for Interpreter {
    /// Interpreter named `hsh` over a snapshot of the process environment.
    fn default() -> Self {
        Self::with_context(Context::new("hsh", Environment::new()))
    }
}
