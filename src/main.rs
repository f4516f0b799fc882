use argh::FromArgs;
use hsh::{Context, Diagnostic, Environment, Input, Interpreter, ShellError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(FromArgs)]
/// A small line-oriented command interpreter.
/// Reads commands from standard input, or from a script file when one is given.
struct Args {
    #[argh(positional)]
    /// file to read commands from instead of standard input.
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("HSH_LOG", "off")).init();

    let args: Args = argh::from_env();
    let shell_name = std::env::args().next().unwrap_or_else(|| "hsh".to_string());
    // the environment is captured before the script is opened
    let ctx = Context::new(shell_name, Environment::new());

    let mut input = match &args.script {
        Some(path) => match Input::script(path) {
            Ok(input) => input,
            Err(err) => {
                log::debug!("cannot open {}: {}", path.display(), err);
                let cause = ShellError::CannotOpen(path.display().to_string());
                eprintln!(
                    "{}",
                    Diagnostic {
                        shell_name: &ctx.shell_name,
                        index: ctx.index,
                        command: None,
                        cause: &cause,
                    }
                );
                return ExitCode::from(cause.status() as u8);
            }
        },
        None => match Input::stdin() {
            Ok(input) => input,
            Err(err) => {
                eprintln!("{}: {:#}", ctx.shell_name, err);
                return ExitCode::FAILURE;
            }
        },
    };
    log::info!("starting, interactive: {}", input.is_interactive());

    let mut interpreter = Interpreter::with_context(ctx);
    let status = interpreter.repl(&mut input);
    ExitCode::from(status.rem_euclid(256) as u8)
}
