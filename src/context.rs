use crate::alias::AliasTable;
use crate::command::ExitCode;
use crate::env::Environment;

/// Process-wide state of one shell session.
///
/// Created once at startup and threaded by reference through the execution loop,
/// the executor and every built-in. Dropping it releases the alias table and the
/// environment store.
#[derive(Debug)]
pub struct Context {
    /// Name the shell was invoked as, used as the prefix of every diagnostic.
    pub shell_name: String,
    /// Environment store handed to children and edited by `setenv`, `unsetenv` and `cd`.
    pub env: Environment,
    aliases: Option<AliasTable>,
    /// Exit status of the most recent command.
    pub status: ExitCode,
    /// Number of command lines read so far; diagnostics only.
    pub index: usize,
    exit: Option<ExitCode>,
}

impl Context {
    pub fn new(shell_name: impl Into<String>, env: Environment) -> Self {
        Self {
            shell_name: shell_name.into(),
            env,
            aliases: None,
            status: 0,
            index: 0,
            exit: None,
        }
    }

    /// The alias table, if any alias was ever defined.
    pub fn aliases(&self) -> Option<&AliasTable> {
        self.aliases.as_ref()
    }

    /// The alias table, created on first use.
    pub fn aliases_mut(&mut self) -> &mut AliasTable {
        self.aliases.get_or_insert_with(AliasTable::default)
    }

    /// Ask the execution loop to stop with `code` once the current command returns.
    pub fn request_exit(&mut self, code: ExitCode) {
        self.exit = Some(code);
    }

    pub fn exit_requested(&self) -> Option<ExitCode> {
        self.exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_table_is_created_lazily() {
        let mut ctx = Context::new("hsh", Environment::default());
        assert!(ctx.aliases().is_none());

        ctx.aliases_mut().define("ll", "ls -l");
        assert!(ctx.aliases().is_some_and(|t| t.get("ll").is_some()));
    }

    #[test]
    fn test_exit_request() {
        let mut ctx = Context::new("hsh", Environment::default());
        assert_eq!(ctx.exit_requested(), None);
        ctx.request_exit(7);
        assert_eq!(ctx.exit_requested(), Some(7));
    }
}
