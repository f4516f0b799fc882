use crate::error::ShellError;
use regex::Regex;
use std::env as stdenv;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Mutable, shell-level view of the process environment.
///
/// Variables are kept as ordered `KEY=VALUE` entries: `env` lists them in the
/// order they were first defined, and external commands receive exactly this set
/// (nothing leaks in from the real process environment once the shell started).
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: Vec<(String, String)>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
}

fn valid_name(name: &str) -> bool {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"))
        .is_match(name)
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// Variables that are not valid UTF-8 are skipped.
    pub fn new() -> Self {
        let vars = stdenv::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { vars, current_dir }
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set or override an environment variable.
    ///
    /// Fails without touching the store when `key` is not a valid variable name.
    pub fn set_var(
        &mut self,
        key: impl Into<String>,
        val: impl Into<String>,
    ) -> Result<(), ShellError> {
        let key = key.into();
        if !valid_name(&key) {
            return Err(ShellError::Environment);
        }
        let val = val.into();
        match self.vars.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = val,
            None => self.vars.push((key, val)),
        }
        Ok(())
    }

    /// Remove a variable. Removing an absent variable succeeds.
    pub fn unset_var(&mut self, key: &str) -> Result<(), ShellError> {
        if !valid_name(key) {
            return Err(ShellError::Environment);
        }
        self.vars.retain(|(k, _)| k != key);
        Ok(())
    }

    /// Iterate over `(key, value)` pairs in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialized `KEY=VALUE` view of the store.
    pub fn entries(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::default();

        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE").unwrap();
        assert_eq!(env.get_var("KEY"), Some("VALUE"));

        env.set_var("KEY", "OTHER").unwrap();
        assert_eq!(env.get_var("KEY"), Some("OTHER"));
        assert_eq!(env.entries(), vec!["KEY=OTHER".to_string()]);
    }

    #[test]
    fn test_env_keeps_definition_order() {
        let mut env = Environment::default();
        env.set_var("B", "2").unwrap();
        env.set_var("A", "1").unwrap();
        env.set_var("B", "3").unwrap();

        assert_eq!(env.entries(), vec!["B=3", "A=1"]);
    }

    #[test]
    fn test_env_unset_var() {
        let mut env = Environment::default();
        env.set_var("GONE", "x").unwrap();
        env.unset_var("GONE").unwrap();
        assert_eq!(env.get_var("GONE"), None);

        // absent name is not an error
        assert!(env.unset_var("NEVER_SET").is_ok());
    }

    #[test]
    fn test_env_rejects_invalid_names() {
        let mut env = Environment::default();
        env.set_var("OK", "1").unwrap();

        assert!(env.set_var("", "x").is_err());
        assert!(env.set_var("A=B", "x").is_err());
        assert!(env.set_var("1ABC", "x").is_err());
        assert!(env.unset_var("A=B").is_err());

        assert_eq!(env.entries(), vec!["OK=1"]);
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }
}
