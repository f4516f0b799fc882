use std::io::Write;
use std::process::{Command, Output, Stdio};

const HSH: &str = env!("CARGO_BIN_EXE_hsh");

fn run_piped(script: &str) -> Output {
    let mut child = Command::new(HSH)
        .env("PATH", "/bin:/usr/bin")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn hsh");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    child.wait_with_output().expect("wait for hsh")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn script_file_runs_lines_in_order_then_exits() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    writeln!(script, "echo a").unwrap();
    writeln!(script, "exit").unwrap();
    writeln!(script, "echo never").unwrap();

    let output = Command::new(HSH)
        .arg(script.path())
        .env("PATH", "/bin:/usr/bin")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "a\n");
    assert_eq!(stderr(&output), "");
}

#[test]
fn missing_script_is_fatal() {
    let output = Command::new(HSH)
        .arg("/nonexistent/hsh_script")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr(&output).ends_with(": 0: Can't open /nonexistent/hsh_script\n"),
        "unexpected diagnostic: {}",
        stderr(&output)
    );
}

#[test]
fn exit_with_status() {
    let output = run_piped("exit 7\n");
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn exit_with_illegal_number_keeps_running() {
    let output = run_piped("exit abc\necho still here\n");
    assert_eq!(stdout(&output), "still here\n");
    assert!(stderr(&output).contains(": 1: exit: Illegal number: abc"));
    // end of input leaves the status of the last command
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn command_not_found() {
    let output = run_piped("zzzznotacommand\n");
    assert_eq!(output.status.code(), Some(127));
    assert!(stderr(&output).contains(": 1: zzzznotacommand: not found"));
}

#[test]
fn operators_short_circuit() {
    let output = run_piped(
        "true && echo and-ran\n\
         false && echo and-skipped\n\
         false || echo or-ran\n\
         true || echo or-skipped\n\
         false ; echo seq-ran\n\
         false && echo dropped ; echo dropped-too\n\
         true || echo dropped && echo dropped-too\n",
    );
    assert_eq!(stdout(&output), "and-ran\nor-ran\nseq-ran\n");
}

#[test]
fn comments_and_blank_lines_are_silent() {
    let output = run_piped("# nothing\n\n   \n\t# still nothing\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "");
    assert_eq!(stderr(&output), "");
}

#[test]
fn environment_builtins_reach_children() {
    let output = run_piped(
        "setenv HSH_TEST_VAR hello\n\
         printenv HSH_TEST_VAR\n\
         unsetenv HSH_TEST_VAR\n\
         env\n",
    );
    let out = stdout(&output);
    assert!(out.starts_with("hello\n"), "unexpected output: {}", out);
    assert!(!out.contains("HSH_TEST_VAR="));
}

#[test]
fn setenv_without_arguments_fails() {
    let output = run_piped("setenv\n");
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains(": 1: setenv: Unable to add/remove from environment"));
}

#[test]
fn alias_expands_once() {
    let output = run_piped("alias hi='echo hello'\nhi world\nalias hey=hi\nhey\n");
    assert_eq!(stdout(&output), "hello world\n");
    assert_eq!(output.status.code(), Some(127));
    assert!(stderr(&output).contains(": 4: hi: not found"));
}

#[test]
fn cd_changes_directory_of_children() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = std::fs::canonicalize(dir.path()).unwrap();
    let output = run_piped(&format!("cd {}\npwd\n", canonical.display()));
    assert_eq!(stdout(&output), format!("{}\n", canonical.display()));
}
