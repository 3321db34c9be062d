// Runs the `stencil` binary against the library's fixtures
use std::path::PathBuf;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../stencil/tests/fixtures")
        .join(name)
}

fn stencil(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stencil"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run stencil")
}

#[test]
fn test_render_with_definition() {
    let template = fixture("greeting.tmpl");
    let output = stencil(&[template.to_str().unwrap(), "-D", "name=World"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Hello World!\n2 + 2 = 4\n"
    );
}

#[test]
fn test_later_definition_wins() {
    let template = fixture("greeting.tmpl");
    let output = stencil(&[
        template.to_str().unwrap(),
        "-D",
        "name=first",
        "-D",
        "name=second",
    ]);
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Hello second!"));
}

#[test]
fn test_compilation_error_exits_with_diagnostic() {
    let template = fixture("broken.tmpl");
    let output = stencil(&[template.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown symbol `nope`"), "{}", stderr);
    assert!(stderr.contains(" --> 1:19"), "{}", stderr);
}

#[test]
fn test_missing_template() {
    let output = stencil(&["no/such/file.tmpl"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read template"));
}

#[test]
fn test_identical_delimiters_are_rejected() {
    let template = fixture("simple.tmpl");
    let output = stencil(&[template.to_str().unwrap(), "--open", "%%", "--close", "%%"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid delimiters"));
}
