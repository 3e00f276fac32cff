use std::process::Command;

#[test]
fn test_help_lists_both_synthesis_steps() {
    let bin = env!("CARGO_BIN_EXE_stagehand");

    let output = Command::new(bin).arg("--help").output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("postprocess"),
        "help should list the postprocess subcommand; got:\n{}",
        stdout
    );
    assert!(
        stdout.contains("generate"),
        "help should list the generate subcommand; got:\n{}",
        stdout
    );
}

#[test]
fn test_missing_subcommand_is_an_error() {
    let bin = env!("CARGO_BIN_EXE_stagehand");

    let output = Command::new(bin).output().unwrap();

    assert!(!output.status.success());
}
