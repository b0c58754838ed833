use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("brain2bool").unwrap();
    cmd.env_remove("BOOF_LOG");
    cmd
}

#[test]
fn translates_stdin_one_line_per_instruction() {
    cargo_bin()
        .write_stdin("<x>")
        .assert()
        .success()
        .stdout("<<<<<<<<<\n>>>>>>>>>\n");
}

#[test]
fn empty_input_gives_empty_output() {
    cargo_bin()
        .write_stdin("no instructions")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn reads_file_and_writes_output_file() {
    let mut src = tempfile::NamedTempFile::new().unwrap();
    write!(src, ".,").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.bool");

    cargo_bin()
        .arg("-o")
        .arg(&out)
        .arg(src.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, ">;>;>;>;>;>;>;>;<<<<<<<<\n>,>,>,>,>,>,>,>,<<<<<<<<\n");
}

#[test]
fn missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .arg(dir.path().join("absent.bf"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.bf"));
}

#[test]
fn help_and_version() {
    cargo_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OUTPUT-FILE"));
    cargo_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("brain2bool"));
}
