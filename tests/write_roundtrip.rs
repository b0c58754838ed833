// Roundtrip test: brain2bool translates Brainfuck, boof runs the result, and
// the output matches what the Brainfuck program prints.
use std::io::Write;

fn translate(bf_code: &str) -> tempfile::NamedTempFile {
    let mut cmd_gen = assert_cmd::Command::cargo_bin("brain2bool").expect("brain2bool binary");
    let assert = cmd_gen.write_stdin(bf_code).assert().success();
    let generated = assert.get_output().stdout.clone();
    assert!(!generated.is_empty(), "translator should produce code");

    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    tf.write_all(&generated).unwrap();
    tf
}

fn boof() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("boof").expect("boof binary");
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("boof-tests-no-config"))
        .env_remove("BOOF_STRICT")
        .env_remove("BOOF_PAGE_BYTES");
    cmd
}

#[test]
fn translated_multiplication_prints_letter() {
    let tf = translate("++++++++[>++++++++<-]>+.");
    boof().arg(tf.path()).assert().success().stdout("A\n");
}

#[test]
fn translated_cat_echoes_input_until_eof() {
    let tf = translate(",[.,]");
    boof()
        .arg(tf.path())
        .write_stdin("hi")
        .assert()
        .success()
        .stdout("hi\n");
}

#[test]
fn translated_program_runs_in_strict_mode() {
    // The translation's loop sequences are balanced at run time.
    let tf = translate("+[-]++.");
    boof()
        .arg("--strict")
        .arg(tf.path())
        .assert()
        .success()
        .stdout(vec![2u8, b'\n']);
}
