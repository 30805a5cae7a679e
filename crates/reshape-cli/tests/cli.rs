use std::process::Command;

use predicates::prelude::*;

fn cli_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("reshape"))
}

#[test]
fn cli_converts_json_to_yaml_from_stdin() {
    cli_cmd()
        .arg("--from")
        .arg("json")
        .arg("--to")
        .arg("yaml")
        .write_stdin(r#"{"a":"b","c":["d"]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("a: b"))
        .stdout(predicate::str::contains("- d"));
}

#[test]
fn cli_extracts_an_input_path() {
    cli_cmd()
        .arg("--from")
        .arg("json")
        .arg("--to")
        .arg("json")
        .arg("--input-path")
        .arg("c/0")
        .write_stdin(r#"{"a":"b","c":["d"]}"#)
        .assert()
        .success()
        .stdout("\"d\"\n");
}

#[test]
fn cli_wraps_output_at_a_path() {
    cli_cmd()
        .arg("--from")
        .arg("json")
        .arg("--to")
        .arg("json")
        .arg("--output-path")
        .arg("wrapped")
        .write_stdin(r#"{"a":1}"#)
        .assert()
        .success()
        .stdout("{\"wrapped\":{\"a\":1}}\n");
}

#[test]
fn cli_rejects_unknown_formats() {
    cli_cmd()
        .arg("--from")
        .arg("bogus")
        .arg("--to")
        .arg("json")
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported format: bogus"));
}

#[test]
fn cli_requires_an_output_format() {
    cli_cmd()
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing --to"));
}

#[test]
fn cli_lists_formats() {
    cli_cmd()
        .arg("--list-formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("json"))
        .stdout(predicate::str::contains("yaml"))
        .stdout(predicate::str::contains("properties"));
}

#[test]
fn cli_detects_json_from_content() {
    cli_cmd()
        .arg("--to")
        .arg("yaml")
        .write_stdin(r#"{"k":"v"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("k: v"));
}

#[test]
fn cli_converts_files_by_extension() {
    let dir = std::env::temp_dir().join("reshape-cli-test");
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("rows.csv");
    let output = dir.join("rows.json");
    std::fs::write(&input, "id,name\n1,Ada\n").unwrap();

    let status = Command::new(assert_cmd::cargo::cargo_bin!("reshape"))
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--to")
        .arg("json")
        .status()
        .unwrap();
    assert!(status.success());

    let rendered = std::fs::read_to_string(&output).unwrap();
    assert_eq!(rendered, r#"[{"id":1,"name":"Ada"}]"#);
}
