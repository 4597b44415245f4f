//! End-to-end runs of the `glyph-parse` binary.

use std::path::Path;
use std::process::{Command, Output};

fn glyph_parse(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_glyph-parse"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn tokens_prints_positions_and_kinds() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.glyph"), "$ x = 1\n").unwrap();

    let output = glyph_parse(dir.path()).args(["tokens", "a.glyph"]).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let lines: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(lines[0], "1:1 $ $");
    assert_eq!(lines[1], "1:3 IDENT x");
    assert_eq!(lines.last().map(String::as_str), Some("2:1 EOF "));
}

#[test]
fn syntax_flag_overrides_extension() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.glyph"), "let x = 1\n").unwrap();

    let output = glyph_parse(dir.path()).args(["tokens", "a.glyph", "--syntax", "expanded"]).output().unwrap();
    assert!(stdout(&output).starts_with("1:1 $ let\n"));
}

#[test]
fn parse_json_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("svc.glyphx"), "route GET /ping {\n  return \"pong\"\n}\n").unwrap();

    let output = glyph_parse(dir.path()).args(["parse", "svc.glyphx", "--json"]).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["items"][0]["node"]["Route"]["path"], "/ping");
    assert_eq!(value["items"][0]["node"]["Route"]["method"], "Get");
}

#[test]
fn check_reports_each_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("good.glyph"), ": User {\n  id: int\n}\n").unwrap();
    std::fs::write(dir.path().join("bad.glyph"), ": User\n").unwrap();

    let output = glyph_parse(dir.path()).args(["check", "good.glyph", "bad.glyph"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("ok good.glyph"));
    let err = stderr(&output);
    assert!(err.contains("Error at line 1, column 7:"));
    assert!(err.contains("1 of 2 file(s) failed"));
}

#[test]
fn check_json_format() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.glyph"), "$ x = 1;\n").unwrap();

    let output = glyph_parse(dir.path()).args(["--format", "json", "check", "bad.glyph"]).output().unwrap();
    assert!(!output.status.success());
    let first = stderr(&output).lines().next().unwrap_or_default().to_string();
    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(value["kind"], "lex");
    assert_eq!(value["column"], 8);
    assert_eq!(value["file"], "bad.glyph");
}

#[test]
fn config_file_maps_extensions() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("glyph.toml"), "[syntax]\nexpanded_extensions = [\"gx\"]\n").unwrap();
    std::fs::write(dir.path().join("api.gx"), "func ok() {\n  return 1\n}\n").unwrap();

    let output = glyph_parse(dir.path()).args(["check", "api.gx"]).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "ok api.gx");
}

#[test]
fn broken_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("glyph.toml"), "[syntax\n").unwrap();
    std::fs::write(dir.path().join("a.glyph"), "").unwrap();

    let output = glyph_parse(dir.path()).args(["check", "a.glyph"]).output().unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid syntax"));
}
