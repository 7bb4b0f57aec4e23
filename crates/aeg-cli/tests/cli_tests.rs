use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn aeg(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aeg"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("aeg should run")
}

#[test]
fn expand_prints_extension() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Color.swift"),
        "@AppEnumGen\nenum Color { case red }\n",
    )
    .unwrap();

    let output = aeg(dir.path(), &["expand", "-i", "Color.swift"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("enum Color { case red }\n\nextension Color: AppEnum {\n"));
}

#[test]
fn expand_reports_errors_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("S.swift"), "@AppEnumGen\nstruct S {}\n").unwrap();

    let output = aeg(dir.path(), &["expand", "-i", "S.swift"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("de.amaider.SwiftMacros.notAnEnum"));
    assert!(stderr.contains("'@AppEnumGen' can only be applied to an 'enum'"));
    assert!(stderr.contains("S.swift:1:1"));
}

#[test]
fn fix_uses_config_from_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".aeg.yaml"),
        "fixit:\n  insert_missing_inheritance: true\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Color.swift"),
        "@AppEnumGenFixIt\nenum Color {\n    case red\n}\n",
    )
    .unwrap();

    let output = aeg(dir.path(), &["fix", "-i", "Color.swift", "--write"]);
    assert!(output.status.success());
    let written = fs::read_to_string(dir.path().join("Color.swift")).unwrap();
    assert!(written.starts_with("//@AppEnumGenFixIt\nenum Color: AppEnum {\n    case red\n"));
}

#[test]
fn macros_lists_both() {
    let dir = tempfile::tempdir().unwrap();
    let output = aeg(dir.path(), &["macros"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "@AppEnumGen  (AppEnum)\n@AppEnumGenFixIt  (AppEnum)\n"
    );
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    assert!(aeg(dir.path(), &["init"]).status.success());
    assert!(dir.path().join(".aeg.yaml").exists());
    assert!(!aeg(dir.path(), &["init"]).status.success());
    assert!(aeg(dir.path(), &["init", "--force"]).status.success());
}

#[test]
fn inspect_as_json() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Color.swift"),
        "enum Color: String { case red, green }\n",
    )
    .unwrap();

    let output = aeg(dir.path(), &["inspect", "-i", "Color.swift", "--format", "json"]);
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["enums"][0]["cases"], serde_json::json!(["red", "green"]));
}
