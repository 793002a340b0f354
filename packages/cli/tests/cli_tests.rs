//! Runs the `screenweave` binary against files in a temporary directory

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SCREEN: &str = r#"export default function Home() {
  return (
    <div>
      <button id="save" class="primary">Save</button>
    </div>
  );
}
"#;

fn screenweave(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_screenweave"))
        .current_dir(cwd)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn write_screen(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("Home.tsx");
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_inspect_prints_components() {
    let dir = tempfile::tempdir().unwrap();
    write_screen(dir.path(), SCREEN);

    let output = screenweave(dir.path(), &["inspect", "Home.tsx"]);
    assert!(output.status.success());

    let components: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(components[0]["id"], "save");
    assert_eq!(components[0]["properties"]["class"], "primary");
    assert_eq!(components[0]["properties"]["children"], "Save");
}

#[test]
fn test_roundtrip_reports_identical_output() {
    let dir = tempfile::tempdir().unwrap();
    write_screen(dir.path(), SCREEN);

    let output = screenweave(dir.path(), &["roundtrip", "Home.tsx"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Home.tsx"));
}

#[test]
fn test_set_prop_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_screen(dir.path(), SCREEN);

    let output = screenweave(
        dir.path(),
        &["set-prop", "Home.tsx", "--id", "save", "--prop", "disabled", "--value", "true"],
    );
    assert!(output.status.success());
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        SCREEN.replace(r#"class="primary">"#, r#"class="primary" disabled>"#)
    );
}

#[test]
fn test_set_prop_unknown_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_screen(dir.path(), SCREEN);

    let output = screenweave(
        dir.path(),
        &["set-prop", "Home.tsx", "--id", "nope", "--prop", "class", "--value", "x"],
    );
    assert!(!output.status.success());
    assert_eq!(std::fs::read_to_string(path).unwrap(), SCREEN);
}

#[test]
fn test_add_appends_component() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_screen(dir.path(), SCREEN);

    let output = screenweave(
        dir.path(),
        &[
            "add", "Home.tsx", "--type", "Button", "--id", "cancel", "--no-defaults",
            "--prop", "children=Cancel",
        ],
    );
    assert!(output.status.success());

    let text = std::fs::read_to_string(path).unwrap();
    assert!(text.contains(
        "      <button id=\"save\" class=\"primary\">Save</button>\n      <button id=\"cancel\">Cancel</button>\n    </div>"
    ));
}

#[test]
fn test_parse_errors_leave_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let broken = "export default function Home() { return <div><span></div>; }";
    let path = write_screen(dir.path(), broken);

    let output = screenweave(dir.path(), &["add", "Home.tsx", "--type", "Button"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not parse"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), broken);
}

#[test]
fn test_config_vocabulary_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("screenweave.config.json"),
        r#"{ "vocabulary": { "Link": "a" } }"#,
    )
    .unwrap();
    write_screen(
        dir.path(),
        r#"export default function Home() { return <nav><a id="docs">Docs</a></nav>; }"#,
    );

    let output = screenweave(dir.path(), &["inspect", "--compact", "Home.tsx"]);
    assert!(output.status.success());
    let components: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(components[0]["typeTag"], "Link");
}

#[test]
fn test_set_prop_rejects_bad_property_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_screen(dir.path(), SCREEN);

    let output = screenweave(
        dir.path(),
        &["set-prop", "Home.tsx", "--id", "save", "--prop", "my label", "--value", "x"],
    );
    assert!(!output.status.success());
    assert_eq!(std::fs::read_to_string(path).unwrap(), SCREEN);
}
