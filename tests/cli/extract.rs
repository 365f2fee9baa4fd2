use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, stderr, stdout};

const APP: &str = "alert(\"你好\");\n";

#[test]
fn test_dry_run_previews_rewrites() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;

    let output = test.extract_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        r#"  --> src/app.js:1:7
   |
 1 | alert("你好");
   |       ^ 652829 "你好"

Would rewrite 1 literal(s) in 1 file(s).
Run with --out-dir <DIR> to write the rewritten files.
✓ Processed 1 source file: 1 occurrence(s), 1 text(s) in ./i18n_messages/i18n.json
"#
    );
    assert_eq!(test.read_file("src/app.js")?, APP);

    Ok(())
}

#[test]
fn test_registry_snapshot() -> Result<()> {
    let test = CliTest::with_file(
        "src/App.jsx",
        r#"export function App() {
  return <div title="标题">欢迎</div>;
}
"#,
    )?;

    test.extract_command().output()?;

    assert_eq!(
        test.read_json("i18n_messages/i18n.json")?,
        json!([
            { "id": 864625, "text": "标题", "loc": ["src/App.jsx#2#21"] },
            { "id": 887020, "text": "欢迎", "loc": ["src/App.jsx#2#26"] }
        ])
    );
    let raw = test.read_file("i18n_messages/i18n.json")?;
    assert!(raw.starts_with("[\n  {\n    \"id\": 864625,"));
    assert!(raw.ends_with("]\n"));

    Ok(())
}

#[test]
fn test_out_dir_receives_rewritten_sources() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file("src/plain.js", "export const n = 1;\n")?;

    let output = test
        .extract_command()
        .args(["--out-dir", "build"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Rewrote 1 literal(s) in 1 file(s) into build."));
    assert!(!stdout(&output).contains("-->"));
    assert_eq!(
        test.read_file("build/src/app.js")?,
        "import { i18n as _i18n } from \"mickey-i18n\";\nalert(_i18n(\"652829\", \"你好\"));\n"
    );
    assert_eq!(test.read_file("build/src/plain.js")?, "export const n = 1;\n");
    assert_eq!(test.read_file("src/app.js")?, APP);

    Ok(())
}

#[test]
fn test_rerun_is_idempotent() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file("src/other.js", "confirm(\"你好\");\nconfirm(\"再见\");\n")?;

    test.extract_command().output()?;
    let first = test.read_file("i18n_messages/i18n.json")?;
    test.extract_command().output()?;
    let second = test.read_file("i18n_messages/i18n.json")?;

    assert_eq!(first, second);
    assert_eq!(
        test.read_json("i18n_messages/i18n.json")?,
        json!([
            { "id": 652829, "text": "你好", "loc": ["src/app.js#1#7", "src/other.js#1#9"] },
            { "id": 682452, "text": "再见", "loc": ["src/other.js#2#9"] }
        ])
    );

    Ok(())
}

#[test]
fn test_edit_only_touches_own_locations() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file("src/other.js", "confirm(\"你好\");\nconfirm(\"再见\");\n")?;
    test.extract_command().output()?;

    test.write_file("src/other.js", "\nconfirm(\"你好\");\n")?;
    test.extract_command().output()?;

    assert_eq!(
        test.read_json("i18n_messages/i18n.json")?,
        json!([
            { "id": 652829, "text": "你好", "loc": ["src/app.js#1#7", "src/other.js#2#9"] }
        ])
    );

    Ok(())
}

#[test]
fn test_parse_error_sets_exit_code_and_continues() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file("src/broken.js", "const a = {")?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("1 file(s) could not be parsed (use -v for details)"));
    assert!(stdout(&output).contains("Processed 1 source file: 1 occurrence(s), 1 text(s)"));

    let verbose = test.extract_command().arg("-v").output()?;
    assert!(stderr(&verbose).contains("--> src/broken.js"));

    Ok(())
}

#[test]
fn test_debug_listing() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.js",
        "const b = [\"二\"];\nconst a = \"一\";\nconst o = { \"键\": 1 };\n",
    )?;

    let output = test.extract_command().arg("--debug").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let listing = test.read_json("i18n_messages/src/app.json")?;
    let locs: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["loc"].as_str().unwrap())
        .collect();
    assert_eq!(locs, vec!["1#12", "2#11", "3#13"]);
    assert_eq!(listing[2]["text"], "键");

    Ok(())
}

#[test]
fn test_config_exclude_and_dest() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file("src/legacy/old.js", "alert(\"旧的\");\n")?;
    test.write_file(
        ".i18nrc.json",
        r#"{ "dest": "./locales", "filename": "messages.json", "exclude": "legacy/" }"#,
    )?;

    let output = test.extract_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let registry = test.read_json("locales/messages.json")?;
    assert_eq!(registry.as_array().unwrap().len(), 1);
    assert_eq!(registry[0]["text"], "你好");
    assert!(!test.root().join("i18n_messages").exists());

    Ok(())
}

#[test]
fn test_config_match_pattern() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.js",
        "alert(\"Save changes\");\nalert(\"id-42\");\n",
    )?;
    test.write_file(".i18nrc.json", r#"{ "matchPattern": { "pattern": "^[A-Z]" } }"#)?;

    test.extract_command().output()?;

    let registry = test.read_json("i18n_messages/i18n.json")?;
    assert_eq!(registry.as_array().unwrap().len(), 1);
    assert_eq!(registry[0]["text"], "Save changes");

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file(".i18nrc.json", r#"{ "exclude": ["("] }"#)?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Error: Invalid regex in 'exclude'"));

    Ok(())
}

#[test]
fn test_source_root_argument() -> Result<()> {
    let test = CliTest::with_file("web/src/app.js", APP)?;

    let output = test
        .extract_command()
        .args(["--source-root", "web"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let registry = test.read_json("web/i18n_messages/i18n.json")?;
    assert_eq!(registry[0]["loc"], json!(["src/app.js#1#7"]));

    Ok(())
}
