use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

fn write_file(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project(root: &Path) {
    write_file(&root.join("README.md"), b"# Project\n");
    write_file(&root.join("src/main.go"), b"package main\n");
    write_file(&root.join("src/gen.pb.go"), b"// generated\n");
    write_file(&root.join(".git/HEAD"), b"ref: refs/heads/main\n");
    write_file(&root.join("node_modules/dep/index.js"), b"module.exports = {};\n");
    write_file(&root.join("assets/logo.png"), &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    write_file(&root.join(".pewc"), b"# generated code\n*.pb.go\n");
}

#[test]
fn cli_dumps_directory_to_markdown() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    project(&root);
    let out = dir.path().join("out.md");

    let output = Command::new(env!("CARGO_BIN_EXE_pew"))
        .args(["-d", root.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Successfully wrote Markdown to"));

    let markdown = fs::read_to_string(&out).unwrap();
    let expected_tree = "\
```
proj/
|-- README.md
|-- assets/
|   `-- logo.png
`-- src/
    `-- main.go
```
";
    assert!(markdown.starts_with("# Directory Structure\n\n"));
    assert!(markdown.contains(expected_tree), "tree was:\n{markdown}");
    assert!(markdown.contains("## README.md\n\n```md\n# Project\n```\n"));
    assert!(markdown.contains("## src/main.go\n\n```go\npackage main\n```\n"));
    assert!(!markdown.contains("gen.pb.go"));
    assert!(!markdown.contains("## assets/logo.png"));
    assert!(!markdown.contains("node_modules"));
}

#[test]
fn cli_list_json_respects_pewc_and_defaults() {
    let dir = tempdir().unwrap();
    project(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_pew"))
        .args(["-d", dir.path().to_str().unwrap(), "--list", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let files: Vec<&str> = v["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap())
        .collect();

    assert_eq!(files, ["README.md", "src/main.go"]);
    assert_eq!(v["skipped"][0]["path"], "assets/logo.png");
}

#[test]
fn cli_no_default_ignores_includes_dotfiles_and_dependencies() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join(".env"), b"A=1\n");
    write_file(&dir.path().join("node_modules/dep/index.js"), b"x\n");
    write_file(&dir.path().join("main.js"), b"y\n");

    let output = Command::new(env!("CARGO_BIN_EXE_pew"))
        .args(["-d", dir.path().to_str().unwrap(), "--no-default-ignores", "--list"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().map(|l| l.replace('\\', "/")).collect();
    assert_eq!(lines, [".env", "main.js", "node_modules/dep/index.js"]);
}

#[test]
fn cli_extra_ignore_pattern() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("keep.rs"), b"fn keep() {}\n");
    write_file(&dir.path().join("skip.rs"), b"fn skip() {}\n");

    let output = Command::new(env!("CARGO_BIN_EXE_pew"))
        .args(["-d", dir.path().to_str().unwrap(), "--list", "-i", "skip.rs"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "keep.rs\n");
}

#[test]
fn cli_dumps_named_files_to_stdout() {
    let dir = tempdir().unwrap();
    let text = dir.path().join("notes.txt");
    let binary = dir.path().join("blob.txt");
    write_file(&text, b"hello\x07 world");
    write_file(&binary, b"\0\0\0binary");

    let output = Command::new(env!("CARGO_BIN_EXE_pew"))
        .args([text.to_str().unwrap(), binary.to_str().unwrap(), "-o", "-"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("# Source Code Files\n\n"));
    assert!(stdout.contains("```txt\nhello world\n```\n"));
    assert!(!stdout.contains("binary"));
}

#[test]
fn cli_without_input_fails() {
    let dir = tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_pew"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no input files provided"));
    assert!(!dir.path().join("source.md").exists());
}

#[test]
fn cli_json_error_output_is_valid_json_even_with_quotes_in_path() {
    let dir = tempdir().unwrap();

    let bad_path = dir.path().join("does-not-exist-\"quoted\"");

    let output = Command::new(env!("CARGO_BIN_EXE_pew"))
        .args(["-d", bad_path.to_str().unwrap(), "--list", "--json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));

    let stderr = String::from_utf8(output.stderr).unwrap();
    let v: serde_json::Value = serde_json::from_str(stderr.trim()).unwrap();
    assert!(v["error"].as_str().unwrap().contains("path not found"));
}
