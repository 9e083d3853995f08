use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;

fn sample_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("samples")
        .join(name)
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn compiles_to_markdown_by_default() {
    let mut cmd = cargo_bin_cmd!("zl");
    cmd.arg(sample_path("outline.zl"));

    cmd.assert().success().stdout(
        predicate::str::contains("# Project Notes\n")
            .and(predicate::str::contains("- Write the compiler\n    - lexer\n"))
            .and(predicate::str::contains("info:").not()),
    );
}

#[test]
fn accepts_md_alias() {
    let mut cmd = cargo_bin_cmd!("zl");
    cmd.arg(sample_path("outline.zl")).arg("--mode").arg("md");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("owner = Ada"));
}

#[test]
fn dumps_ast_tree() {
    let mut cmd = cargo_bin_cmd!("zl");
    cmd.arg(sample_path("outline.zl")).arg("-m").arg("tree");

    cmd.assert().success().stdout(
        predicate::str::contains("└─ Tree: Project Notes")
            .and(predicate::str::contains("Keyword: `items`")),
    );
}

#[test]
fn dumps_tokens_and_json() {
    cargo_bin_cmd!("zl")
        .arg(sample_path("outline.zl"))
        .args(["--mode", "tokens"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3:1 Word \"Project\""));

    cargo_bin_cmd!("zl")
        .arg(sample_path("outline.zl"))
        .args(["--mode", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rule\": \"start\""));
}

#[test]
fn rejects_unknown_mode() {
    let mut cmd = cargo_bin_cmd!("zl");
    cmd.arg(sample_path("outline.zl")).arg("--mode").arg("html");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("unknown output mode 'html'"));
}

#[test]
fn reports_indentation_errors() {
    let mut cmd = cargo_bin_cmd!("zl");
    cmd.arg(sample_path("bad_indent.zl"));

    cmd.assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("error: indentation error at 3:3"));
}

#[test]
fn reports_syntax_errors() {
    let mut cmd = cargo_bin_cmd!("zl");
    cmd.arg(sample_path("bad_pair.zl"));

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("error: syntax error at"));
}

#[test]
fn reports_missing_file() {
    let mut cmd = cargo_bin_cmd!("zl");
    cmd.arg(sample_path("does-not-exist.zl"));

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("error: cannot read"));
}

#[test]
fn config_file_sets_default_mode_and_wiki() {
    let config = config_file(
        "[output]\ndefault_mode = \"tree\"\n\n[render]\nwiki_base_url = \"https://wiki.example/\"\n",
    );

    cargo_bin_cmd!("zl")
        .arg(sample_path("outline.zl"))
        .arg("--config")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("└─ Tree: Project Notes"));

    cargo_bin_cmd!("zl")
        .arg(sample_path("outline.zl"))
        .arg("--config")
        .arg(config.path())
        .args(["--mode", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Rust](https://wiki.example/Rust)"));
}

#[test]
fn invalid_default_mode_in_config_is_reported() {
    let config = config_file("[output]\ndefault_mode = \"pdf\"\n");

    cargo_bin_cmd!("zl")
        .arg(sample_path("outline.zl"))
        .arg("-c")
        .arg(config.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown output mode 'pdf'"));
}
