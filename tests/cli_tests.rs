//! Integration tests for the formbind CLI
//!
//! These tests run the actual CLI binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the binary to test
#[allow(deprecated)]
fn formbind_cmd() -> Command {
    Command::cargo_bin("formbind").unwrap()
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const PROFILE_FORM: &str = r#"
open: { method: PUT, url: /users/1, class: profile }
model: true
fields:
  - { type: text, name: name, label: Full name }
  - { type: email, name: email }
  - { type: select, name: size, options: { L: Large, M: Medium, S: Small } }
  - { type: checkbox, name: newsletter }
  - { type: password, name: password }
  - { type: submit, value: Save }
"#;

#[test]
fn test_help_flag() {
    formbind_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("HTML forms with model binding"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_render_help() {
    formbind_cmd()
        .args(["render", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--old-input"))
        .stdout(predicate::str::contains("--ignore-request"))
        .stdout(predicate::str::contains("--token"));
}

// ============================================================================
// render
// ============================================================================

#[test]
fn test_render_with_model() {
    let temp_dir = TempDir::new().unwrap();
    let form = write(&temp_dir, "profile.yaml", PROFILE_FORM);
    let model = write(
        &temp_dir,
        "user.json",
        r#"{"name": "Anton", "email": "anton@example.com", "size": "M", "newsletter": true, "password": "hunter2"}"#,
    );

    formbind_cmd()
        .args(["render", form.to_str().unwrap(), "--model", model.to_str().unwrap(), "--token", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<form method="POST" action="/users/1" accept-charset="UTF-8" class="profile"><input name="_method" type="hidden" value="PUT"><input name="_token" type="hidden" value="abc">"#,
        ))
        .stdout(predicate::str::contains(r#"<label for="name">Full name</label>"#))
        .stdout(predicate::str::contains(r#"<input name="name" type="text" value="Anton" id="name">"#))
        .stdout(predicate::str::contains(r#"<input name="email" type="email" value="anton@example.com">"#))
        .stdout(predicate::str::contains(r#"<option value="M" selected="selected">Medium</option>"#))
        .stdout(predicate::str::contains(r#"<input checked="checked" name="newsletter" type="checkbox" value="1">"#))
        .stdout(predicate::str::contains(r#"<input name="password" type="password" value="">"#))
        .stdout(predicate::str::contains("hunter2").not())
        .stdout(predicate::str::contains("</form>"));
}

#[test]
fn test_render_old_input_beats_model() {
    let temp_dir = TempDir::new().unwrap();
    let form = write(&temp_dir, "profile.yaml", PROFILE_FORM);
    let model = write(
        &temp_dir,
        "user.yaml",
        "name: Anton\nemail: anton@example.com\nsize: M\nnewsletter: true\n",
    );
    let old = write(&temp_dir, "old.json", r#"{"name": "Ant", "size": "S"}"#);

    formbind_cmd()
        .args([
            "render",
            form.to_str().unwrap(),
            "--model",
            model.to_str().unwrap(),
            "--old-input",
            old.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"value="Ant""#))
        .stdout(predicate::str::contains(r#"<option value="S" selected="selected">Small</option>"#))
        // Submitted without the box: it was unticked
        .stdout(predicate::str::contains(r#"<input name="newsletter" type="checkbox" value="1">"#));
}

#[test]
fn test_render_request_and_ignore_request() {
    let temp_dir = TempDir::new().unwrap();
    let form = write(
        &temp_dir,
        "search.yaml",
        "fields:\n  - { type: search, name: 'filter[q]', value: default }\n",
    );
    let request = write(&temp_dir, "request.json", r#"{"filter": {"q": "rust"}}"#);

    formbind_cmd()
        .args(["render", form.to_str().unwrap(), "--request", request.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<input name="filter[q]" type="search" value="rust">"#));

    formbind_cmd()
        .args([
            "render",
            form.to_str().unwrap(),
            "--request",
            request.to_str().unwrap(),
            "--ignore-request",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<input name="filter[q]" type="search" value="default">"#));
}

#[test]
fn test_render_with_config() {
    let temp_dir = TempDir::new().unwrap();
    let form = write(
        &temp_dir,
        "login.yaml",
        r#"
open: { url: /login, group: login }
fields:
  - { type: text, name: username }
  - { type: button, value: Go, attributes: { type: submit } }
"#,
    );
    let config = write(
        &temp_dir,
        "html.yaml",
        r#"
form:
  text: { class: form-control }
  button: { class: btn }
group:
  login: { class: form-login }
"#,
    );

    formbind_cmd()
        .args(["render", form.to_str().unwrap(), "--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<form method="POST" action="/login" accept-charset="UTF-8" class="form-login">"#,
        ))
        .stdout(predicate::str::contains(r#"<input class="form-control" name="username" type="text">"#))
        .stdout(predicate::str::contains(r#"<button type="submit" class="btn">Go</button>"#));
}

#[test]
fn test_render_model_document_without_model_fails() {
    let temp_dir = TempDir::new().unwrap();
    let form = write(&temp_dir, "profile.yaml", PROFILE_FORM);

    formbind_cmd()
        .args(["render", form.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FORM-001"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_render_unknown_field_type() {
    let temp_dir = TempDir::new().unwrap();
    let form = write(&temp_dir, "bad.yaml", "fields:\n  - { type: marquee, name: news }\n");

    formbind_cmd()
        .args(["render", form.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FORM-010"))
        .stderr(predicate::str::contains("marquee"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_render_rejects_huge_range() {
    let temp_dir = TempDir::new().unwrap();
    let form = write(
        &temp_dir,
        "years.yaml",
        "fields:\n  - { type: select-range, name: year, begin: 0, end: 9223372036854775807 }\n",
    );

    formbind_cmd()
        .args(["render", form.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FORM-013"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_render_missing_file() {
    formbind_cmd()
        .args(["render", "/nonexistent/form.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load form"));
}

#[test]
fn test_render_invalid_model_type() {
    let temp_dir = TempDir::new().unwrap();
    let form = write(&temp_dir, "form.yaml", "fields:\n  - { type: text, name: a }\n");
    let model = write(&temp_dir, "model.json", "[1, 2, 3]");

    formbind_cmd()
        .args(["render", form.to_str().unwrap(), "--model", model.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FORM-002"));
}

// ============================================================================
// resolve
// ============================================================================

#[test]
fn test_resolve_precedence() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.yaml", "person:\n  name: Model\n  age: 40\n");
    let old = write(&temp_dir, "old.json", r#"{"person": {"name": "Old"}}"#);

    formbind_cmd()
        .args([
            "resolve",
            "person[name]",
            "--model",
            model.to_str().unwrap(),
            "--old-input",
            old.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("\"Old\"\n");

    formbind_cmd()
        .args([
            "resolve",
            "person.age",
            "--model",
            model.to_str().unwrap(),
            "--old-input",
            old.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("40\n");
}

#[test]
fn test_resolve_default() {
    formbind_cmd()
        .args(["resolve", "missing", "--default", r#"["a", "b"]"#])
        .assert()
        .success()
        .stdout("[\"a\",\"b\"]\n");

    formbind_cmd()
        .args(["resolve", "missing"])
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn test_resolve_invalid_default() {
    formbind_cmd()
        .args(["resolve", "name", "--default", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --default"));
}

#[test]
fn test_resolve_model_only_requires_model() {
    formbind_cmd()
        .args(["resolve", "name", "--model-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FORM-001"))
        .stderr(predicate::str::contains("'name'"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_resolve_model_only_skips_input() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.json", r#"{"name": "Model"}"#);
    let request = write(&temp_dir, "request.json", r#"{"name": "Request"}"#);

    formbind_cmd()
        .args([
            "resolve",
            "name",
            "--model",
            model.to_str().unwrap(),
            "--request",
            request.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("\"Request\"\n");

    formbind_cmd()
        .args([
            "resolve",
            "name",
            "--model",
            model.to_str().unwrap(),
            "--request",
            request.to_str().unwrap(),
            "--model-only",
        ])
        .assert()
        .success()
        .stdout("\"Model\"\n");
}

#[test]
fn test_resolve_malformed_json_input() {
    let temp_dir = TempDir::new().unwrap();
    let old = write(&temp_dir, "old.json", "{\"name\": ");

    formbind_cmd()
        .args(["resolve", "name", "--old-input", old.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"))
        .stderr(predicate::str::contains("Fix:"));
}
