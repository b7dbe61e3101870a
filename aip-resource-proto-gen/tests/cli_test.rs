//! CLI integration tests for the aip-resource-proto-gen binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("aip-resource-proto-gen"))
}

fn library_args() -> [&'static str; 7] {
    [
        "Book",
        "--package",
        "library.v1",
        "--service",
        "library.example.com",
        "--resource-parent",
        "publishers/{publisher}",
    ]
}

#[test]
fn prints_schema_to_stdout() {
    cmd()
        .args(library_args())
        .assert()
        .success()
        .stdout(include_str!("testdata/book.proto"));
}

#[test]
fn writes_schema_and_descriptor_set() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("book.proto");
    let descriptor = dir.path().join("book.pb");

    cmd()
        .args(library_args())
        .arg("--output")
        .arg(&output)
        .arg("--descriptor-set-out")
        .arg(&descriptor)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("service BookService {"));
    assert!(!fs::read(&descriptor).unwrap().is_empty());
}

#[test]
fn boolean_flags_can_be_disabled() {
    cmd()
        .args(library_args())
        .args([
            "--with-http-options=false",
            "--resource-with-timestamps=false",
            "--methods",
            "rl",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("google.api.http").not())
        .stdout(predicate::str::contains("create_time").not())
        .stdout(predicate::str::contains("rpc GetBook(GetBookRequest) returns (Book);"))
        .stdout(predicate::str::contains("rpc CreateBook").not());
}

#[test]
fn bare_boolean_flag_enables() {
    cmd()
        .args(library_args())
        .args(["--resource-id-required", "--methods", "c"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "string book_id = 2 [(google.api.field_behavior) = REQUIRED];",
        ))
        .stdout(predicate::str::contains(r#""parent,book,book_id""#));
}

#[test]
fn bare_boolean_flag_before_resource() {
    cmd()
        .args([
            "--compact",
            "Book",
            "--package",
            "library.v1",
            "--service",
            "library.example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("message Book {"))
        .stdout(predicate::str::contains(
            r#"option (google.api.resource) = { type: "library.example.com/Book""#,
        ));

    cmd()
        .args([
            "--with-http-options=false",
            "--resource-id-required",
            "Book",
            "--package",
            "library.v1",
            "--service",
            "library.example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("google.api.http").not())
        .stdout(predicate::str::contains(
            "string book_id = 1 [(google.api.field_behavior) = REQUIRED];",
        ));
}

#[test]
fn rejects_unknown_method_letter() {
    cmd()
        .args(library_args())
        .args(["--methods", "crudx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid method 'x'"));
}

#[test]
fn rejects_invalid_resource_name() {
    cmd()
        .args(["book", "--package", "library.v1", "--service", "library.example.com"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid resource name"));
}

#[test]
fn requires_package_and_service() {
    cmd()
        .arg("Book")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--package"));
}
