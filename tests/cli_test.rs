//! CLI integration tests for swagger-convert binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("swagger-convert"))
}

// Helper to create a temp schema file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

const PETSTORE: &str = r##"{
    "swagger": "2.0",
    "definitions": {
        "Pet": {
            "type": "object",
            "required": ["name"],
            "properties": {
                "id": { "type": "integer", "format": "int64" },
                "name": { "type": "string", "example": "doggie" }
            }
        },
        "Dog": {
            "description": "a dog",
            "allOf": [
                { "$ref": "#/definitions/Pet" },
                {
                    "type": "object",
                    "required": ["bark"],
                    "properties": { "bark": { "type": "boolean" } }
                }
            ]
        },
        "Choice": { "oneOf": [{ "type": "string" }] }
    }
}"##;

mod convert_command {
    use super::*;

    #[test]
    fn ref_to_property() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "ref.json", r##"{"$ref":"#/definitions/Pet"}"##);

        let output = cmd()
            .args(["convert", schema.to_str().unwrap(), "--to-property"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        assert_eq!(
            stdout_json(&output),
            json!({ "$ref": "#/definitions/Pet", "name": "Pet" })
        );
    }

    #[test]
    fn composed_definition_via_pointer() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "petstore.json", PETSTORE);

        let output = cmd()
            .args([
                "convert",
                doc.to_str().unwrap(),
                "--to-property",
                "--pointer",
                "#/definitions/Dog",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let property = stdout_json(&output);
        assert_eq!(property["type"], "object");
        assert_eq!(property["description"], "a dog");
        assert_eq!(property["properties"]["Pet"]["$ref"], "#/definitions/Pet");
        assert_eq!(property["properties"]["bark"]["type"], "boolean");
        assert_eq!(property["required"], json!(["bark"]));
    }

    #[test]
    fn property_to_model() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "prop.json",
            r#"{"type":"integer","format":"int32","name":"age","example":42,"minimum":0}"#,
        );

        let output = cmd()
            .args(["convert", schema.to_str().unwrap(), "--to-model"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        assert_eq!(
            stdout_json(&output),
            json!({ "type": "integer", "format": "int32", "name": "age", "example": "42" })
        );
    }

    #[test]
    fn convert_with_pretty() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"type":"string"}"#);

        cmd()
            .args(["convert", schema.to_str().unwrap(), "--to-property", "--pretty"])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn convert_with_output_file() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"type":"string"}"#);
        let output = dir.path().join("output.json");

        cmd()
            .args([
                "convert",
                schema.to_str().unwrap(),
                "--to-property",
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        // Verify file was written
        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#""type":"string""#));
    }
}

mod roundtrip_command {
    use super::*;

    #[test]
    fn shows_property_and_model() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "petstore.json", PETSTORE);

        let output = cmd()
            .args([
                "roundtrip",
                doc.to_str().unwrap(),
                "--pointer",
                "#/definitions/Pet",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let result = stdout_json(&output);
        assert_eq!(result["property"]["required"], json!(["name"]));
        assert_eq!(result["model"]["type"], "object");
        assert!(result["model"]["properties"].get("id").is_some());
        // Required names do not survive the way back
        assert!(result["model"].get("required").is_none());
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["convert", "/nonexistent/schema.json", "--to-property"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn invalid_json_schema() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "bad.json", r#"{ not valid json"#);

        cmd()
            .args(["convert", schema.to_str().unwrap(), "--to-property"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }

    #[test]
    fn unsupported_model_variant() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "petstore.json", PETSTORE);

        cmd()
            .args([
                "convert",
                doc.to_str().unwrap(),
                "--to-property",
                "--pointer",
                "#/definitions/Choice",
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("oneOf"));
    }

    #[test]
    fn pointer_not_found() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "petstore.json", PETSTORE);

        cmd()
            .args([
                "convert",
                doc.to_str().unwrap(),
                "--to-property",
                "--pointer",
                "#/definitions/Cat",
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("fragment not found"));
    }

    #[test]
    fn property_without_type() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "prop.json", r#"{"description":"?"}"#);

        cmd()
            .args(["convert", schema.to_str().unwrap(), "--to-model"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("missing type"));
    }
}

mod required_args {
    use super::*;

    #[test]
    fn missing_direction_flag() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"type":"object"}"#);

        cmd()
            .args(["convert", schema.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(
                predicate::str::contains("--to-property")
                    .or(predicate::str::contains("--to-model")),
            );
    }

    #[test]
    fn conflicting_direction_flags() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"type":"object"}"#);

        cmd()
            .args([
                "convert",
                schema.to_str().unwrap(),
                "--to-property",
                "--to-model",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cannot be used with"));
    }

    #[test]
    fn missing_schema_path() {
        cmd().args(["convert", "--to-property"]).assert().failure();
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Convert Swagger schemas between model and property form",
            ));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("swagger-convert"));
    }

    #[test]
    fn convert_help() {
        cmd()
            .args(["convert", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--pointer"));
    }
}

#[cfg(feature = "remote")]
mod remote {
    use super::*;

    #[test]
    fn convert_from_url() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/swagger.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PETSTORE)
            .create();

        cmd()
            .args([
                "convert",
                &format!("{}/swagger.json", server.url()),
                "--to-property",
                "--pointer",
                "#/definitions/Pet",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""required":["name"]"#));
    }

    #[test]
    fn convert_url_404() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/missing.json").with_status(404).create();

        cmd()
            .args([
                "convert",
                &format!("{}/missing.json", server.url()),
                "--to-property",
            ])
            .assert()
            .code(3) // Network errors are exit code 3
            .stderr(predicate::str::contains("failed to fetch"));
    }
}
