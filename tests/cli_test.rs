//! CLI integration tests for api-traits binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("api-traits"))
}

// Helper to create a temp document file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// List operation composing paging into its response and checking for it.
const PAGING_DOC: &str = r#"{
    "models": [
        {
            "name": "Paging",
            "properties": [
                {
                    "name": "nextLink",
                    "type": { "scalar": "string" },
                    "optional": true,
                    "annotations": [
                        { "traitLocation": "responseBody" },
                        { "traitContext": ["list"] }
                    ]
                }
            ]
        },
        { "name": "ListResponse" }
    ],
    "steps": [
        {
            "op": "addTraitProperties",
            "target": "ListResponse",
            "traitModel": "Paging",
            "location": "responseBody",
            "contexts": ["list"]
        },
        {
            "op": "ensureTraitsPresent",
            "target": { "model": "ListResponse" },
            "traitModel": "ListResponse",
            "expected": [
                { "traitName": "Paging", "diagnosticMessage": "list operations must support paging" }
            ]
        }
    ]
}"#;

/// Same check without the composition step, so paging is missing.
const MISSING_PAGING_DOC: &str = r#"{
    "models": [{ "name": "ListResponse" }],
    "steps": [
        {
            "op": "ensureTraitsPresent",
            "target": { "model": "ListResponse" },
            "traitModel": "ListResponse",
            "expected": [
                { "traitName": "Paging", "diagnosticMessage": "list operations must support paging" }
            ]
        }
    ]
}"#;

/// A trait property with no location: warning only.
const UNLOCATED_DOC: &str = r#"{
    "models": [
        {
            "name": "Versioning",
            "properties": [{ "name": "apiVersion", "type": { "scalar": "string" } }]
        }
    ],
    "steps": [{ "op": "lintTrait", "traitModel": "Versioning" }]
}"#;

/// Two traits contributing the same property name.
const CONFLICT_DOC: &str = r#"{
    "models": [
        {
            "name": "Conditional",
            "properties": [
                {
                    "name": "etag",
                    "type": { "scalar": "string" },
                    "annotations": [{ "traitLocation": "parameters" }]
                }
            ]
        },
        {
            "name": "Caching",
            "properties": [
                {
                    "name": "etag",
                    "type": { "scalar": "int32" },
                    "annotations": [{ "traitLocation": "parameters" }]
                }
            ]
        },
        { "name": "Params" }
    ],
    "steps": [
        { "op": "addTraitProperties", "target": "Params", "traitModel": "Conditional", "location": "parameters" },
        { "op": "addTraitProperties", "target": "Params", "traitModel": "Caching", "location": "parameters" }
    ]
}"#;

mod check_command {
    use super::*;

    #[test]
    fn passing_document() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "paging.json", PAGING_DOC);

        cmd()
            .args(["check", doc.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("no errors"));
    }

    #[test]
    fn missing_trait_fails() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "missing.json", MISSING_PAGING_DOC);

        cmd()
            .args(["check", doc.to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("E004"))
            .stdout(predicate::str::contains("list operations must support paging"));
    }

    #[test]
    fn trait_conflict_fails() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "conflict.json", CONFLICT_DOC);

        cmd()
            .args(["check", doc.to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("E002"))
            .stdout(predicate::str::contains("property Params.etag"));
    }

    #[test]
    fn last_write_wins_resolves_conflict() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "conflict.json", CONFLICT_DOC);

        cmd()
            .args(["check", doc.to_str().unwrap(), "--last-write-wins"])
            .assert()
            .success();
    }

    #[test]
    fn warnings_pass_without_strict() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "unlocated.json", UNLOCATED_DOC);

        cmd()
            .args(["check", doc.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("W001"));
    }

    #[test]
    fn strict_fails_on_warnings() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "unlocated.json", UNLOCATED_DOC);

        cmd()
            .args(["check", doc.to_str().unwrap(), "--strict"])
            .assert()
            .code(1);
    }

    #[test]
    fn quiet_hides_warnings() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "unlocated.json", UNLOCATED_DOC);

        cmd()
            .args(["check", doc.to_str().unwrap(), "--quiet"])
            .assert()
            .success()
            .stdout(predicate::str::contains("W001").not())
            .stdout(predicate::str::contains("Checking").not());
    }

    #[test]
    fn json_format() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "missing.json", MISSING_PAGING_DOC);

        let output = cmd()
            .args(["check", doc.to_str().unwrap(), "--format", "json"])
            .assert()
            .code(1)
            .get_output()
            .stdout
            .clone();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(report["passed"], false);
        assert_eq!(report["errors"], 1);
        assert_eq!(report["warnings"], 0);
        assert_eq!(report["diagnostics"][0]["code"], "E004");
        assert_eq!(report["diagnostics"][0]["severity"], "error");
        assert_eq!(
            report["diagnostics"][0]["target"],
            serde_json::json!({ "model": "ListResponse" })
        );
    }

    #[test]
    fn file_not_found() {
        cmd()
            .args(["check", "/nonexistent/document.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn invalid_json() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "bad.json", "{ not json");

        cmd()
            .args(["check", doc.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }

    #[test]
    fn invalid_step_arguments() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(
            &dir,
            "bad_step.json",
            r#"{
                "models": [{ "name": "Params" }],
                "steps": [
                    { "op": "addTraitProperties", "target": "Params", "traitModel": "Nope", "location": "parameters" }
                ]
            }"#,
        );

        cmd()
            .args(["check", doc.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("step 0 (addTraitProperties)"))
            .stderr(predicate::str::contains("unknown model 'Nope'"));
    }

    #[test]
    fn duplicate_model() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(
            &dir,
            "dup.json",
            r#"{ "models": [{ "name": "A" }, { "name": "A" }] }"#,
        );

        cmd()
            .args(["check", doc.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("duplicate model 'A'"));
    }
}

mod compose_command {
    use super::*;

    #[test]
    fn prints_composed_models() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "paging.json", PAGING_DOC);

        cmd()
            .args(["compose", doc.to_str().unwrap(), "--model", "ListResponse"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""name":"nextLink""#))
            .stdout(predicate::str::contains(r#"{"traitSource":"Paging"}"#));
    }

    #[test]
    fn compose_with_pretty() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "paging.json", PAGING_DOC);

        cmd()
            .args(["compose", doc.to_str().unwrap(), "--pretty"])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("[\n"));
    }

    #[test]
    fn compose_with_output_file() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "paging.json", PAGING_DOC);
        let output = dir.path().join("out.json");

        cmd()
            .args([
                "compose",
                doc.to_str().unwrap(),
                "--model",
                "ListResponse",
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["name"], "ListResponse");
        assert_eq!(written["properties"][0]["name"], "nextLink");
        assert_eq!(written["properties"][0]["optional"], true);
    }

    #[test]
    fn unknown_model() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "paging.json", PAGING_DOC);

        cmd()
            .args(["compose", doc.to_str().unwrap(), "--model", "Missing"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unknown model 'Missing'"));
    }

    #[test]
    fn errors_still_print_models() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "conflict.json", CONFLICT_DOC);

        cmd()
            .args(["compose", doc.to_str().unwrap(), "--model", "Params"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""name":"etag""#))
            .stderr(predicate::str::contains("E002"));
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
            .stdout(predicate::str::contains("Compose and check API operation traits"));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("api-traits"));
    }

    #[test]
    fn check_help() {
        cmd()
            .args(["check", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--format"))
            .stdout(predicate::str::contains("--strict"))
            .stdout(predicate::str::contains("--last-write-wins"));
    }

    #[test]
    fn compose_help() {
        cmd()
            .args(["compose", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--model"))
            .stdout(predicate::str::contains("--pretty"));
    }
}
