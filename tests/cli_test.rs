//! CLI integration tests for the nerdm-schema binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("nerdm-schema"))
}

// Helper to create a temp JSON file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const SCHEMA: &str = r##"{
    "definitions": {
        "Resource": {
            "properties": {
                "@type": { "type": "array" },
                "@id": { "type": "string" },
                "title": { "type": "string" },
                "keyword": { "type": "array" }
            },
            "required": ["@id", "title"]
        },
        "PublicDataResource": {
            "allOf": [
                { "$ref": "#/definitions/Resource" },
                {
                    "properties": { "accessLevel": { "type": "string" } },
                    "required": ["accessLevel"]
                }
            ]
        },
        "Keywords": { "type": "array" }
    }
}"##;

mod list_command {
    use super::*;

    #[test]
    fn lists_definition_names_sorted() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);

        cmd()
            .args(["list", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::diff(
                "Keywords\nPublicDataResource\nResource\n",
            ));
    }

    #[test]
    fn missing_definitions_errors() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"title": "bare"}"#);

        cmd()
            .args(["list", schema.to_str().unwrap()])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("no definitions mapping"));
    }
}

mod default_command {
    use super::*;

    #[test]
    fn array_definition() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);

        cmd()
            .args(["default", schema.to_str().unwrap(), "Keywords"])
            .assert()
            .success()
            .stdout(predicate::str::diff("[]\n"));
    }

    #[test]
    fn object_definition() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);

        cmd()
            .args(["default", schema.to_str().unwrap(), "Resource"])
            .assert()
            .success()
            .stdout(predicate::str::diff("{}\n"));
    }

    #[test]
    fn unknown_definition_exits_with_schema_error() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);

        cmd()
            .args(["default", schema.to_str().unwrap(), "Ghost"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("unknown definition \"Ghost\""));
    }

    #[test]
    fn missing_schema_file_exits_with_io_error() {
        cmd()
            .args(["default", "/nonexistent/schema.json", "Resource"])
            .assert()
            .failure()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }
}

mod chain_command {
    use super::*;

    #[test]
    fn inherited_definition() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);

        cmd()
            .args(["chain", schema.to_str().unwrap(), "PublicDataResource"])
            .assert()
            .success()
            .stdout(predicate::str::diff(
                "[\"ndrm:PublicDataResource\",\"ndrm:Resource\"]\n",
            ));
    }
}

mod properties_command {
    use super::*;

    #[test]
    fn merged_required_names() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);

        cmd()
            .args([
                "properties",
                schema.to_str().unwrap(),
                "PublicDataResource",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#""required":["@id","title","accessLevel"]"#,
            ))
            .stdout(predicate::str::contains(r#""keyword""#));
    }

    #[test]
    fn pretty_output() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);

        cmd()
            .args([
                "properties",
                schema.to_str().unwrap(),
                "Resource",
                "--pretty",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("{\n"));
    }
}

mod instance_command {
    use super::*;

    #[test]
    fn seeds_discriminators_and_required() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);

        cmd()
            .args(["instance", schema.to_str().unwrap(), "Resource"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""@type":["ndrm:Resource"]"#))
            .stdout(predicate::str::contains(r#""title":"""#));
    }

    #[test]
    fn writes_to_output_file() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);
        let output = dir.path().join("instance.json");

        cmd()
            .args([
                "instance",
                schema.to_str().unwrap(),
                "Resource",
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#""@id":"""#));
    }
}

mod compose_command {
    use super::*;

    const CORE: &str = r#"{
        "definitions": {
            "Resource": {
                "properties": { "title": { "type": "string" } },
                "required": ["title"]
            }
        }
    }"#;

    const EXTENSION: &str = r#"{
        "definitions": {
            "DataPublication": {
                "allOf": [
                    { "$ref": "https://example.org/core/v1#/definitions/Resource" },
                    { "properties": { "doi": { "type": "string" } } }
                ]
            }
        }
    }"#;

    #[test]
    fn merges_extension_with_rebase() {
        let dir = TempDir::new().unwrap();
        let core = write_temp_file(&dir, "core.json", CORE);
        let extension = write_temp_file(&dir, "ext.json", EXTENSION);

        cmd()
            .args([
                "compose",
                core.to_str().unwrap(),
                "--extension",
                extension.to_str().unwrap(),
                "--rebase",
                "https://example.org/core/v1",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""DataPublication""#))
            .stdout(predicate::str::contains(
                r##""$ref":"#/definitions/Resource""##,
            ))
            .stdout(predicate::str::contains("https://example.org").not());
    }

    #[test]
    fn collection_wraps_definitions() {
        let dir = TempDir::new().unwrap();
        let core = write_temp_file(&dir, "core.json", CORE);

        cmd()
            .args(["compose", core.to_str().unwrap(), "--collection"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""title":"MetaData""#))
            .stdout(predicate::str::contains(r#""Resource list""#))
            .stdout(predicate::str::contains(r##""$ref":"#/MetaData""##));
    }

    #[test]
    fn without_extension_passes_core_through() {
        let dir = TempDir::new().unwrap();
        let core = write_temp_file(&dir, "core.json", CORE);

        cmd()
            .args(["compose", core.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""Resource""#));
    }
}

mod init_command {
    use super::*;

    #[test]
    fn writes_header_fields() {
        cmd()
            .args(["init", "--author", "jdoe"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""Author":"jdoe""#))
            .stdout(predicate::str::contains(r#""Licence":"CC-BY""#))
            .stdout(predicate::str::contains(
                "https://data.nist.gov/od/dm/nerdm-schema/pub/v0.3",
            ))
            .stdout(predicate::str::contains(r#""Created on""#));
    }

    #[test]
    fn custom_schema_url() {
        cmd()
            .args([
                "init",
                "--author",
                "jdoe",
                "--schema-url",
                "https://example.org/schema/v1",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#""$schema":"https://example.org/schema/v1""#,
            ));
    }
}

mod add_command {
    use super::*;

    #[test]
    fn appends_synthesized_instance() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);
        let document = write_temp_file(&dir, "doc.json", r#"{"Author": "jdoe"}"#);
        let output = dir.path().join("out.json");

        cmd()
            .args([
                "add",
                document.to_str().unwrap(),
                schema.to_str().unwrap(),
                "Resource",
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#""Resource list""#));
        assert!(content.contains(r#""@type":["ndrm:Resource"]"#));
        // Header fields are preserved
        assert!(content.contains(r#""Author":"jdoe""#));
    }

    #[test]
    fn rewrites_document_in_place_by_default() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);
        let document = write_temp_file(&dir, "doc.json", r#"{"Author": "jdoe"}"#);

        cmd()
            .args([
                "add",
                document.to_str().unwrap(),
                schema.to_str().unwrap(),
                "Keywords",
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&document).unwrap();
        assert!(content.contains(r#""Keywords list":[[]]"#));
    }

    #[test]
    fn appends_instance_from_file() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);
        let document = write_temp_file(&dir, "doc.json", r#"{}"#);
        let instance = write_temp_file(&dir, "instance.json", r#"{"title": "edited"}"#);

        cmd()
            .args([
                "add",
                document.to_str().unwrap(),
                schema.to_str().unwrap(),
                "Resource",
                "--instance",
                instance.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&document).unwrap();
        assert!(content.contains(r#""Resource list":[{"title":"edited"}]"#));
    }

    #[test]
    fn unknown_definition_leaves_document_untouched() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", SCHEMA);
        let document = write_temp_file(&dir, "doc.json", r#"{"Author": "jdoe"}"#);

        cmd()
            .args([
                "add",
                document.to_str().unwrap(),
                schema.to_str().unwrap(),
                "Ghost",
            ])
            .assert()
            .failure()
            .code(2);

        assert_eq!(
            fs::read_to_string(&document).unwrap(),
            r#"{"Author": "jdoe"}"#
        );
    }
}
