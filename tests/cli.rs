//! CLI end-to-end tests
//!
//! Runs the media-iiif binary against a small catalog written to a temp dir.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::process::Command;
use tempfile::{TempDir, tempdir};

const CATALOG: &str = r#"{
  "courses": [{"id": 1, "title": "Art 101"}],
  "collections": [{
    "id": 9, "course_id": 1, "title": "Week 1", "description": "Readings",
    "sort_order": 1,
    "resources": [
      {"resource_id": 1, "sort_order": 1},
      {"resource_id": 2, "sort_order": 2},
      {"resource_id": 1, "sort_order": 3}
    ]
  }],
  "resources": [
    {"id": 1, "course_id": 1, "title": "dawn.jpg",
     "media_store": {"id": 1, "file_name": "dawn.jpg", "file_type": "jpg",
                     "img_width": 3000, "img_height": 2000}},
    {"id": 2, "course_id": 1, "title": "Link",
     "img_url": "http://my.link/image.jpg", "img_width": 800, "img_height": 600}
  ]
}"#;

const CONFIG: &str = r#"
[server]
base_url = "http://iiif.test"

[image_server]
url = "http://loris.test/"
"#;

#[allow(deprecated)]
fn media_iiif_cmd() -> Command {
    Command::cargo_bin("media-iiif").unwrap()
}

/// Temp dir holding `catalog.json` and `config.toml`.
fn workspace() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("catalog.json"), CATALOG).unwrap();
    fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
    dir
}

fn cmd_in(dir: &TempDir) -> Command {
    let mut cmd = media_iiif_cmd();
    cmd.arg("--catalog")
        .arg(dir.path().join("catalog.json"))
        .arg("--config-dir")
        .arg(dir.path());
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_help_flag() {
    media_iiif_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("gen-config"));
}

#[test]
fn test_cli_gen_config_needs_no_catalog() {
    media_iiif_cmd()
        .arg("--catalog")
        .arg("/nonexistent/catalog.json")
        .arg("gen-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[server]"))
        .stdout(predicate::str::contains("base_url"));
}

#[test]
fn test_cli_manifest() {
    let dir = workspace();
    let value = stdout_json(cmd_in(&dir).args(["manifest", "9"]));

    assert_eq!(value["@type"], "sc:Manifest");
    assert_eq!(value["@id"], "http://iiif.test/manifest/9");
    assert_eq!(value["label"], "Week 1");
    let canvases = value["sequences"][0]["canvases"].as_array().unwrap();
    // The link is skipped, the duplicate keeps its own id
    let ids: Vec<&str> = canvases.iter().map(|c| c["@id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec![
            "http://iiif.test/manifest/9/canvas/1.0",
            "http://iiif.test/manifest/9/canvas/1.1",
        ]
    );
    assert_eq!(
        canvases[0]["images"][0]["resource"]["service"]["@id"],
        "http://loris.test/media-management%2Fmedia%2Fimages%2F1%2Fdawn.jpg"
    );
}

#[test]
fn test_cli_manifest_pretty() {
    let dir = workspace();
    cmd_in(&dir)
        .args(["manifest", "9", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n    \"@context\""));
}

#[test]
fn test_cli_manifest_object() {
    let dir = workspace();
    let value = stdout_json(cmd_in(&dir).args([
        "manifest",
        "9",
        "--object-type",
        "canvas",
        "--object-id",
        "1.1",
    ]));
    assert_eq!(value["@type"], "sc:Canvas");
    assert_eq!(value["@id"], "http://iiif.test/manifest/9/canvas/1.1");
    assert_eq!(value["width"], 3000);
}

#[test]
fn test_cli_missing_object_fails() {
    let dir = workspace();
    cmd_in(&dir)
        .args(["manifest", "9", "--object-type", "canvas", "--object-id", "2.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No canvas '2.1' in manifest 9"));
}

#[test]
fn test_cli_object_type_requires_object_id() {
    let dir = workspace();
    cmd_in(&dir)
        .args(["manifest", "9", "--object-type", "canvas"])
        .assert()
        .failure();
}

#[test]
fn test_cli_missing_collection_fails() {
    let dir = workspace();
    cmd_in(&dir)
        .args(["manifest", "404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MissingCollection(404)"));
}

#[test]
fn test_cli_collections() {
    let dir = workspace();
    let value = stdout_json(cmd_in(&dir).arg("collections"));
    assert_eq!(value["label"], "Top-level collection");
    assert_eq!(value["members"][0]["@id"], "http://iiif.test/collection/1");
    assert_eq!(value["members"][0]["@type"], "sc:Collection");
}

#[test]
fn test_cli_course_collection() {
    let dir = workspace();
    let value = stdout_json(cmd_in(&dir).args(["collection", "1"]));
    assert_eq!(value["label"], "Top-level collection: Art 101");
    assert_eq!(value["members"][0]["@type"], "sc:Manifest");
    assert_eq!(value["members"][0]["@id"], "http://iiif.test/manifest/9");
}

#[test]
fn test_cli_show() {
    let dir = workspace();
    cmd_in(&dir)
        .args(["show", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sequence 1 (2 canvases)"))
        .stdout(predicate::str::contains("001 dawn.jpg [1.0] 3000x2000"));
}

#[test]
fn test_cli_check() {
    let dir = workspace();
    cmd_in(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("001 Week 1 (3 images, 1 link)"))
        .stdout(predicate::str::contains("Catalog is valid"));
}

#[test]
fn test_cli_invalid_config_fails() {
    let dir = workspace();
    fs::write(dir.path().join("config.toml"), "[server]\nbase_url = \"ftp://x\"\n").unwrap();
    cmd_in(&dir).arg("check").assert().failure();
}

#[test]
fn test_cli_export() {
    let dir = workspace();
    let out = dir.path().join("dist");
    cmd_in(&dir)
        .arg("export")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest/9.json"));

    for file in [
        "index.json",
        "collections.json",
        "collection/1.json",
        "manifest/9.json",
    ] {
        assert!(out.join(file).is_file(), "missing {file}");
    }
    let manifest: Value =
        serde_json::from_str(&fs::read_to_string(out.join("manifest/9.json")).unwrap()).unwrap();
    assert_eq!(manifest["@id"], "http://iiif.test/manifest/9");
}
