//! End-to-end conversion tests

use record_format_converter::{
    ConfigError, Convention, ConvertConfig, EmbeddedJson, Record, convert_all,
};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn old_record(definition: Value, data: &[Value]) -> String {
    let collections: Vec<Value> = data
        .iter()
        .map(|d| json!({ "data": d.to_string() }))
        .collect();
    json!({
        "definition": definition.to_string(),
        "dataCollections": collections,
    })
    .to_string()
}

#[test]
fn test_single_file_old_to_new() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("record.json");
    fs::write(
        &source,
        r#"{"definition":"{\"a\":1}","dataCollections":[{"data":"{\"b\":2}"}]}"#,
    )
    .unwrap();

    let resolved = ConvertConfig {
        source: Some(source),
        format: Some("old".to_string()),
        target: Some(dir.path().join("out")),
        ..Default::default()
    }
    .resolve()
    .unwrap();
    let report = convert_all(&resolved).unwrap();

    assert_eq!(report.converted, vec![dir.path().join("out/record.json")]);
    assert_eq!(
        fs::read_to_string(dir.path().join("out/record.json")).unwrap(),
        r#"{"definition":{"a":1},"dataCollections":[{"data":{"b":2}}]}"#
    );
}

#[test]
fn test_directory_round_trip() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("records");
    fs::create_dir_all(source.join("team/a")).unwrap();
    fs::create_dir_all(source.join("team/b")).unwrap();
    let inputs = [
        (
            "team/a/one.json",
            old_record(json!({"k": "v", "n": [1, 2.5, null]}), &[json!({"x": 1})]),
        ),
        (
            "team/b/one.json",
            old_record(json!([true, false]), &[json!("text"), json!(42)]),
        ),
        ("top.json", old_record(json!({}), &[])),
    ];
    for (path, content) in &inputs {
        fs::write(source.join(path), content).unwrap();
    }

    let forward = ConvertConfig {
        source: Some(source.clone()),
        target: Some(dir.path().join("new")),
        ..Default::default()
    }
    .resolve()
    .unwrap();
    assert_eq!(forward.convention, Convention::Old);
    let report = convert_all(&forward).unwrap();
    assert_eq!(report.converted.len(), 3);
    assert!(report.skipped.is_empty());

    let converted = read_json(&dir.path().join("new/team/b/one.json"));
    assert_eq!(converted["definition"], json!([true, false]));
    assert_eq!(converted["dataCollections"][0]["data"], json!("text"));
    assert_eq!(converted["dataCollections"][1]["data"], json!(42));

    let backward = ConvertConfig {
        source: Some(dir.path().join("new")),
        target: Some(dir.path().join("old")),
        ..Default::default()
    }
    .resolve()
    .unwrap();
    assert_eq!(backward.convention, Convention::New);
    let report = convert_all(&backward).unwrap();
    assert_eq!(report.converted.len(), 3);

    for (path, content) in &inputs {
        let original: Record = serde_json::from_str(content).unwrap();
        let restored: Record =
            serde_json::from_str(&fs::read_to_string(dir.path().join("old").join(path)).unwrap())
                .unwrap();
        assert!(matches!(restored.definition(), EmbeddedJson::Raw(_)));
        assert_eq!(
            restored.definition().to_value().unwrap(),
            original.definition().to_value().unwrap()
        );
        let restored_entries = restored.collection_data();
        let original_entries = original.collection_data();
        assert_eq!(restored_entries.len(), original_entries.len());
        for (r, o) in restored_entries.iter().zip(original_entries.iter()) {
            assert_eq!(r.to_value().unwrap(), o.to_value().unwrap());
        }
    }
}

#[test]
fn test_default_target_is_next_free_number() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("records");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("r.json"), old_record(json!({"a": 1}), &[])).unwrap();

    let output = dir.path().join("output");
    fs::create_dir_all(output.join("converted_1")).unwrap();
    fs::write(output.join("converted_1/previous.json"), "{}").unwrap();

    let resolved = ConvertConfig {
        source: Some(source),
        output_dir: Some(output.clone()),
        ..Default::default()
    }
    .resolve()
    .unwrap();
    assert_eq!(resolved.target, output.join("converted_2"));

    convert_all(&resolved).unwrap();
    assert!(output.join("converted_2/r.json").exists());
}

#[test]
fn test_inferred_convention_applies_to_every_file() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("records");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.json"), old_record(json!({"a": 1}), &[])).unwrap();
    fs::write(source.join("b.json"), r#"{"definition":{"b":2}}"#).unwrap();
    fs::write(source.join("c.json"), old_record(json!({"c": 3}), &[])).unwrap();

    let resolved = ConvertConfig {
        source: Some(source.clone()),
        target: Some(dir.path().join("out")),
        ..Default::default()
    }
    .resolve()
    .unwrap();
    assert_eq!(resolved.convention, Convention::Old);

    let report = convert_all(&resolved).unwrap();
    let converted: Vec<PathBuf> = report.converted.clone();
    assert_eq!(
        converted,
        vec![dir.path().join("out/a.json"), dir.path().join("out/c.json")]
    );

    let mismatched: Vec<_> = report.mismatched().collect();
    assert_eq!(mismatched.len(), 1);
    assert_eq!(mismatched[0].path, source.join("b.json"));
    assert!(!dir.path().join("out/b.json").exists());
}

#[test]
fn test_malformed_file_is_isolated() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("records");
    fs::create_dir_all(&source).unwrap();
    for i in 0..4 {
        fs::write(
            source.join(format!("valid_{}.json", i)),
            old_record(json!({ "i": i }), &[json!({ "j": i })]),
        )
        .unwrap();
    }
    fs::write(
        source.join("broken.json"),
        r#"{"definition":"{\"a\":","dataCollections":[]}"#,
    )
    .unwrap();

    let resolved = ConvertConfig {
        source: Some(source.clone()),
        format: Some("old".to_string()),
        target: Some(dir.path().join("out")),
        ..Default::default()
    }
    .resolve()
    .unwrap();
    let report = convert_all(&resolved).unwrap();

    assert_eq!(report.converted.len(), 4);
    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].path, source.join("broken.json"));
    assert!(!dir.path().join("out/broken.json").exists());
    assert_eq!(fs::read_dir(dir.path().join("out")).unwrap().count(), 4);
}

#[test]
fn test_explicit_format_mismatch_produces_no_output() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("new.json");
    fs::write(&source, r#"{"definition":{"a":1},"dataCollections":[]}"#).unwrap();

    let resolved = ConvertConfig {
        source: Some(source),
        format: Some("old".to_string()),
        target: Some(dir.path().join("out")),
        ..Default::default()
    }
    .resolve()
    .unwrap();
    let report = convert_all(&resolved).unwrap();

    assert!(report.converted.is_empty());
    assert_eq!(report.mismatched().count(), 1);
    assert_eq!(fs::read_dir(dir.path().join("out")).unwrap().count(), 0);
}

#[test]
fn test_non_record_source_is_fatal() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("records");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("readme.md"), "# notes").unwrap();
    fs::write(source.join("data.json"), r#"{"rows":[]}"#).unwrap();

    let result = ConvertConfig {
        source: Some(source),
        target: Some(dir.path().join("out")),
        ..Default::default()
    }
    .resolve();
    assert!(matches!(result, Err(ConfigError::UndetectableFormat)));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_key_order_survives_conversion() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("record.json");
    fs::write(
        &source,
        r#"{"id":"x","definition":"{}","dataCollections":[{"name":"n","data":"1"}],"z":0}"#,
    )
    .unwrap();

    let resolved = ConvertConfig {
        source: Some(source),
        target: Some(dir.path().join("out")),
        ..Default::default()
    }
    .resolve()
    .unwrap();
    convert_all(&resolved).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("out/record.json")).unwrap(),
        r#"{"id":"x","definition":{},"dataCollections":[{"name":"n","data":1}],"z":0}"#
    );
}

#[test]
fn test_empty_definition_does_not_decide_format() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("records");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.json"), r#"{"definition":""}"#).unwrap();
    fs::write(source.join("b.json"), r#"{"definition":{"x":1}}"#).unwrap();

    let resolved = ConvertConfig {
        source: Some(source),
        target: Some(dir.path().join("out")),
        ..Default::default()
    }
    .resolve()
    .unwrap();
    assert_eq!(resolved.convention, Convention::New);

    let report = convert_all(&resolved).unwrap();
    assert_eq!(report.converted, vec![dir.path().join("out/b.json")]);
    assert_eq!(report.mismatched().count(), 1);
}
