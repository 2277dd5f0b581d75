//! Paired fixture walker
//!
//! Fixtures are paired text/json files with matching basenames under
//! `tests/fixtures/{text,json}`. Alternative text spellings of the same
//! filter carry an `-altNN` suffix and must parse to the main JSON, but are
//! not expected to match the normalized text output.

use cql2_filter::{parse_json, parse_text, to_json, to_text};
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[test]
fn paired_fixtures_agree() {
    let text_dir = fixtures_dir().join("text");
    let json_dir = fixtures_dir().join("json");

    let mut text_files: Vec<PathBuf> = fs::read_dir(&text_dir)
        .expect("fixture text dir")
        .map(|entry| entry.expect("fixture entry").path())
        .collect();
    text_files.sort();
    assert!(!text_files.is_empty(), "no fixtures found");

    for text_path in text_files {
        let stem = text_path
            .file_stem()
            .and_then(|s| s.to_str())
            .expect("fixture stem");
        let base = stem.split('-').next().expect("fixture base name");
        let json_path = json_dir.join(format!("{base}.json"));

        let text = fs::read_to_string(&text_path).expect("read text fixture");
        let text = text.trim();
        let json_value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).expect("read json fixture"))
                .expect("fixture json parses");

        let from_text =
            parse_text(text).unwrap_or_else(|e| panic!("{stem}: text failed to parse: {e}"));
        let from_json =
            parse_json(&json_value).unwrap_or_else(|e| panic!("{base}: json failed to decode: {e}"));

        assert_eq!(from_text, from_json, "{stem}: text and json trees disagree");
        assert_eq!(
            to_json(&from_text),
            json_value,
            "{stem}: emitted json differs from fixture"
        );
        if !stem.contains("-alt") {
            assert_eq!(
                to_text(&from_json),
                text,
                "{stem}: emitted text differs from fixture"
            );
        }
    }
}

#[test]
fn every_json_fixture_has_a_text_twin() {
    let json_dir = fixtures_dir().join("json");
    let text_dir = fixtures_dir().join("text");
    for entry in fs::read_dir(&json_dir).expect("fixture json dir") {
        let path = entry.expect("fixture entry").path();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .expect("fixture stem");
        assert!(
            text_dir.join(format!("{stem}.txt")).exists(),
            "{stem}.json has no matching text fixture"
        );
    }
}
