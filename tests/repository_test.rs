//! Guide persistence and export through the real filesystem.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;

use treeguide::application::services::{ExportFormat, GuideRepository};
use treeguide::application::ApplicationError;
use treeguide::config::Settings;
use treeguide::domain::{Guide, GuideMetadata, Node};
use treeguide::infrastructure::traits::RealFileSystem;
use treeguide::util::testing;

fn repository(data_dir: &Path) -> GuideRepository {
    let settings = Settings {
        data_dir: data_dir.to_path_buf(),
        ..Settings::default()
    };
    GuideRepository::new(Arc::new(RealFileSystem), Arc::new(settings))
}

fn printer_guide() -> Guide {
    let mut guide = Guide::new(
        GuideMetadata::new("Printer: paper jam!", "Paper stuck in tray").with_author("Support"),
    );
    guide.metadata.add_tag("printer");
    let mut tray = Node::with_id("tray", "Is paper visible in the tray?");
    tray.help_text = Some("Open the front cover".into());
    tray.add_solution("Yes", "Pull it out <gently> & close the cover");
    tray.add_continuation("No", "rear");
    let mut rear = Node::with_id("rear", "Is paper visible at the back?");
    rear.add_solution("Yes", "Open the rear door and remove it");
    rear.add_solution("No", "Call service");
    guide.add_node(tray, true);
    guide.add_node(rear, false);
    guide
}

// ============================================================
// save / load
// ============================================================

#[test]
fn given_guide_when_saved_without_path_then_written_under_guides_dir() {
    testing::init_test_setup();
    // Arrange
    let temp = TempDir::new().unwrap();
    let repo = repository(temp.path());

    // Act
    let path = repo.save(&printer_guide(), None).unwrap();

    // Assert
    assert_eq!(path, temp.path().join("guides").join("Printer_paper_jam.tsg"));
    assert!(path.is_file());
}

#[test]
fn given_saved_guide_when_reading_raw_json_then_envelope_present() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let repo = repository(temp.path());
    let path = repo
        .save(&printer_guide(), Some(&temp.path().join("g.json")))
        .unwrap();

    // Act
    let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

    // Assert
    assert_eq!(doc["_metadata"]["file_version"], "1.0");
    assert_eq!(doc["_metadata"]["application"], "treeguide");
    assert_eq!(doc["root_node_id"], "tray");
    assert_eq!(doc["nodes"]["rear"]["question"], "Is paper visible at the back?");
}

#[test]
fn given_saved_guide_when_loading_then_equal_to_original() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let repo = repository(temp.path());
    let guide = printer_guide();
    let path = repo.save(&guide, None).unwrap();

    // Act
    let loaded = repo.load(&path).unwrap();

    // Assert
    assert_eq!(loaded, guide);
    assert!(loaded.validate().is_valid());
}

#[test]
fn given_document_without_optional_fields_when_loading_then_defaults_applied() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("minimal.json");
    fs::write(
        &path,
        r#"{
            "metadata": {"title": "Minimal", "description": "", "created_date": "2024-01-15T10:30:00"},
            "root_node_id": "",
            "nodes": {}
        }"#,
    )
    .unwrap();
    let repo = repository(temp.path());

    // Act
    let guide = repo.load(&path).unwrap();

    // Assert
    assert_eq!(guide.metadata.title, "Minimal");
    assert_eq!(guide.metadata.author, "Unknown");
    assert_eq!(guide.metadata.version, "1.0.0");
    assert_eq!(guide.root_node_id(), None);
    assert!(guide.is_empty());
}

#[test]
fn given_missing_file_when_loading_then_guide_not_found() {
    let temp = TempDir::new().unwrap();
    let repo = repository(temp.path());

    let result = repo.load(&temp.path().join("nope.tsg"));

    assert!(matches!(result, Err(ApplicationError::GuideNotFound(_))));
}

#[test]
fn given_corrupt_file_when_loading_then_malformed_and_try_load_none() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.tsg");
    fs::write(&path, "{ not json").unwrap();
    let repo = repository(temp.path());

    // Act / Assert
    assert!(matches!(
        repo.load(&path),
        Err(ApplicationError::MalformedGuide { .. })
    ));
    assert!(repo.try_load(&path).is_none());
}

#[test]
fn given_unparseable_timestamp_when_loading_then_malformed() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("yesterday.tsg");
    fs::write(
        &path,
        r#"{
            "metadata": {"title": "Stale", "description": "", "created_date": "yesterday"},
            "root_node_id": "",
            "nodes": {}
        }"#,
    )
    .unwrap();
    let repo = repository(temp.path());

    // Act / Assert
    assert!(matches!(
        repo.load(&path),
        Err(ApplicationError::MalformedGuide { .. })
    ));
}

// ============================================================
// export
// ============================================================

#[test]
fn given_guide_when_exporting_text_then_tree_with_solutions() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let repo = repository(temp.path());
    let out = temp.path().join("out/printer.txt");

    // Act
    repo.export(&printer_guide(), ExportFormat::Text, &out).unwrap();

    // Assert
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("Printer: paper jam!\n"));
    assert!(text.contains("Author: Support"));
    assert!(text.contains("Tags: printer"));
    assert!(text.contains("Is paper visible in the tray? (Open the front cover)"));
    assert!(text.contains("[No]"));
    assert!(text.contains("Solution: Call service"));
}

#[test]
fn given_markup_in_text_when_exporting_html_then_escaped() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let repo = repository(temp.path());
    let out = temp.path().join("printer.html");

    // Act
    repo.export(&printer_guide(), ExportFormat::Html, &out).unwrap();

    // Assert
    let html = fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Pull it out &lt;gently&gt; &amp; close the cover"));
    assert!(!html.contains("<gently>"));
}

#[test]
fn given_cyclic_guide_when_exporting_html_then_each_question_once() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let repo = repository(temp.path());
    let mut guide = printer_guide();
    guide.node_mut("rear").unwrap().add_continuation("Unsure", "tray");
    let out = temp.path().join("cyclic.html");

    // Act
    repo.export(&guide, ExportFormat::Html, &out).unwrap();

    // Assert
    let html = fs::read_to_string(&out).unwrap();
    assert_eq!(html.matches("Is paper visible in the tray?").count(), 1);
    assert_eq!(html.matches("Is paper visible at the back?").count(), 1);
}

#[test]
fn given_deep_chain_when_exporting_text_then_depth_capped() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let repo = repository(temp.path());
    let mut guide = Guide::new(GuideMetadata::new("Deep", ""));
    for i in 0..8 {
        let mut node = Node::with_id(format!("q{}", i), format!("Question {}", i));
        node.add_continuation("Next", format!("q{}", i + 1));
        node.add_solution("Stop", "Done");
        guide.add_node(node, i == 0);
    }
    let out = temp.path().join("deep.txt");

    // Act
    repo.export(&guide, ExportFormat::Text, &out).unwrap();

    // Assert
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("Question 4"));
    assert!(!text.contains("Question 5"));
}

#[test]
fn given_json_format_when_exporting_then_loadable_guide() {
    let temp = TempDir::new().unwrap();
    let repo = repository(temp.path());
    let guide = printer_guide();
    let out = temp.path().join("copy.json");

    repo.export(&guide, ExportFormat::Json, &out).unwrap();

    assert_eq!(repo.load(&out).unwrap(), guide);
}
