//! Command line parsing and end-to-end command execution.

use std::path::Path;

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use treeguide::application::services::GuideRepository;
use treeguide::cli::{execute, Cli, CliError};
use treeguide::config::Settings;
use treeguide::exitcode;
use treeguide::infrastructure::ServiceContainer;
use treeguide::util::testing;

fn run(data_dir: &Path, args: &[&str]) -> Result<(), CliError> {
    let mut argv = vec!["treeguide", "-D", data_dir.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("arguments should parse");
    execute(&cli)
}

fn repository(data_dir: &Path) -> GuideRepository {
    let settings = Settings {
        data_dir: data_dir.to_path_buf(),
        ..Settings::default()
    };
    ServiceContainer::new(settings).guides()
}

// ============================================================
// Parsing
// ============================================================

#[rstest]
#[case(&["treeguide", "guide", "validate", "g.tsg"])]
#[case(&["treeguide", "-dd", "guide", "export", "g.tsg", "--format", "html"])]
#[case(&["treeguide", "answer", "add", "g.tsg", "q1", "Yes", "--solution", "Done"])]
#[case(&["treeguide", "catalog", "add-guide", "smart-toaster-3000", "toast-problems", "new-guide"])]
#[case(&["treeguide", "completion", "bash"])]
fn given_valid_arguments_when_parsing_then_accepted(#[case] argv: &[&str]) {
    assert!(Cli::try_parse_from(argv).is_ok());
}

#[rstest]
#[case(&["treeguide", "answer", "add", "g.tsg", "q1", "Yes"])]
#[case(&["treeguide", "answer", "add", "g.tsg", "q1", "Yes", "--next", "q2", "--solution", "x"])]
#[case(&["treeguide", "guide", "bump", "g.tsg", "--major", "--minor"])]
#[case(&["treeguide", "guide", "export", "g.tsg", "--format", "pdf"])]
fn given_invalid_arguments_when_parsing_then_rejected(#[case] argv: &[&str]) {
    assert!(Cli::try_parse_from(argv).is_err());
}

// ============================================================
// Execution
// ============================================================

#[test]
fn given_authoring_commands_when_executed_then_valid_guide_on_disk() {
    testing::init_test_setup();
    // Arrange
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let file = dir.join("wifi.tsg");
    let f = file.to_str().unwrap();

    // Act
    run(dir, &["guide", "new", "Wifi", "--author", "Ops", "--out", f]).unwrap();
    run(dir, &["node", "add", f, "Is Wi-Fi enabled?", "--id", "enabled", "--root"]).unwrap();
    run(dir, &["node", "add", f, "Do other devices connect?", "--id", "others"]).unwrap();
    run(dir, &["answer", "add", f, "enabled", "No", "--solution", "Turn Wi-Fi on"]).unwrap();
    run(dir, &["answer", "add", f, "enabled", "Yes", "--next", "others"]).unwrap();
    run(dir, &["answer", "add", f, "others", "No", "--solution", "Restart the router"]).unwrap();
    run(dir, &["answer", "add", f, "others", "Yes", "--solution", "Forget and rejoin"]).unwrap();
    run(dir, &["guide", "tag", f, "add", "network"]).unwrap();
    run(dir, &["guide", "bump", f, "--minor"]).unwrap();

    // Assert
    run(dir, &["guide", "validate", f]).unwrap();
    let guide = repository(dir).load(&file).unwrap();
    assert_eq!(guide.metadata.author, "Ops");
    assert_eq!(guide.metadata.version, "1.1.0");
    assert_eq!(guide.metadata.tags, vec!["network".to_string()]);
    assert_eq!(guide.root_node_id().map(|id| id.to_string()), Some("enabled".into()));
    assert_eq!(guide.get_statistics().total_paths, 3);
}

#[test]
fn given_incomplete_guide_when_validating_then_dataerr() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let file = dir.join("half.tsg");
    let f = file.to_str().unwrap();
    run(dir, &["guide", "new", "Half", "--out", f]).unwrap();
    run(dir, &["node", "add", f, "Only one answer?", "--id", "q"]).unwrap();
    run(dir, &["answer", "add", f, "q", "Yes", "--next", "missing"]).unwrap();

    // Act
    let err = run(dir, &["guide", "validate", f]).unwrap_err();

    // Assert
    assert!(matches!(err, CliError::InvalidGuide(2)));
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_missing_guide_when_running_command_then_noinput() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.tsg");

    let err = run(temp.path(), &["guide", "stats", missing.to_str().unwrap()]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_root_node_when_removing_via_cli_then_usage_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let file = dir.join("g.tsg");
    let f = file.to_str().unwrap();
    run(dir, &["guide", "new", "G", "--out", f]).unwrap();
    run(dir, &["node", "add", f, "Start?", "--id", "start"]).unwrap();

    // Act
    let err = run(dir, &["node", "remove", f, "start"]).unwrap_err();

    // Assert
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_guide_when_exporting_without_out_then_written_next_to_guide() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let file = dir.join("g.tsg");
    let f = file.to_str().unwrap();
    run(dir, &["guide", "new", "G", "--out", f]).unwrap();

    // Act
    run(dir, &["guide", "export", f, "--format", "html"]).unwrap();

    // Assert
    assert!(dir.join("g.html").is_file());
}

#[test]
fn given_library_commands_when_executed_then_layout_and_catalog_created() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    // Act
    run(dir, &["library", "init"]).unwrap();
    let again = run(dir, &["catalog", "init"]);
    run(dir, &["catalog", "add-guide", "quantum-coffee", "quantum-issues", "foam"]).unwrap();

    // Assert
    assert!(dir.join("guides").is_dir());
    assert!(dir.join("examples/toast-too-dark.tsg").is_file());
    assert!(dir.join("product_catalog.json").is_file());
    assert_eq!(again.unwrap_err().exit_code(), exitcode::USAGE);
    run(dir, &["catalog", "locate", "foam"]).unwrap();
    run(dir, &["library", "list"]).unwrap();
}
