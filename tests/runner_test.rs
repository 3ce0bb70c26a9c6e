//! Interactive session driven by scripted input.

use std::io::Cursor;

use treeguide::cli::{run_session, RunOutcome};
use treeguide::domain::{Guide, GuideMetadata, Node};
use treeguide::util::testing;

fn kettle_guide() -> Guide {
    let mut guide = Guide::new(GuideMetadata::new("Kettle", "Kettle will not boil"));
    let mut power = Node::with_id("power", "Does the light come on?");
    power.help_text = Some("Check the switch at the base".into());
    power.add_continuation("Yes", "water");
    power.add_solution("No", "Check the fuse in the plug");
    let mut water = Node::with_id("water", "Is there water above the minimum mark?");
    water.add_solution("Yes", "Descale the element");
    water.add_solution("No", "Fill the kettle");
    guide.add_node(power, true);
    guide.add_node(water, false);
    guide
}

fn run(guide: &Guide, script: &str) -> (RunOutcome, String) {
    let mut input = Cursor::new(script.as_bytes().to_vec());
    let mut out = Vec::new();
    let outcome = run_session(guide, &mut input, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn given_choices_when_running_then_solution_reached() {
    testing::init_test_setup();
    // Arrange
    let guide = kettle_guide();

    // Act
    let (outcome, out) = run(&guide, "1\n2\nq\n");

    // Assert
    assert_eq!(outcome, RunOutcome::Solved("Fill the kettle".to_string()));
    assert!(out.contains("Does the light come on?"));
    assert!(out.contains("Check the switch at the base"));
    assert!(out.contains("Is there water above the minimum mark?"));
    assert!(out.contains("Fill the kettle"));
}

#[test]
fn given_input_ends_early_when_running_then_quit() {
    let guide = kettle_guide();

    let (outcome, _) = run(&guide, "1\n");

    assert_eq!(outcome, RunOutcome::Quit);
}

#[test]
fn given_bad_input_and_back_at_start_when_running_then_messages_and_continue() {
    // Arrange
    let guide = kettle_guide();

    // Act
    let (outcome, out) = run(&guide, "b\n7\nmaybe\n2\n");

    // Assert
    assert!(out.contains("Already at the first question"));
    assert_eq!(out.matches("Invalid choice").count(), 2);
    assert_eq!(
        outcome,
        RunOutcome::Solved("Check the fuse in the plug".to_string())
    );
}

#[test]
fn given_solution_when_going_back_then_outcome_cleared() {
    // Arrange
    let guide = kettle_guide();

    // Act
    let (outcome, _) = run(&guide, "2\nb\n");

    // Assert
    assert_eq!(outcome, RunOutcome::Quit);
}

#[test]
fn given_restart_when_running_then_starts_over() {
    let guide = kettle_guide();

    let (outcome, out) = run(&guide, "1\nr\n1\n1\n");

    assert_eq!(out.matches("Does the light come on?").count(), 2);
    assert_eq!(outcome, RunOutcome::Solved("Descale the element".to_string()));
}

#[test]
fn given_guide_without_root_when_running_then_error() {
    let guide = Guide::new(GuideMetadata::new("Empty", ""));
    let mut out = Vec::new();

    let result = run_session(&guide, &mut Cursor::new(Vec::new()), &mut out);

    assert!(result.is_err());
}
