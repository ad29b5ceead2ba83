//! End-to-end tests for the `dayplan` binary.
//!
//! Each test runs the built executable against a temporary data directory
//! with `XDG_CONFIG_HOME` pointed at an empty directory, so no user config
//! leaks in.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{Value, json};

use dayplan_core::DocumentKind;
use dayplan_core::workout::PLANNER_REST_MESSAGE;
use dayplan_test_utils::{self as fixtures, TempDataDir};

/// Run the binary against `data` with an isolated config home.
fn dayplan(data: &Path, args: &[&str]) -> Output {
    let config_home = tempfile::TempDir::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_dayplan"))
        .arg("--data-dir")
        .arg(data)
        .args(args)
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("DAYPLAN_DATA_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run dayplan")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "dayplan failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn show_json_applies_planner_overrides() {
    let data = TempDataDir::with_all_documents();
    let out = stdout(&dayplan(data.path(), &["show", "--date", "2025-11-04", "--json"]));
    let plan: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(plan["date"], json!("2025-11-04"));
    assert_eq!(plan["weekday"], json!("tuesday"));
    assert_eq!(plan["workout"]["source"], json!("Planner (Monday)"));
    assert_eq!(plan["workout"]["focus"], json!("Upper A"));
    assert_eq!(plan["nutrition"]["plan_label"], json!("Planner override"));
    assert_eq!(plan["nutrition"]["day_type_label"], json!("Rest A"));
    assert_eq!(plan["supplements"]["on"], json!(false));
}

#[test]
fn show_text_on_planner_rest_day() {
    let data = TempDataDir::with_all_documents();
    let out = stdout(&dayplan(data.path(), &["show", "--date", "2025-11-06"]));

    assert!(out.contains(" DAILY PLAN FOR THURSDAY 2025-11-06"), "{out}");
    assert!(out.contains("[Planner]\n"));
    assert!(out.contains("  Notes: Travel day\n"));
    assert!(out.contains(&format!("[Workout]\n  {PLANNER_REST_MESSAGE}\n")), "{out}");
}

#[test]
fn show_with_empty_directory_prints_messages() {
    let data = TempDataDir::new();
    let out = stdout(&dayplan(data.path(), &["show", "--date", "2025-11-03"]));
    assert!(out.contains("No workout.json found or it's empty."), "{out}");
    assert!(out.contains("No supplements.json found or it's empty."));
}

#[test]
fn show_rejects_bad_date() {
    let data = TempDataDir::new();
    let output = dayplan(data.path(), &["show", "--date", "2025-13-01"]);
    assert!(!output.status.success());
}

#[test]
fn migrate_nutrition_writes_a_new_file() {
    let data = TempDataDir::new();
    data.write(DocumentKind::Nutrition, &fixtures::nutrition_legacy_days());

    let out = stdout(&dayplan(data.path(), &["migrate-nutrition", "--to", "v2"]));
    assert!(out.contains("replace nutrition.json manually"), "{out}");

    let migrated: Value = serde_json::from_str(
        &std::fs::read_to_string(data.path().join("nutrition_v2.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(migrated["version"], json!(2));

    let again = dayplan(data.path(), &["migrate-nutrition", "--to", "v2"]);
    assert!(!again.status.success());
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));
}

#[test]
fn inspect_lists_every_document() {
    let data = TempDataDir::with_all_documents();
    let out = stdout(&dayplan(data.path(), &["inspect"]));
    for kind in DocumentKind::ALL {
        assert!(out.contains(kind.file_name()), "{kind} missing from {out}");
    }
    assert!(out.contains("v3 day-type plans"), "{out}");
    assert!(out.contains("month 2025-11"), "{out}");
}
