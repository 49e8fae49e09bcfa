//! Integration tests for the JSON command protocol, sessions and export.

use trailmark_lib::command::{execute_json, execute_json_batch};
use trailmark_lib::harness::TestHarness;
use trailmark_lib::state::TrailSnapshot;
use trailmark_lib::validation::TrailValidator;

const DRAW_TWO_TRAILS: &str = r#"[
    {"command": "click", "x": 0.0, "y": 0.0},
    {"command": "click", "x": 30.0, "y": 0.0},
    {"command": "double_click", "x": 30.0, "y": 40.0},
    {"command": "click", "x": 200.0, "y": 0.0},
    {"command": "double_click", "x": 300.0, "y": 0.0}
]"#;

#[test]
fn test_command_draw_and_inspect() {
    let mut h = TestHarness::new();
    let responses = execute_json_batch(&mut h, DRAW_TWO_TRAILS).unwrap();
    assert!(responses.iter().all(|r| r.success));

    let data = execute_json(&mut h, r#"{"command": "inspect"}"#)
        .unwrap()
        .data
        .unwrap();
    assert_eq!(data["trail_count"], 2);
    assert_eq!(data["trails"][0]["labels"][1], "b0: 40.00 m");
    assert_eq!(data["trails"][0]["total"], "Total: 70.00 m");
    assert_eq!(data["trails"][1]["labels"][0], "a1: 100.00 m");
    assert!(data["drawing"].is_null());
}

#[test]
fn test_command_drag_via_pointer_events() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, DRAW_TWO_TRAILS).unwrap();

    let script = r#"[
        {"command": "pointer_down", "x": 300.0, "y": 0.0},
        {"command": "pointer_move", "x": 300.0, "y": 20.0},
        {"command": "pointer_move", "x": 300.0, "y": 75.0},
        {"command": "pointer_up", "x": 300.0, "y": 75.0}
    ]"#;
    let responses = execute_json_batch(&mut h, script).unwrap();
    assert_eq!(responses[0].data.as_ref().unwrap()["drag_armed"], true);
    assert_eq!(responses[3].data.as_ref().unwrap()["dragged"], true);

    let data = h.inspect();
    assert_eq!(data["trails"][1]["labels"][0], "a1: 125.00 m");
}

#[test]
fn test_command_add_mode_and_exit() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, DRAW_TWO_TRAILS).unwrap();

    execute_json(&mut h, r#"{"command": "double_click", "x": 250.0, "y": 0.0}"#).unwrap();
    assert_eq!(h.inspect()["add_mode"], true);

    execute_json(&mut h, r#"{"command": "exit_add_mode"}"#).unwrap();
    assert_eq!(h.inspect()["add_mode"], false);
}

#[test]
fn test_command_remove_trail_with_answers() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, DRAW_TWO_TRAILS).unwrap();
    let id = h.inspect()["trails"][0]["id"].as_str().unwrap().to_string();

    let declined = format!(
        r#"[{{"command": "answer", "accept": false}}, {{"command": "remove_trail", "id": "{id}"}}]"#
    );
    let responses = execute_json_batch(&mut h, &declined).unwrap();
    assert!(!responses[1].success);
    assert_eq!(h.trail_count(), 2);

    let accepted = format!(r#"{{"command": "remove_trail", "id": "{id}"}}"#);
    assert!(execute_json(&mut h, &accepted).unwrap().success);
    assert_eq!(h.trail_count(), 1);
}

#[test]
fn test_command_middle_click_removes_vertex() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, DRAW_TWO_TRAILS).unwrap();

    execute_json(&mut h, r#"{"command": "middle_click", "x": 30.0, "y": 0.0}"#).unwrap();

    let data = h.inspect();
    assert_eq!(data["trails"][0]["labels"], serde_json::json!(["a0: 50.00 m"]));
}

#[test]
fn test_command_export_geojson() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, DRAW_TWO_TRAILS).unwrap();

    let data = execute_json(&mut h, r#"{"command": "export_geojson"}"#)
        .unwrap()
        .data
        .unwrap();
    assert_eq!(data["type"], "FeatureCollection");
    let features = data["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["geometry"]["type"], "LineString");
    assert_eq!(
        features[0]["geometry"]["coordinates"].as_array().unwrap().len(),
        3
    );
    assert_eq!(features[1]["properties"]["lengthText"], "100.00 m");
}

#[test]
fn test_command_unknown_is_an_error() {
    let mut h = TestHarness::new();
    let err = execute_json(&mut h, r#"{"command": "fly"}"#).unwrap_err();
    assert!(err.starts_with("Invalid command JSON"));
}

#[test]
fn test_snapshot_restores_trails_and_labels() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, DRAW_TWO_TRAILS).unwrap();
    let before = h.inspect();
    let snapshot = h.editor.snapshot();

    let mut restored = TestHarness::new();
    restored.editor.restore(snapshot);

    let after = restored.inspect();
    assert_eq!(after["trails"], before["trails"]);
    assert_eq!(
        restored.scene().len(),
        h.scene().len(),
        "restored scene should hold the same primitives"
    );
    let errors = TrailValidator::new(&restored.editor).validate_all();
    assert!(errors.is_empty(), "Validation errors: {:?}", errors);
}

#[test]
fn test_restored_trail_can_be_edited() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, DRAW_TWO_TRAILS).unwrap();
    let mut restored = TestHarness::new();
    restored.editor.restore(h.editor.snapshot());

    // Resume from the last vertex of the second trail
    restored.click(300.0, 0.0);
    restored.double_click(400.0, 0.0);

    let data = restored.inspect();
    assert_eq!(data["trails"][1]["total"], "Total: 200.00 m");
    assert_eq!(data["trails"][1]["labels"][1], "b1: 100.00 m");

    // New trails continue the label numbering
    restored.draw_trail(&[(0.0, 300.0), (10.0, 300.0)]);
    assert_eq!(restored.inspect()["trails"][2]["labels"][0], "a2: 10.00 m");
}

#[test]
fn test_snapshot_file_round_trip() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, DRAW_TWO_TRAILS).unwrap();

    let path = std::env::temp_dir()
        .join(format!("trailmark-test-{}", uuid::Uuid::new_v4()))
        .join("trails.json");
    h.editor.snapshot().save_to(&path).unwrap();
    let loaded = TrailSnapshot::load_from(&path).unwrap();
    let _ = std::fs::remove_dir_all(path.parent().unwrap());

    assert_eq!(loaded.store.len(), 2);
    let mut restored = TestHarness::new();
    restored.editor.restore(loaded);
    assert_eq!(restored.inspect()["trails"], h.inspect()["trails"]);
}

#[tokio::test]
async fn test_submitted_state_survives_restore() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, DRAW_TWO_TRAILS).unwrap();
    let submitter = trailmark_lib::fixtures::RecordingSubmitter::new();
    h.editor.submit(&submitter).await.unwrap();

    let mut restored = TestHarness::new();
    restored.editor.restore(h.editor.snapshot());

    let data = restored.inspect();
    assert_eq!(data["trails"][0]["submitted"], false);
    assert_eq!(data["trails"][1]["submitted"], true);
    assert!(restored.editor.submit_target().is_none());
}
