//! JSON command protocol for scripted editing sessions.
//!
//! Each command is one pointer gesture (in screen pixels) or a query, applied
//! to a [`TestHarness`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::harness::TestHarness;
use crate::state::trails::TrailId;

/// A command a script can execute against the editor.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    Click { x: f64, y: f64 },
    DoubleClick { x: f64, y: f64 },
    RightClick { x: f64, y: f64 },
    MiddleClick { x: f64, y: f64 },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    /// Leave add mode without inserting.
    ExitAddMode,
    /// Delete a whole trail by id.
    RemoveTrail { id: String },
    /// Answer the next confirmation prompt.
    Answer { accept: bool },
    /// Inspect every trail.
    Inspect,
    /// Export trails as GeoJSON.
    ExportGeojson,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: EditorCommand) -> CommandResponse {
    let editor = &mut harness.editor;
    match cmd {
        EditorCommand::Click { x, y } => editor.click(DVec2::new(x, y)),
        EditorCommand::DoubleClick { x, y } => editor.double_click(DVec2::new(x, y)),
        EditorCommand::RightClick { x, y } => editor.right_click(DVec2::new(x, y)),
        EditorCommand::MiddleClick { x, y } => editor.middle_click(DVec2::new(x, y)),
        EditorCommand::PointerDown { x, y } => {
            let taken = editor.pointer_down(DVec2::new(x, y));
            return CommandResponse::ok_with_data(serde_json::json!({ "drag_armed": taken }));
        }
        EditorCommand::PointerMove { x, y } => editor.pointer_move(DVec2::new(x, y)),
        EditorCommand::PointerUp { x, y } => {
            let committed = editor.pointer_up(DVec2::new(x, y));
            return CommandResponse::ok_with_data(serde_json::json!({ "dragged": committed }));
        }
        EditorCommand::ExitAddMode => editor.exit_add_mode(),
        EditorCommand::RemoveTrail { id } => {
            let Some(trail) = TrailId::parse(&id) else {
                return CommandResponse::err(format!("Invalid trail id: {id}"));
            };
            if let Err(e) = editor.remove_trail(trail) {
                return CommandResponse::err(e.to_string());
            }
        }
        EditorCommand::Answer { accept } => editor.notifier.answer(accept),
        EditorCommand::Inspect => return CommandResponse::ok_with_data(harness.inspect()),
        EditorCommand::ExportGeojson => {
            return CommandResponse::ok_with_data(harness.editor.export_geojson())
        }
    }
    CommandResponse::ok()
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_click() {
        let json = r#"{"command": "click", "x": 10.0, "y": 20.0}"#;
        let cmd: EditorCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, EditorCommand::Click { x, y } if x == 10.0 && y == 20.0));
    }

    #[test]
    fn test_command_serde_exit_add_mode() {
        let cmd: EditorCommand = serde_json::from_str(r#"{"command": "exit_add_mode"}"#).unwrap();
        assert!(matches!(cmd, EditorCommand::ExitAddMode));
    }

    #[test]
    fn test_execute_draw_and_inspect() {
        let mut h = TestHarness::new();
        let script = r#"[
            {"command": "click", "x": 0.0, "y": 0.0},
            {"command": "click", "x": 100.0, "y": 0.0},
            {"command": "double_click", "x": 100.0, "y": 100.0}
        ]"#;
        let responses = execute_json_batch(&mut h, script).unwrap();
        assert!(responses.iter().all(|r| r.success));

        let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["trail_count"], 1);
        assert_eq!(data["trails"][0]["total"], "Total: 200.00 m");
    }

    #[test]
    fn test_execute_remove_trail_with_bad_id() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "remove_trail", "id": "nope"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("Invalid trail id"));
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = TestHarness::new();
        let result = execute_json(&mut h, "not valid json");
        assert!(result.is_err());
    }
}
