//! Keyboard shortcut handling

use eframe::egui;

use super::Editor;

#[derive(Default)]
struct Keys {
    escape: bool,
    delete: bool,
    submit: bool,
}

/// Handle keyboard shortcuts. Returns true when a submission was requested.
pub fn handle_keyboard(ctx: &egui::Context, editor: &mut Editor) -> bool {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return false;
    }

    // Read keys first: deletion may open a blocking confirmation dialog
    let keys = ctx.input(|i| Keys {
        escape: i.key_pressed(egui::Key::Escape),
        delete: i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
        submit: i.modifiers.command && i.key_pressed(egui::Key::Enter),
    });

    if keys.escape {
        handle_escape(editor);
    }
    if keys.delete {
        handle_delete(editor);
    }
    keys.submit
}

/// Escape: leave add mode, else finish the trail being drawn, else deselect
fn handle_escape(editor: &mut Editor) {
    if editor.armed_segment().is_some() {
        editor.exit_add_mode();
    } else if editor.active_edit().is_some() {
        if let Err(e) = editor.finish_measure(None) {
            tracing::warn!("Finish trail: {e}");
        }
    } else {
        editor.clear_selection();
    }
}

fn handle_delete(editor: &mut Editor) {
    let Some(trail) = editor.selection().selected_trail else {
        return;
    };
    if let Err(e) = editor.remove_trail(trail) {
        tracing::warn!("Delete trail: {e}");
    }
}
