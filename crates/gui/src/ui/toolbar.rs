//! Toolbar actions and UI

use egui::Ui;

use crate::app::Editor;

// ── Public actions (callable from menus too) ─────────────────

/// Ask for a path and write every trail as GeoJSON
pub fn action_export_geojson(editor: &Editor) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export GeoJSON")
        .add_filter("GeoJSON", &["geojson", "json"])
        .set_file_name("trails.geojson")
        .save_file()
    else {
        return;
    };
    match serde_json::to_string_pretty(&editor.export_geojson()) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&path, json) {
                tracing::error!("Failed to write GeoJSON: {e}");
            } else {
                tracing::info!("Exported trails to {}", path.display());
            }
        }
        Err(e) => tracing::error!("Failed to serialize GeoJSON: {e}"),
    }
}

pub fn action_finish_trail(editor: &mut Editor) {
    if let Err(e) = editor.finish_measure(None) {
        tracing::warn!("Finish trail: {e}");
    }
}

pub fn action_delete_selected(editor: &mut Editor) {
    let Some(trail) = editor.selection().selected_trail else {
        return;
    };
    if let Err(e) = editor.remove_trail(trail) {
        tracing::warn!("Delete trail: {e}");
    }
}

/// Draw the toolbar. Returns true when Submit was clicked.
pub fn show(ui: &mut Ui, editor: &mut Editor) -> bool {
    let mut submit = false;
    ui.horizontal(|ui| {
        let drawing = editor.active_edit().is_some();
        if ui
            .add_enabled(drawing, egui::Button::new("Finish trail"))
            .on_hover_text("Finish the trail being drawn (Esc, right click)")
            .clicked()
        {
            action_finish_trail(editor);
        }
        if ui
            .add_enabled(editor.armed_segment().is_some(), egui::Button::new("Exit add mode"))
            .on_hover_text("Stop inserting into the armed segment (Esc)")
            .clicked()
        {
            editor.exit_add_mode();
        }

        ui.separator();

        let in_flight = editor.submissions().in_flight();
        let can_submit = editor.submit_target().is_some() && !in_flight;
        if ui
            .add_enabled(can_submit, egui::Button::new("Submit"))
            .on_hover_text("Send the selected trail to the backend (Ctrl+Enter)")
            .clicked()
        {
            submit = true;
        }
        if in_flight {
            ui.spinner();
        }
        if ui
            .add_enabled(
                editor.selection().selected_trail.is_some() && !drawing,
                egui::Button::new("Delete trail"),
            )
            .on_hover_text("Delete the selected trail (Del)")
            .clicked()
        {
            action_delete_selected(editor);
        }

        ui.separator();

        if ui.button("Export GeoJSON").clicked() {
            action_export_geojson(editor);
        }
    });
    submit
}
