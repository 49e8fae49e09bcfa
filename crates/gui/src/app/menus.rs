//! Application menu bar and settings window

use eframe::egui;
use shared::Georeference;

use trailmark_lib::state::TrailSnapshot;

use super::Editor;
use crate::ui::toolbar;
use crate::viewport::PlanViewport;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, editor: &mut Editor) {
    ui.menu_button("File", |ui| {
        if ui.button("Open trails…").clicked() {
            ui.close_menu();
            if let Some(path) = rfd::FileDialog::new()
                .set_title("Open trails")
                .add_filter("JSON", &["json"])
                .pick_file()
            {
                match TrailSnapshot::load_from(&path) {
                    Ok(snapshot) => {
                        editor.restore(snapshot);
                        tracing::info!("Loaded trails from {}", path.display());
                    }
                    Err(e) => tracing::error!("Failed to load trails: {e}"),
                }
            }
        }
        if ui.button("Save trails…").clicked() {
            ui.close_menu();
            if let Some(path) = rfd::FileDialog::new()
                .set_title("Save trails")
                .add_filter("JSON", &["json"])
                .set_file_name("trails.json")
                .save_file()
            {
                match editor.snapshot().save_to(&path) {
                    Ok(()) => tracing::info!("Saved trails to {}", path.display()),
                    Err(e) => tracing::error!("Failed to save trails: {e}"),
                }
            }
        }
        ui.separator();
        if ui.button("Export GeoJSON…").clicked() {
            ui.close_menu();
            toolbar::action_export_geojson(editor);
        }
    });
}

pub fn view_menu(ui: &mut egui::Ui, editor: &mut Editor, viewport: &mut PlanViewport) {
    ui.menu_button("View", |ui| {
        if ui.button("Fit trails").clicked() {
            viewport.fit_trails(editor);
            ui.close_menu();
        }
        if ui.button("Reset view").clicked() {
            viewport.reset(editor);
            ui.close_menu();
        }
    });
}

/// Settings window. Returns the new endpoint when it was changed.
pub fn settings_window(ctx: &egui::Context, open: &mut bool, editor: &mut Editor) -> Option<String> {
    let mut changed = false;
    let endpoint_before = editor.settings.submission.endpoint.clone();

    egui::Window::new("Settings")
        .open(open)
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            let settings = &mut editor.settings;
            egui::Grid::new("settings_grid")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Min. point spacing (m)");
                    changed |= ui
                        .add(
                            egui::DragValue::new(&mut settings.drawing.proximity_threshold)
                                .speed(0.05)
                                .range(0.0..=100.0),
                        )
                        .changed();
                    ui.end_row();

                    ui.label("Pick radius (px)");
                    changed |= ui
                        .add(
                            egui::DragValue::new(&mut settings.drawing.pick_radius_px)
                                .speed(0.5)
                                .range(1.0..=40.0),
                        )
                        .changed();
                    ui.end_row();

                    ui.label("Drag threshold (px)");
                    changed |= ui
                        .add(
                            egui::DragValue::new(&mut settings.drawing.drag_threshold_px)
                                .speed(0.5)
                                .range(0.0..=40.0),
                        )
                        .changed();
                    ui.end_row();

                    ui.label("Remove emptied trails");
                    changed |= ui
                        .checkbox(&mut settings.drawing.prune_empty_trails, "")
                        .changed();
                    ui.end_row();

                    ui.label("Backend URL");
                    changed |= ui
                        .text_edit_singleline(&mut settings.submission.endpoint)
                        .changed();
                    ui.end_row();

                    ui.label("Submitter e-mail");
                    let mut email = settings.submission.submitter_id.clone().unwrap_or_default();
                    if ui.text_edit_singleline(&mut email).changed() {
                        let email = email.trim();
                        settings.submission.submitter_id =
                            (!email.is_empty()).then(|| email.to_string());
                        changed = true;
                    }
                    ui.end_row();

                    ui.label("Confirm before submitting");
                    changed |= ui.checkbox(&mut settings.submission.confirm, "").changed();
                    ui.end_row();

                    if let Georeference::LocalEnu { origin } = &mut settings.georeference {
                        ui.label("Origin lon / lat (°)");
                        ui.horizontal(|ui| {
                            changed |= ui
                                .add(egui::DragValue::new(&mut origin.longitude).speed(0.0001))
                                .changed();
                            changed |= ui
                                .add(egui::DragValue::new(&mut origin.latitude).speed(0.0001))
                                .changed();
                        });
                        ui.end_row();

                        ui.label("Origin height (m)");
                        changed |= ui
                            .add(egui::DragValue::new(&mut origin.height).speed(0.1))
                            .changed();
                        ui.end_row();
                    }
                });
        });

    if !changed {
        return None;
    }
    editor.renderer.pick_radius_px = editor.settings.drawing.pick_radius_px;
    editor.settings.save();
    (editor.settings.submission.endpoint != endpoint_before)
        .then(|| editor.settings.submission.endpoint.clone())
}
