use egui::Ui;

use trailmark_lib::scene::labels;
use trailmark_lib::DrawState;

use crate::app::Editor;

pub fn show(ui: &mut Ui, editor: &Editor) {
    ui.horizontal(|ui| {
        let trails = editor.store().live_groups().count();
        ui.weak(format!("Trails: {trails}"));

        ui.separator();

        if editor.is_dragging() {
            ui.colored_label(egui::Color32::YELLOW, "Moving point: release to drop");
        } else if editor.armed_segment().is_some() {
            ui.colored_label(
                egui::Color32::YELLOW,
                "Add mode: click to insert a point, Esc to leave",
            );
        } else {
            match editor.draw_state() {
                DrawState::Drawing(edit) => {
                    let points = editor.store().get(edit.trail).map_or(0, |g| g.len());
                    ui.colored_label(
                        egui::Color32::YELLOW,
                        format!("Drawing ({points} points): click to add, double click to finish"),
                    );
                }
                _ => match editor.selection().selected_trail {
                    Some(trail) => {
                        let length = editor.trail_length(trail).unwrap_or_default();
                        let state = if editor.is_submitted(trail) {
                            "submitted"
                        } else {
                            "not submitted"
                        };
                        ui.label(format!(
                            "Selected: {} ({state})",
                            labels::format_distance(length)
                        ));
                    }
                    None => {
                        ui.weak("Click to start a trail");
                    }
                },
            }
        }

        if editor.submissions().in_flight() {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(255, 200, 100), "Submitting…");
        }

        // Right-aligned pointer position
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if let Some(p) = editor.pointer() {
                ui.weak(format!("{:.2}, {:.2}", p.x, p.y));
            }
        });
    });
}
