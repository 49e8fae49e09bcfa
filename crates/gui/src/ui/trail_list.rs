//! Trail list panel

use egui::Ui;

use trailmark_lib::scene::labels;
use trailmark_lib::state::TrailId;

use crate::app::Editor;

enum RowAction {
    Select(TrailId),
    Delete(TrailId),
}

pub fn show(ui: &mut Ui, editor: &mut Editor) {
    ui.horizontal(|ui| {
        ui.heading("Trails");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("({})", editor.store().live_groups().count()));
        });
    });
    ui.separator();

    // Collect rows first to avoid borrow conflicts
    let rows: Vec<_> = editor
        .store()
        .live_groups()
        .map(|g| {
            (
                g.id,
                g.label_number,
                g.len(),
                editor.trail_length(g.id).unwrap_or_default(),
                editor.is_submitted(g.id),
            )
        })
        .collect();

    if rows.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.weak("No trails yet");
        });
        return;
    }

    let selected = editor.selection().selected_trail;
    let active = editor.active_edit().map(|e| e.trail);
    let mut action = None;

    egui::ScrollArea::vertical()
        .id_salt("trail_list_scroll")
        .show(ui, |ui| {
            for (id, number, points, length, submitted) in rows {
                ui.horizontal(|ui| {
                    let mut text = format!(
                        "Trail {number}  ·  {points} pts  ·  {}",
                        labels::format_distance(length)
                    );
                    if active == Some(id) {
                        text.push_str("  (drawing)");
                    }
                    let label = if submitted {
                        egui::RichText::new(text).color(egui::Color32::from_rgb(120, 200, 140))
                    } else {
                        egui::RichText::new(text)
                    };
                    if ui.selectable_label(selected == Some(id), label).clicked() {
                        action = Some(RowAction::Select(id));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add_enabled(active != Some(id), egui::Button::new("🗑").small())
                            .on_hover_text("Delete trail")
                            .clicked()
                        {
                            action = Some(RowAction::Delete(id));
                        }
                    });
                });
            }
        });

    let result = match action {
        Some(RowAction::Select(id)) => editor.select_trail(id),
        Some(RowAction::Delete(id)) => editor.remove_trail(id),
        None => Ok(()),
    };
    if let Err(e) = result {
        tracing::warn!("Trail list: {e}");
    }
}
