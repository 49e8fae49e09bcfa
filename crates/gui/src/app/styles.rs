//! Application style configuration

use eframe::egui;

/// Dark theme with slightly rounded widgets
pub fn configure_styles(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::dark();

    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.menu_corner_radius = egui::CornerRadius::same(4);
    for widget in [
        &mut style.visuals.widgets.noninteractive,
        &mut style.visuals.widgets.inactive,
        &mut style.visuals.widgets.hovered,
        &mut style.visuals.widgets.active,
    ] {
        widget.corner_radius = egui::CornerRadius::same(3);
    }

    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 3.0);
    style.spacing.menu_margin = egui::Margin::same(4);

    style.visuals.panel_fill = egui::Color32::from_rgb(28, 30, 33);
    style.visuals.window_fill = egui::Color32::from_rgb(35, 37, 41);
    style.visuals.selection.bg_fill = egui::Color32::from_rgb(40, 110, 90);

    style
        .text_styles
        .insert(egui::TextStyle::Small, egui::FontId::proportional(11.0));

    ctx.set_style(style);
}

/// Background of the plan view
pub const GROUND_FILL: egui::Color32 = egui::Color32::from_rgb(22, 26, 24);
pub const GRID_STROKE: egui::Color32 = egui::Color32::from_rgb(38, 44, 40);
