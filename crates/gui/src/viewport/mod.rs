//! Top-down plan view of the trail scene

mod paint;

use egui::Ui;
use glam::{DVec2, DVec3};

use crate::app::Editor;

/// Margin kept around trails when fitting the view, in pixels
const FIT_MARGIN: f32 = 48.0;

/// Plan-view panel: forwards pointer gestures to the editor and paints its scene
pub struct PlanViewport {
    /// Size of the panel last frame
    size: egui::Vec2,
    centered: bool,
    /// The last primary press went to the editor as a possible vertex drag
    press_taken: bool,
    last_pointer: Option<DVec2>,
}

impl PlanViewport {
    pub fn new() -> Self {
        Self {
            size: egui::vec2(800.0, 600.0),
            centered: false,
            press_taken: false,
            last_pointer: None,
        }
    }

    /// One meter per pixel, world origin in the middle
    pub fn reset(&mut self, editor: &mut Editor) {
        editor.renderer.view.meters_per_pixel = 1.0;
        self.center_on(editor, DVec3::ZERO);
    }

    /// Zoom and pan so every trail is visible
    pub fn fit_trails(&mut self, editor: &mut Editor) {
        let positions: Vec<DVec3> = editor
            .store()
            .live_groups()
            .flat_map(|g| g.positions())
            .collect();
        let Some(first) = positions.first() else {
            return;
        };
        let (min, max) = positions
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));

        let usable = (self.size - egui::vec2(2.0 * FIT_MARGIN, 2.0 * FIT_MARGIN))
            .max(egui::vec2(1.0, 1.0));
        let extent = max - min;
        let mpp = (extent.x / usable.x as f64)
            .max(extent.y / usable.y as f64)
            .max(1e-2);
        editor.renderer.view.meters_per_pixel = mpp;
        self.center_on(editor, (min + max) * 0.5);
    }

    fn center_on(&self, editor: &mut Editor, world: DVec3) {
        let view = &mut editor.renderer.view;
        let half = DVec2::new(self.size.x as f64, self.size.y as f64) * 0.5 * view.meters_per_pixel;
        view.origin.x = world.x - half.x;
        view.origin.y = if view.y_up {
            world.y + half.y
        } else {
            world.y - half.y
        };
    }

    pub fn show(&mut self, ui: &mut Ui, editor: &mut Editor) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        self.size = rect.size();
        if !self.centered {
            self.center_on(editor, DVec3::ZERO);
            self.centered = true;
        }

        self.handle_pointer(ui, &response, rect, editor);
        self.handle_camera(ui, &response, rect, editor);

        if !ui.is_rect_visible(rect) {
            return;
        }
        let painter = ui.painter_at(rect);
        paint::draw_ground(&painter, rect, &editor.renderer.view);
        paint::draw_scene(&painter, rect, &editor.renderer);
    }

    fn handle_pointer(
        &mut self,
        ui: &Ui,
        response: &egui::Response,
        rect: egui::Rect,
        editor: &mut Editor,
    ) {
        let local = |p: egui::Pos2| DVec2::new((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64);
        let (pressed, released, latest) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
            )
        });
        let hover = response.hover_pos().map(local);

        if pressed {
            if let Some(pos) = hover {
                self.press_taken = editor.pointer_down(pos);
            }
        }

        // Keep tracking outside the panel while a drag is armed
        let pointer = if self.press_taken {
            latest.map(local)
        } else {
            hover
        };
        if let Some(pos) = pointer {
            if self.last_pointer != Some(pos) {
                editor.pointer_move(pos);
                self.last_pointer = Some(pos);
            }
        }

        let mut drag_committed = false;
        if released && self.press_taken {
            self.press_taken = false;
            if let Some(pos) = latest.map(local).or(self.last_pointer) {
                drag_committed = editor.pointer_up(pos);
            }
        }
        if drag_committed {
            return;
        }

        let Some(pos) = response.interact_pointer_pos().map(local) else {
            return;
        };
        // egui also reports the second click of a double click as a click
        if response.double_clicked() {
            editor.double_click(pos);
        } else if response.clicked() {
            editor.click(pos);
        } else if response.secondary_clicked() {
            editor.right_click(pos);
        } else if response.middle_clicked() {
            editor.middle_click(pos);
        }
    }

    fn handle_camera(
        &mut self,
        ui: &Ui,
        response: &egui::Response,
        rect: egui::Rect,
        editor: &mut Editor,
    ) {
        if !editor.renderer.camera_navigation() {
            return;
        }
        if response.dragged() {
            let delta = response.drag_delta();
            editor
                .renderer
                .view
                .pan(DVec2::new(delta.x as f64, delta.y as f64));
        }

        let Some(hover) = response.hover_pos() else {
            return;
        };
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll.abs() > 0.1 {
            let anchor = DVec2::new((hover.x - rect.min.x) as f64, (hover.y - rect.min.y) as f64);
            editor
                .renderer
                .view
                .zoom_at(anchor, (scroll as f64 * 0.002).exp());
        }
    }
}
