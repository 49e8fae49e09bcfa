//! Painting the in-memory scene with the egui painter

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};
use glam::{DVec2, DVec3};

use trailmark_lib::scene::{MemoryScene, Phase, PlanView, Primitive, Role, Shape};

use crate::app::{GRID_STROKE, GROUND_FILL};

/// Smallest spacing between grid lines, in pixels
const MIN_GRID_PX: f64 = 40.0;

fn color(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

fn to_screen(rect: Rect, view: &PlanView, world: DVec3) -> Pos2 {
    let s = view.world_to_screen(world);
    Pos2::new(rect.min.x + s.x as f32, rect.min.y + s.y as f32)
}

/// Ground fill plus a metric grid whose step adapts to the zoom level
pub fn draw_ground(painter: &Painter, rect: Rect, view: &PlanView) {
    painter.rect_filled(rect, egui::CornerRadius::ZERO, GROUND_FILL);

    let mut step = 1.0;
    while step / view.meters_per_pixel < MIN_GRID_PX {
        step *= 10.0;
    }
    while step / view.meters_per_pixel > MIN_GRID_PX * 10.0 {
        step /= 10.0;
    }

    let a = view.screen_to_ground(DVec2::ZERO);
    let b = view.screen_to_ground(DVec2::new(rect.width() as f64, rect.height() as f64));
    let (min, max) = (a.min(b), a.max(b));
    let stroke = Stroke::new(1.0, GRID_STROKE);

    let mut x = (min.x / step).floor() * step;
    while x <= max.x {
        let top = to_screen(rect, view, DVec3::new(x, min.y, 0.0));
        painter.vline(top.x, rect.y_range(), stroke);
        x += step;
    }
    let mut y = (min.y / step).floor() * step;
    while y <= max.y {
        let left = to_screen(rect, view, DVec3::new(min.x, y, 0.0));
        painter.hline(rect.x_range(), left.y, stroke);
        y += step;
    }

    painter.text(
        rect.right_bottom() + egui::vec2(-8.0, -6.0),
        Align2::RIGHT_BOTTOM,
        format!("grid {step} m"),
        FontId::proportional(11.0),
        Color32::from_gray(110),
    );
}

/// Lines first, then points, then labels on top
pub fn draw_scene(painter: &Painter, rect: Rect, scene: &MemoryScene) {
    let visible: Vec<&Primitive> = scene
        .iter()
        .map(|(_, prim)| prim)
        .filter(|prim| prim.visible)
        .collect();

    for prim in &visible {
        if let Shape::Segment(a, b) = &prim.shape {
            draw_line(painter, rect, &scene.view, *a, *b, prim);
        }
    }
    for prim in &visible {
        if let Shape::Point(p) = &prim.shape {
            let pos = to_screen(rect, &scene.view, *p);
            let radius = if prim.style.tag.phase == Phase::Committed { 4.5 } else { 3.5 };
            painter.circle(
                pos,
                radius,
                color(prim.style.color),
                Stroke::new(1.0, Color32::BLACK),
            );
        }
    }
    for prim in &visible {
        if let Shape::Label { anchor, text } = &prim.shape {
            let pos = to_screen(rect, &scene.view, *anchor);
            draw_label(painter, pos, text, prim);
        }
    }
}

fn draw_line(painter: &Painter, rect: Rect, view: &PlanView, a: DVec3, b: DVec3, prim: &Primitive) {
    let points = [to_screen(rect, view, a), to_screen(rect, view, b)];
    let col = color(prim.style.color);
    match prim.style.tag.phase {
        Phase::Moving => {
            painter.extend(egui::Shape::dashed_line(
                &points,
                Stroke::new(1.5, col),
                6.0,
                4.0,
            ));
        }
        Phase::Pending => {
            painter.line_segment(points, Stroke::new(2.0, col));
        }
        Phase::Committed => {
            painter.line_segment(points, Stroke::new(3.0, col));
        }
    }
}

fn draw_label(painter: &Painter, pos: Pos2, text: &str, prim: &Primitive) {
    let (font, align, offset) = match prim.style.tag.role {
        Role::TotalLabel => (
            FontId::proportional(14.0),
            Align2::LEFT_BOTTOM,
            egui::vec2(10.0, -10.0),
        ),
        _ => (
            FontId::proportional(12.0),
            Align2::CENTER_BOTTOM,
            egui::vec2(0.0, -6.0),
        ),
    };
    let col = color(prim.style.color);
    let galley = painter.layout_no_wrap(text.to_string(), font, col);
    let frame = align.anchor_size(pos + offset, galley.size());
    painter.rect_filled(
        frame.expand(2.0),
        egui::CornerRadius::same(2),
        Color32::from_black_alpha(150),
    );
    painter.galley(frame.min, galley, col);
}
