//! In-memory renderer over a flat, top-down plan view.
//!
//! Used headless by the test harness and as the backing store the egui
//! viewport paints from each frame.

use std::collections::BTreeMap;

use glam::{DVec2, DVec3};

use super::{Phase, PrimitiveHandle, Renderer, Role, ScreenPos, Style};

/// Orthographic top-down mapping between screen pixels and ground positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanView {
    /// World x/y shown at screen (0, 0)
    pub origin: DVec2,
    pub meters_per_pixel: f64,
    /// Screen y grows downward while world y grows upward
    pub y_up: bool,
}

impl Default for PlanView {
    fn default() -> Self {
        Self::identity()
    }
}

impl PlanView {
    /// One pixel per meter, screen axes equal world axes
    pub fn identity() -> Self {
        Self {
            origin: DVec2::ZERO,
            meters_per_pixel: 1.0,
            y_up: false,
        }
    }

    pub fn screen_to_ground(&self, screen: ScreenPos) -> DVec3 {
        let dy = screen.y * self.meters_per_pixel;
        let y = if self.y_up {
            self.origin.y - dy
        } else {
            self.origin.y + dy
        };
        DVec3::new(self.origin.x + screen.x * self.meters_per_pixel, y, 0.0)
    }

    pub fn world_to_screen(&self, world: DVec3) -> ScreenPos {
        let sx = (world.x - self.origin.x) / self.meters_per_pixel;
        let sy = if self.y_up {
            (self.origin.y - world.y) / self.meters_per_pixel
        } else {
            (world.y - self.origin.y) / self.meters_per_pixel
        };
        DVec2::new(sx, sy)
    }

    /// Shift the view by a screen-space delta
    pub fn pan(&mut self, delta: DVec2) {
        self.origin.x -= delta.x * self.meters_per_pixel;
        if self.y_up {
            self.origin.y += delta.y * self.meters_per_pixel;
        } else {
            self.origin.y -= delta.y * self.meters_per_pixel;
        }
    }

    /// Zoom by `factor` keeping the ground under `anchor` fixed
    pub fn zoom_at(&mut self, anchor: ScreenPos, factor: f64) {
        let before = self.screen_to_ground(anchor);
        self.meters_per_pixel = (self.meters_per_pixel / factor).clamp(1e-3, 1e4);
        let after = self.screen_to_ground(anchor);
        self.origin.x += before.x - after.x;
        self.origin.y += before.y - after.y;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(DVec3),
    Segment(DVec3, DVec3),
    Label { anchor: DVec3, text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub style: Style,
    pub visible: bool,
}

impl Primitive {
    fn pickable(&self) -> bool {
        self.visible && self.style.tag.phase != Phase::Moving
    }
}

#[derive(Debug)]
pub struct MemoryScene {
    pub view: PlanView,
    pub pick_radius_px: f64,
    primitives: BTreeMap<PrimitiveHandle, Primitive>,
    next_handle: u64,
    camera_navigation: bool,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new(PlanView::identity(), 8.0)
    }
}

impl MemoryScene {
    pub fn new(view: PlanView, pick_radius_px: f64) -> Self {
        Self {
            view,
            pick_radius_px,
            primitives: BTreeMap::new(),
            next_handle: 1,
            camera_navigation: true,
        }
    }

    fn insert(&mut self, shape: Shape, style: Style) -> PrimitiveHandle {
        let handle = PrimitiveHandle(self.next_handle);
        self.next_handle += 1;
        self.primitives.insert(
            handle,
            Primitive {
                shape,
                style,
                visible: true,
            },
        );
        handle
    }

    pub fn get(&self, handle: PrimitiveHandle) -> Option<&Primitive> {
        self.primitives.get(&handle)
    }

    /// Primitives in creation order
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveHandle, &Primitive)> {
        self.primitives.iter().map(|(h, p)| (*h, p))
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Number of primitives carrying the legacy tag string `tag`
    pub fn count_tagged(&self, tag: &str) -> usize {
        self.primitives
            .values()
            .filter(|p| p.style.tag.as_str() == tag)
            .count()
    }

    /// Number of visible primitives with the given role
    pub fn count_visible(&self, role: Role) -> usize {
        self.primitives
            .values()
            .filter(|p| p.visible && p.style.tag.role == role)
            .count()
    }

    pub fn text(&self, handle: PrimitiveHandle) -> Option<&str> {
        match &self.primitives.get(&handle)?.shape {
            Shape::Label { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn camera_navigation(&self) -> bool {
        self.camera_navigation
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    /// Pickable primitives under `screen`; points before segments, newest first
    fn hits(&self, screen: ScreenPos) -> Vec<PrimitiveHandle> {
        let radius = self.pick_radius_px;
        let mut points = Vec::new();
        let mut segments = Vec::new();
        for (handle, prim) in self.primitives.iter().rev() {
            if !prim.pickable() {
                continue;
            }
            match &prim.shape {
                Shape::Point(p) => {
                    if self.view.world_to_screen(*p).distance(screen) <= radius {
                        points.push(*handle);
                    }
                }
                Shape::Segment(a, b) => {
                    let a = self.view.world_to_screen(*a);
                    let b = self.view.world_to_screen(*b);
                    if distance_to_segment(screen, a, b) <= radius {
                        segments.push(*handle);
                    }
                }
                Shape::Label { .. } => {}
            }
        }
        points.extend(segments);
        points
    }
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 < f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Renderer for MemoryScene {
    fn add_point(&mut self, position: DVec3, style: Style) -> PrimitiveHandle {
        self.insert(Shape::Point(position), style)
    }

    fn add_segment(&mut self, from: DVec3, to: DVec3, style: Style) -> PrimitiveHandle {
        self.insert(Shape::Segment(from, to), style)
    }

    fn add_label(&mut self, anchor: DVec3, text: &str, style: Style) -> PrimitiveHandle {
        self.insert(
            Shape::Label {
                anchor,
                text: text.to_string(),
            },
            style,
        )
    }

    fn remove(&mut self, handle: PrimitiveHandle) -> bool {
        self.primitives.remove(&handle).is_some()
    }

    fn set_visible(&mut self, handle: PrimitiveHandle, visible: bool) {
        if let Some(p) = self.primitives.get_mut(&handle) {
            p.visible = visible;
        }
    }

    fn set_style(&mut self, handle: PrimitiveHandle, style: Style) {
        if let Some(p) = self.primitives.get_mut(&handle) {
            p.style = style;
        }
    }

    fn set_text(&mut self, handle: PrimitiveHandle, new_text: &str) {
        if let Some(Primitive {
            shape: Shape::Label { text, .. },
            ..
        }) = self.primitives.get_mut(&handle)
        {
            *text = new_text.to_string();
        }
    }

    fn pick(&self, screen: ScreenPos) -> Option<PrimitiveHandle> {
        self.hits(screen).into_iter().next()
    }

    fn drill_pick(&self, screen: ScreenPos, limit: usize) -> Vec<PrimitiveHandle> {
        let mut hits = self.hits(screen);
        hits.truncate(limit);
        hits
    }

    fn ground_clamped_distance(&self, a: DVec3, b: DVec3) -> f64 {
        DVec2::new(a.x, a.y).distance(DVec2::new(b.x, b.y))
    }

    fn screen_to_world(&self, screen: ScreenPos) -> Option<DVec3> {
        if !screen.is_finite() {
            return None;
        }
        Some(self.view.screen_to_ground(screen))
    }

    fn set_camera_navigation(&mut self, enabled: bool) {
        self.camera_navigation = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT: Style = Style::new(Role::Point, Phase::Committed, [255, 255, 255]);
    const LINE: Style = Style::new(Role::Line, Phase::Committed, [255, 255, 0]);
    const MOVING: Style = Style::new(Role::Line, Phase::Moving, [0, 255, 255]);

    #[test]
    fn plan_view_round_trips_with_flipped_y() {
        let view = PlanView {
            origin: DVec2::new(100.0, 200.0),
            meters_per_pixel: 0.5,
            y_up: true,
        };
        let world = view.screen_to_ground(DVec2::new(20.0, 40.0));
        assert_eq!(world, DVec3::new(110.0, 180.0, 0.0));
        assert_eq!(view.world_to_screen(world), DVec2::new(20.0, 40.0));
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut view = PlanView::identity();
        let anchor = DVec2::new(50.0, 50.0);
        let before = view.screen_to_ground(anchor);
        view.zoom_at(anchor, 2.0);
        assert!((view.meters_per_pixel - 0.5).abs() < 1e-12);
        assert!(view.screen_to_ground(anchor).distance(before) < 1e-9);
    }

    #[test]
    fn pick_prefers_points_over_segments() {
        let mut scene = MemoryScene::default();
        let line = scene.add_segment(DVec3::ZERO, DVec3::new(100.0, 0.0, 0.0), LINE);
        let point = scene.add_point(DVec3::ZERO, POINT);

        assert_eq!(scene.pick(DVec2::new(1.0, 1.0)), Some(point));
        assert_eq!(scene.pick(DVec2::new(50.0, 3.0)), Some(line));
        assert_eq!(scene.pick(DVec2::new(50.0, 30.0)), None);
        assert_eq!(scene.drill_pick(DVec2::new(0.0, 0.0), 5), vec![point, line]);
        assert_eq!(scene.drill_pick(DVec2::new(0.0, 0.0), 1), vec![point]);
    }

    #[test]
    fn hidden_and_moving_primitives_are_not_pickable() {
        let mut scene = MemoryScene::default();
        let point = scene.add_point(DVec3::ZERO, POINT);
        scene.add_segment(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0), MOVING);
        scene.set_visible(point, false);
        assert_eq!(scene.pick(DVec2::ZERO), None);
    }

    #[test]
    fn ground_distance_ignores_height() {
        let scene = MemoryScene::default();
        let d = scene.ground_clamped_distance(DVec3::new(0.0, 0.0, 50.0), DVec3::new(3.0, 4.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn label_text_updates() {
        let mut scene = MemoryScene::default();
        let label = scene.add_label(DVec3::ZERO, "a0: 1.00 m", LINE);
        scene.set_text(label, "a0: 2.00 m");
        assert_eq!(scene.text(label), Some("a0: 2.00 m"));
        assert!(scene.remove(label));
        assert!(!scene.remove(label));
    }
}
