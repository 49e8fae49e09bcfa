//! Presentation layer seen from the editing core.
//!
//! The core never owns rendering resources. It asks a [`Renderer`] to create
//! points, segments and labels, keeps the returned handles in a
//! [`GeometryIndex`], and addresses primitives only through that index.

pub mod index;
pub mod key;
pub mod labels;
pub mod memory;

pub use index::{GeometryIndex, Owner, PointEntry, SegmentEntry, SegmentKey};
pub use key::PositionKey;
pub use memory::{MemoryScene, PlanView, Primitive, Shape};

use glam::{DVec2, DVec3};

/// RGB color
pub type Rgb = [u8; 3];

/// Screen-space position in pixels
pub type ScreenPos = DVec2;

/// Opaque reference to a renderer-owned primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveHandle(pub u64);

/// What a primitive depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Point,
    Line,
    Label,
    TotalLabel,
}

/// Lifecycle phase of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Part of a finished trail
    Committed,
    /// Part of the trail currently being drawn
    Pending,
    /// Transient drag / rubber-band geometry
    Moving,
}

/// Role + phase of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub role: Role,
    pub phase: Phase,
}

impl Tag {
    pub const fn new(role: Role, phase: Phase) -> Self {
        Self { role, phase }
    }

    /// String form understood by tag-based renderers
    pub fn as_str(&self) -> &'static str {
        match (self.role, self.phase) {
            (Role::Point, Phase::Committed) => "trail_point",
            (Role::Point, Phase::Pending) => "trail_point_pending",
            (Role::Point, Phase::Moving) => "trail_point_moving",
            (Role::Line, Phase::Committed) => "trail_line",
            (Role::Line, Phase::Pending) => "trail_line_pending",
            (Role::Line, Phase::Moving) => "trail_line_moving",
            (Role::Label, Phase::Committed) => "trail_label",
            (Role::Label, Phase::Pending) => "trail_label_pending",
            (Role::Label, Phase::Moving) => "trail_label_moving",
            (Role::TotalLabel, _) => "trail_label_total",
        }
    }
}

/// Tag plus color of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub tag: Tag,
    pub color: Rgb,
}

impl Style {
    pub const fn new(role: Role, phase: Phase, color: Rgb) -> Self {
        Self {
            tag: Tag::new(role, phase),
            color,
        }
    }
}

/// Scene environment the editor draws into.
///
/// Implementations own every primitive; handles stay valid until `remove`.
pub trait Renderer {
    fn add_point(&mut self, position: DVec3, style: Style) -> PrimitiveHandle;

    fn add_segment(&mut self, from: DVec3, to: DVec3, style: Style) -> PrimitiveHandle;

    fn add_label(&mut self, anchor: DVec3, text: &str, style: Style) -> PrimitiveHandle;

    /// Returns false if the handle was unknown
    fn remove(&mut self, handle: PrimitiveHandle) -> bool;

    fn set_visible(&mut self, handle: PrimitiveHandle, visible: bool);

    fn set_style(&mut self, handle: PrimitiveHandle, style: Style);

    fn set_text(&mut self, handle: PrimitiveHandle, text: &str);

    /// Topmost pickable primitive under the cursor
    fn pick(&self, screen: ScreenPos) -> Option<PrimitiveHandle>;

    /// All pickable primitives under the cursor, topmost first
    fn drill_pick(&self, screen: ScreenPos, limit: usize) -> Vec<PrimitiveHandle>;

    /// Length between two positions measured along the ground
    fn ground_clamped_distance(&self, a: DVec3, b: DVec3) -> f64;

    /// Ground position under a screen point, if any
    fn screen_to_world(&self, screen: ScreenPos) -> Option<DVec3>;

    /// Enable / disable camera navigation (pan, rotate, zoom)
    fn set_camera_navigation(&mut self, enabled: bool);
}
