//! Segment and total label text.
//!
//! A segment label reads `<letter><number>: <distance>`. The letter is
//! positional (`a` for the first segment of a trail, cycling through the
//! alphabet), so it has to be recomputed for every segment after an insert
//! or delete. The number is the trail's `label_number`, fixed when the trail
//! is created, which keeps two trails drawn side by side visually apart.

use glam::DVec3;

pub const TOTAL_PREFIX: &str = "Total: ";

/// Letter for the segment at `index` (0 = first segment)
pub fn letter(index: usize) -> char {
    (b'a' + (index % 26) as u8) as char
}

/// Meters below one kilometer, kilometers from there on, two decimals
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.2} m")
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

pub fn segment_label(index: usize, label_number: u32, distance: f64) -> String {
    format!("{}{}: {}", letter(index), label_number, format_distance(distance))
}

pub fn total_label(total: f64) -> String {
    format!("{TOTAL_PREFIX}{}", format_distance(total))
}

/// Anchor of a segment label
pub fn midpoint(a: DVec3, b: DVec3) -> DVec3 {
    (a + b) * 0.5
}
