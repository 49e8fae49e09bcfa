//! Quantized string keys for positions.
//!
//! Two vectors built separately from the same coordinates may differ in the
//! last bits, so set membership and joins across positions go through a
//! `PositionKey` instead of raw float equality.

use std::fmt;

use glam::DVec3;

/// Quantization step (one micrometer in scene units)
const QUANTUM: f64 = 1e-6;

/// Deterministic key derived from a position's components
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey(String);

impl PositionKey {
    pub fn of(position: DVec3) -> Self {
        Self(format!(
            "{:.6},{:.6},{:.6}",
            quantize(position.x),
            quantize(position.y),
            quantize(position.z)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn quantize(v: f64) -> f64 {
    // `+ 0.0` folds -0.0 into 0.0 so both print the same
    (v / QUANTUM).round() * QUANTUM + 0.0
}

/// `|`-joined keys of an ordered position list
pub fn fingerprint<I>(positions: I) -> String
where
    I: IntoIterator<Item = DVec3>,
{
    positions
        .into_iter()
        .map(|p| PositionKey::of(p).0)
        .collect::<Vec<_>>()
        .join("|")
}
