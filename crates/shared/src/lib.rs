//! Wire types shared by the trail editor and the logging backend.

use serde::{Deserialize, Serialize};

pub mod geodesy;

pub use geodesy::{Georeference, WGS84_A, WGS84_E2};

/// Table that receives submitted trails
pub const TRAILS_TABLE: &str = "trails";

/// Table that receives removal notices for previously submitted trails
pub const TRAILS_REMOVED_TABLE: &str = "trails_removed";

/// Geographic position in degrees / meters above the ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }
}

/// Body of a trail submission.
///
/// `content` is itself a JSON string (an array of [`GeoPoint`]) because the
/// backend stores it verbatim in a text column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailPayload {
    #[serde(rename = "trackId")]
    pub track_id: String,
    pub content: String,
    pub comp_length: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl TrailPayload {
    /// Build a payload, serializing the vertex list into `content`
    pub fn new(
        track_id: impl Into<String>,
        points: &[GeoPoint],
        comp_length: f64,
        email: Option<String>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            track_id: track_id.into(),
            content: serde_json::to_string(points)?,
            comp_length,
            email,
        })
    }

    /// Decode the vertex list stored in `content`
    pub fn points(&self) -> Result<Vec<GeoPoint>, serde_json::Error> {
        serde_json::from_str(&self.content)
    }
}

/// Sent when a submitted trail is demoted or deleted in the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalNotice {
    #[serde(rename = "trackId")]
    pub track_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Backend acknowledgement of a `log` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogResponse {
    pub id: String,
    pub table: String,
}
