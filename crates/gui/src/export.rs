//! GeoJSON export of finished trails.

use glam::DVec3;
use serde_json::{json, Value};
use shared::Georeference;

use crate::scene::labels;
use crate::state::trails::{TrailGroup, TrailStore};

/// Build a `FeatureCollection` with one `LineString` per trail that has at
/// least two vertices.
///
/// Coordinates are `[longitude, latitude, height]`; `distance` measures each
/// segment the same way the on-screen labels do.
pub fn trails_to_geojson<F>(store: &TrailStore, georeference: &Georeference, distance: F) -> Value
where
    F: Fn(DVec3, DVec3) -> f64,
{
    let features: Vec<Value> = store
        .groups()
        .iter()
        .filter(|g| g.len() >= 2)
        .map(|g| trail_feature(g, georeference, &distance))
        .collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

fn trail_feature<F>(group: &TrailGroup, georeference: &Georeference, distance: &F) -> Value
where
    F: Fn(DVec3, DVec3) -> f64,
{
    let coordinates: Vec<[f64; 3]> = group
        .vertices
        .iter()
        .map(|v| {
            let p = georeference.to_geographic(v.position.to_array());
            [p.longitude, p.latitude, p.height]
        })
        .collect();
    let length: f64 = group
        .vertices
        .windows(2)
        .map(|w| distance(w[0].position, w[1].position))
        .sum();
    json!({
        "type": "Feature",
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        },
        "properties": {
            "trackId": group.id.to_string(),
            "label": group.label_number,
            "length": length,
            "lengthText": labels::format_distance(length),
        },
    })
}
