//! Dataset loading for points of interest.
//!
//! Reads the venue JSON file (point records plus optional reference anchors
//! under `metadata.store_location.reference_points`), normalizes the loosely
//! typed records into [`PointOfInterest`], drops anything without usable
//! coordinates, and caches the parsed set for repeated proximity queries.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::registry::ReferenceRegistry;
use crate::types::{Category, PointCoords, PointOfInterest, PoiStatus};

#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),
}

// ─── Raw dataset shape ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    metadata: Option<RawMetadata>,
    #[serde(default)]
    points_of_interest: Vec<RawPoi>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    store_location: Option<RawStoreLocation>,
}

#[derive(Debug, Deserialize)]
struct RawStoreLocation {
    #[serde(default)]
    reference_points: HashMap<String, RawReferencePoint>,
}

#[derive(Debug, Deserialize)]
struct RawReferencePoint {
    lat: f64,
    lng: f64,
    #[serde(default)]
    name: Option<String>,
}

/// Ids arrive as strings in the navigation datasets and as plain numbers in
/// the factory sensor exports.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

#[derive(Debug, Deserialize)]
struct RawLocalPosition {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Deserialize)]
struct RawPoi {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, rename = "type")]
    type_tag: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    position: Option<RawLocalPosition>,
    #[serde(default)]
    readings: Vec<f64>,
    #[serde(default, alias = "lastUpdated")]
    last_updated: Option<String>,
}

// ─── Loader ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct DataLoader {
    cache: Option<Vec<PointOfInterest>>,
    reference_points: Vec<(String, RawRef)>,
}

#[derive(Debug, Clone)]
struct RawRef {
    lat: f64,
    lng: f64,
    name: String,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a dataset file, replacing any cached set.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&[PointOfInterest], DataError> {
        let text = fs::read_to_string(path)?;
        self.load_str(&text)
    }

    /// Parse a dataset from JSON text, replacing any cached set.
    pub fn load_str(&mut self, text: &str) -> Result<&[PointOfInterest], DataError> {
        let raw: RawDataset = serde_json::from_str(text)?;

        self.reference_points = raw
            .metadata
            .and_then(|m| m.store_location)
            .map(|loc| {
                loc.reference_points
                    .into_iter()
                    .filter(|(_, p)| p.lat.is_finite() && p.lng.is_finite())
                    .map(|(id, p)| {
                        let name = p.name.unwrap_or_else(|| id.clone());
                        (
                            id,
                            RawRef {
                                lat: p.lat,
                                lng: p.lng,
                                name,
                            },
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut points = Vec::with_capacity(raw.points_of_interest.len());
        for (index, raw_poi) in raw.points_of_interest.into_iter().enumerate() {
            match normalize(raw_poi, index) {
                Some(poi) => points.push(poi),
                None => log::debug!("dropping record {index}: no usable coordinates"),
            }
        }

        self.cache = Some(points);
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    /// The last successfully parsed point set, if any.
    pub fn cached(&self) -> Option<&[PointOfInterest]> {
        self.cache.as_deref()
    }

    /// Upsert the dataset's reference anchors into a registry.
    pub fn merge_reference_points(&self, registry: &mut ReferenceRegistry) {
        for (id, point) in &self.reference_points {
            registry.upsert(id, point.lat, point.lng, &point.name);
        }
    }
}

/// Convert one raw record; None when neither coordinate form is usable.
fn normalize(raw: RawPoi, index: usize) -> Option<PointOfInterest> {
    let coords = match (raw.latitude, raw.longitude, raw.position) {
        (Some(latitude), Some(longitude), _) => PointCoords::Geo {
            latitude,
            longitude,
        },
        (_, _, Some(position)) => PointCoords::Local {
            x: position.x,
            y: position.y,
            z: position.z,
        },
        _ => return None,
    };
    if !coords.is_finite() {
        return None;
    }

    let id = match raw.id {
        Some(RawId::Text(text)) => text,
        Some(RawId::Number(number)) => number.to_string(),
        None => format!("poi-{index}"),
    };
    let tag = raw.category.or(raw.type_tag).unwrap_or_default();

    Some(PointOfInterest {
        id,
        name: raw.name.unwrap_or_else(|| "Unknown".to_string()),
        description: raw.description,
        category: Category::from_tag(&tag),
        coords,
        status: raw.status.as_deref().map(PoiStatus::from_tag),
        readings: raw.readings,
        last_updated: raw.last_updated,
        distance: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAV_DATASET: &str = r#"{
        "metadata": {
            "store_location": {
                "reference_points": {
                    "entrance": { "lat": 40.7128, "lng": -74.0060, "name": "Main Entrance" },
                    "dock": { "lat": 40.7131, "lng": -74.0065 }
                }
            }
        },
        "points_of_interest": [
            {
                "id": "poi-produce",
                "name": "Fresh Produce",
                "description": "Find our selection of fresh produce in this aisle.",
                "category": "products",
                "latitude": 40.71285,
                "longitude": -74.00595
            },
            {
                "id": "poi-bad",
                "name": "Broken Record",
                "category": "products"
            },
            {
                "name": "Weekly Special",
                "category": "deals",
                "latitude": 40.7129,
                "longitude": -74.0061
            }
        ]
    }"#;

    const FACTORY_DATASET: &str = r#"{
        "points_of_interest": [
            {
                "id": 3,
                "name": "Pressure Sensor P1",
                "type": "Pressure",
                "status": "Warning",
                "position": { "x": 3.1, "y": 0.9, "z": -0.6 },
                "lastUpdated": "2025-04-27T09:22:10",
                "readings": [65, 70, 75, 78, 82, 85, 83, 81],
                "description": "Hydraulic system pressure monitor"
            }
        ]
    }"#;

    #[test]
    fn test_load_navigation_dataset() {
        let mut loader = DataLoader::new();
        let points = loader.load_str(NAV_DATASET).unwrap();

        // The record without coordinates is dropped.
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].id, "poi-produce");
        assert_eq!(points[0].category, Category::Products);
        assert!(matches!(points[0].coords, PointCoords::Geo { .. }));

        // Missing id falls back to the record index; "deals" maps through
        // the synonym table.
        assert_eq!(points[1].id, "poi-2");
        assert_eq!(points[1].category, Category::Promotions);
    }

    #[test]
    fn test_merge_reference_points() {
        let mut loader = DataLoader::new();
        loader.load_str(NAV_DATASET).unwrap();

        let mut registry = ReferenceRegistry::new();
        loader.merge_reference_points(&mut registry);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("entrance").unwrap().display_name, "Main Entrance");
        // Anchors without a name fall back to their id.
        assert_eq!(registry.get("dock").unwrap().display_name, "dock");
    }

    #[test]
    fn test_load_factory_dataset() {
        let mut loader = DataLoader::new();
        let points = loader.load_str(FACTORY_DATASET).unwrap();

        assert_eq!(points.len(), 1);
        let sensor = &points[0];
        assert_eq!(sensor.id, "3");
        assert_eq!(sensor.category, Category::Other);
        assert_eq!(sensor.status, Some(PoiStatus::Warning));
        assert_eq!(sensor.readings.len(), 8);
        assert!(matches!(
            sensor.coords,
            PointCoords::Local { x, .. } if (x - 3.1).abs() < 1e-12
        ));
    }

    #[test]
    fn test_cache_replaced_on_reload() {
        let mut loader = DataLoader::new();
        assert!(loader.cached().is_none());

        loader.load_str(NAV_DATASET).unwrap();
        assert_eq!(loader.cached().unwrap().len(), 2);

        loader.load_str(FACTORY_DATASET).unwrap();
        assert_eq!(loader.cached().unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let mut loader = DataLoader::new();
        assert!(matches!(
            loader.load_str("{ not json"),
            Err(DataError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut loader = DataLoader::new();
        assert!(matches!(
            loader.load_file("/nonexistent/pois.json"),
            Err(DataError::Io(_))
        ));
    }
}
