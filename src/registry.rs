use std::collections::HashMap;

use crate::types::ReferencePoint;

/// Built-in anchors for the default venue. Seeded at startup; a dataset can
/// overwrite or extend them at runtime.
const DEFAULT_ANCHORS: [(&str, f64, f64, &str); 3] = [
    ("entrance", 40.7128, -74.0060, "Main Entrance"),
    ("checkout", 40.7130, -74.0062, "Checkout Area"),
    ("exit", 40.7129, -74.0063, "Emergency Exit"),
];

/// Anchor id used when no geolocation fix is available.
pub const DEFAULT_ANCHOR_ID: &str = "entrance";

/// Mutable mapping of named calibration anchors with known coordinates.
///
/// Entries are unique by id and never removed during a session; `upsert`
/// inserts or overwrites unconditionally.
#[derive(Clone, Debug, Default)]
pub struct ReferenceRegistry {
    points: HashMap<String, ReferencePoint>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in anchor set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.seed_defaults();
        registry
    }

    /// Install the built-in anchors, overwriting same-id entries.
    pub fn seed_defaults(&mut self) {
        for (id, lat, lng, display_name) in DEFAULT_ANCHORS {
            self.upsert(id, lat, lng, display_name);
        }
    }

    pub fn get(&self, id: &str) -> Option<&ReferencePoint> {
        self.points.get(id)
    }

    /// Insert or overwrite an anchor. Always succeeds.
    pub fn upsert(&mut self, id: &str, lat: f64, lng: f64, display_name: &str) {
        self.points.insert(
            id.to_string(),
            ReferencePoint {
                id: id.to_string(),
                lat,
                lng,
                display_name: display_name.to_string(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferencePoint> {
        self.points.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_defaults() {
        let registry = ReferenceRegistry::with_defaults();
        assert_eq!(registry.len(), 3);
        let entrance = registry.get("entrance").unwrap();
        assert_eq!(entrance.lat, 40.7128);
        assert_eq!(entrance.lng, -74.0060);
        assert_eq!(entrance.display_name, "Main Entrance");
    }

    #[test]
    fn test_get_unknown_id() {
        let registry = ReferenceRegistry::with_defaults();
        assert!(registry.get("loading-dock").is_none());
    }

    #[test]
    fn test_upsert_inserts_and_overwrites() {
        let mut registry = ReferenceRegistry::new();
        registry.upsert("dock", 40.0, -74.0, "Loading Dock");
        assert_eq!(registry.len(), 1);

        registry.upsert("dock", 41.0, -75.0, "Loading Dock B");
        assert_eq!(registry.len(), 1);
        let dock = registry.get("dock").unwrap();
        assert_eq!(dock.lat, 41.0);
        assert_eq!(dock.display_name, "Loading Dock B");
    }

    #[test]
    fn test_reseeding_does_not_drop_extras() {
        let mut registry = ReferenceRegistry::with_defaults();
        registry.upsert("dock", 40.0, -74.0, "Loading Dock");
        registry.seed_defaults();
        assert_eq!(registry.len(), 4);
        assert!(registry.get("dock").is_some());
    }
}
