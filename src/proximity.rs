use rstar::{RTree, RTreeObject, AABB};

use crate::geodesy;
use crate::types::{PointCoords, PointOfInterest, Position};

/// Meters per degree of latitude, for envelope prefiltering only.
const METERS_PER_DEGREE: f64 = 111_000.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct QueryOptions {
    /// Measure local-frame distance over (x, z) only, ignoring elevation.
    pub ground_plane_only: bool,
    /// Sort results nearest-first instead of preserving input order.
    pub sort_by_distance: bool,
}

/// Distance from the origin to a point, in meters for geographic pairs and
/// scene units for local pairs. None when the frames do not match.
fn point_distance(origin: &Position, coords: &PointCoords, ground_plane_only: bool) -> Option<f64> {
    match (origin, coords) {
        (
            Position::Geo(origin),
            PointCoords::Geo {
                latitude,
                longitude,
            },
        ) => Some(geodesy::haversine_distance(
            origin.latitude,
            origin.longitude,
            *latitude,
            *longitude,
        )),
        (Position::Local(origin), PointCoords::Local { x, y, z }) => {
            let dx = x - origin.x;
            let dz = z - origin.z;
            if ground_plane_only {
                Some(dx.hypot(dz))
            } else {
                let dy = y - origin.y;
                Some((dx * dx + dy * dy + dz * dz).sqrt())
            }
        }
        _ => None,
    }
}

/// Points within `radius` of `origin`, inclusive (`distance <= radius`).
///
/// Output preserves input order and consists of clones annotated with the
/// computed `distance`. An uninitialized origin (`None`) or an empty input
/// yields an empty result; records with non-finite coordinates or a
/// mismatched coordinate frame are silently filtered out.
pub fn nearby(
    points: &[PointOfInterest],
    origin: Option<&Position>,
    radius: f64,
) -> Vec<PointOfInterest> {
    nearby_with(points, origin, radius, QueryOptions::default())
}

pub fn nearby_with(
    points: &[PointOfInterest],
    origin: Option<&Position>,
    radius: f64,
    options: QueryOptions,
) -> Vec<PointOfInterest> {
    let Some(origin) = origin else {
        return Vec::new();
    };

    let mut results: Vec<PointOfInterest> = points
        .iter()
        .filter(|poi| poi.coords.is_finite())
        .filter_map(|poi| {
            let distance = point_distance(origin, &poi.coords, options.ground_plane_only)?;
            (distance <= radius).then(|| {
                let mut hit = poi.clone();
                hit.distance = Some(distance);
                hit
            })
        })
        .collect();

    if options.sort_by_distance {
        results.sort_by(|a, b| {
            a.distance
                .unwrap_or(f64::MAX)
                .total_cmp(&b.distance.unwrap_or(f64::MAX))
        });
    }
    results
}

/// Wrapper pairing a point record with its spatial envelope.
#[derive(Clone, Debug)]
struct IndexedPoi {
    poi: PointOfInterest,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedPoi {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree spatial index over a point set for repeated proximity queries.
///
/// Queries run an envelope prefilter and then the same exact inclusive
/// distance check as [`nearby`], returning results nearest-first. Geographic
/// records index on (longitude, latitude) degrees and local records on
/// (x, z) scene units; a query only ever matches records in its own frame,
/// so mixing both in one tree is allowed but costs prefilter precision.
pub struct PoiTree {
    tree: RTree<IndexedPoi>,
    point_count: usize,
}

impl PoiTree {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            point_count: 0,
        }
    }

    /// Bulk-load an index, dropping records with non-finite coordinates.
    pub fn from_points(points: Vec<PointOfInterest>) -> Self {
        let indexed: Vec<IndexedPoi> = points
            .into_iter()
            .filter(|poi| poi.coords.is_finite())
            .map(|poi| {
                let envelope = coords_envelope(&poi.coords);
                IndexedPoi { poi, envelope }
            })
            .collect();
        let point_count = indexed.len();
        Self {
            tree: RTree::bulk_load(indexed),
            point_count,
        }
    }

    pub fn insert(&mut self, poi: PointOfInterest) {
        if !poi.coords.is_finite() {
            return;
        }
        let envelope = coords_envelope(&poi.coords);
        self.tree.insert(IndexedPoi { poi, envelope });
        self.point_count += 1;
    }

    /// Indexed records within `radius`, inclusive, sorted nearest-first.
    pub fn nearby(
        &self,
        origin: Option<&Position>,
        radius: f64,
        options: QueryOptions,
    ) -> Vec<PointOfInterest> {
        let Some(origin) = origin else {
            return Vec::new();
        };

        let envelope = match origin {
            Position::Geo(geo) => {
                let lat_span = radius / METERS_PER_DEGREE;
                // Longitude degrees shrink with latitude; widen the span so
                // boundary points stay inside the prefilter.
                let lon_span = lat_span / geo.latitude.to_radians().cos().abs().max(1e-6);
                AABB::from_corners(
                    [geo.longitude - lon_span, geo.latitude - lat_span],
                    [geo.longitude + lon_span, geo.latitude + lat_span],
                )
            }
            Position::Local(local) => AABB::from_corners(
                [local.x - radius, local.z - radius],
                [local.x + radius, local.z + radius],
            ),
        };

        let mut results: Vec<PointOfInterest> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .filter_map(|indexed| {
                let distance =
                    point_distance(origin, &indexed.poi.coords, options.ground_plane_only)?;
                (distance <= radius).then(|| {
                    let mut hit = indexed.poi.clone();
                    hit.distance = Some(distance);
                    hit
                })
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance
                .unwrap_or(f64::MAX)
                .total_cmp(&b.distance.unwrap_or(f64::MAX))
        });
        results
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }
}

impl Default for PoiTree {
    fn default() -> Self {
        Self::new()
    }
}

fn coords_envelope(coords: &PointCoords) -> AABB<[f64; 2]> {
    match *coords {
        PointCoords::Geo {
            latitude,
            longitude,
        } => AABB::from_point([longitude, latitude]),
        PointCoords::Local { x, z, .. } => AABB::from_point([x, z]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::PositionEstimator;
    use crate::types::{Category, GeoPosition, LocalPosition};

    fn geo_poi(id: &str, latitude: f64, longitude: f64) -> PointOfInterest {
        PointOfInterest {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            category: Category::Products,
            coords: PointCoords::Geo {
                latitude,
                longitude,
            },
            status: None,
            readings: Vec::new(),
            last_updated: None,
            distance: None,
        }
    }

    fn local_poi(id: &str, x: f64, y: f64, z: f64) -> PointOfInterest {
        PointOfInterest {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            category: Category::Other,
            coords: PointCoords::Local { x, y, z },
            status: None,
            readings: Vec::new(),
            last_updated: None,
            distance: None,
        }
    }

    fn geo_origin(latitude: f64, longitude: f64) -> Position {
        Position::Geo(GeoPosition {
            latitude,
            longitude,
        })
    }

    fn local_origin() -> Position {
        Position::Local(LocalPosition {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        })
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let origin = geo_origin(40.7128, -74.0060);
        assert!(nearby(&[], Some(&origin), 50.0).is_empty());
    }

    #[test]
    fn test_uninitialized_origin_yields_empty_output() {
        let points = vec![geo_poi("a", 40.7128, -74.0060)];
        assert!(nearby(&points, None, 50.0).is_empty());
    }

    #[test]
    fn test_inclusive_boundary_local_frame() {
        // (3, 4, 0) is exactly 5 units out; exact boundary is a hit.
        let points = vec![local_poi("edge", 3.0, 4.0, 0.0)];
        let origin = local_origin();

        let hits = nearby(&points, Some(&origin), 5.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].distance, Some(5.0));

        let misses = nearby(&points, Some(&origin), 5.0 - 1e-9);
        assert!(misses.is_empty());
    }

    #[test]
    fn test_geo_distance_annotation() {
        let origin = GeoPosition {
            latitude: 40.7128,
            longitude: -74.0060,
        };
        let (lat, lon) = geodesy::offset_by_meters(origin.latitude, origin.longitude, 0.0, 30.0);
        let points = vec![geo_poi("close", lat, lon)];

        let hits = nearby(&points, Some(&Position::Geo(origin)), 50.0);
        assert_eq!(hits.len(), 1);
        let distance = hits[0].distance.unwrap();
        assert!((distance - 30.0).abs() < 0.5, "expected ~30 m, got {distance}");
    }

    #[test]
    fn test_frame_mismatch_and_non_finite_filtered() {
        let points = vec![
            geo_poi("geo", 40.7128, -74.0060),
            local_poi("local", 1.0, 0.0, 1.0),
            local_poi("bad", f64::NAN, 0.0, 0.0),
        ];
        let hits = nearby(&points, Some(&local_origin()), 10.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "local");
    }

    #[test]
    fn test_input_order_preserved_without_sort() {
        let points = vec![
            local_poi("far", 8.0, 0.0, 0.0),
            local_poi("near", 1.0, 0.0, 0.0),
        ];
        let hits = nearby(&points, Some(&local_origin()), 10.0);
        assert_eq!(hits[0].id, "far");
        assert_eq!(hits[1].id, "near");

        let sorted = nearby_with(
            &points,
            Some(&local_origin()),
            10.0,
            QueryOptions {
                sort_by_distance: true,
                ..Default::default()
            },
        );
        assert_eq!(sorted[0].id, "near");
        assert_eq!(sorted[1].id, "far");
    }

    #[test]
    fn test_ground_plane_option_ignores_elevation() {
        // 3 units straight up, 4 along z: 5 in 3D but 4 on the ground plane.
        let points = vec![local_poi("high", 0.0, 3.0, 4.0)];
        let origin = local_origin();

        let full = nearby(&points, Some(&origin), 4.5);
        assert!(full.is_empty());

        let planar = nearby_with(
            &points,
            Some(&origin),
            4.5,
            QueryOptions {
                ground_plane_only: true,
                ..Default::default()
            },
        );
        assert_eq!(planar.len(), 1);
        assert_eq!(planar[0].distance, Some(4.0));
    }

    #[test]
    fn test_query_does_not_mutate_input() {
        let points = vec![local_poi("a", 1.0, 0.0, 0.0)];
        let _ = nearby(&points, Some(&local_origin()), 10.0);
        assert_eq!(points[0].distance, None);
    }

    #[test]
    fn test_end_to_end_registry_reset_and_query() {
        let mut estimator = PositionEstimator::with_defaults();
        estimator.registry_mut().upsert("entrance", 40.7128, -74.0060, "Main Entrance");
        estimator.init(None);
        assert!(estimator.reset_to_reference("entrance"));

        let (lat_near, lon_near) = geodesy::offset_by_meters(40.7128, -74.0060, 30.0, 0.0);
        let (lat_far, lon_far) = geodesy::offset_by_meters(40.7128, -74.0060, 0.0, 80.0);
        let points = vec![
            geo_poi("near", lat_near, lon_near),
            geo_poi("far", lat_far, lon_far),
        ];

        let origin = estimator.position();
        let hits = nearby(&points, origin.as_ref(), 50.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "near");
        let distance = hits[0].distance.unwrap();
        assert!((distance - 30.0).abs() < 0.5, "expected ~30 m, got {distance}");
    }

    #[test]
    fn test_tree_agrees_with_linear_engine() {
        let origin = GeoPosition {
            latitude: 40.7128,
            longitude: -74.0060,
        };
        let mut points = Vec::new();
        for i in 0..40 {
            let east = (i as f64 - 20.0) * 7.0;
            let north = (i as f64 % 9.0) * 11.0;
            let (lat, lon) =
                geodesy::offset_by_meters(origin.latitude, origin.longitude, east, north);
            points.push(geo_poi(&format!("poi-{i}"), lat, lon));
        }

        let origin = Position::Geo(origin);
        let linear = nearby_with(
            &points,
            Some(&origin),
            60.0,
            QueryOptions {
                sort_by_distance: true,
                ..Default::default()
            },
        );
        let tree = PoiTree::from_points(points);
        let indexed = tree.nearby(Some(&origin), 60.0, QueryOptions::default());

        assert_eq!(
            linear.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            indexed.iter().map(|p| p.id.as_str()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_tree_empty_and_boundary() {
        let tree = PoiTree::new();
        assert_eq!(tree.point_count(), 0);
        assert!(tree
            .nearby(Some(&local_origin()), 100.0, QueryOptions::default())
            .is_empty());

        let mut tree = PoiTree::new();
        tree.insert(local_poi("edge", 3.0, 4.0, 0.0));
        tree.insert(local_poi("nan", f64::NAN, 0.0, 0.0));
        assert_eq!(tree.point_count(), 1);

        let hits = tree.nearby(Some(&local_origin()), 5.0, QueryOptions::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].distance, Some(5.0));
    }

    #[test]
    fn test_tree_sorts_nearest_first() {
        let mut tree = PoiTree::new();
        tree.insert(local_poi("far", 9.0, 0.0, 0.0));
        tree.insert(local_poi("near", 1.0, 0.0, 0.0));
        tree.insert(local_poi("mid", 5.0, 0.0, 0.0));

        let hits = tree.nearby(Some(&local_origin()), 20.0, QueryOptions::default());
        let ids: Vec<_> = hits.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
    }
}
