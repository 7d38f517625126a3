//! Position estimation and proximity querying for an AR point-of-interest
//! overlay.
//!
//! The tracking core fuses raw accelerometer and orientation samples into a
//! dead-reckoned position estimate, seeded from a geolocation fix or a named
//! reference anchor, and answers "which points lie within radius R of here"
//! over geographic or device-relative point sets. It is deliberately an
//! approximation tuned for overlay anchoring, not a navigation-grade
//! positioning system.
//!
//! All state is owned by [`estimator::PositionEstimator`]; sensor feeds,
//! user actions, and listener notifications go through it as the single
//! writer. Rendering, UI, and data transport live elsewhere and interact
//! only via point records in and position snapshots out.

pub mod data;
pub mod estimator;
pub mod filters;
pub mod geodesy;
pub mod orientation;
pub mod proximity;
pub mod registry;
pub mod sensors;
pub mod types;

pub use estimator::{PositionEstimator, PositionSnapshot, TrackerConfig, TrackerEvent};
pub use proximity::{nearby, nearby_with, PoiTree, QueryOptions};
pub use registry::ReferenceRegistry;
pub use types::{
    AccelSample, Category, GeoPosition, LocalPosition, OrientationSample, PointCoords,
    PointOfInterest, PoiStatus, Position, ReferencePoint,
};
