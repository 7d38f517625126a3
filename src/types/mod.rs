use serde::{Deserialize, Serialize};

/// Raw acceleration-including-gravity sample from the device motion source.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AccelSample {
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Raw device orientation sample, angles in degrees.
///
/// `alpha` rotates about the vertical axis (0..360), `beta` about the device
/// x axis (-180..180), `gamma` about the device y axis (-90..90).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OrientationSample {
    pub timestamp: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A query origin: either geographic or device-relative scene coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Position {
    Geo(GeoPosition),
    Local(LocalPosition),
}

/// Device attitude in radians. Overwritten wholesale on every orientation event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// A named calibration anchor with known absolute coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

/// Closed category set for points of interest.
///
/// Free-form tags from external data resolve through [`Category::from_tag`],
/// which is total: anything unrecognized lands on `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Products,
    Promotions,
    Exits,
    Facilities,
    Other,
}

impl Category {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "product" | "products" | "item" | "items" => Category::Products,
            "promo" | "promotion" | "promotions" | "deal" | "deals" | "special" | "specials" => {
                Category::Promotions
            }
            "exit" | "exits" | "door" | "doors" => Category::Exits,
            "facility" | "facilities" | "amenity" | "amenities" => Category::Facilities,
            _ => Category::Other,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Category::Products => "products",
            Category::Promotions => "promotions",
            Category::Exits => "exits",
            Category::Facilities => "facilities",
            Category::Other => "other",
        }
    }

    pub const fn icon(&self) -> &'static str {
        match self {
            Category::Products => "shopping-cart",
            Category::Promotions => "tag",
            Category::Exits => "door-open",
            Category::Facilities => "info-sign",
            Category::Other => "question-sign",
        }
    }

    /// Marker color as a `#rrggbb` hex string.
    pub const fn color_hex(&self) -> &'static str {
        match self {
            Category::Products => "#4caf50",
            Category::Promotions => "#ff9800",
            Category::Exits => "#f44336",
            Category::Facilities => "#2196f3",
            Category::Other => "#9c27b0",
        }
    }
}

/// Operational status carried by factory sensor records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoiStatus {
    Active,
    Warning,
    Critical,
    Offline,
    Unknown,
}

impl PoiStatus {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "active" => PoiStatus::Active,
            "warning" => PoiStatus::Warning,
            "critical" => PoiStatus::Critical,
            "offline" => PoiStatus::Offline,
            _ => PoiStatus::Unknown,
        }
    }
}

/// Coordinates of a point record: geographic (indoor-navigation variant) or
/// device-relative scene units (factory visualizer variant).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PointCoords {
    Geo { latitude: f64, longitude: f64 },
    Local { x: f64, y: f64, z: f64 },
}

impl PointCoords {
    pub fn is_finite(&self) -> bool {
        match *self {
            PointCoords::Geo {
                latitude,
                longitude,
            } => latitude.is_finite() && longitude.is_finite(),
            PointCoords::Local { x, y, z } => x.is_finite() && y.is_finite() && z.is_finite(),
        }
    }
}

/// A point of interest or sensor record supplied by an external data source.
///
/// Read-only from the tracking core's perspective: proximity queries return
/// clones annotated with `distance` and leave every other field untouched.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub coords: PointCoords,
    #[serde(default)]
    pub status: Option<PoiStatus>,
    #[serde(default)]
    pub readings: Vec<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
    /// Meters from the query origin. Set only on proximity query results.
    #[serde(default)]
    pub distance: Option<f64>,
}
