//! Built-in sample data: the factory sensor fixture set and a deterministic
//! point-of-interest generator for driving the tracker without a backend.

use std::f64::consts::PI;

use crate::geodesy;
use crate::types::{Category, GeoPosition, PointCoords, PointOfInterest, PoiStatus};

const PRODUCT_NAMES: [&str; 16] = [
    "Fresh Produce",
    "Dairy Products",
    "Frozen Foods",
    "Breakfast Items",
    "Snack Corner",
    "Beverages",
    "Canned Goods",
    "Bakery",
    "Household Items",
    "Personal Care",
    "Electronics",
    "Clothing",
    "Sporting Goods",
    "Toys & Games",
    "Garden Center",
    "Home Decor",
];

const PROMO_NAMES: [&str; 8] = [
    "Weekly Special",
    "Clearance Sale",
    "Buy One Get One",
    "Flash Deal",
    "Member Discount",
    "Seasonal Promotion",
    "New Arrivals",
    "Limited Time Offer",
];

const EXIT_NAMES: [&str; 7] = [
    "Main Exit",
    "North Exit",
    "Emergency Exit",
    "Staff Exit",
    "Parking Exit",
    "Loading Dock",
    "Side Entrance",
];

const FACILITY_NAMES: [&str; 9] = [
    "Restrooms",
    "Customer Service",
    "Information Desk",
    "ATM",
    "Cafe",
    "Water Fountain",
    "Elevator",
    "Escalator",
    "Seating Area",
];

/// Deterministic stand-in for a random roll: low-discrepancy stride over
/// (0, 1), so consecutive indices spread instead of clustering.
fn stride(index: usize, step: f64) -> f64 {
    (index as f64 * step).fract()
}

fn pick_category(index: usize) -> Category {
    // Weighted toward products and promotions, like a real store layout.
    let roll = stride(index, 0.381_966);
    if roll < 0.5 {
        Category::Products
    } else if roll < 0.75 {
        Category::Promotions
    } else if roll < 0.9 {
        Category::Exits
    } else {
        Category::Facilities
    }
}

fn pick_name(category: Category, index: usize) -> &'static str {
    match category {
        Category::Products => PRODUCT_NAMES[index % PRODUCT_NAMES.len()],
        Category::Promotions => PROMO_NAMES[index % PROMO_NAMES.len()],
        Category::Exits => EXIT_NAMES[index % EXIT_NAMES.len()],
        Category::Facilities | Category::Other => FACILITY_NAMES[index % FACILITY_NAMES.len()],
    }
}

fn describe(category: Category, name: &str) -> String {
    match category {
        Category::Products => format!("Find our selection of {} in this aisle.", name.to_lowercase()),
        Category::Promotions => "Limited time offer on selected items.".to_string(),
        Category::Exits => "Exit to parking lot.".to_string(),
        Category::Facilities | Category::Other => {
            "Public facility available during store hours.".to_string()
        }
    }
}

/// Generate `count` points of interest distributed in a ring around an
/// origin, 5–40 m out, weighted toward products and promotions.
///
/// Fully deterministic: the same origin and count always produce the same
/// set. Each record carries its generation distance, and the set is sorted
/// nearest-first for easier inspection.
pub fn generate_pois(origin: &GeoPosition, count: usize) -> Vec<PointOfInterest> {
    let mut pois = Vec::with_capacity(count);

    for i in 0..count {
        let angle = (i as f64 / count.max(1) as f64) * 2.0 * PI;
        let distance = 5.0 + 35.0 * stride(i, 0.618_033_988_7);

        let east = distance * angle.cos();
        let north = distance * angle.sin();
        let (latitude, longitude) =
            geodesy::offset_by_meters(origin.latitude, origin.longitude, east, north);

        let category = pick_category(i);
        let name = pick_name(category, i);

        pois.push(PointOfInterest {
            id: format!("poi-{i}"),
            name: name.to_string(),
            description: describe(category, name),
            category,
            coords: PointCoords::Geo {
                latitude,
                longitude,
            },
            status: None,
            readings: Vec::new(),
            last_updated: None,
            distance: Some(distance.round()),
        });
    }

    pois.sort_by(|a, b| {
        a.distance
            .unwrap_or(f64::MAX)
            .total_cmp(&b.distance.unwrap_or(f64::MAX))
    });
    pois
}

/// The twelve factory floor sensors from the AR visualizer sample set,
/// anchored in the device-relative scene frame.
pub fn factory_sensors() -> Vec<PointOfInterest> {
    let records: [(i32, &str, &str, PoiStatus, (f64, f64, f64), &str, &[f64], &str); 12] = [
        (
            1,
            "Temperature Sensor T1",
            "Temperature",
            PoiStatus::Active,
            (-3.2, 1.2, -1.8),
            "2025-04-27T09:30:22",
            &[65.0, 68.0, 72.0, 73.0, 75.0, 74.0, 73.0, 72.0],
            "Primary temperature monitor for extrusion machine",
        ),
        (
            2,
            "Humidity Sensor H1",
            "Humidity",
            PoiStatus::Active,
            (2.8, 1.4, -1.2),
            "2025-04-27T09:45:43",
            &[42.0, 43.0, 45.0, 44.0, 43.0, 42.0, 41.0, 40.0],
            "Main humidity sensor for the production area",
        ),
        (
            3,
            "Pressure Sensor P1",
            "Pressure",
            PoiStatus::Warning,
            (3.1, 0.9, -0.6),
            "2025-04-27T09:22:10",
            &[65.0, 70.0, 75.0, 78.0, 82.0, 85.0, 83.0, 81.0],
            "Hydraulic system pressure monitor - approaching upper threshold",
        ),
        (
            4,
            "Motion Sensor M1",
            "Motion",
            PoiStatus::Offline,
            (-2.5, 2.1, -3.5),
            "2025-04-26T18:45:12",
            &[90.0, 85.0, 82.0, 78.0, 45.0, 20.0, 0.0, 0.0],
            "Personnel movement detector - maintenance scheduled for tomorrow",
        ),
        (
            5,
            "Light Sensor L1",
            "Light",
            PoiStatus::Active,
            (0.3, 2.2, 1.8),
            "2025-04-27T09:35:33",
            &[85.0, 86.0, 85.0, 84.0, 86.0, 87.0, 88.0, 87.0],
            "Workstation illumination monitor for quality control",
        ),
        (
            6,
            "CO2 Sensor C1",
            "Carbon Dioxide",
            PoiStatus::Critical,
            (-3.8, 1.8, -2.2),
            "2025-04-27T09:12:18",
            &[40.0, 48.0, 55.0, 68.0, 75.0, 82.0, 90.0, 95.0],
            "Air quality monitor - CO2 levels exceeding safety threshold",
        ),
        (
            7,
            "Flow Sensor F1",
            "Water Flow",
            PoiStatus::Active,
            (-4.0, 1.5, 0.5),
            "2025-04-27T09:40:21",
            &[80.0, 82.0, 79.0, 81.0, 83.0, 80.0, 78.0, 81.0],
            "Cooling system water flow monitor",
        ),
        (
            8,
            "Sound Sensor S1",
            "Sound",
            PoiStatus::Active,
            (0.5, 1.2, 2.3),
            "2025-04-27T09:37:44",
            &[30.0, 32.0, 35.0, 36.0, 35.0, 34.0, 33.0, 32.0],
            "Equipment noise level monitoring system",
        ),
        (
            9,
            "Vibration Sensor V1",
            "Vibration",
            PoiStatus::Warning,
            (-3.0, 0.8, -1.5),
            "2025-04-27T09:25:55",
            &[15.0, 18.0, 22.0, 28.0, 35.0, 42.0, 45.0, 48.0],
            "Equipment vibration monitor - showing increased levels",
        ),
        (
            10,
            "Voltage Sensor E1",
            "Electrical",
            PoiStatus::Active,
            (-4.5, 1.7, -4.0),
            "2025-04-27T09:15:30",
            &[220.0, 221.0, 222.0, 220.0, 219.0, 220.0, 221.0, 220.0],
            "Main equipment power supply monitor",
        ),
        (
            11,
            "Position Sensor P2",
            "Proximity",
            PoiStatus::Active,
            (0.2, 0.9, 2.1),
            "2025-04-27T09:42:11",
            &[0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0],
            "Tool placement verification sensor",
        ),
        (
            12,
            "Gas Sensor G1",
            "Gas Detection",
            PoiStatus::Active,
            (3.8, 1.6, -2.5),
            "2025-04-27T09:10:05",
            &[5.0, 6.0, 7.0, 8.0, 7.0, 6.0, 5.0, 6.0],
            "Combustible gas monitoring system",
        ),
    ];

    records
        .into_iter()
        .map(
            |(id, name, kind, status, (x, y, z), updated, readings, description)| PointOfInterest {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                category: Category::from_tag(kind),
                coords: PointCoords::Local { x, y, z },
                status: Some(status),
                readings: readings.to_vec(),
                last_updated: Some(updated.to_string()),
                distance: None,
            },
        )
        .collect()
}
