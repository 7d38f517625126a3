use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

use indoor_nav_rs::data::{sample, DataLoader};
use indoor_nav_rs::estimator::{PositionEstimator, TrackerConfig, TrackerEvent};
use indoor_nav_rs::proximity::{self, QueryOptions};
use indoor_nav_rs::registry::ReferenceRegistry;
use indoor_nav_rs::sensors;
use indoor_nav_rs::types::{GeoPosition, PointOfInterest};

#[derive(Parser, Debug)]
#[command(name = "indoor_nav")]
#[command(about = "Dead-reckoning position tracker with proximity queries over sample POIs", long_about = None)]
struct Args {
    /// Duration in seconds (0 = continuous)
    #[arg(value_name = "SECONDS", default_value = "0")]
    duration: u64,

    /// Proximity query radius in meters
    #[arg(long, default_value = "50.0")]
    radius: f64,

    /// Load points of interest from a JSON dataset instead of generating samples
    #[arg(long)]
    data_file: Option<String>,

    /// Number of sample POIs to generate when no data file is given
    #[arg(long, default_value = "20")]
    poi_count: usize,

    /// Simulate an unavailable geolocation source (forces anchor fallback)
    #[arg(long)]
    no_fix: bool,
}

#[derive(Serialize)]
struct SessionStats {
    motion_samples: u64,
    orientation_samples: u64,
    position_updates: u64,
    queries_run: u64,
    last_latitude: f64,
    last_longitude: f64,
    nearby_at_exit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("[{}] Indoor Nav Starting", ts_now());
    println!("  Duration: {} seconds (0=continuous)", args.duration);
    println!("  Query Radius: {} m", args.radius);
    println!("  POI Source: {}", args.data_file.as_deref().unwrap_or("generated samples"));

    // Registry + estimator; the dataset can extend the anchor set below.
    let mut registry = ReferenceRegistry::with_defaults();

    // Load or generate the point set.
    let mut loader = DataLoader::new();
    let points: Vec<PointOfInterest> = match &args.data_file {
        Some(path) => {
            let loaded = loader.load_file(path)?;
            println!("[{}] Loaded {} points from {}", ts_now(), loaded.len(), path);
            let owned = loaded.to_vec();
            loader.merge_reference_points(&mut registry);
            owned
        }
        None => Vec::new(), // generated after init, around wherever we start
    };

    let mut estimator = PositionEstimator::new(TrackerConfig::default(), registry);

    // Simulated geolocation: one fix near the entrance, or nothing at all.
    let fix = if args.no_fix {
        None
    } else {
        Some(GeoPosition {
            latitude: 40.71281,
            longitude: -74.00598,
        })
    };
    for event in estimator.init(fix) {
        if let TrackerEvent::Initialized {
            latitude,
            longitude,
            from_fallback,
        } = event
        {
            let source = if from_fallback { "default anchor" } else { "geolocation fix" };
            println!("[{}] Position seeded from {source}: {latitude:.6}, {longitude:.6}", ts_now());
        }
    }

    let points = if points.is_empty() {
        let origin = estimator
            .snapshot()
            .map(|s| s.position)
            .unwrap_or(GeoPosition {
                latitude: 40.7128,
                longitude: -74.0060,
            });
        let generated = sample::generate_pois(&origin, args.poi_count);
        println!("[{}] Generated {} sample POIs around start position", ts_now(), generated.len());
        generated
    } else {
        points
    };

    // Count position updates through the listener interface.
    let update_count = std::sync::Arc::new(std::sync::atomic::AtomicU64::new(0));
    {
        let update_count = update_count.clone();
        estimator.subscribe(move |_| {
            update_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        });
    }

    // Sensor channels; this task is the single writer for the estimator.
    let (motion_tx, mut motion_rx) = mpsc::channel(500);
    let (orientation_tx, mut orientation_rx) = mpsc::channel(200);

    let _motion_handle = tokio::spawn(sensors::motion_loop(motion_tx));
    let _orientation_handle = tokio::spawn(sensors::orientation_loop(orientation_tx));

    let mut query_tick = interval(Duration::from_secs(1));
    let mut queries_run = 0u64;
    let mut last_nearby = 0usize;
    let start = Utc::now();

    loop {
        tokio::select! {
            Some(accel) = motion_rx.recv() => {
                for event in estimator.feed_motion(&accel) {
                    if let TrackerEvent::StaleSampleDropped { gap_secs } = event {
                        log::debug!("dropped motion sample, gap {gap_secs:.3}s");
                    }
                }
            }
            Some(orientation) = orientation_rx.recv() => {
                estimator.feed_orientation(&orientation);
            }
            _ = query_tick.tick() => {
                queries_run += 1;
                let origin = estimator.position();
                let hits = proximity::nearby_with(
                    &points,
                    origin.as_ref(),
                    args.radius,
                    QueryOptions { sort_by_distance: true, ..Default::default() },
                );
                last_nearby = hits.len();

                if let Some(snapshot) = estimator.snapshot() {
                    println!(
                        "[{}] pos {:.6},{:.6} | speed {:.3} | {} nearby (r={}m)",
                        ts_now(),
                        snapshot.position.latitude,
                        snapshot.position.longitude,
                        snapshot.speed,
                        hits.len(),
                        args.radius,
                    );
                    for poi in hits.iter().take(3) {
                        println!(
                            "    {} [{}] ~{:.0}m",
                            poi.name,
                            poi.category.name(),
                            poi.distance.unwrap_or(f64::MAX),
                        );
                    }
                }

                if args.duration > 0 {
                    let elapsed = (Utc::now() - start).num_seconds() as u64;
                    if elapsed >= args.duration {
                        break;
                    }
                }
            }
        }
    }

    let snapshot = estimator.snapshot();
    let stats = SessionStats {
        motion_samples: snapshot.as_ref().map(|s| s.motion_samples).unwrap_or(0),
        orientation_samples: snapshot.as_ref().map(|s| s.orientation_samples).unwrap_or(0),
        position_updates: update_count.load(std::sync::atomic::Ordering::Relaxed),
        queries_run,
        last_latitude: snapshot.as_ref().map(|s| s.position.latitude).unwrap_or(0.0),
        last_longitude: snapshot.as_ref().map(|s| s.position.longitude).unwrap_or(0.0),
        nearby_at_exit: last_nearby,
    };

    println!("[{}] Session complete", ts_now());
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S%.3f").to_string()
}
