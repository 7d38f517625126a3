//! Simulated sensor feeds for the demo binary.
//!
//! A headless CLI has no device motion source, so these loops synthesize a
//! plausible walking pattern: a gentle sway on the accelerometer and a slow
//! yaw sweep on orientation. Samples are pushed through bounded channels and
//! dropped when the consumer falls behind.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc::Sender;
use tokio::time::{interval, Duration};

use crate::types::{AccelSample, OrientationSample};

pub async fn motion_loop(tx: Sender<AccelSample>) {
    let mut interval = interval(Duration::from_millis(20)); // ~50Hz sampling
    let mut sample_count = 0u64;

    loop {
        interval.tick().await;

        match tx.try_send(mock_motion_sample()) {
            Ok(_) => {
                sample_count += 1;
                if sample_count % 250 == 0 {
                    eprintln!("[motion] {} samples", sample_count);
                }
            }
            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {
                eprintln!("[motion] channel closed after {} samples", sample_count);
                break;
            }
            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                // Consumer is behind, drop this sample
            }
        }
    }
}

pub async fn orientation_loop(tx: Sender<OrientationSample>) {
    let mut interval = interval(Duration::from_millis(50)); // ~20Hz
    let mut sample_count = 0u64;

    loop {
        interval.tick().await;

        match tx.try_send(mock_orientation_sample()) {
            Ok(_) => {
                sample_count += 1;
                if sample_count % 100 == 0 {
                    eprintln!("[orientation] {} samples", sample_count);
                }
            }
            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {
                eprintln!("[orientation] channel closed after {} samples", sample_count);
                break;
            }
            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {}
        }
    }
}

fn mock_motion_sample() -> AccelSample {
    use std::f64::consts::PI;
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let t = COUNTER.fetch_add(1, Ordering::Relaxed) as f64 * 0.02;

    AccelSample {
        timestamp: current_timestamp(),
        x: (t * 2.0 * PI).sin() * 0.8,
        y: 9.81 + (t * PI).sin() * 0.15,
        z: (t * 1.4 * PI).cos() * 0.5,
    }
}

fn mock_orientation_sample() -> OrientationSample {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let t = COUNTER.fetch_add(1, Ordering::Relaxed) as f64 * 0.05;

    OrientationSample {
        timestamp: current_timestamp(),
        alpha: (t * 6.0) % 360.0,          // slow turn, full circle per minute
        beta: (t * 0.7).sin() * 4.0,       // slight pitch bob
        gamma: (t * 0.9).cos() * 3.0,      // slight roll sway
    }
}

fn current_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
