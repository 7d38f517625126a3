// estimator.rs — Position tracking orchestrator
//
// Owns the one authoritative position for a session. Everything else in the
// crate either feeds it (motion/orientation samples, registry anchors) or
// reads snapshots from it (proximity queries, the view layer). No other
// component writes position, velocity, or attitude; a multi-threaded host
// must funnel all sensor events through the single owner of this struct.
//
// It takes sensor samples in, produces position snapshots and diagnostic
// events out, so it can be driven with recorded or simulated data without
// touching any platform sensor API.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::filters::dead_reckoning::{DEFAULT_DAMPING, DEFAULT_POSITION_SCALE};
use crate::filters::motion::{DEFAULT_DEAD_ZONE, DEFAULT_LOWPASS_ALPHA};
use crate::filters::{DeadReckoner, MotionFilter};
use crate::geodesy;
use crate::orientation::OrientationTracker;
use crate::registry::{ReferenceRegistry, DEFAULT_ANCHOR_ID};
use crate::types::{
    AccelSample, EulerAngles, GeoPosition, LocalPosition, OrientationSample, Position,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Tracker tuning. The numeric defaults are the empirically chosen values
/// from the observed system; they are surfaced here so callers can override
/// them instead of relying on magic numbers buried in the pipeline.
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Exponential low-pass smoothing factor for the motion filter.
    pub lowpass_alpha: f64,
    /// Per-axis noise floor; filtered axes below this snap to zero.
    pub dead_zone: f64,
    /// Multiplicative velocity decay per integration step.
    pub damping: f64,
    /// Sensor-unit to scene-unit conversion for position advances.
    pub position_scale: f64,
    /// Samples arriving more than this many seconds apart are dropped.
    pub max_sample_gap_secs: f64,
    /// Registry anchor used when no geolocation fix is available.
    pub default_anchor: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            lowpass_alpha: DEFAULT_LOWPASS_ALPHA,
            dead_zone: DEFAULT_DEAD_ZONE,
            damping: DEFAULT_DAMPING,
            position_scale: DEFAULT_POSITION_SCALE,
            max_sample_gap_secs: 1.0,
            default_anchor: DEFAULT_ANCHOR_ID.to_string(),
        }
    }
}

// ─── Diagnostic events ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum TrackerEvent {
    Initialized {
        latitude: f64,
        longitude: f64,
        from_fallback: bool,
    },
    StaleSampleDropped {
        gap_secs: f64,
    },
    ReferenceReset {
        id: String,
    },
    AnchorSaved {
        id: String,
    },
    MotionReset,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// Immutable view of the tracker state handed to listeners and queries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub position: GeoPosition,
    /// Cumulative dead-reckoned offset from the session origin, scene units.
    pub local_offset: LocalPosition,
    pub orientation: EulerAngles,
    /// Current velocity magnitude, sensor units.
    pub speed: f64,
    pub motion_samples: u64,
    pub orientation_samples: u64,
}

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&PositionSnapshot)>;

// ─── The estimator ───────────────────────────────────────────────────────────

pub struct PositionEstimator {
    config: TrackerConfig,
    registry: ReferenceRegistry,

    filter: MotionFilter,
    reckoner: DeadReckoner,
    orientation: OrientationTracker,

    // Authoritative state. `position` is None only before init.
    position: Option<GeoPosition>,
    local_offset: Vector3<f64>,

    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: ListenerId,

    last_motion_ts: Option<f64>,
    motion_samples: u64,
    orientation_samples: u64,
}

impl PositionEstimator {
    pub fn new(config: TrackerConfig, registry: ReferenceRegistry) -> Self {
        let filter = MotionFilter::new(config.lowpass_alpha, config.dead_zone);
        let reckoner = DeadReckoner::new(config.damping, config.position_scale);
        Self {
            filter,
            reckoner,
            orientation: OrientationTracker::new(),
            position: None,
            local_offset: Vector3::zeros(),
            listeners: Vec::new(),
            next_listener_id: 0,
            last_motion_ts: None,
            motion_samples: 0,
            orientation_samples: 0,
            config,
            registry,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(TrackerConfig::default(), ReferenceRegistry::with_defaults())
    }

    // ── Initialization ───────────────────────────────────────────────────

    /// Establish the session position from an optional geolocation fix.
    ///
    /// Without a fix (source absent, errored, or permission denied) the
    /// position falls back to the configured default anchor, so it is
    /// always non-null once this returns. Calling again after the first
    /// successful init is a no-op: tracking never re-seeds mid-session.
    pub fn init(&mut self, fix: Option<GeoPosition>) -> Vec<TrackerEvent> {
        if self.position.is_some() {
            return Vec::new();
        }

        let (seeded, from_fallback) = match fix {
            Some(position) => (position, false),
            None => {
                let anchor = self.registry.get(&self.config.default_anchor);
                let position = match anchor {
                    Some(point) => GeoPosition {
                        latitude: point.lat,
                        longitude: point.lng,
                    },
                    // Registry was never seeded; last-resort constant keeps
                    // the non-null guarantee.
                    None => GeoPosition {
                        latitude: 0.0,
                        longitude: 0.0,
                    },
                };
                log::warn!(
                    "no geolocation fix, falling back to anchor '{}'",
                    self.config.default_anchor
                );
                (position, true)
            }
        };

        self.position = Some(seeded);
        self.notify();
        vec![TrackerEvent::Initialized {
            latitude: seeded.latitude,
            longitude: seeded.longitude,
            from_fallback,
        }]
    }

    // ── Sensor feeds ─────────────────────────────────────────────────────

    /// Feed one raw motion sample.
    ///
    /// Ignored before init. Duplicate, out-of-order, or excessively gapped
    /// timestamps drop the sample rather than amplifying noise through the
    /// integrator. Every accepted sample advances the position estimate and
    /// notifies listeners, in registration order, before this returns.
    pub fn feed_motion(&mut self, sample: &AccelSample) -> Vec<TrackerEvent> {
        let mut events = Vec::new();
        let Some(position) = self.position else {
            return events;
        };

        let Some(prev_ts) = self.last_motion_ts else {
            // First sample seeds the filter and the clock.
            self.last_motion_ts = Some(sample.timestamp);
            self.filter.apply(Vector3::new(sample.x, sample.y, sample.z));
            return events;
        };

        let dt = sample.timestamp - prev_ts;
        if dt <= 0.0 || dt > self.config.max_sample_gap_secs {
            self.last_motion_ts = Some(sample.timestamp);
            events.push(TrackerEvent::StaleSampleDropped { gap_secs: dt });
            return events;
        }
        self.last_motion_ts = Some(sample.timestamp);

        let cleaned = self.filter.apply(Vector3::new(sample.x, sample.y, sample.z));
        let world = self.orientation.to_world(cleaned);
        let displacement = self.reckoner.integrate(world, dt);

        self.local_offset += displacement;
        // World frame: x east, y up, z north. Elevation does not move the
        // geographic estimate.
        let (latitude, longitude) = geodesy::offset_by_meters(
            position.latitude,
            position.longitude,
            displacement.x,
            displacement.z,
        );
        self.position = Some(GeoPosition {
            latitude,
            longitude,
        });

        self.motion_samples += 1;
        self.notify();
        events
    }

    /// Feed one raw orientation sample. Overwrites the attitude wholesale.
    pub fn feed_orientation(&mut self, sample: &OrientationSample) {
        if self.position.is_none() {
            return;
        }
        self.orientation.update(sample);
        self.orientation_samples += 1;
        self.notify();
    }

    // ── User actions ─────────────────────────────────────────────────────

    /// Overwrite the position with a known anchor.
    ///
    /// Returns false (leaving the position untouched) when the id is
    /// unknown; callers handle the miss, it is not an error.
    pub fn reset_to_reference(&mut self, id: &str) -> bool {
        let Some(point) = self.registry.get(id) else {
            return false;
        };
        self.position = Some(GeoPosition {
            latitude: point.lat,
            longitude: point.lng,
        });
        self.notify();
        true
    }

    /// Save the current position as a named anchor. False before init.
    pub fn save_reference(&mut self, id: &str, display_name: &str) -> bool {
        let Some(position) = self.position else {
            return false;
        };
        self.registry
            .upsert(id, position.latitude, position.longitude, display_name);
        true
    }

    /// Session-level tracking reset: zero velocity and filter history.
    /// The position itself is untouched and the session stays in tracking.
    pub fn reset_motion(&mut self) -> Vec<TrackerEvent> {
        self.reckoner.reset();
        self.filter.reset();
        vec![TrackerEvent::MotionReset]
    }

    // ── Listeners ────────────────────────────────────────────────────────

    /// Register a position listener. Listeners run synchronously, in
    /// registration order, each receiving the same snapshot.
    pub fn subscribe(&mut self, listener: impl FnMut(&PositionSnapshot) + 'static) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        let Some(snapshot) = self.snapshot() else {
            return;
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&snapshot);
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Option<PositionSnapshot> {
        let position = self.position?;
        Some(PositionSnapshot {
            position,
            local_offset: LocalPosition {
                x: self.local_offset.x,
                y: self.local_offset.y,
                z: self.local_offset.z,
            },
            orientation: self.orientation.angles(),
            speed: self.reckoner.velocity().norm(),
            motion_samples: self.motion_samples,
            orientation_samples: self.orientation_samples,
        })
    }

    /// The authoritative query origin, None only before init.
    pub fn position(&self) -> Option<Position> {
        self.position.map(Position::Geo)
    }

    pub fn is_tracking(&self) -> bool {
        self.position.is_some()
    }

    pub fn registry(&self) -> &ReferenceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ReferenceRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}
