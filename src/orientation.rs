use nalgebra::{Rotation3, Vector3};

use crate::types::{EulerAngles, OrientationSample};

/// Tracks device attitude from raw orientation events.
///
/// Each event overwrites the previous attitude wholesale; there is no
/// smoothing or integration, so the same alpha/beta/gamma triple always
/// produces the same rotation regardless of what came before.
///
/// Axis mapping follows the browser orientation convention: beta becomes
/// pitch, alpha becomes yaw, gamma becomes roll, all converted to radians.
/// The rotation composes in the fixed order yaw, then pitch, then roll
/// (`R_y(yaw) * R_x(pitch) * R_z(roll)`).
#[derive(Clone, Debug, Default)]
pub struct OrientationTracker {
    angles: EulerAngles,
}

impl OrientationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the attitude from a raw sample (degrees).
    pub fn update(&mut self, sample: &OrientationSample) {
        self.angles = EulerAngles {
            pitch: sample.beta.to_radians(),
            yaw: sample.alpha.to_radians(),
            roll: sample.gamma.to_radians(),
        };
    }

    pub fn angles(&self) -> EulerAngles {
        self.angles
    }

    /// The current attitude as a world-from-device rotation.
    pub fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.angles.yaw)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.angles.pitch)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.angles.roll)
    }

    /// Re-project a device-frame vector into the world frame.
    pub fn to_world(&self, device: Vector3<f64>) -> Vector3<f64> {
        self.rotation() * device
    }
}
