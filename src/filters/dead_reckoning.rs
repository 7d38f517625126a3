use nalgebra::Vector3;

/// Default multiplicative velocity decay per integration step.
pub const DEFAULT_DAMPING: f64 = 0.95;

/// Default sensor-unit to scene-unit conversion for position advances.
pub const DEFAULT_POSITION_SCALE: f64 = 0.1;

/// Velocity/position integrator for dead reckoning.
///
/// Each step integrates cleaned acceleration into velocity, decays the
/// velocity by a damping factor so drift stays bounded, and returns the
/// resulting displacement. Damping is applied every step whether or not new
/// acceleration arrived, so callers must invoke this at a bounded cadence;
/// irregular tick rates change the effective decay.
///
/// This is an approximation for overlay anchoring, not a navigation-grade
/// estimator: there is no accuracy guarantee, only bounded velocity growth
/// (zero input decays |velocity| toward zero).
pub struct DeadReckoner {
    damping: f64,
    scale: f64,
    velocity: Vector3<f64>,
}

impl DeadReckoner {
    /// `damping` must lie in (0, 1); values outside make velocity diverge.
    pub fn new(damping: f64, scale: f64) -> Self {
        debug_assert!(damping > 0.0 && damping < 1.0);
        Self {
            damping,
            scale,
            velocity: Vector3::zeros(),
        }
    }

    /// Advance one step and return the world-frame displacement.
    ///
    /// `dt <= 0` is degenerate (duplicate or out-of-order event timestamps)
    /// and yields zero displacement with no state change.
    pub fn integrate(&mut self, accel: Vector3<f64>, dt: f64) -> Vector3<f64> {
        if dt <= 0.0 {
            return Vector3::zeros();
        }
        self.velocity += accel * dt;
        self.velocity *= self.damping;
        self.velocity * dt * self.scale
    }

    /// Zero the velocity estimate. Used by the session-level tracking reset.
    pub fn reset(&mut self) {
        self.velocity = Vector3::zeros();
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }
}

impl Default for DeadReckoner {
    fn default() -> Self {
        Self::new(DEFAULT_DAMPING, DEFAULT_POSITION_SCALE)
    }
}
