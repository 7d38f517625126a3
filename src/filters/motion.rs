use nalgebra::Vector3;

/// Default exponential low-pass smoothing factor.
pub const DEFAULT_LOWPASS_ALPHA: f64 = 0.8;

/// Default per-axis dead zone in m/s². Anything quieter is sensor noise.
pub const DEFAULT_DEAD_ZONE: f64 = 0.1;

/// Cleans raw acceleration-including-gravity samples into linear acceleration.
///
/// Per axis, each sample goes through three stages:
/// 1. high-pass as the delta against the previous raw sample, which strips the
///    gravity bias without an explicit calibration phase,
/// 2. exponential low-pass `alpha * hp + (1 - alpha) * prev`,
/// 3. dead zone: axes below the threshold snap to exactly 0.
///
/// The first sample after construction or [`reset`](MotionFilter::reset) has no
/// predecessor and produces zero output.
pub struct MotionFilter {
    alpha: f64,
    dead_zone: f64,
    prev_raw: Vector3<f64>,
    prev_filtered: Vector3<f64>,
    initialized: bool,
}

impl MotionFilter {
    pub fn new(alpha: f64, dead_zone: f64) -> Self {
        Self {
            alpha,
            dead_zone,
            prev_raw: Vector3::zeros(),
            prev_filtered: Vector3::zeros(),
            initialized: false,
        }
    }

    /// Feed one raw sample, returning the cleaned linear acceleration.
    pub fn apply(&mut self, raw: Vector3<f64>) -> Vector3<f64> {
        if !self.initialized {
            self.prev_raw = raw;
            self.prev_filtered = Vector3::zeros();
            self.initialized = true;
            return Vector3::zeros();
        }

        let highpassed = raw - self.prev_raw;
        let mut filtered = highpassed * self.alpha + self.prev_filtered * (1.0 - self.alpha);

        for axis in filtered.iter_mut() {
            if axis.abs() < self.dead_zone {
                *axis = 0.0;
            }
        }

        self.prev_raw = raw;
        self.prev_filtered = filtered;
        filtered
    }

    /// Drop all history. The next sample re-seeds the filter.
    pub fn reset(&mut self) {
        self.prev_raw = Vector3::zeros();
        self.prev_filtered = Vector3::zeros();
        self.initialized = false;
    }
}

impl Default for MotionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_LOWPASS_ALPHA, DEFAULT_DEAD_ZONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_zero() {
        let mut filter = MotionFilter::default();
        let out = filter.apply(Vector3::new(0.3, 9.81, 0.2));
        assert_eq!(out, Vector3::zeros());
    }

    #[test]
    fn test_dead_zone_snaps_small_axes_to_exactly_zero() {
        let mut filter = MotionFilter::default();
        filter.apply(Vector3::new(0.0, 9.81, 0.0));
        // Delta of (0.1, 0.05, 2.0): after alpha=0.8 the x and y axes land
        // below the 0.1 threshold and must be exactly 0, not merely small.
        let out = filter.apply(Vector3::new(0.1, 9.86, 2.0));
        assert_eq!(out.x, 0.0);
        assert_eq!(out.y, 0.0);
        assert!(out.z > 1.0);
    }

    #[test]
    fn test_constant_input_settles_to_zero() {
        // A constant raw vector has zero delta, so the high-pass stage kills
        // it: gravity at rest never leaks into the output.
        let mut filter = MotionFilter::default();
        let gravity = Vector3::new(0.0, 9.81, 0.0);
        for _ in 0..20 {
            filter.apply(gravity);
        }
        let out = filter.apply(gravity);
        assert_eq!(out, Vector3::zeros());
    }

    #[test]
    fn test_reset_reseeds_history() {
        let mut filter = MotionFilter::default();
        filter.apply(Vector3::new(1.0, 2.0, 3.0));
        filter.apply(Vector3::new(4.0, 5.0, 6.0));
        filter.reset();
        let out = filter.apply(Vector3::new(7.0, 8.0, 9.0));
        assert_eq!(out, Vector3::zeros());
    }

    #[test]
    fn test_step_input_passes_high_pass() {
        let mut filter = MotionFilter::default();
        filter.apply(Vector3::new(0.0, 9.81, 0.0));
        // Sudden 3 m/s² jolt on x: 0.8 * 3.0 = 2.4 expected on first response.
        let out = filter.apply(Vector3::new(3.0, 9.81, 0.0));
        assert!((out.x - 2.4).abs() < 1e-9);
    }
}
