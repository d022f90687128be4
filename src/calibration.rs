use log::info;
use nalgebra::Vector3;

use crate::sample::ImuSample;

/// Estimates the at-rest accelerometer reading (gravity plus sensor bias)
/// by averaging a fixed window of samples.
///
/// There is no outlier rejection: a bump during the window biases the
/// offset for the rest of the session, and only a recalibration clears it.
pub struct GravityCalibrator {
    sum: Vector3<f64>,
    collected: usize,
    sample_count: usize,
}

impl GravityCalibrator {
    pub fn new(sample_count: usize) -> Self {
        Self {
            sum: Vector3::zeros(),
            collected: 0,
            sample_count: sample_count.max(1),
        }
    }

    /// Feed one sample collected while the sensor is assumed stationary.
    /// Returns the per-axis mean once the window fills; the caller adopts
    /// that as the session's gravity offset.
    pub fn observe(&mut self, sample: &ImuSample) -> Option<Vector3<f64>> {
        self.sum += sample.accel();
        self.collected += 1;

        if self.collected < self.sample_count {
            return None;
        }

        let offset = self.sum / self.collected as f64;
        info!(
            "calibration complete: gravity offset ({:.4}, {:.4}, {:.4}) from {} samples",
            offset.x, offset.y, offset.z, self.collected
        );
        Some(offset)
    }

    /// Samples collected so far out of the configured window.
    pub fn progress(&self) -> (usize, usize) {
        (self.collected.min(self.sample_count), self.sample_count)
    }

    pub fn reset(&mut self) {
        self.sum = Vector3::zeros();
        self.collected = 0;
    }
}
