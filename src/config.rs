use serde::{Deserialize, Serialize};

/// Which estimate the tracker maintains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerMode {
    /// Roll/pitch/yaw from the complementary filter.
    Orientation,
    /// Position and velocity dead reckoning with a trail.
    Position,
}

/// Complementary-filter gains (orientation mode).
///
/// These were tuned for a stable on-screen cube, not for attitude accuracy;
/// the gyro is under-weighted and the accelerometer over-weighted relative
/// to a textbook filter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OrientationConfig {
    /// Fixed integration step in seconds. The filter does not measure
    /// elapsed time, so integration error accumulates at whatever rate
    /// samples actually arrive.
    pub dt: f64,
    /// Scale on the integrated gyro rate.
    pub gyro_gain: f64,
    /// Complementary blend: share kept from the integrated angle, the
    /// remainder taken from accelerometer tilt.
    pub alpha: f64,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            gyro_gain: 0.5,
            alpha: 0.8,
        }
    }
}

/// Dead-reckoning tunables (position mode).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Corrected-acceleration axes below this magnitude are zeroed (g).
    pub dead_zone: f64,
    /// Acceleration-to-velocity scale, adjustable at runtime.
    pub sensitivity: f64,
    /// Multiplier applied per sensitivity increase/decrease command.
    pub sensitivity_step: f64,
    /// Per-step velocity decay, independent of dt.
    pub damping: f64,
    /// Per-axis velocity clamp.
    pub max_velocity: f64,
    /// Per-axis position clamp.
    pub max_position: f64,
    /// A velocity axis above this counts as moving for trail recording.
    pub motion_threshold: f64,
    /// Upper bound on the measured time step, so a stall cannot turn into a
    /// position spike.
    pub max_dt: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            dead_zone: 0.001,
            sensitivity: 2.0,
            sensitivity_step: 1.2,
            damping: 0.95,
            max_velocity: 5.0,
            max_position: 10.0,
            motion_threshold: 0.01,
            max_dt: 0.1,
        }
    }
}

/// Full tracker configuration. Two profiles exist: [`TrackerConfig::live`]
/// for a physical sensor and [`TrackerConfig::synthetic`] for the demo
/// generator, which calibrates over a shorter window.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub mode: TrackerMode,
    /// Stationary samples averaged into the gravity offset.
    pub calibration_samples: usize,
    /// Seconds to wait for the start marker before calibrating anyway.
    pub start_timeout: f64,
    /// Seconds between automatic resets while auto-reset is enabled.
    pub auto_reset_interval: f64,
    /// Whether auto-reset starts enabled.
    pub auto_reset: bool,
    /// Trail ring-buffer capacity.
    pub trail_capacity: usize,
    /// Record every Nth moving sample into the trail.
    pub trail_decimation: u64,
    pub orientation: OrientationConfig,
    pub motion: MotionConfig,
}

impl TrackerConfig {
    /// Profile for a live sensor stream.
    pub fn live(mode: TrackerMode) -> Self {
        Self {
            mode,
            calibration_samples: 100,
            start_timeout: 10.0,
            auto_reset_interval: 30.0,
            auto_reset: true,
            trail_capacity: 1000,
            trail_decimation: 2,
            orientation: OrientationConfig::default(),
            motion: MotionConfig::default(),
        }
    }

    /// Profile for the synthetic generator: same gains, shorter calibration.
    pub fn synthetic(mode: TrackerMode) -> Self {
        Self {
            calibration_samples: 30,
            ..Self::live(mode)
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::live(TrackerMode::Position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_differ_only_in_calibration_window() {
        let live = TrackerConfig::live(TrackerMode::Position);
        let synth = TrackerConfig::synthetic(TrackerMode::Position);
        assert_eq!(live.calibration_samples, 100);
        assert_eq!(synth.calibration_samples, 30);
        assert_eq!(live.motion.damping, synth.motion.damping);
        assert_eq!(live.start_timeout, synth.start_timeout);
    }
}
