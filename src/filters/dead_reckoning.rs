use nalgebra::Vector3;

use crate::config::MotionConfig;
use crate::sample::ImuSample;

/// Position and velocity of the tracked sensor, both clamped per axis after
/// every step.
#[derive(Clone, Copy, Debug, Default)]
pub struct MotionState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// Heuristic dead reckoner.
///
/// Corrected acceleration is *assigned* into a damped velocity rather than
/// integrated; velocity is then integrated to position. The assignment step
/// is deliberately non-physical: it keeps the tracked marker responsive and
/// self-centering, where a true double integral of consumer-grade
/// accelerometer data diverges within seconds.
pub struct DeadReckoner {
    state: MotionState,
    offset: Vector3<f64>,
    sensitivity: f64,
    config: MotionConfig,
}

impl DeadReckoner {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            state: MotionState::default(),
            offset: Vector3::zeros(),
            sensitivity: config.sensitivity,
            config,
        }
    }

    /// Install the gravity offset produced by calibration.
    pub fn set_offset(&mut self, offset: Vector3<f64>) {
        self.offset = offset;
    }

    /// Advance one sample. `dt` is measured elapsed time, already capped by
    /// the caller. Returns true when the sensor counts as moving.
    pub fn step(&mut self, sample: &ImuSample, dt: f64) -> bool {
        let mut a = sample.accel() - self.offset;

        for axis in a.iter_mut() {
            if axis.abs() < self.config.dead_zone {
                *axis = 0.0;
            }
        }

        // Sensor frame to display frame: X flips, sensor Z becomes the
        // display vertical, sensor Y the display depth.
        let mapped = Vector3::new(-a.x, a.z, a.y);

        let mut v = mapped * self.sensitivity;
        let vmax = self.config.max_velocity;
        v.x = v.x.clamp(-vmax, vmax);
        v.y = v.y.clamp(-vmax, vmax);
        v.z = v.z.clamp(-vmax, vmax);
        v *= self.config.damping;
        self.state.velocity = v;

        self.state.position += v * dt;
        let pmax = self.config.max_position;
        self.state.position.x = self.state.position.x.clamp(-pmax, pmax);
        self.state.position.y = self.state.position.y.clamp(-pmax, pmax);
        self.state.position.z = self.state.position.z.clamp(-pmax, pmax);

        self.is_moving()
    }

    /// Any velocity axis above the motion threshold.
    pub fn is_moving(&self) -> bool {
        let threshold = self.config.motion_threshold;
        self.state.velocity.iter().any(|c| c.abs() > threshold)
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Zero position and velocity. Idempotent.
    pub fn reset(&mut self) {
        self.state = MotionState::default();
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn scale_sensitivity(&mut self, factor: f64) {
        self.sensitivity *= factor;
    }
}
