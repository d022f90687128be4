use serde::{Deserialize, Serialize};

use crate::config::OrientationConfig;
use crate::sample::ImuSample;

/// Euler angles in degrees.
///
/// Yaw has no absolute reference on a 6-axis IMU and drifts without bound.
/// That is inherent to the sensor, not a filter defect.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Complementary filter fusing gyroscope-rate integration with
/// accelerometer-derived tilt.
///
/// Each sample advances the integrated angles by a fixed time step, then
/// blends roll and pitch toward the tilt the accelerometer observes. Yaw
/// has no correction term.
pub struct ComplementaryFilter {
    angles: EulerAngles,
    config: OrientationConfig,
}

impl ComplementaryFilter {
    pub fn new(config: OrientationConfig) -> Self {
        Self {
            angles: EulerAngles::default(),
            config,
        }
    }

    /// Advance the estimate by one sample.
    pub fn update(&mut self, sample: &ImuSample) {
        let OrientationConfig {
            dt,
            gyro_gain,
            alpha,
        } = self.config;

        self.angles.roll += sample.gx * dt * gyro_gain;
        self.angles.pitch += sample.gy * dt * gyro_gain;
        self.angles.yaw += sample.gz * dt * gyro_gain;

        // Tilt as the accelerometer sees it, gravity being the reference.
        let roll_acc = sample.ay.atan2(sample.az).to_degrees();
        let pitch_acc = (-sample.ax)
            .atan2((sample.ay * sample.ay + sample.az * sample.az).sqrt())
            .to_degrees();

        self.angles.roll = alpha * self.angles.roll + (1.0 - alpha) * roll_acc;
        self.angles.pitch = alpha * self.angles.pitch + (1.0 - alpha) * pitch_acc;
    }

    pub fn angles(&self) -> EulerAngles {
        self.angles
    }

    pub fn reset(&mut self) {
        self.angles = EulerAngles::default();
    }
}
