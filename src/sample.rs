use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Line the firmware prints once at boot, right before the first data line.
pub const START_MARKER: &str = "DATA_BEGIN";

/// One decoded 6-axis inertial sample.
///
/// Accelerometer axes are in g (magnitude ~1.0 at rest), gyroscope axes in
/// degrees per second. Immutable once decoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImuSample {
    pub ax: f64,
    pub ay: f64,
    pub az: f64,
    pub gx: f64,
    pub gy: f64,
    pub gz: f64,
}

impl ImuSample {
    pub fn new(ax: f64, ay: f64, az: f64, gx: f64, gy: f64, gz: f64) -> Self {
        Self {
            ax,
            ay,
            az,
            gx,
            gy,
            gz,
        }
    }

    pub fn accel(&self) -> Vector3<f64> {
        Vector3::new(self.ax, self.ay, self.az)
    }

    pub fn gyro(&self) -> Vector3<f64> {
        Vector3::new(self.gx, self.gy, self.gz)
    }
}

/// Decode one transport line into a sample.
///
/// A data line is six comma-separated floats: `ax,ay,az,gx,gy,gz`. Anything
/// else (firmware banners, partial reads at open time, the start marker)
/// fails with [`TrackerError::MalformedSample`] and is skipped by the caller.
/// Pure and stateless.
pub fn parse_line(line: &str) -> Result<ImuSample, TrackerError> {
    let line = line.trim();
    if !line.contains(',') {
        return Err(TrackerError::MalformedSample(line.to_string()));
    }

    let mut fields = [0.0f64; 6];
    let mut count = 0usize;
    for part in line.split(',') {
        if count == fields.len() {
            return Err(TrackerError::MalformedSample(line.to_string()));
        }
        fields[count] = part
            .trim()
            .parse()
            .map_err(|_| TrackerError::MalformedSample(line.to_string()))?;
        count += 1;
    }
    if count != fields.len() {
        return Err(TrackerError::MalformedSample(line.to_string()));
    }

    Ok(ImuSample::new(
        fields[0], fields[1], fields[2], fields[3], fields[4], fields[5],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let sample = parse_line("0.12,-0.03,0.98,1.5,-2.25,0.0").unwrap();
        assert_eq!(sample.ax, 0.12);
        assert_eq!(sample.ay, -0.03);
        assert_eq!(sample.az, 0.98);
        assert_eq!(sample.gx, 1.5);
        assert_eq!(sample.gy, -2.25);
        assert_eq!(sample.gz, 0.0);
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let sample = parse_line(" 0.1, 0.2 ,0.3, 1.0, 2.0, 3.0 \r\n").unwrap();
        assert_eq!(sample.accel(), Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(sample.gyro(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_parse_rejects_no_separator() {
        assert!(parse_line("BMI160 ready").is_err());
        assert!(parse_line(START_MARKER).is_err());
        assert!(parse_line("").is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        assert!(parse_line("0.1,0.2,0.3,1.0,2.0").is_err());
        assert!(parse_line("0.1,0.2,0.3,1.0,2.0,3.0,4.0").is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(parse_line("0.1,0.2,xyz,1.0,2.0,3.0").is_err());
        assert!(parse_line("0.1,0.2,,1.0,2.0,3.0").is_err());
    }
}
