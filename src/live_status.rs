use serde::{Deserialize, Serialize};
use std::fs;

/// Point-in-time snapshot of the tracker, pulled once per frame by the
/// presentation side and periodically written to disk as JSON.
#[derive(Serialize, Deserialize, Clone)]
pub struct LiveStatus {
    pub phase: String,
    pub mode: String,
    pub calibration_collected: usize,
    pub calibration_target: usize,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub trail_len: usize,
    pub sensitivity: f64,
    pub auto_reset: bool,
    pub samples_processed: u64,
    pub samples_skipped: u64,
    pub uptime_seconds: f64,
}

impl LiveStatus {
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
