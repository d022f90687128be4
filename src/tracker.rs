use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::calibration::GravityCalibrator;
use crate::config::{TrackerConfig, TrackerMode};
use crate::error::TrackerError;
use crate::filters::complementary::{ComplementaryFilter, EulerAngles};
use crate::filters::dead_reckoning::{DeadReckoner, MotionState};
use crate::live_status::LiveStatus;
use crate::sample::ImuSample;
use crate::source::{Poll, SampleSource};
use crate::trail::TrailBuffer;

/// Lifecycle phase of the estimator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerPhase {
    /// Discarding transport output until the start marker (or a timeout).
    WaitingForStream,
    /// Averaging stationary samples into the gravity offset.
    Calibrating,
    /// Producing orientation / position estimates.
    Active,
}

impl TrackerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerPhase::WaitingForStream => "waiting",
            TrackerPhase::Calibrating => "calibrating",
            TrackerPhase::Active => "active",
        }
    }
}

/// Discrete operator command, applied synchronously.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerCommand {
    Reset,
    ToggleAutoReset,
    Recalibrate,
    IncreaseSensitivity,
    DecreaseSensitivity,
}

/// Owns every piece of mutable estimator state and advances it one source
/// event per tick.
///
/// All clocks are caller-supplied monotonic seconds; the tracker never
/// reads a clock itself, which keeps the timeout transitions testable.
pub struct MotionTracker {
    config: TrackerConfig,
    phase: TrackerPhase,
    calibrator: GravityCalibrator,
    orientation: ComplementaryFilter,
    reckoner: DeadReckoner,
    trail: TrailBuffer,
    offset: Option<Vector3<f64>>,
    auto_reset: bool,
    started_at: f64,
    wait_started: f64,
    last_auto_reset: f64,
    last_sample_at: f64,
    last_telemetry: f64,
    samples_processed: u64,
    samples_skipped: u64,
}

impl MotionTracker {
    pub fn new(config: TrackerConfig, now: f64) -> Self {
        Self {
            phase: TrackerPhase::WaitingForStream,
            calibrator: GravityCalibrator::new(config.calibration_samples),
            orientation: ComplementaryFilter::new(config.orientation),
            reckoner: DeadReckoner::new(config.motion),
            trail: TrailBuffer::new(config.trail_capacity),
            offset: None,
            auto_reset: config.auto_reset,
            started_at: now,
            wait_started: now,
            last_auto_reset: now,
            last_sample_at: now,
            last_telemetry: now,
            samples_processed: 0,
            samples_skipped: 0,
            config,
        }
    }

    /// Run one tick: poll the source once, route the event, then service
    /// the timers. Never blocks and never fails; the worst outcome of a bad
    /// sample is that it is ignored.
    pub fn tick(&mut self, source: &mut dyn SampleSource, now: f64) {
        match source.poll() {
            Poll::Marker => self.on_marker(),
            Poll::Sample(sample) => self.on_sample(&sample, now),
            Poll::Malformed(line) => self.on_malformed(&line),
            Poll::Pending => {}
        }
        self.service_timers(now);
    }

    /// Apply an operator command. Valid in any phase.
    pub fn command(&mut self, command: TrackerCommand) {
        match command {
            TrackerCommand::Reset => {
                info!("manual reset");
                self.reset_motion();
            }
            TrackerCommand::ToggleAutoReset => {
                self.auto_reset = !self.auto_reset;
                info!(
                    "auto reset {}",
                    if self.auto_reset { "enabled" } else { "disabled" }
                );
            }
            TrackerCommand::Recalibrate => {
                // The previous offset stays in use until the new window
                // completes.
                info!("recalibration requested");
                self.enter_calibration();
            }
            TrackerCommand::IncreaseSensitivity => {
                self.reckoner
                    .scale_sensitivity(self.config.motion.sensitivity_step);
                info!("sensitivity {:.2}", self.reckoner.sensitivity());
            }
            TrackerCommand::DecreaseSensitivity => {
                self.reckoner
                    .scale_sensitivity(1.0 / self.config.motion.sensitivity_step);
                info!("sensitivity {:.2}", self.reckoner.sensitivity());
            }
        }
    }

    fn on_marker(&mut self) {
        if self.phase == TrackerPhase::WaitingForStream {
            info!("stream start marker received");
            self.enter_calibration();
        } else {
            // A mid-stream marker means the firmware rebooted; treated like
            // any other non-data line.
            self.samples_skipped += 1;
        }
    }

    fn on_malformed(&mut self, line: &str) {
        if self.phase == TrackerPhase::WaitingForStream {
            debug!("transport output before marker: {line:?}");
        } else {
            self.samples_skipped += 1;
            warn!("{}", TrackerError::MalformedSample(line.to_string()));
        }
    }

    fn on_sample(&mut self, sample: &ImuSample, now: f64) {
        match self.phase {
            TrackerPhase::WaitingForStream => {
                debug!("data line before start marker, discarding");
            }
            TrackerPhase::Calibrating => {
                if let Some(offset) = self.calibrator.observe(sample) {
                    self.offset = Some(offset);
                    self.reckoner.set_offset(offset);
                    self.enter_active(now);
                }
            }
            TrackerPhase::Active => self.integrate(sample, now),
        }
    }

    fn integrate(&mut self, sample: &ImuSample, now: f64) {
        let dt = (now - self.last_sample_at).clamp(0.0, self.config.motion.max_dt);
        self.last_sample_at = now;
        self.samples_processed += 1;

        match self.config.mode {
            TrackerMode::Orientation => self.orientation.update(sample),
            TrackerMode::Position => {
                let moving = self.reckoner.step(sample, dt);
                if moving && self.samples_processed % self.config.trail_decimation == 0 {
                    self.trail.push(self.reckoner.state().position);
                }
            }
        }

        if now - self.last_telemetry >= 1.0 {
            match self.config.mode {
                TrackerMode::Orientation => {
                    let a = self.orientation.angles();
                    debug!(
                        "roll {:.2} pitch {:.2} yaw {:.2}",
                        a.roll, a.pitch, a.yaw
                    );
                }
                TrackerMode::Position => {
                    let m = self.reckoner.state();
                    debug!(
                        "pos ({:.3}, {:.3}, {:.3}) vel ({:.3}, {:.3}, {:.3})",
                        m.position.x, m.position.y, m.position.z,
                        m.velocity.x, m.velocity.y, m.velocity.z
                    );
                }
            }
            self.last_telemetry = now;
        }
    }

    fn service_timers(&mut self, now: f64) {
        if self.phase == TrackerPhase::WaitingForStream
            && now - self.wait_started >= self.config.start_timeout
        {
            warn!("{}", TrackerError::StreamTimeout(self.config.start_timeout));
            self.enter_calibration();
        }

        if self.phase == TrackerPhase::Active
            && self.auto_reset
            && now - self.last_auto_reset >= self.config.auto_reset_interval
        {
            debug!("auto reset");
            self.reset_motion();
            self.last_auto_reset = now;
        }
    }

    fn enter_calibration(&mut self) {
        self.calibrator.reset();
        self.phase = TrackerPhase::Calibrating;
        info!(
            "calibrating: collecting {} stationary samples",
            self.config.calibration_samples
        );
    }

    /// A fresh zero reference point: the new offset only makes sense with
    /// motion state at the origin.
    fn enter_active(&mut self, now: f64) {
        self.reset_motion();
        self.last_sample_at = now;
        self.last_auto_reset = now;
        self.phase = TrackerPhase::Active;
    }

    fn reset_motion(&mut self) {
        self.reckoner.reset();
        self.trail.clear();
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn mode(&self) -> TrackerMode {
        self.config.mode
    }

    /// `(collected, target)` for on-screen calibration progress.
    pub fn calibration_progress(&self) -> (usize, usize) {
        self.calibrator.progress()
    }

    pub fn motion(&self) -> MotionState {
        self.reckoner.state()
    }

    pub fn orientation(&self) -> EulerAngles {
        self.orientation.angles()
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn offset(&self) -> Option<Vector3<f64>> {
        self.offset
    }

    pub fn sensitivity(&self) -> f64 {
        self.reckoner.sensitivity()
    }

    pub fn auto_reset_enabled(&self) -> bool {
        self.auto_reset
    }

    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    pub fn samples_skipped(&self) -> u64 {
        self.samples_skipped
    }

    pub fn status(&self, now: f64) -> LiveStatus {
        let (collected, target) = self.calibration_progress();
        let m = self.reckoner.state();
        let a = self.orientation.angles();
        LiveStatus {
            phase: self.phase.as_str().to_string(),
            mode: format!("{:?}", self.config.mode).to_lowercase(),
            calibration_collected: collected,
            calibration_target: target,
            position: [m.position.x, m.position.y, m.position.z],
            velocity: [m.velocity.x, m.velocity.y, m.velocity.z],
            roll: a.roll,
            pitch: a.pitch,
            yaw: a.yaw,
            trail_len: self.trail.len(),
            sensitivity: self.reckoner.sensitivity(),
            auto_reset: self.auto_reset,
            samples_processed: self.samples_processed,
            samples_skipped: self.samples_skipped,
            uptime_seconds: now - self.started_at,
        }
    }
}
