use std::io::Cursor;

use approx::assert_relative_eq;
use nalgebra::Vector3;

use imu_tracker_rs::{
    ImuSample, LineSource, MotionTracker, Poll, SampleSource, TrackerConfig, TrackerMode,
    TrackerPhase,
};

/// Cheap deterministic generator for the clamp-invariant sweep.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }
}

struct Idle;

impl SampleSource for Idle {
    fn poll(&mut self) -> Poll {
        Poll::Pending
    }
}

#[test]
fn stationary_stream_calibrates_then_tracks_one_push() {
    let config = TrackerConfig::synthetic(TrackerMode::Position);
    let mut input = String::from("BMI160 ready\nDATA_BEGIN\n");
    for _ in 0..config.calibration_samples {
        input.push_str("0.0,0.0,1.0,0.0,0.0,0.0\n");
    }
    input.push_str("1.0,0.0,1.0,0.0,0.0,0.0\n");

    let mut source = LineSource::new(Cursor::new(input));
    let mut tracker = MotionTracker::new(config, 0.0);

    // Banner + marker.
    tracker.tick(&mut source, 0.0);
    tracker.tick(&mut source, 0.01);
    assert_eq!(tracker.phase(), TrackerPhase::Calibrating);

    let mut now = 0.01;
    for _ in 0..config.calibration_samples {
        now += 0.01;
        tracker.tick(&mut source, now);
    }
    assert_eq!(tracker.phase(), TrackerPhase::Active);
    assert_eq!(tracker.offset().unwrap(), Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(tracker.motion().position, Vector3::zeros());
    assert_eq!(tracker.motion().velocity, Vector3::zeros());
    assert!(tracker.trail().is_empty());

    // One 1 g lateral push, 100 ms after activation: bias-corrected to
    // (1, 0, 0), remapped onto the display X axis (flipped), scaled by
    // sensitivity 2.0 and damped by 0.95.
    tracker.tick(&mut source, now + 0.1);
    let m = tracker.motion();
    assert_relative_eq!(m.velocity.x, -1.9, epsilon = 1e-9);
    assert_relative_eq!(m.position.x, -0.19, epsilon = 1e-9);
    assert!(m.position.x.abs() < 10.0);
    assert_eq!(m.velocity.y, 0.0);
    assert_eq!(m.velocity.z, 0.0);
}

#[test]
fn missing_start_marker_times_out_into_calibration() {
    let config = TrackerConfig::live(TrackerMode::Position);
    let mut tracker = MotionTracker::new(config, 0.0);
    let mut idle = Idle;

    for step in 1..10 {
        tracker.tick(&mut idle, step as f64);
        assert_eq!(tracker.phase(), TrackerPhase::WaitingForStream);
    }

    // Wait budget is 10 s of simulated clock; no sentinel ever arrives.
    tracker.tick(&mut idle, 10.5);
    assert_eq!(tracker.phase(), TrackerPhase::Calibrating);
}

#[test]
fn malformed_lines_do_not_disturb_the_estimate() {
    let config = TrackerConfig::synthetic(TrackerMode::Position);
    let mut input = String::from("DATA_BEGIN\n");
    for _ in 0..config.calibration_samples {
        input.push_str("0.0,0.0,1.0,0.0,0.0,0.0\n");
    }
    input.push_str("0.5,0.5\n");
    input.push_str("a,b,c,d,e,f\n");
    input.push_str("no separator here\n");

    let mut source = LineSource::new(Cursor::new(input));
    let mut tracker = MotionTracker::new(config, 0.0);

    let mut now = 0.0;
    for _ in 0..config.calibration_samples + 4 {
        now += 0.01;
        tracker.tick(&mut source, now);
    }
    assert_eq!(tracker.phase(), TrackerPhase::Active);
    assert_eq!(tracker.motion().position, Vector3::zeros());
    assert_eq!(tracker.motion().velocity, Vector3::zeros());
    assert_eq!(tracker.samples_skipped(), 3);
}

#[test]
fn clamp_invariants_hold_under_random_acceleration() {
    let config = TrackerConfig::synthetic(TrackerMode::Position);
    let mut tracker = MotionTracker::new(config, 0.0);

    // Walk straight into the active phase.
    let mut calib = String::from("DATA_BEGIN\n");
    for _ in 0..config.calibration_samples {
        calib.push_str("0.0,0.0,1.0,0.0,0.0,0.0\n");
    }
    let mut source = LineSource::new(Cursor::new(calib));
    let mut now = 0.0;
    for _ in 0..config.calibration_samples + 1 {
        now += 0.01;
        tracker.tick(&mut source, now);
    }
    assert_eq!(tracker.phase(), TrackerPhase::Active);

    let mut rng = Lcg(0x5eed);
    let vmax = config.motion.max_velocity;
    let pmax = config.motion.max_position;
    for _ in 0..5000 {
        let sample = ImuSample::new(
            rng.next_f64() * 20.0,
            rng.next_f64() * 20.0,
            rng.next_f64() * 20.0 + 1.0,
            rng.next_f64() * 250.0,
            rng.next_f64() * 250.0,
            rng.next_f64() * 250.0,
        );
        now += 0.02 + 0.03 * (rng.next_f64() + 1.0);
        let mut one_shot = OneShot(Some(sample));
        tracker.tick(&mut one_shot, now);

        let m = tracker.motion();
        for axis in 0..3 {
            assert!(m.velocity[axis].abs() <= vmax);
            assert!(m.position[axis].abs() <= pmax);
        }
        assert!(tracker.trail().len() <= config.trail_capacity);
    }
}

struct OneShot(Option<ImuSample>);

impl SampleSource for OneShot {
    fn poll(&mut self) -> Poll {
        match self.0.take() {
            Some(sample) => Poll::Sample(sample),
            None => Poll::Pending,
        }
    }
}
