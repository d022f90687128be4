// IMU line-stream tracker core
// Turns a 6-axis sample stream into an orientation estimate (complementary
// filter) or a dead-reckoned position with a bounded trail.

pub mod calibration;
pub mod config;
pub mod error;
pub mod filters;
pub mod live_status;
pub mod sample;
pub mod source;
pub mod tracker;
pub mod trail;

pub use calibration::GravityCalibrator;
pub use config::{MotionConfig, OrientationConfig, TrackerConfig, TrackerMode};
pub use error::{TrackerError, TrackerResult};
pub use filters::complementary::{ComplementaryFilter, EulerAngles};
pub use filters::dead_reckoning::{DeadReckoner, MotionState};
pub use live_status::LiveStatus;
pub use sample::{parse_line, ImuSample, START_MARKER};
pub use source::{spawn_line_reader, ChannelSource, LineSource, Poll, SampleSource, SyntheticSource};
pub use tracker::{MotionTracker, TrackerCommand, TrackerPhase};
pub use trail::TrailBuffer;
