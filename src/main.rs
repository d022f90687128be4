use std::fs::File;
use std::io::{self, BufReader, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use log::{info, warn};

use imu_tracker_rs::config::{TrackerConfig, TrackerMode};
use imu_tracker_rs::error::TrackerError;
use imu_tracker_rs::source::{spawn_line_reader, SampleSource, SyntheticSource};
use imu_tracker_rs::tracker::{MotionTracker, TrackerCommand, TrackerPhase};

#[derive(Parser, Debug)]
#[command(name = "imu_tracker")]
#[command(about = "IMU stream tracker - complementary orientation or dead-reckoned position", long_about = None)]
struct Args {
    /// Duration in seconds (0 = run until Esc)
    #[arg(value_name = "SECONDS", default_value = "0")]
    duration: u64,

    /// Tracking mode (orientation, position)
    #[arg(long, default_value = "position")]
    mode: String,

    /// Sample line input: a file path, or "-" for stdin
    #[arg(long)]
    input: Option<String>,

    /// Use the synthetic sample generator
    #[arg(long)]
    synthetic: bool,

    /// Where the live status JSON is written
    #[arg(long, default_value = "imu_tracker_status.json")]
    status_path: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mode = match args.mode.as_str() {
        "orientation" => TrackerMode::Orientation,
        "position" => TrackerMode::Position,
        other => anyhow::bail!("unknown mode {other:?} (expected orientation or position)"),
    };

    let (mut source, config) = open_source(&args, mode);

    println!("[{}] imu_tracker starting ({} mode)", ts_now(), args.mode);
    println!("  Keys: R reset, A auto-reset, C recalibrate, Up/Down sensitivity, Esc quit");

    // Raw mode gives unbuffered keys. Without a tty the tracker still runs,
    // it just has no command surface.
    let raw_keys = terminal::enable_raw_mode().is_ok();

    let start = Instant::now();
    let mut tracker = MotionTracker::new(config, 0.0);
    let mut last_status = 0.0f64;

    'main: loop {
        let now = start.elapsed().as_secs_f64();

        if args.duration > 0 && now >= args.duration as f64 {
            break;
        }

        while raw_keys && event::poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break 'main;
                    }
                    KeyCode::Esc => break 'main,
                    KeyCode::Char('r') => tracker.command(TrackerCommand::Reset),
                    KeyCode::Char('a') => tracker.command(TrackerCommand::ToggleAutoReset),
                    KeyCode::Char('c') => tracker.command(TrackerCommand::Recalibrate),
                    KeyCode::Up => tracker.command(TrackerCommand::IncreaseSensitivity),
                    KeyCode::Down => tracker.command(TrackerCommand::DecreaseSensitivity),
                    _ => {}
                }
            }
        }

        tracker.tick(source.as_mut(), now);

        // Status snapshot + HUD line every 2 seconds.
        if now - last_status >= 2.0 {
            let status = tracker.status(now);
            if let Err(err) = status.save(&args.status_path) {
                warn!("status save failed: {err}");
            }
            print_hud(&tracker);
            last_status = now;
        }

        std::thread::sleep(Duration::from_millis(16));
    }

    if raw_keys {
        let _ = terminal::disable_raw_mode();
    }

    let now = start.elapsed().as_secs_f64();
    let _ = tracker.status(now).save(&args.status_path);

    println!("\n=== Final Stats ===");
    println!("Uptime: {:.1} s", now);
    println!("Samples processed: {}", tracker.samples_processed());
    println!("Samples skipped: {}", tracker.samples_skipped());
    if let Some(offset) = tracker.offset() {
        println!(
            "Gravity offset: ({:.4}, {:.4}, {:.4})",
            offset.x, offset.y, offset.z
        );
    }

    Ok(())
}

/// Pick the sample source. An unreachable transport is reported once and
/// degrades into the synthetic generator; the tracker cannot tell the
/// difference.
fn open_source(args: &Args, mode: TrackerMode) -> (Box<dyn SampleSource>, TrackerConfig) {
    if args.synthetic {
        return (
            Box::new(SyntheticSource::new()),
            TrackerConfig::synthetic(mode),
        );
    }

    match &args.input {
        Some(path) if path == "-" => (
            Box::new(spawn_line_reader(BufReader::new(io::stdin()), 512)),
            TrackerConfig::live(mode),
        ),
        Some(path) => match File::open(path) {
            Ok(file) => (
                Box::new(spawn_line_reader(BufReader::new(file), 512)),
                TrackerConfig::live(mode),
            ),
            Err(err) => {
                warn!(
                    "{}",
                    TrackerError::TransportUnavailable(format!("{path}: {err}"))
                );
                info!("falling back to synthetic samples");
                (
                    Box::new(SyntheticSource::new()),
                    TrackerConfig::synthetic(mode),
                )
            }
        },
        None => {
            info!("no input configured, using synthetic samples");
            (
                Box::new(SyntheticSource::new()),
                TrackerConfig::synthetic(mode),
            )
        }
    }
}

fn print_hud(tracker: &MotionTracker) {
    let estimate = match tracker.mode() {
        TrackerMode::Orientation => {
            let a = tracker.orientation();
            format!("roll {:.1} pitch {:.1} yaw {:.1}", a.roll, a.pitch, a.yaw)
        }
        TrackerMode::Position => {
            let m = tracker.motion();
            format!(
                "pos ({:.2}, {:.2}, {:.2}) trail {}",
                m.position.x,
                m.position.y,
                m.position.z,
                tracker.trail().len()
            )
        }
    };

    let phase = match tracker.phase() {
        TrackerPhase::Calibrating => {
            let (collected, target) = tracker.calibration_progress();
            format!("calibrating {collected}/{target}")
        }
        phase => phase.as_str().to_string(),
    };

    // Raw mode needs the explicit carriage return.
    print!(
        "[{}] {} | {} | sens {:.2} | auto-reset {}\r\n",
        ts_now(),
        phase,
        estimate,
        tracker.sensitivity(),
        if tracker.auto_reset_enabled() {
            "on"
        } else {
            "off"
        }
    );
    let _ = io::stdout().flush();
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}
