use std::io::BufRead;
use std::thread;

use crossbeam::channel::{bounded, Receiver, TrySendError};
use log::{debug, warn};

use crate::sample::{parse_line, ImuSample, START_MARKER};

/// One event from a sample source.
#[derive(Clone, Debug)]
pub enum Poll {
    /// A decoded data line.
    Sample(ImuSample),
    /// The stream start marker. Meaningful only while waiting for the
    /// stream; mid-stream markers are treated like any other non-data line.
    Marker,
    /// A line that is neither the marker nor six numeric fields.
    Malformed(String),
    /// Nothing available this tick.
    Pending,
}

/// Anything that yields decoded transport events one at a time, once per
/// tick. The tracker never knows whether it is fed by real hardware or a
/// generator.
pub trait SampleSource {
    fn poll(&mut self) -> Poll;
}

fn decode(line: &str) -> Poll {
    let trimmed = line.trim();
    if trimmed == START_MARKER {
        return Poll::Marker;
    }
    match parse_line(trimmed) {
        Ok(sample) => Poll::Sample(sample),
        Err(_) => Poll::Malformed(trimmed.to_string()),
    }
}

/// Decodes one line per poll from a buffered reader. Suited to replay
/// files and tests; `poll` blocks for as long as `read_line` does, so live
/// transports go through [`spawn_line_reader`] instead.
pub struct LineSource<R: BufRead> {
    reader: R,
    buf: String,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> SampleSource for LineSource<R> {
    fn poll(&mut self) -> Poll {
        self.buf.clear();
        match self.reader.read_line(&mut self.buf) {
            Ok(0) => Poll::Pending,
            Ok(_) => decode(&self.buf),
            Err(err) => {
                warn!("transport read error: {err}");
                Poll::Pending
            }
        }
    }
}

/// Receiving side of the reader-thread hand-off. `poll` never blocks.
pub struct ChannelSource {
    rx: Receiver<String>,
}

impl SampleSource for ChannelSource {
    fn poll(&mut self) -> Poll {
        match self.rx.try_recv() {
            Ok(line) => decode(&line),
            Err(_) => Poll::Pending,
        }
    }
}

/// Move a blocking reader onto its own thread, bridged by a bounded
/// single-producer queue. When the consumer falls behind the newest line is
/// dropped rather than queued without bound.
pub fn spawn_line_reader<R>(reader: R, queue: usize) -> ChannelSource
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = bounded(queue);
    thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("transport read error: {err}");
                    break;
                }
            };
            match tx.try_send(line) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => break,
            }
        }
        debug!("line reader finished");
    });
    ChannelSource { rx }
}

/// Deterministic stand-in for the physical sensor: a slowly rotating
/// lateral acceleration under ~1 g of gravity, with a short shake burst on
/// a fixed cycle so the trail actually moves. Emits the start marker first,
/// so the tracker walks the same phases as with real hardware.
pub struct SyntheticSource {
    ticks: u64,
    angle_deg: f64,
    marker_sent: bool,
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self {
            ticks: 0,
            angle_deg: 0.0,
            marker_sent: false,
        }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for SyntheticSource {
    fn poll(&mut self) -> Poll {
        if !self.marker_sent {
            self.marker_sent = true;
            return Poll::Marker;
        }

        self.ticks += 1;
        self.angle_deg += 3.0;
        let rad = self.angle_deg.to_radians();
        let mut ax = 0.3 * rad.sin();
        let mut ay = 0.3 * rad.cos();
        let az = 0.98;

        // Shake burst: 12 of every 120 ticks (~0.2 s of every 2 s at 60 Hz).
        if self.ticks % 120 < 12 {
            let t = self.ticks as f64;
            ax += 0.4 * (t * 1.7).sin();
            ay += 0.4 * (t * 2.3).cos();
        }

        Poll::Sample(ImuSample::new(ax, ay, az, 0.0, 0.0, 0.0))
    }
}
