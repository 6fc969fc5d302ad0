//! Input statistics shared by the streams of one playback session.

use std::time::Instant;

use parking_lot::Mutex;

/// Receiver for read counters.
pub trait StatsSink: Send {
    /// Add `bytes` to the read-bytes counter and return the running total.
    fn read_bytes(&mut self, bytes: u64) -> u64;

    /// Feed the running byte total to the bitrate estimator.
    fn input_bitrate(&mut self, total: u64);

    /// Add `delta` to the packet counter.
    fn read_packets(&mut self, delta: u64);
}

/// Default counters: byte and packet totals plus an average bitrate.
#[derive(Debug, Clone, Default)]
pub struct InputCounters {
    bytes: u64,
    packets: u64,
    bitrate: f64,
    started: Option<Instant>,
}

impl InputCounters {
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    #[must_use]
    pub fn packets(&self) -> u64 {
        self.packets
    }

    /// Average input rate in bytes per second since the first sample.
    #[must_use]
    pub fn bitrate(&self) -> f64 {
        self.bitrate
    }
}

impl StatsSink for InputCounters {
    fn read_bytes(&mut self, bytes: u64) -> u64 {
        self.bytes += bytes;
        self.bytes
    }

    fn input_bitrate(&mut self, total: u64) {
        let started = *self.started.get_or_insert_with(Instant::now);
        let secs = started.elapsed().as_secs_f64();
        if secs > 0.0 {
            #[allow(clippy::cast_precision_loss)]
            let total = total as f64;
            self.bitrate = total / secs;
        }
    }

    fn read_packets(&mut self, delta: u64) {
        self.packets += delta;
    }
}

/// Playback session owning the statistics lock.
///
/// Streams opened for the same session share it through an `Arc`.
pub struct Session {
    counters: Mutex<Box<dyn StatsSink>>,
}

impl Session {
    #[must_use]
    pub fn new(sink: Box<dyn StatsSink>) -> Self {
        Self {
            counters: Mutex::new(sink),
        }
    }

    /// Account one successful read of `bytes`.
    pub fn record_read(&self, bytes: usize) {
        let mut sink = self.counters.lock();
        let total = sink.read_bytes(bytes as u64);
        sink.input_bitrate(total);
        sink.read_packets(1);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Box::<InputCounters>::default())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
