mod source;

use anyhow::Result;
use flume::{Receiver, Sender};
use log::{debug, trace};
use scanview_messages::{Command, Event, Timestamp};
use scanview_spectrogram::ScanLock;
use std::time::Duration;

pub use source::SweepSource;

const DEFAULT_BINS: usize = 256;
const DEFAULT_PERIOD: Duration = Duration::from_millis(250);

/// Simulated acquisition thread.
/// Stores one sweep per period in the shared history and tells the UI about it.
pub struct Scanner {
    cmd_rx: Receiver<Command>,
    event_tx: Sender<Event>,
    lock: ScanLock,
    source: SweepSource,
    period: Duration,
    should_exit: bool,
}

impl Scanner {
    /// Create a new Scanner instance.
    pub fn new(cmd_rx: Receiver<Command>, event_tx: Sender<Event>, lock: ScanLock) -> Self {
        debug!("Constructing a new scanner");
        Self {
            cmd_rx,
            event_tx,
            lock,
            source: SweepSource::new(DEFAULT_BINS, rand::random()),
            period: DEFAULT_PERIOD,
            should_exit: false,
        }
    }

    /// Time between sweeps.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn with_source(mut self, source: SweepSource) -> Self {
        self.source = source;
        self
    }

    /// Run the scanner (blocking) until stopped or either channel closes.
    pub fn run(mut self) -> Result<()> {
        while !self.should_exit {
            match self.cmd_rx.recv_timeout(self.period) {
                Ok(Command::Stop) | Err(flume::RecvTimeoutError::Disconnected) => {
                    debug!("Scanner stopping");
                    self.should_exit = true;
                }
                Err(flume::RecvTimeoutError::Timeout) => self.scan_once()?,
            }
        }
        Ok(())
    }

    fn scan_once(&mut self) -> Result<()> {
        let (start, stop) = {
            let scan = self.lock.lock();
            (scan.settings.start, scan.settings.stop)
        };
        if stop <= start {
            anyhow::bail!("invalid scan range {start} - {stop} MHz");
        }

        let sweep = self.source.sweep(start, stop);
        let captured = Timestamp::now();
        self.lock.lock().record_sweep(captured, sweep);
        trace!("Recorded sweep at {}", captured.as_secs());

        if self.event_tx.send(Event::SweepsUpdated).is_err() {
            debug!("UI has disconnected, stopping scanner");
            self.should_exit = true;
        }
        Ok(())
    }
}
