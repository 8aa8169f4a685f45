use std::sync::Arc;

use log::trace;
use parking_lot::Mutex;
use scanview_messages::{Settings, Sweep, SweepHistory, Timestamp};

use crate::figure::Figure;

/// Life cycle of the plot surface.
#[derive(Debug, Default)]
pub enum Surface {
    #[default]
    Uninitialized,
    Ready(Figure),
    Closed,
}

/// State shared by the scanner, the UI and the spectrogram.
///
/// All of it lives behind one [`ScanLock`]; there is no finer locking.
#[derive(Debug)]
pub struct Scan {
    pub settings: Settings,
    /// Most recent sweeps, at most `settings.retain_max` of them
    pub sweeps: SweepHistory,
    pub(crate) surface: Surface,
}

pub type ScanLock = Arc<Mutex<Scan>>;

impl Scan {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            sweeps: SweepHistory::new(),
            surface: Surface::Uninitialized,
        }
    }

    /// Wrap in the shared lock.
    pub fn into_lock(self) -> ScanLock {
        Arc::new(Mutex::new(self))
    }

    /// The figure, while the surface is ready.
    pub fn figure(&self) -> Option<&Figure> {
        match &self.surface {
            Surface::Ready(figure) => Some(figure),
            _ => None,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Store a sweep and evict the oldest beyond the retention count.
    pub fn record_sweep(&mut self, time: Timestamp, sweep: Sweep) {
        self.sweeps.insert(time, Arc::new(sweep));
        while self.sweeps.len() > self.settings.retain_max {
            if let Some((evicted, _)) = self.sweeps.pop_first() {
                trace!("Evicted sweep captured at {}", evicted.as_secs());
            }
        }
    }
}
