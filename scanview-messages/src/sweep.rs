use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Days from 0001-01-01 to the Unix epoch, plus one, as used by the plot time axis.
const PLOT_EPOCH_DAYS: f64 = 719_163.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Capture time of a sweep in seconds since the Unix epoch.
///
/// Ordered with `f64::total_cmp` so it can key a `BTreeMap`.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp(pub f64);

impl Timestamp {
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        Self(secs)
    }

    pub const fn as_secs(self) -> f64 {
        self.0
    }

    /// Convert to the plot time axis (fractional days).
    pub fn to_plot(self) -> f64 {
        self.0 / SECONDS_PER_DAY + PLOT_EPOCH_DAYS
    }

    /// Inverse of [`Timestamp::to_plot`].
    pub fn from_plot(value: f64) -> Self {
        Self((value - PLOT_EPOCH_DAYS) * SECONDS_PER_DAY)
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Timestamp {
    fn from(secs: f64) -> Self {
        Self(secs)
    }
}

/// One scan: (frequency in MHz, level in dB) pairs captured at a single instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sweep {
    points: Vec<(f64, f32)>,
}

impl Sweep {
    pub fn new(points: Vec<(f64, f32)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(f64, f32)] {
        &self.points
    }

    /// Lowest and highest frequency in the sweep.
    pub fn frequency_range(&self) -> Option<(f64, f64)> {
        let mut freqs = self.points.iter().map(|&(f, _)| f).filter(|f| f.is_finite());
        let first = freqs.next()?;
        Some(freqs.fold((first, first), |(lo, hi), f| (lo.min(f), hi.max(f))))
    }

    /// Split into frequencies and levels, sorted by frequency.
    pub fn split(&self) -> (Vec<f64>, Vec<f32>) {
        let mut points: Vec<(f64, f32)> = self
            .points
            .iter()
            .copied()
            .filter(|(f, _)| f.is_finite())
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points.into_iter().unzip()
    }
}

impl FromIterator<(f64, f32)> for Sweep {
    fn from_iter<I: IntoIterator<Item = (f64, f32)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Sweeps keyed by capture time. Cloning is cheap: sweeps are shared.
pub type SweepHistory = BTreeMap<Timestamp, Arc<Sweep>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sorts_by_frequency() {
        let sweep = Sweep::new(vec![(20.0, -30.0), (10.0, -20.0), (15.0, -25.0)]);
        let (freqs, levels) = sweep.split();
        assert_eq!(freqs, vec![10.0, 15.0, 20.0]);
        assert_eq!(levels, vec![-20.0, -25.0, -30.0]);
    }

    #[test]
    fn test_split_drops_non_finite_frequencies() {
        let sweep = Sweep::new(vec![(f64::NAN, -1.0), (10.0, -2.0)]);
        let (freqs, levels) = sweep.split();
        assert_eq!(freqs, vec![10.0]);
        assert_eq!(levels, vec![-2.0]);
    }

    #[test]
    fn test_frequency_range() {
        let sweep: Sweep = [(101.5, 0.0), (99.0, 0.0), (100.0, 0.0)].into_iter().collect();
        assert_eq!(sweep.frequency_range(), Some((99.0, 101.5)));
        assert_eq!(Sweep::default().frequency_range(), None);
    }

    #[test]
    fn test_plot_time_round_trip() {
        let t = Timestamp(1_700_000_000.25);
        let back = Timestamp::from_plot(t.to_plot());
        assert!((back.as_secs() - t.as_secs()).abs() < 1e-3);
        assert_eq!(Timestamp(0.0).to_plot(), 719_163.0);
    }

    #[test]
    fn test_history_is_ordered_by_time() {
        let mut history = SweepHistory::new();
        history.insert(Timestamp(101.0), Arc::new(Sweep::default()));
        history.insert(Timestamp(100.0), Arc::new(Sweep::default()));
        history.insert(Timestamp(100.5), Arc::new(Sweep::default()));
        let keys: Vec<f64> = history.keys().map(|t| t.as_secs()).collect();
        assert_eq!(keys, vec![100.0, 100.5, 101.0]);
    }
}
