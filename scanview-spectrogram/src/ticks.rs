use chrono::{DateTime, Local};
use scanview_messages::Timestamp;

const TARGET_MAJOR_TICKS: f64 = 6.0;
const TIME_STEPS_SECS: [f64; 16] = [
    1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 900.0, 1800.0, 3600.0, 7200.0,
    21600.0, 43200.0,
];

/// How an axis turns values into tick labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    /// Plain numbers, never with an offset or exponent.
    Scalar,
    /// Plot time rendered as local `%H:%M:%S`.
    TimeOfDay,
}

/// Tick positions for one axis, in plot coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticks {
    pub major: Vec<f64>,
    pub minor: Vec<f64>,
    /// Distance between major ticks
    pub step: f64,
}

impl TickFormat {
    /// Major ticks on a 1-2-5 (or clock) grid and `minor_per_major` minor
    /// intervals between them. Limits may be given in either order.
    pub fn ticks(&self, a: f64, b: f64, minor_per_major: usize) -> Ticks {
        let (lo, hi) = (a.min(b), a.max(b));
        if !(hi - lo).is_finite() || hi - lo <= 0.0 {
            return Ticks::default();
        }
        match self {
            TickFormat::Scalar => {
                let step = nice_step((hi - lo) / TARGET_MAJOR_TICKS);
                locate(lo, hi, step, minor_per_major)
            }
            TickFormat::TimeOfDay => {
                let lo_s = Timestamp::from_plot(lo).as_secs();
                let hi_s = Timestamp::from_plot(hi).as_secs();
                let raw = (hi_s - lo_s) / TARGET_MAJOR_TICKS;
                let step = TIME_STEPS_SECS
                    .iter()
                    .copied()
                    .find(|&s| s >= raw)
                    .unwrap_or_else(|| nice_step(raw));
                let secs = locate(lo_s, hi_s, step, minor_per_major);
                let to_plot = |v: Vec<f64>| -> Vec<f64> {
                    v.into_iter().map(|s| Timestamp(s).to_plot()).collect()
                };
                Ticks {
                    major: to_plot(secs.major),
                    minor: to_plot(secs.minor),
                    step: step / 86_400.0,
                }
            }
        }
    }

    /// Label for a tick at `value` on an axis with major spacing `step`.
    pub fn label(&self, value: f64, step: f64) -> String {
        match self {
            TickFormat::Scalar => {
                let decimals = if step >= 1.0 || step <= 0.0 {
                    0
                } else {
                    (-step.log10()).ceil() as usize
                };
                format!("{value:.decimals$}")
            }
            TickFormat::TimeOfDay => {
                let secs = Timestamp::from_plot(value).as_secs().round();
                DateTime::from_timestamp(secs as i64, 0)
                    .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
                    .unwrap_or_default()
            }
        }
    }
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn locate(lo: f64, hi: f64, step: f64, minor_per_major: usize) -> Ticks {
    let subdivisions = minor_per_major.max(1);
    let minor_step = step / subdivisions as f64;
    // Tolerate rounding at the limits so ticks on the edges are kept.
    let first = (lo / minor_step - 1e-9).ceil() as i64;
    let last = (hi / minor_step + 1e-9).floor() as i64;

    let mut ticks = Ticks {
        step,
        ..Ticks::default()
    };
    for k in first..=last {
        let value = k as f64 * minor_step;
        if k.rem_euclid(subdivisions as i64) == 0 {
            ticks.major.push(value);
        } else {
            ticks.minor.push(value);
        }
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_ticks_use_nice_steps() {
        let ticks = TickFormat::Scalar.ticks(87.0, 108.0, 10);
        assert_eq!(ticks.step, 5.0);
        assert_eq!(ticks.major, vec![90.0, 95.0, 100.0, 105.0]);
        // 10 minor intervals per major: 9 minor ticks between each pair.
        let between = ticks.minor.iter().filter(|&&v| v > 90.0 && v < 95.0).count();
        assert_eq!(between, 9);
    }

    #[test]
    fn test_inverted_limits() {
        let ticks = TickFormat::Scalar.ticks(1.0, 0.0, 10);
        assert_eq!(ticks.step, 0.2);
        assert_eq!(ticks.major.len(), 6);
    }

    #[test]
    fn test_degenerate_limits_have_no_ticks() {
        assert_eq!(TickFormat::Scalar.ticks(3.0, 3.0, 10), Ticks::default());
        assert_eq!(TickFormat::Scalar.ticks(0.0, f64::NAN, 10), Ticks::default());
    }

    #[test]
    fn test_scalar_labels_have_no_offset() {
        assert_eq!(TickFormat::Scalar.label(100.0, 5.0), "100");
        assert_eq!(TickFormat::Scalar.label(1_000_000.5, 0.5), "1000000.5");
        assert_eq!(TickFormat::Scalar.label(0.25, 0.05), "0.25");
    }

    #[test]
    fn test_time_ticks_land_on_whole_seconds() {
        let now = Timestamp(1_700_000_000.0);
        let earlier = Timestamp(now.as_secs() - 10.0);
        let ticks = TickFormat::TimeOfDay.ticks(now.to_plot(), earlier.to_plot(), 10);
        assert!(!ticks.major.is_empty());
        for tick in &ticks.major {
            let secs = Timestamp::from_plot(*tick).as_secs();
            assert!((secs - secs.round()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_time_label_shape() {
        let label = TickFormat::TimeOfDay.label(Timestamp(1_700_000_000.0).to_plot(), 0.0);
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
