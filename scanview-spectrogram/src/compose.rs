use log::trace;
use scanview_messages::{SweepHistory, Timestamp};

use crate::error::SpectrogramError;
use crate::raster::{Extent, Raster};

/// Build the spectrogram raster for a history snapshot.
///
/// The raster always has `retain_max` rows. Sweeps are written newest first
/// starting at the last row; sweeps that do not fit are dropped, rows without
/// a sweep stay masked.
pub fn compose(
    history: &SweepHistory,
    retain_max: usize,
) -> Result<(Raster, Extent), SpectrogramError> {
    let (Some((&time_min, reference)), Some((&last, _))) =
        (history.first_key_value(), history.last_key_value())
    else {
        return Err(SpectrogramError::MalformedSweep("empty sweep history"));
    };
    if retain_max == 0 {
        return Err(SpectrogramError::MalformedSweep("retention count is zero"));
    }

    let width = reference.len();
    if width == 0 {
        return Err(SpectrogramError::MalformedSweep("reference sweep has no columns"));
    }
    let (x_min, x_max) = reference
        .frequency_range()
        .ok_or(SpectrogramError::MalformedSweep("reference sweep has no valid frequency"))?;

    let time_max = if history.len() == 1 {
        Timestamp(time_min.as_secs() + 1.0)
    } else {
        last
    };

    let mut raster = Raster::masked(retain_max, width);
    for (row, (time, sweep)) in (0..retain_max).rev().zip(history.iter().rev()) {
        let (_freqs, levels) = sweep.split();
        if levels.len() > width {
            trace!(
                "Sweep at {} has {} points, truncating to {}",
                time.as_secs(),
                levels.len(),
                width
            );
        }
        for (col, &level) in levels.iter().take(width).enumerate() {
            raster.set(row, col, level);
        }
    }

    let extent = Extent {
        x_min,
        x_max,
        y_bottom: time_max.to_plot(),
        y_top: time_min.to_plot(),
    };
    Ok((raster, extent))
}
