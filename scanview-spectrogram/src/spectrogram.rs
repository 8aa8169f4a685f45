use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use log::{debug, trace, warn};
use scanview_messages::{Settings, SweepHistory, Timestamp};

use crate::canvas::Canvas;
use crate::colormap::ColorMap;
use crate::compose::compose;
use crate::error::SpectrogramError;
use crate::figure::{Figure, ImageArtifact, PLOT_TAG};
use crate::redraw::RedrawStrategy;
use crate::shared::{Scan, ScanLock, Surface};

/// Half width given to an axis range that collapsed to one value.
const NONSINGULAR_PAD: f64 = 0.5;

struct Inner {
    lock: ScanLock,
    canvas: Box<dyn Canvas>,
    redraw: Box<dyn RedrawStrategy>,
    /// Render failures that were logged and dropped
    suppressed: AtomicU64,
}

/// Rolling time/frequency heat map of the scanner's sweeps.
///
/// Cheap to clone; clones share the same surface. Every operation is safe to
/// call from any thread and after [`Spectrogram::close`], where it does
/// nothing. Plotting and painting never block the caller beyond the time
/// needed to take the scan lock.
#[derive(Clone)]
pub struct Spectrogram {
    inner: Arc<Inner>,
}

impl Spectrogram {
    pub fn new(
        lock: ScanLock,
        canvas: impl Canvas + 'static,
        redraw: Box<dyn RedrawStrategy>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                lock,
                canvas: Box::new(canvas),
                redraw,
                suppressed: AtomicU64::new(0),
            }),
        }
    }

    /// Lay out the axes and legend, then request the first paint.
    ///
    /// Only the first call on an uninitialized surface has an effect.
    pub fn initialize(&self) {
        {
            let mut scan = self.inner.lock.lock();
            if !matches!(scan.surface, Surface::Uninitialized) {
                debug!("Spectrogram already initialized");
                return;
            }
            let figure = Figure::setup(&scan.settings, Timestamp::now());
            scan.surface = Surface::Ready(figure);
        }
        self.redraw_plot();
    }

    /// Show or hide the grid on the main axes.
    pub fn set_grid(&self, on: bool) {
        {
            let mut scan = self.inner.lock.lock();
            let Surface::Ready(figure) = &mut scan.surface else {
                return;
            };
            figure.main.grid = on;
        }
        self.redraw_plot();
    }

    /// Rebuild the spectrogram from `history` on a worker thread.
    ///
    /// Returns the worker's handle; dropping it detaches the worker.
    pub fn set_plot(&self, history: SweepHistory) -> Option<JoinHandle<()>> {
        let view = self.clone();
        match thread::Builder::new()
            .name("plot".to_owned())
            .spawn(move || view.plot(&history))
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Failed to spawn plot thread: {e}");
                None
            }
        }
    }

    /// Compose, attach and scale `history` in one critical section, then
    /// request a repaint. This is the body of the [`Spectrogram::set_plot`] worker.
    pub fn plot(&self, history: &SweepHistory) {
        let result = {
            let mut scan = self.inner.lock.lock();
            self.plot_locked(&mut scan, history)
        };
        match result {
            Ok(()) => self.redraw_plot(),
            Err(SpectrogramError::MalformedSweep(reason)) => {
                debug!("Skipping spectrogram update: {reason}");
            }
            Err(SpectrogramError::ClosedSurface) => trace!("Plot after close ignored"),
            Err(e) => self.suppress(e),
        }
    }

    /// Apply color and axis limits to the current image.
    ///
    /// With auto scaling (or `force`) the limits come from the data and are
    /// written back to the settings; otherwise the settings' limits are applied.
    pub fn scale_plot(&self, force: bool) {
        let mut scan = self.inner.lock.lock();
        let Scan {
            settings, surface, ..
        } = &mut *scan;
        if let Surface::Ready(figure) = surface {
            self.scale_locked(settings, figure, force);
        }
    }

    /// Ask for the surface to be repainted soon.
    pub fn redraw_plot(&self) {
        if self.inner.lock.lock().figure().is_none() {
            return;
        }
        self.inner.redraw.request(self);
    }

    /// Fit the layout and paint. Failures are logged and counted.
    pub fn perform_draw(&self) {
        let scan = self.inner.lock.lock();
        let Some(figure) = scan.figure() else {
            return;
        };
        let canvas = &self.inner.canvas;
        if let Err(e) = canvas.tight_layout(figure).and_then(|()| canvas.draw(figure)) {
            self.suppress(e);
        }
    }

    /// Clear and release the surface. Later calls do nothing.
    pub fn close(&self) {
        let mut scan = self.inner.lock.lock();
        if matches!(scan.surface, Surface::Ready(_)) {
            self.inner.canvas.clear();
        }
        scan.surface = Surface::Closed;
        debug!("Spectrogram closed");
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.inner.lock.lock().surface, Surface::Closed)
    }

    /// Number of render failures dropped so far.
    pub fn suppressed_failures(&self) -> u64 {
        self.inner.suppressed.load(Ordering::Relaxed)
    }

    fn plot_locked(&self, scan: &mut Scan, history: &SweepHistory) -> Result<(), SpectrogramError> {
        let Scan {
            settings, surface, ..
        } = scan;
        let Surface::Ready(figure) = surface else {
            return Err(SpectrogramError::ClosedSurface);
        };

        let (raster, extent) = compose(history, settings.retain_max)?;
        trace!(
            "Composed {:?} raster from {} sweeps",
            raster.shape(),
            history.len()
        );
        figure
            .main
            .attach_image(PLOT_TAG, ImageArtifact::new(raster, extent, ColorMap::viridis()));

        self.scale_locked(settings, figure, false);
        Ok(())
    }

    fn scale_locked(&self, settings: &mut Settings, figure: &mut Figure, force: bool) {
        let Some(image) = figure.main.image_mut(PLOT_TAG) else {
            return;
        };

        let observed = image.raster().value_range();
        let data_extent = match observed {
            Some((lo, hi)) if settings.auto_scale || force => {
                image.set_clim(lo, hi);
                settings.y_min = lo;
                settings.y_max = hi;
                Some(image.extent())
            }
            // Manual limits, or no observed value to scale to.
            _ => {
                image.set_clim(settings.y_min, settings.y_max);
                None
            }
        };
        let clim = image.clim();

        if let Some(extent) = data_extent {
            figure.main.xlim = nonsingular(extent.x_min, extent.x_max);
            figure.main.ylim = nonsingular(extent.y_bottom, extent.y_top);
        }
        figure.legend.norm = clim;
        if let Err(e) = self.inner.canvas.draw_colorbar(&figure.legend) {
            self.suppress(e);
        }
    }

    fn suppress(&self, error: SpectrogramError) {
        let count = self.inner.suppressed.fetch_add(1, Ordering::Relaxed) + 1;
        warn!("Suppressed render failure ({count} so far): {error}");
    }
}

/// Widen a zero-span axis range so it can be mapped onto the screen.
fn nonsingular(a: f64, b: f64) -> (f64, f64) {
    if a == b {
        (a - NONSINGULAR_PAD, b + NONSINGULAR_PAD)
    } else {
        (a, b)
    }
}
