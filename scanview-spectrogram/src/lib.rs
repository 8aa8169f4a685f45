//! Spectrogram view for the frequency scanner.
//!
//! Sweeps keyed by capture time are composed into a fixed-height raster,
//! attached to a [`Figure`], color scaled, and handed to a [`Canvas`] for
//! painting. All shared state sits behind one [`ScanLock`].

mod canvas;
mod colormap;
mod compose;
mod error;
mod figure;
mod raster;
mod redraw;
mod shared;
mod spectrogram;
mod ticks;

pub use canvas::Canvas;
pub use colormap::{ColorMap, Normalize};
pub use compose::compose;
pub use error::SpectrogramError;
pub use figure::{Artifact, Axes, ColorBar, Figure, ImageArtifact, PLOT_TAG};
pub use raster::{Extent, Raster};
pub use redraw::{NotifyRedraw, RedrawStrategy, WorkerRedraw, platform_redraw};
pub use shared::{Scan, ScanLock, Surface};
pub use spectrogram::Spectrogram;
pub use ticks::{TickFormat, Ticks};
