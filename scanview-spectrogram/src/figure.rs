use std::sync::Arc;

use scanview_messages::{Settings, Timestamp};

use crate::colormap::{ColorMap, Normalize};
use crate::raster::{Extent, Raster};
use crate::ticks::TickFormat;

/// Tag of the spectrogram image on the main axes.
pub const PLOT_TAG: &str = "plot";

const GAINSBORO: [u8; 3] = [220, 220, 220];
const WHITE: [u8; 3] = [255, 255, 255];
/// Main plot to legend width ratio.
const WIDTH_RATIOS: [f32; 2] = [9.5, 0.5];
const MINOR_TICKS: usize = 10;
const INITIAL_NORM: Normalize = Normalize::new(-50.0, 0.0);
/// Seconds of history shown before any data arrives.
const INITIAL_SPAN_SECS: f64 = 10.0;

/// A raster mapped onto the axes with its own color limits.
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    raster: Arc<Raster>,
    extent: Extent,
    cmap: ColorMap,
    clim: Normalize,
}

impl ImageArtifact {
    /// Color limits start at the data range.
    pub fn new(raster: Raster, extent: Extent, cmap: ColorMap) -> Self {
        let (vmin, vmax) = raster.value_range().unwrap_or((0.0, 1.0));
        Self {
            raster: Arc::new(raster),
            extent,
            cmap,
            clim: Normalize::new(vmin, vmax),
        }
    }

    pub fn raster(&self) -> &Arc<Raster> {
        &self.raster
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn cmap(&self) -> ColorMap {
        self.cmap
    }

    pub fn clim(&self) -> Normalize {
        self.clim
    }

    pub fn set_clim(&mut self, vmin: f32, vmax: f32) {
        self.clim = Normalize::new(vmin, vmax);
    }
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub tag: String,
    pub image: ImageArtifact,
}

/// The main plotting region.
#[derive(Debug, Clone)]
pub struct Axes {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_format: TickFormat,
    pub y_format: TickFormat,
    /// Minor intervals per major tick interval
    pub minor_ticks: usize,
    /// (left, right)
    pub xlim: (f64, f64),
    /// (bottom, top)
    pub ylim: (f64, f64),
    pub grid: bool,
    pub grid_color: [u8; 3],
    artifacts: Vec<Artifact>,
}

impl Axes {
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn image(&self, tag: &str) -> Option<&ImageArtifact> {
        self.artifacts.iter().find(|a| a.tag == tag).map(|a| &a.image)
    }

    pub fn image_mut(&mut self, tag: &str) -> Option<&mut ImageArtifact> {
        self.artifacts
            .iter_mut()
            .find(|a| a.tag == tag)
            .map(|a| &mut a.image)
    }

    /// Remove every artifact carrying `tag`. Returns how many were removed.
    pub fn remove_tagged(&mut self, tag: &str) -> usize {
        let before = self.artifacts.len();
        self.artifacts.retain(|a| a.tag != tag);
        before - self.artifacts.len()
    }

    /// Replace the tagged image with a new one.
    pub fn attach_image(&mut self, tag: &str, image: ImageArtifact) {
        self.remove_tagged(tag);
        self.artifacts.push(Artifact {
            tag: tag.to_owned(),
            image,
        });
    }
}

/// Legend strip showing the color scale.
#[derive(Debug, Clone)]
pub struct ColorBar {
    pub norm: Normalize,
    pub cmap: ColorMap,
    pub label: String,
}

/// Everything drawn on the plot surface.
#[derive(Debug, Clone)]
pub struct Figure {
    pub background: [u8; 3],
    /// Relative widths of the main axes and the legend
    pub width_ratios: [f32; 2],
    pub main: Axes,
    pub legend: ColorBar,
}

impl Figure {
    /// Lay out an empty spectrogram for the current scan settings.
    ///
    /// The y axis starts at `now` at the bottom and ten seconds earlier at the top.
    pub fn setup(settings: &Settings, now: Timestamp) -> Self {
        let earlier = Timestamp(now.as_secs() - INITIAL_SPAN_SECS);
        let main = Axes {
            title: format!(
                "Frequency Spectrogram\n{} - {} MHz, gain = {}dB",
                settings.start,
                settings.stop,
                settings.gain()
            ),
            x_label: "Frequency (MHz)".to_owned(),
            y_label: "Time".to_owned(),
            x_format: TickFormat::Scalar,
            y_format: TickFormat::TimeOfDay,
            minor_ticks: MINOR_TICKS,
            xlim: (settings.start.as_mhz(), settings.stop.as_mhz()),
            ylim: (now.to_plot(), earlier.to_plot()),
            grid: settings.grid,
            grid_color: WHITE,
            artifacts: Vec::new(),
        };
        Figure {
            background: GAINSBORO,
            width_ratios: WIDTH_RATIOS,
            main,
            legend: ColorBar {
                norm: INITIAL_NORM,
                cmap: ColorMap::viridis(),
                label: "Level (dB)".to_owned(),
            },
        }
    }
}
