use std::sync::Arc;

use eframe::egui::{Color32, ColorImage, Context};
use log::trace;
use parking_lot::Mutex;
use scanview_spectrogram::{
    Axes, Canvas, ColorBar, Extent, Figure, Normalize, PLOT_TAG, SpectrogramError, TickFormat,
    Ticks,
};

/// Height in pixels of the rendered color bar gradient.
const COLORBAR_STEPS: usize = 256;
/// Rough glyph width used to size the margins.
const CHAR_WIDTH: f32 = 7.0;
const LINE_HEIGHT: f32 = 16.0;

/// Space around the axes, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 70.0,
            right: 12.0,
            top: 48.0,
            bottom: 44.0,
        }
    }
}

#[derive(Clone)]
pub struct RenderedImage {
    pub pixels: ColorImage,
    pub extent: Extent,
}

#[derive(Clone)]
pub struct RenderedColorBar {
    /// One pixel wide, `vmax` at the top
    pub strip: ColorImage,
    pub norm: Normalize,
    pub ticks: Ticks,
    pub label: String,
}

/// Everything the GUI thread needs to paint one figure.
#[derive(Clone)]
pub struct Rendered {
    /// Bumped on every draw so the painter knows when to upload textures
    pub generation: u64,
    pub background: Color32,
    pub width_ratios: [f32; 2],
    pub margins: Margins,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
    pub x_format: TickFormat,
    pub y_format: TickFormat,
    pub x_ticks: Ticks,
    pub y_ticks: Ticks,
    pub grid: Option<Color32>,
    pub image: Option<RenderedImage>,
    pub colorbar: RenderedColorBar,
}

#[derive(Default)]
struct Slot {
    margins: Margins,
    generation: u64,
    latest: Option<Arc<Rendered>>,
}

/// Canvas that renders figures into a slot read by the egui event loop.
#[derive(Clone)]
pub struct EguiCanvas {
    ctx: Context,
    slot: Arc<Mutex<Slot>>,
}

impl EguiCanvas {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Most recently rendered figure.
    pub fn latest(&self) -> Option<Arc<Rendered>> {
        self.slot.lock().latest.clone()
    }

    fn publish(&self, rendered: Rendered) {
        self.slot.lock().latest = Some(Arc::new(rendered));
        self.ctx.request_repaint();
    }
}

impl Canvas for EguiCanvas {
    fn tight_layout(&self, figure: &Figure) -> Result<(), SpectrogramError> {
        let axes = &figure.main;
        check_limits(axes)?;

        let y_ticks = axes.y_format.ticks(axes.ylim.0, axes.ylim.1, axes.minor_ticks);
        let widest = y_ticks
            .major
            .iter()
            .map(|&v| axes.y_format.label(v, y_ticks.step).chars().count())
            .max()
            .unwrap_or(0);
        let title_lines = axes.title.lines().count().max(1);

        self.slot.lock().margins = Margins {
            left: widest as f32 * CHAR_WIDTH + 16.0,
            right: 12.0,
            top: title_lines as f32 * LINE_HEIGHT + 16.0,
            bottom: 2.0 * LINE_HEIGHT + 12.0,
        };
        Ok(())
    }

    fn draw(&self, figure: &Figure) -> Result<(), SpectrogramError> {
        let axes = &figure.main;
        check_limits(axes)?;

        let image = axes.image(PLOT_TAG).map(|image| {
            let (rows, cols) = image.raster().shape();
            let clim = image.clim();
            let rgba: Vec<u8> = image
                .raster()
                .cells()
                .iter()
                .flat_map(|&cell| image.cmap().rgba(cell, &clim))
                .collect();
            RenderedImage {
                pixels: ColorImage::from_rgba_unmultiplied([cols, rows], &rgba),
                extent: image.extent(),
            }
        });

        let (margins, generation) = {
            let mut slot = self.slot.lock();
            slot.generation += 1;
            (slot.margins, slot.generation)
        };
        trace!("Rendering figure generation {generation}");

        let [r, g, b] = figure.background;
        let [gr, gg, gb] = axes.grid_color;
        self.publish(Rendered {
            generation,
            background: Color32::from_rgb(r, g, b),
            width_ratios: figure.width_ratios,
            margins,
            title: axes.title.clone(),
            x_label: axes.x_label.clone(),
            y_label: axes.y_label.clone(),
            xlim: axes.xlim,
            ylim: axes.ylim,
            x_format: axes.x_format,
            y_format: axes.y_format,
            x_ticks: axes.x_format.ticks(axes.xlim.0, axes.xlim.1, axes.minor_ticks),
            y_ticks: axes.y_format.ticks(axes.ylim.0, axes.ylim.1, axes.minor_ticks),
            grid: axes.grid.then(|| Color32::from_rgb(gr, gg, gb)),
            image,
            colorbar: render_colorbar(&figure.legend),
        });
        Ok(())
    }

    fn draw_colorbar(&self, colorbar: &ColorBar) -> Result<(), SpectrogramError> {
        let mut slot = self.slot.lock();
        let Some(latest) = slot.latest.take() else {
            // Nothing painted yet; the next full draw includes the legend.
            return Ok(());
        };
        slot.generation += 1;
        let mut rendered = Rendered::clone(&latest);
        rendered.generation = slot.generation;
        rendered.colorbar = render_colorbar(colorbar);
        slot.latest = Some(Arc::new(rendered));
        drop(slot);
        self.ctx.request_repaint();
        Ok(())
    }

    fn clear(&self) {
        self.slot.lock().latest = None;
        self.ctx.request_repaint();
    }
}

fn check_limits(axes: &Axes) -> Result<(), SpectrogramError> {
    let (x0, x1) = axes.xlim;
    let (y0, y1) = axes.ylim;
    if [x0, x1, y0, y1].iter().all(|v| v.is_finite()) && x0 != x1 && y0 != y1 {
        Ok(())
    } else {
        Err(SpectrogramError::RenderBackend(format!(
            "unusable axis limits x {:?} y {:?}",
            axes.xlim, axes.ylim
        )))
    }
}

fn render_colorbar(colorbar: &ColorBar) -> RenderedColorBar {
    let last = (COLORBAR_STEPS - 1) as f32;
    let rgba: Vec<u8> = (0..COLORBAR_STEPS)
        .flat_map(|i| {
            let [r, g, b] = colorbar.cmap.rgb(1.0 - i as f32 / last);
            [r, g, b, 255]
        })
        .collect();
    let norm = colorbar.norm;
    RenderedColorBar {
        strip: ColorImage::from_rgba_unmultiplied([1, COLORBAR_STEPS], &rgba),
        norm,
        ticks: TickFormat::Scalar.ticks(norm.vmin as f64, norm.vmax as f64, 1),
        label: colorbar.label.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanview_messages::{Settings, Timestamp};
    use scanview_spectrogram::{ColorMap, ImageArtifact, Raster};

    fn figure_with_image() -> Figure {
        let mut figure = Figure::setup(&Settings::default(), Timestamp(1_700_000_000.0));
        let mut raster = Raster::masked(3, 2);
        raster.set(2, 0, -10.0);
        raster.set(2, 1, -20.0);
        let extent = Extent {
            x_min: 88.0,
            x_max: 108.0,
            y_bottom: Timestamp(1_700_000_001.0).to_plot(),
            y_top: Timestamp(1_700_000_000.0).to_plot(),
        };
        figure
            .main
            .attach_image(PLOT_TAG, ImageArtifact::new(raster, extent, ColorMap::viridis()));
        figure
    }

    #[test]
    fn test_draw_publishes_frame() {
        let canvas = EguiCanvas::new(Context::default());
        assert!(canvas.latest().is_none());

        canvas.draw(&figure_with_image()).unwrap();

        let rendered = canvas.latest().expect("a frame should be published");
        assert_eq!(rendered.generation, 1);
        let image = rendered.image.as_ref().expect("image should be rendered");
        assert_eq!(image.pixels.size, [2, 3]);
        // Masked rows are transparent, data rows opaque.
        assert_eq!(image.pixels.pixels[0].a(), 0);
        assert_eq!(image.pixels.pixels[4].a(), 255);
        assert_eq!(rendered.colorbar.strip.size, [1, COLORBAR_STEPS]);
        assert!(rendered.grid.is_some());
    }

    #[test]
    fn test_colorbar_updates_latest_frame() {
        let canvas = EguiCanvas::new(Context::default());
        let mut figure = figure_with_image();
        canvas.draw_colorbar(&figure.legend).unwrap();
        assert!(canvas.latest().is_none());

        canvas.draw(&figure).unwrap();
        figure.legend.norm = Normalize::new(-80.0, -20.0);
        canvas.draw_colorbar(&figure.legend).unwrap();

        let rendered = canvas.latest().unwrap();
        assert_eq!(rendered.generation, 2);
        assert_eq!(rendered.colorbar.norm, Normalize::new(-80.0, -20.0));
        assert!(rendered.image.is_some());
    }

    #[test]
    fn test_layout_sizes_margins_from_labels() {
        let canvas = EguiCanvas::new(Context::default());
        let figure = figure_with_image();

        canvas.tight_layout(&figure).unwrap();
        canvas.draw(&figure).unwrap();

        let margins = canvas.latest().unwrap().margins;
        // "HH:MM:SS" tick labels and a two line title.
        assert_eq!(margins.left, 8.0 * CHAR_WIDTH + 16.0);
        assert_eq!(margins.top, 2.0 * LINE_HEIGHT + 16.0);
    }

    #[test]
    fn test_non_finite_limits_fail() {
        let canvas = EguiCanvas::new(Context::default());
        let mut figure = figure_with_image();
        figure.main.xlim = (f64::NAN, 1.0);

        assert!(canvas.tight_layout(&figure).is_err());
        assert!(canvas.draw(&figure).is_err());
        assert!(canvas.latest().is_none());
    }

    #[test]
    fn test_zero_span_limits_fail() {
        let canvas = EguiCanvas::new(Context::default());
        let mut figure = figure_with_image();
        figure.main.xlim = (10.0, 10.0);

        assert!(canvas.tight_layout(&figure).is_err());
        assert!(canvas.draw(&figure).is_err());
        assert!(canvas.latest().is_none());
    }

    #[test]
    fn test_clear_drops_frame() {
        let canvas = EguiCanvas::new(Context::default());
        canvas.draw(&figure_with_image()).unwrap();
        canvas.clear();
        assert!(canvas.latest().is_none());
    }
}
