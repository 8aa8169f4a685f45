use eframe::egui::{
    Align2, Color32, FontId, Painter, Pos2, Rect, Response, Sense, Stroke, TextureHandle,
    TextureOptions, Ui, Widget, pos2,
};
use scanview_spectrogram::{TickFormat, Ticks};

use crate::canvas::{EguiCanvas, Rendered};

const TEXT_COLOR: Color32 = Color32::from_gray(30);
const FRAME_COLOR: Color32 = Color32::from_gray(60);
const MAJOR_TICK_LEN: f32 = 6.0;
const MINOR_TICK_LEN: f32 = 3.0;
const LEGEND_TICKS_WIDTH: f32 = 48.0;

/// Paints the most recent figure rendered by the [`EguiCanvas`].
///
/// Textures are only re-uploaded when the canvas publishes a new generation.
pub struct PlotView {
    canvas: EguiCanvas,
    uploaded: u64,
    image_texture: Option<TextureHandle>,
    colorbar_texture: Option<TextureHandle>,
}

/// Maps plot coordinates into a screen rectangle. `ylim.0` is at the bottom.
struct Transform {
    rect: Rect,
    xlim: (f64, f64),
    ylim: (f64, f64),
}

impl Transform {
    fn x(&self, x: f64) -> f32 {
        let t = (x - self.xlim.0) / (self.xlim.1 - self.xlim.0);
        self.rect.left() + t as f32 * self.rect.width()
    }

    fn y(&self, y: f64) -> f32 {
        let t = (y - self.ylim.0) / (self.ylim.1 - self.ylim.0);
        self.rect.bottom() - t as f32 * self.rect.height()
    }

    fn pos(&self, x: f64, y: f64) -> Pos2 {
        pos2(self.x(x), self.y(y))
    }
}

impl PlotView {
    pub fn new(canvas: EguiCanvas) -> Self {
        Self {
            canvas,
            uploaded: 0,
            image_texture: None,
            colorbar_texture: None,
        }
    }

    fn upload(&mut self, ui: &Ui, rendered: &Rendered) {
        if self.uploaded == rendered.generation {
            return;
        }
        self.image_texture = rendered.image.as_ref().map(|image| {
            ui.ctx()
                .load_texture("spectrogram", image.pixels.clone(), TextureOptions::NEAREST)
        });
        self.colorbar_texture = Some(ui.ctx().load_texture(
            "spectrogram_colorbar",
            rendered.colorbar.strip.clone(),
            TextureOptions::LINEAR,
        ));
        self.uploaded = rendered.generation;
    }

    fn paint_axes(&self, painter: &Painter, region: Rect, rendered: &Rendered) {
        let m = rendered.margins;
        let rect = Rect::from_min_max(
            pos2(region.left() + m.left, region.top() + m.top),
            pos2(region.right() - m.right, region.bottom() - m.bottom),
        );
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let transform = Transform {
            rect,
            xlim: rendered.xlim,
            ylim: rendered.ylim,
        };

        painter.text(
            pos2(rect.center().x, region.top() + 4.0),
            Align2::CENTER_TOP,
            &rendered.title,
            FontId::proportional(14.0),
            TEXT_COLOR,
        );

        let plot_painter = painter.with_clip_rect(rect);
        if let (Some(texture), Some(image)) = (&self.image_texture, &rendered.image) {
            let e = image.extent;
            let image_rect = Rect::from_two_pos(
                transform.pos(e.x_min, e.y_top),
                transform.pos(e.x_max, e.y_bottom),
            );
            // Row 0 belongs at y_top wherever that lands on screen.
            let flip_y = transform.y(e.y_top) > transform.y(e.y_bottom);
            let flip_x = transform.x(e.x_min) > transform.x(e.x_max);
            let (u0, u1) = if flip_x { (1.0, 0.0) } else { (0.0, 1.0) };
            let (v0, v1) = if flip_y { (1.0, 0.0) } else { (0.0, 1.0) };
            let uv = Rect::from_min_max(pos2(u0, v0), pos2(u1, v1));
            plot_painter.image(texture.id(), image_rect, uv, Color32::WHITE);
        }

        if let Some(color) = rendered.grid {
            let stroke = Stroke::new(1.0, color);
            for &x in &rendered.x_ticks.major {
                let x = transform.x(x);
                plot_painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
            }
            for &y in &rendered.y_ticks.major {
                let y = transform.y(y);
                plot_painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
            }
        }

        paint_frame(painter, rect);
        self.paint_x_ticks(painter, &transform, &rendered.x_ticks, rendered.x_format);
        self.paint_y_ticks(painter, &transform, &rendered.y_ticks, rendered.y_format);

        painter.text(
            pos2(rect.center().x, region.bottom() - 4.0),
            Align2::CENTER_BOTTOM,
            &rendered.x_label,
            FontId::proportional(13.0),
            TEXT_COLOR,
        );
        painter.text(
            pos2(region.left() + 4.0, rect.top() - 4.0),
            Align2::LEFT_BOTTOM,
            &rendered.y_label,
            FontId::proportional(13.0),
            TEXT_COLOR,
        );
    }

    fn paint_x_ticks(&self, painter: &Painter, transform: &Transform, ticks: &Ticks, format: TickFormat) {
        let stroke = Stroke::new(1.0, FRAME_COLOR);
        let bottom = transform.rect.bottom();
        for &x in &ticks.minor {
            let x = transform.x(x);
            painter.line_segment([pos2(x, bottom), pos2(x, bottom + MINOR_TICK_LEN)], stroke);
        }
        for &value in &ticks.major {
            let x = transform.x(value);
            painter.line_segment([pos2(x, bottom), pos2(x, bottom + MAJOR_TICK_LEN)], stroke);
            painter.text(
                pos2(x, bottom + MAJOR_TICK_LEN + 2.0),
                Align2::CENTER_TOP,
                format.label(value, ticks.step),
                FontId::monospace(11.0),
                TEXT_COLOR,
            );
        }
    }

    fn paint_y_ticks(&self, painter: &Painter, transform: &Transform, ticks: &Ticks, format: TickFormat) {
        let stroke = Stroke::new(1.0, FRAME_COLOR);
        let left = transform.rect.left();
        for &y in &ticks.minor {
            let y = transform.y(y);
            painter.line_segment([pos2(left - MINOR_TICK_LEN, y), pos2(left, y)], stroke);
        }
        for &value in &ticks.major {
            let y = transform.y(value);
            painter.line_segment([pos2(left - MAJOR_TICK_LEN, y), pos2(left, y)], stroke);
            painter.text(
                pos2(left - MAJOR_TICK_LEN - 2.0, y),
                Align2::RIGHT_CENTER,
                format.label(value, ticks.step),
                FontId::monospace(11.0),
                TEXT_COLOR,
            );
        }
    }

    fn paint_legend(&self, painter: &Painter, region: Rect, rendered: &Rendered) {
        let m = rendered.margins;
        let strip_right = region.right() - LEGEND_TICKS_WIDTH;
        let rect = Rect::from_min_max(
            pos2(region.left() + 4.0, region.top() + m.top),
            pos2(strip_right.max(region.left() + 8.0), region.bottom() - m.bottom),
        );
        if rect.height() <= 0.0 {
            return;
        }
        if let Some(texture) = &self.colorbar_texture {
            let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
        paint_frame(painter, rect);

        let bar = &rendered.colorbar;
        let transform = Transform {
            rect,
            xlim: (0.0, 1.0),
            ylim: (bar.norm.vmin as f64, bar.norm.vmax as f64),
        };
        let stroke = Stroke::new(1.0, FRAME_COLOR);
        if (bar.norm.vmax - bar.norm.vmin).abs() > f32::EPSILON {
            for &value in &bar.ticks.major {
                let y = transform.y(value);
                painter.line_segment([pos2(rect.right(), y), pos2(rect.right() + 4.0, y)], stroke);
                painter.text(
                    pos2(rect.right() + 6.0, y),
                    Align2::LEFT_CENTER,
                    TickFormat::Scalar.label(value, bar.ticks.step),
                    FontId::monospace(11.0),
                    TEXT_COLOR,
                );
            }
        }
        painter.text(
            pos2(rect.center().x, region.bottom() - 4.0),
            Align2::CENTER_BOTTOM,
            &bar.label,
            FontId::proportional(12.0),
            TEXT_COLOR,
        );
    }
}

fn paint_frame(painter: &Painter, rect: Rect) {
    let stroke = Stroke::new(1.0, FRAME_COLOR);
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    for pair in corners.windows(2) {
        painter.line_segment([pair[0], pair[1]], stroke);
    }
}

impl Widget for &mut PlotView {
    fn ui(self, ui: &mut Ui) -> Response {
        let Some(rendered) = self.canvas.latest() else {
            ui.label("Waiting for spectrum data...");
            return ui.response();
        };
        self.upload(ui, &rendered);

        let (region, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(region);
        painter.rect_filled(region, 0.0, rendered.background);

        let [main, legend] = rendered.width_ratios;
        // Legend tick labels sit outside the strip, like the axes' labels.
        let usable = (region.width() - LEGEND_TICKS_WIDTH).max(0.0);
        let split = region.left() + usable * main / (main + legend);
        let main_region = Rect::from_min_max(region.left_top(), pos2(split, region.bottom()));
        let legend_region = Rect::from_min_max(pos2(split, region.top()), region.right_bottom());

        self.paint_axes(&painter, main_region, &rendered);
        self.paint_legend(&painter, legend_region, &rendered);

        response
    }
}
