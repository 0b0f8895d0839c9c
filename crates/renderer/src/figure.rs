//! Figure composition: field panel, axis frame and ticks, color bar, title.

use field_common::{FieldError, FieldResult};
use image::RgbaImage;
use tiny_skia::{Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform};
use tracing::warn;

use crate::colorbar::{draw_colorbar, ColorbarOrientation};
use crate::colormap::Color;
use crate::overlay::Marker;
use crate::plot::{RenderOptions, RenderedPlot, DEFAULT_LEVELS};
use crate::png;
use crate::text::{HAlign, TextLabel, TextPainter, VAlign};
use crate::ticks::{format_tick, nice_ticks};
use crate::viewport::PixelRect;

const TICK_LENGTH: f32 = 5.0;
const COLORBAR_GAP: f32 = 20.0;
const COLORBAR_THICKNESS: f32 = 18.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FigureOptions {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    /// `None` hides the color bar.
    pub colorbar: Option<ColorbarOrientation>,
    pub font_size: f32,
    pub background: Color,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            title: None,
            colorbar: None,
            font_size: 12.0,
            background: Color::WHITE,
        }
    }
}

/// Where each part of the figure goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureLayout {
    /// Area handed to the field renderer.
    pub plot: PixelRect,
    /// Vertical position of the title's center line.
    pub title_y: Option<f32>,
}

impl FigureLayout {
    pub fn compute(options: &FigureOptions) -> FieldResult<Self> {
        let fs = options.font_size;
        let mut left = fs * 6.0;
        let mut right = fs * 2.0;
        let mut top = fs * 2.0;
        let mut bottom = fs * 4.0;

        let title_y = options.title.as_ref().map(|_| {
            let title_height = fs * 3.0;
            top += title_height;
            fs + title_height / 2.0
        });

        match options.colorbar {
            Some(ColorbarOrientation::Vertical) => right += COLORBAR_GAP + COLORBAR_THICKNESS + fs * 6.0,
            Some(ColorbarOrientation::Horizontal) => bottom += COLORBAR_GAP + COLORBAR_THICKNESS + fs * 3.0,
            None => {}
        }
        left = left.round();
        right = right.round();
        top = top.round();
        bottom = bottom.round();

        let width = options.width as f32 - left - right;
        let height = options.height as f32 - top - bottom;
        if width < 20.0 || height < 20.0 {
            return Err(FieldError::invalid(
                "size",
                format!(
                    "figure {}x{} leaves no room for the plot",
                    options.width, options.height
                ),
            ));
        }

        Ok(Self {
            plot: PixelRect::new(left, top, width.floor(), height.floor()),
            title_y,
        })
    }
}

/// A figure being assembled.
#[derive(Debug)]
pub struct Figure {
    canvas: Pixmap,
    options: FigureOptions,
    layout: FigureLayout,
    labels: Vec<TextLabel>,
    data_rect: Option<PixelRect>,
}

impl Figure {
    pub fn new(options: FigureOptions) -> FieldResult<Self> {
        let layout = FigureLayout::compute(&options)?;
        let mut canvas = Pixmap::new(options.width, options.height).ok_or_else(|| {
            FieldError::invalid(
                "size",
                format!("invalid figure size {}x{}", options.width, options.height),
            )
        })?;
        canvas.fill(options.background.to_skia());

        let mut labels = Vec::new();
        if let (Some(title), Some(y)) = (&options.title, layout.title_y) {
            labels.push(
                TextLabel::new(title.clone(), options.width as f32 / 2.0, y, options.font_size * 1.4)
                    .aligned(HAlign::Center, VAlign::Middle),
            );
        }

        Ok(Self {
            canvas,
            options,
            layout,
            labels,
            data_rect: None,
        })
    }

    pub fn layout(&self) -> &FigureLayout {
        &self.layout
    }

    /// Render options sized for this figure's plot area.
    pub fn render_options(&self, levels: Option<usize>) -> RenderOptions {
        RenderOptions {
            width: self.layout.plot.width as u32,
            height: self.layout.plot.height as u32,
            levels: levels.unwrap_or(DEFAULT_LEVELS),
            background: self.options.background,
        }
    }

    /// Copy the rendered panel in and draw the axis frame and ticks.
    pub fn place_plot(&mut self, plot: &RenderedPlot) {
        let origin = self.layout.plot;
        self.canvas.draw_pixmap(
            origin.x as i32,
            origin.y as i32,
            plot.pixmap().as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        let inner = plot.viewport().data_rect();
        let data_rect = PixelRect::new(
            origin.x + inner.x,
            origin.y + inner.y,
            inner.width,
            inner.height,
        );
        self.data_rect = Some(data_rect);

        let mut pb = PathBuilder::new();
        if let Some(rect) = data_rect.to_skia() {
            pb.push_rect(rect);
        }

        let viewport = plot.viewport();
        let bounds = *viewport.bounds();
        let fs = self.options.font_size;

        let x_target = ((data_rect.width / (fs * 8.0)) as usize).clamp(2, 8);
        let x_ticks = nice_ticks(bounds.min_x, bounds.max_x, x_target);
        let x_step = tick_step(&x_ticks, bounds.width());
        for &x in &x_ticks {
            let px = origin.x + viewport.to_pixel(x, bounds.min_y).0;
            pb.move_to(px, data_rect.bottom());
            pb.line_to(px, data_rect.bottom() + TICK_LENGTH);
            self.labels.push(
                TextLabel::new(format_tick(x, x_step), px, data_rect.bottom() + TICK_LENGTH + 3.0, fs)
                    .aligned(HAlign::Center, VAlign::Top),
            );
        }

        let y_target = ((data_rect.height / (fs * 4.0)) as usize).clamp(2, 8);
        let y_ticks = nice_ticks(bounds.min_y, bounds.max_y, y_target);
        let y_step = tick_step(&y_ticks, bounds.height());
        for &y in &y_ticks {
            let py = origin.y + viewport.to_pixel(bounds.min_x, y).1;
            pb.move_to(data_rect.x, py);
            pb.line_to(data_rect.x - TICK_LENGTH, py);
            self.labels.push(
                TextLabel::new(format_tick(y, y_step), data_rect.x - TICK_LENGTH - 3.0, py, fs)
                    .aligned(HAlign::Right, VAlign::Middle),
            );
        }

        self.stroke(pb, 1.0);
    }

    /// Draw the color bar next to the placed plot, if enabled.
    pub fn place_colorbar(&mut self, plot: &RenderedPlot) -> FieldResult<()> {
        let Some(orientation) = self.options.colorbar else {
            return Ok(());
        };
        let Some(data_rect) = self.data_rect else {
            return Err(FieldError::RenderError(
                "color bar placed before the plot".to_string(),
            ));
        };
        let fs = self.options.font_size;
        let mut pb = PathBuilder::new();

        match orientation {
            ColorbarOrientation::Vertical => {
                let length = data_rect.height.round().max(1.0) as u32;
                let bar = draw_colorbar(plot.mappable(), orientation, length, COLORBAR_THICKNESS as u32)?;
                let x = data_rect.right() + COLORBAR_GAP;
                let y = data_rect.y;
                self.blit(&bar.pixmap, x, y);

                let tick_x = x + COLORBAR_THICKNESS;
                for tick in &bar.ticks {
                    let py = y + length as f32 - tick.offset;
                    pb.move_to(tick_x, py);
                    pb.line_to(tick_x + TICK_LENGTH, py);
                    self.labels.push(
                        TextLabel::new(tick.label.clone(), tick_x + TICK_LENGTH + 3.0, py, fs)
                            .aligned(HAlign::Left, VAlign::Middle),
                    );
                }
            }
            ColorbarOrientation::Horizontal => {
                let length = data_rect.width.round().max(1.0) as u32;
                let bar = draw_colorbar(plot.mappable(), orientation, length, COLORBAR_THICKNESS as u32)?;
                let x = data_rect.x;
                // Leave room for the x-axis tick labels.
                let y = data_rect.bottom() + TICK_LENGTH + fs * 2.0 + COLORBAR_GAP;
                self.blit(&bar.pixmap, x, y);

                let tick_y = y + COLORBAR_THICKNESS;
                for tick in &bar.ticks {
                    let px = x + tick.offset;
                    pb.move_to(px, tick_y);
                    pb.line_to(px, tick_y + TICK_LENGTH);
                    self.labels.push(
                        TextLabel::new(tick.label.clone(), px, tick_y + TICK_LENGTH + 3.0, fs)
                            .aligned(HAlign::Center, VAlign::Top),
                    );
                }
            }
        }

        self.stroke(pb, 1.0);
        Ok(())
    }

    /// Queue marker labels centered `offset` pixels above their markers.
    /// Unlabeled markers and markers outside the data box are skipped.
    /// Returns the number of labels queued.
    pub fn label_markers(&mut self, plot: &RenderedPlot, markers: &[Marker], offset: f32) -> usize {
        let origin = self.layout.plot;
        let viewport = plot.viewport();
        let bounds = *viewport.bounds();
        let size = self.options.font_size * 0.8;

        let mut queued = 0;
        for marker in markers {
            let Some(label) = &marker.label else {
                continue;
            };
            if !marker.x.is_finite() || !marker.y.is_finite() || !bounds.contains(marker.x, marker.y) {
                continue;
            }
            let (px, py) = viewport.to_pixel(marker.x, marker.y);
            self.labels.push(
                TextLabel::new(label.clone(), origin.x + px, origin.y + py - offset, size)
                    .aligned(HAlign::Center, VAlign::Bottom),
            );
            queued += 1;
        }
        queued
    }

    /// Draw pending text and return the finished image.
    pub fn finish(mut self, painter: &TextPainter) -> FieldResult<RgbaImage> {
        let skipped = painter.draw_fallback(&mut self.canvas, &self.labels);
        if let Some(first) = skipped.first() {
            warn!(
                skipped = skipped.len(),
                example = %first.text,
                "No font loaded; text labels skipped"
            );
        }

        let (width, height) = (self.canvas.width(), self.canvas.height());
        let data: Vec<u8> = self
            .canvas
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        let mut image = RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| FieldError::RenderError("figure buffer size mismatch".to_string()))?;

        painter.draw_with_font(&mut image, &self.labels);
        Ok(image)
    }

    fn blit(&mut self, pixmap: &Pixmap, x: f32, y: f32) {
        self.canvas.draw_pixmap(
            x.round() as i32,
            y.round() as i32,
            pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn stroke(&mut self, pb: PathBuilder, width: f32) {
        let Some(path) = pb.finish() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(Color::BLACK.to_skia());
        paint.anti_alias = true;
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.canvas
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

fn tick_step(ticks: &[f64], span: f64) -> f64 {
    match ticks {
        [a, b, ..] => b - a,
        _ => span,
    }
}

/// Encode a finished figure as PNG.
pub fn encode_png(image: &RgbaImage) -> FieldResult<Vec<u8>> {
    png::encode_auto(image.as_raw(), image.width() as usize, image.height() as usize)
}
