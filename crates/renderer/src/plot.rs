//! Field rendering: triangulate scattered samples and color them.

use std::fmt;
use std::str::FromStr;

use field_common::{BoundingBox, FieldError, FieldResult, SampledField};
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;
use tracing::{debug, info};

use crate::calibrate::ColorLimits;
use crate::colormap::{Color, Colormap};
use crate::ticks::band_levels;
use crate::triangulation::triangulate;
use crate::tricontour::{band_color, band_index, fill_bands};
use crate::tripatch::fill_patches;
use crate::viewport::{PixelRect, Viewport};

/// Default number of filled contour bands.
pub const DEFAULT_LEVELS: usize = 64;

/// Upper bound on contour bands.
pub const MAX_LEVELS: usize = 1024;

/// How the triangulated field is colored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Filled contour bands, linear inside each triangle.
    #[default]
    FilledContour,
    /// One flat color per triangle.
    FlatTripatch,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::FilledContour => write!(f, "filled-contour"),
            RenderMode::FlatTripatch => write!(f, "flat-tripatch"),
        }
    }
}

impl FromStr for RenderMode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "filled-contour" | "contour" | "tricontourf" => Ok(RenderMode::FilledContour),
            "flat-tripatch" | "flat" | "tripcolor" => Ok(RenderMode::FlatTripatch),
            other => Err(FieldError::invalid(
                "mode",
                format!("unknown render mode '{}' (expected filled-contour or flat-tripatch)", other),
            )),
        }
    }
}

/// Panel size and drawing knobs for a single field render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Number of contour bands between the color limits.
    pub levels: usize,
    pub background: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            levels: DEFAULT_LEVELS,
            background: Color::WHITE,
        }
    }
}

/// The color mapping attached to a rendered plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Mappable {
    pub colormap: Colormap,
    pub limits: ColorLimits,
    /// Band boundaries for contour plots; `None` for continuous coloring.
    pub levels: Option<Vec<f32>>,
}

impl Mappable {
    /// Color a value the way the plot colored it.
    pub fn color_for(&self, value: f32) -> Color {
        match &self.levels {
            Some(levels) if levels.len() >= 2 => {
                if value.is_nan() {
                    return Color::transparent();
                }
                let clamped = value.clamp(levels[0], levels[levels.len() - 1]);
                band_color(&self.colormap, band_index(clamped, levels), levels.len() - 1)
            }
            _ => self.colormap.map(value, &self.limits),
        }
    }
}

/// A rendered field panel together with its coordinate transform and
/// color mapping.
#[derive(Debug, Clone)]
pub struct RenderedPlot {
    pixmap: Pixmap,
    viewport: Viewport,
    mappable: Mappable,
    mode: RenderMode,
    triangles: usize,
}

impl RenderedPlot {
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mappable(&self) -> &Mappable {
        &self.mappable
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Number of triangles actually drawn.
    pub fn triangles(&self) -> usize {
        self.triangles
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

/// Render scattered samples with a built-in colormap.
pub fn render(
    x: &[f32],
    y: &[f32],
    v: &[f32],
    mode: RenderMode,
    limits: ColorLimits,
    colormap_name: &str,
    options: &RenderOptions,
) -> FieldResult<RenderedPlot> {
    let colormap = Colormap::by_name(colormap_name)?;
    render_with(x, y, v, mode, limits, &colormap, options)
}

/// Render a whole field.
pub fn render_field(
    field: &SampledField,
    mode: RenderMode,
    limits: ColorLimits,
    colormap: &Colormap,
    options: &RenderOptions,
) -> FieldResult<RenderedPlot> {
    render_with(
        field.x(),
        field.y(),
        field.values(),
        mode,
        limits,
        colormap,
        options,
    )
}

/// Render scattered samples with an already resolved colormap.
pub fn render_with(
    x: &[f32],
    y: &[f32],
    v: &[f32],
    mode: RenderMode,
    limits: ColorLimits,
    colormap: &Colormap,
    options: &RenderOptions,
) -> FieldResult<RenderedPlot> {
    if x.len() != v.len() || y.len() != v.len() {
        return Err(FieldError::invalid(
            "field",
            format!("array lengths differ: x={}, y={}, v={}", x.len(), y.len(), v.len()),
        ));
    }
    if !limits.low.is_finite() || !limits.high.is_finite() || limits.low > limits.high {
        return Err(FieldError::invalid(
            "color limits",
            format!("limits must be finite and ordered, got {}", limits),
        ));
    }
    if options.levels == 0 || options.levels > MAX_LEVELS {
        return Err(FieldError::invalid(
            "levels",
            format!("expected 1 to {} contour bands, got {}", MAX_LEVELS, options.levels),
        ));
    }

    let triangulation = triangulate(x, y)?;
    debug!(
        points = triangulation.point_count(),
        triangles = triangulation.len(),
        "Triangulated samples"
    );

    let bounds = BoundingBox::from_points(x, y)
        .ok_or_else(|| FieldError::RenderError("no finite coordinates".to_string()))?;

    let mut pixmap = Pixmap::new(options.width, options.height).ok_or_else(|| {
        FieldError::invalid(
            "size",
            format!("invalid panel size {}x{}", options.width, options.height),
        )
    })?;
    pixmap.fill(options.background.to_skia());

    let panel = PixelRect::new(0.0, 0.0, options.width as f32, options.height as f32);
    let viewport = Viewport::fit(bounds, panel);

    let (triangles, levels) = match mode {
        RenderMode::FilledContour => {
            let levels = band_levels(limits.low, limits.high, options.levels);
            let drawn = fill_bands(
                &mut pixmap,
                &viewport,
                x,
                y,
                v,
                &triangulation,
                &levels,
                colormap,
            );
            (drawn, Some(levels))
        }
        RenderMode::FlatTripatch => {
            let drawn = fill_patches(
                &mut pixmap,
                &viewport,
                x,
                y,
                v,
                &triangulation,
                &limits,
                colormap,
            );
            (drawn, None)
        }
    };

    if triangles == 0 {
        return Err(FieldError::RenderError(
            "every triangle touches a NaN value; nothing to draw".to_string(),
        ));
    }

    info!(
        mode = %mode,
        colormap = colormap.name(),
        limits = %limits,
        triangles,
        "Rendered field"
    );

    Ok(RenderedPlot {
        pixmap,
        viewport,
        mappable: Mappable {
            colormap: colormap.clone(),
            limits,
            levels,
        },
        mode,
        triangles,
    })
}
