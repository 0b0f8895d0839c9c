//! The visualization pipeline: load, decimate, calibrate, render, overlay,
//! compose and write.
//!
//! A [`PlotRequest`] is fully validated before any data file is opened.
//! Overlay files are read after the field is rendered and their failures
//! end up in the [`RunReport`] instead of aborting the run.

use std::fs;
use std::path::{Path, PathBuf};

use field_common::{FieldError, FieldResult, SampledField};
use record_codec::RecordLayout;
use renderer::calibrate::{calibrate_with, CalibrationOptions, ColorLimits};
use renderer::colormap::Colormap;
use renderer::decimate::decimate_field;
use renderer::figure::{encode_png, Figure, FigureLayout, FigureOptions};
use renderer::overlay::{scatter, Marker, MarkerStyle, OverlayFormat, OverlaySet};
use renderer::plot::{render_field, RenderMode, RenderedPlot, MAX_LEVELS};
use renderer::style::StyleConfig;
use renderer::text::TextPainter;
use tracing::{debug, info, warn};

/// Coordinate and value files. Each list is concatenated in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSources {
    pub x: Vec<PathBuf>,
    pub y: Vec<PathBuf>,
    pub values: Vec<PathBuf>,
}

impl FieldSources {
    /// Split comma-separated path lists. All three lists must name the same
    /// number of files.
    pub fn parse(x: &str, y: &str, values: &str) -> FieldResult<Self> {
        let sources = Self {
            x: split_paths("xcoords", x)?,
            y: split_paths("ycoords", y)?,
            values: split_paths("file", values)?,
        };
        if sources.x.len() != sources.values.len() || sources.y.len() != sources.values.len() {
            return Err(FieldError::invalid(
                "file",
                format!(
                    "xcoords, ycoords and file must list the same number of files (got {}, {}, {})",
                    sources.x.len(),
                    sources.y.len(),
                    sources.values.len()
                ),
            ));
        }
        Ok(sources)
    }

    /// Decode every file and build one field.
    pub fn load(&self, layout: &RecordLayout) -> FieldResult<SampledField> {
        let mut parts = Vec::with_capacity(self.values.len());
        for ((x, y), v) in self.x.iter().zip(&self.y).zip(&self.values) {
            let part = SampledField::new(decode(x, layout)?, decode(y, layout)?, decode(v, layout)?)
                .map_err(|e| FieldError::DecodeError {
                    path: v.display().to_string(),
                    message: e.to_string(),
                })?;
            debug!(file = %v.display(), points = part.len(), "Loaded slice");
            parts.push(part);
        }
        Ok(SampledField::concat(parts))
    }
}

fn split_paths(param: &str, list: &str) -> FieldResult<Vec<PathBuf>> {
    let paths: Vec<&str> = list.split(',').map(str::trim).collect();
    if paths.iter().any(|p| p.is_empty()) {
        return Err(FieldError::invalid(
            param,
            format!("empty entry in file list '{}'", list),
        ));
    }
    Ok(paths.into_iter().map(PathBuf::from).collect())
}

fn decode(path: &Path, layout: &RecordLayout) -> FieldResult<Vec<f32>> {
    record_codec::decode(path, layout).map_err(|e| FieldError::DecodeError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Where the colormap comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColormapSource {
    Builtin(String),
    /// A JSON style file; `style` picks an entry, otherwise its default.
    StyleFile { path: PathBuf, style: Option<String> },
}

impl ColormapSource {
    pub fn resolve(&self) -> FieldResult<Colormap> {
        match self {
            ColormapSource::Builtin(name) => Colormap::by_name(name),
            ColormapSource::StyleFile { path, style } => {
                StyleConfig::from_file(path)?.colormap(style.as_deref())
            }
        }
    }
}

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub sources: FieldSources,
    pub layout: RecordLayout,
    pub decimate: i64,
    pub calibration: CalibrationOptions,
    pub mode: RenderMode,
    pub colormap: ColormapSource,
    pub levels: usize,
    /// Draw every (decimated) node as a dot.
    pub show_points: bool,
    pub figure: FigureOptions,
    pub stations: Option<PathBuf>,
    pub source_markers: Option<PathBuf>,
    pub output: PathBuf,
    pub font_path: Option<PathBuf>,
}

impl PlotRequest {
    /// Check every argument and resolve the colormap without touching the
    /// data files. A style file is read here so a bad style name fails
    /// before any record is decoded.
    pub fn validate(&self) -> FieldResult<Colormap> {
        if self.decimate < 1 {
            return Err(FieldError::invalid(
                "decimate",
                format!("stride must be at least 1, got {}", self.decimate),
            ));
        }
        self.calibration.validate()?;
        if self.levels == 0 || self.levels > MAX_LEVELS {
            return Err(FieldError::invalid(
                "levels",
                format!("expected 1 to {} contour bands, got {}", MAX_LEVELS, self.levels),
            ));
        }
        FigureLayout::compute(&self.figure)?;
        if self.output.as_os_str().is_empty() {
            return Err(FieldError::invalid("output", "output path is empty"));
        }
        self.colormap.resolve()
    }
}

/// Result of drawing one overlay file.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayOutcome {
    Drawn {
        path: PathBuf,
        markers: usize,
        drawn: usize,
    },
    Failed {
        path: PathBuf,
        error: String,
    },
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub points_loaded: usize,
    pub points_rendered: usize,
    pub limits: ColorLimits,
    pub triangles: usize,
    pub overlays: Vec<OverlayOutcome>,
    pub output: PathBuf,
}

impl RunReport {
    pub fn failed_overlays(&self) -> impl Iterator<Item = &OverlayOutcome> {
        self.overlays
            .iter()
            .filter(|o| matches!(o, OverlayOutcome::Failed { .. }))
    }
}

/// Run the whole pipeline and write the PNG.
pub fn run(request: &PlotRequest, painter: &TextPainter) -> FieldResult<RunReport> {
    let colormap = request.validate()?;

    let field = request.sources.load(&request.layout)?;
    let points_loaded = field.len();
    info!(points = points_loaded, files = request.sources.values.len(), "Loaded field");

    let field = if request.decimate > 1 {
        decimate_field(&field, request.decimate)?
    } else {
        field
    };

    let limits = calibrate_with(field.values(), &request.calibration)?;
    info!(
        points = field.len(),
        stride = request.decimate,
        low = limits.low,
        high = limits.high,
        "Calibrated color limits"
    );

    let mut figure = Figure::new(request.figure.clone())?;
    let mut plot = render_field(
        &field,
        request.mode,
        limits,
        &colormap,
        &figure.render_options(Some(request.levels)),
    )?;

    if request.show_points {
        let nodes: Vec<(f64, f64)> = field
            .x()
            .iter()
            .zip(field.y())
            .map(|(&x, &y)| (x as f64, y as f64))
            .collect();
        let drawn = scatter(&mut plot, &nodes, &MarkerStyle::node());
        debug!(drawn, "Drew mesh nodes");
    }

    let (overlays, labeled) = draw_overlays(&mut plot, request);

    figure.place_plot(&plot);
    let labels = figure.label_markers(&plot, &labeled, MarkerStyle::station().size * 0.6);
    debug!(labels, "Queued station labels");
    figure.place_colorbar(&plot)?;
    let image = figure.finish(painter)?;
    write_output(&request.output, &encode_png(&image)?)?;

    Ok(RunReport {
        points_loaded,
        points_rendered: field.len(),
        limits,
        triangles: plot.triangles(),
        overlays,
        output: request.output.clone(),
    })
}

/// Draw every overlay file. Returns one outcome per file plus the labeled
/// markers that were read.
fn draw_overlays(plot: &mut RenderedPlot, request: &PlotRequest) -> (Vec<OverlayOutcome>, Vec<Marker>) {
    let layers = [
        (&request.stations, OverlayFormat::Stations, MarkerStyle::station()),
        (&request.source_markers, OverlayFormat::TwoColumn, MarkerStyle::source()),
    ];

    let mut outcomes = Vec::new();
    let mut labeled = Vec::new();
    for (path, format, style) in layers {
        let Some(path) = path else {
            continue;
        };
        let outcome = match OverlaySet::read(path, format) {
            Ok(set) => {
                let drawn = scatter(plot, &set.points(), &style);
                if drawn < set.len() {
                    debug!(
                        overlay = %set.name,
                        skipped = set.len() - drawn,
                        "Markers outside the field were skipped"
                    );
                }
                let markers = set.len();
                labeled.extend(set.markers.into_iter().filter(|m| m.label.is_some()));
                OverlayOutcome::Drawn {
                    path: path.clone(),
                    markers,
                    drawn,
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Overlay skipped");
                OverlayOutcome::Failed {
                    path: path.clone(),
                    error: e.to_string(),
                }
            }
        };
        outcomes.push(outcome);
    }
    (outcomes, labeled)
}

fn write_output(path: &Path, png: &[u8]) -> FieldResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, png).map_err(|e| {
        FieldError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot write {}: {}", path.display(), e),
        ))
    })?;
    info!(path = %path.display(), bytes = png.len(), "Wrote PNG");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lists() {
        let sources = FieldSources::parse("a_x.bin,b_x.bin", "a_z.bin, b_z.bin", "a.bin,b.bin").unwrap();
        assert_eq!(sources.y, vec![PathBuf::from("a_z.bin"), PathBuf::from("b_z.bin")]);
    }

    #[test]
    fn test_list_length_mismatch() {
        assert!(FieldSources::parse("a,b", "a,b", "a").is_err());
        assert!(FieldSources::parse("a,,b", "a,b,c", "a,b,c").is_err());
    }
}
