//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use field_common::FieldResult;
use record_codec::{Endian, Framing, Precision, RecordLayout};
use renderer::calibrate::CalibrationOptions;
use renderer::colorbar::ColorbarOrientation;
use renderer::figure::FigureOptions;
use renderer::plot::RenderMode;

use crate::config::ViewerConfig;
use crate::display::DisplayBackend;
use crate::pipeline::{ColormapSource, FieldSources, PlotRequest};

/// Plot a scalar field sampled at GLL nodes
#[derive(Parser, Debug, Clone)]
#[command(name = "field-viewer")]
#[command(about = "Render a scalar field stored in sequential binary record files")]
pub struct Args {
    /// X coordinate file(s), comma-separated
    pub xcoords: String,

    /// Y (depth) coordinate file(s), comma-separated
    pub ycoords: String,

    /// Value file(s), comma-separated
    pub file: String,

    /// Built-in colormap name (append `_r` to reverse), or a style name
    /// when --style-file is given
    #[arg(long, env = "GLL_PLOT_CMAP")]
    pub cmap: Option<String>,

    /// JSON style file with custom color stops
    #[arg(long)]
    pub style_file: Option<PathBuf>,

    /// Lower color limit (requires --cmax)
    #[arg(long, allow_negative_numbers = true)]
    pub cmin: Option<f32>,

    /// Upper color limit (requires --cmin)
    #[arg(long, allow_negative_numbers = true)]
    pub cmax: Option<f32>,

    /// Make the color limits symmetric about zero
    #[arg(long)]
    pub symmetric: bool,

    /// Divide the half-range of the color limits by this factor
    #[arg(long, allow_negative_numbers = true)]
    pub saturation: Option<f32>,

    /// Keep every n-th sample
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub decimate: i64,

    /// Flat-colored triangles instead of filled contours
    #[arg(long)]
    pub flat: bool,

    /// Draw the mesh nodes over the field
    #[arg(long)]
    pub points: bool,

    /// Show a color bar
    #[arg(long)]
    pub colorbar: bool,

    /// Color bar orientation
    #[arg(long, requires = "colorbar")]
    pub colorbar_orientation: Option<ColorbarOrientation>,

    /// Figure title
    #[arg(long)]
    pub title: Option<String>,

    /// Station file (name network x z ...)
    #[arg(long)]
    pub stations: Option<PathBuf>,

    /// Source file (x z)
    #[arg(long)]
    pub sources: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, env = "GLL_PLOT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Figure width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Figure height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of contour bands
    #[arg(long)]
    pub levels: Option<usize>,

    /// Record framing of the input files
    #[arg(long, value_enum, default_value_t = FramingArg::Sequential)]
    pub framing: FramingArg,

    /// Sample precision of the input files
    #[arg(long, value_enum, default_value_t = PrecisionArg::Single)]
    pub precision: PrecisionArg,

    /// Input files are big-endian
    #[arg(long)]
    pub big_endian: bool,

    /// Display backend (file or viewer)
    #[arg(long)]
    pub backend: Option<DisplayBackend>,

    /// YAML configuration file
    #[arg(long, env = "GLL_PLOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// TrueType font for titles and labels
    #[arg(long, env = "GLL_PLOT_FONT")]
    pub font: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Log as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FramingArg {
    Sequential,
    Raw,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrecisionArg {
    Single,
    Double,
}

impl Args {
    pub fn record_layout(&self) -> RecordLayout {
        let framing = match self.framing {
            FramingArg::Sequential => Framing::Sequential,
            FramingArg::Raw => Framing::Raw,
            FramingArg::Auto => Framing::Auto,
        };
        let precision = match self.precision {
            PrecisionArg::Single => Precision::Single,
            PrecisionArg::Double => Precision::Double,
        };
        let endian = if self.big_endian { Endian::Big } else { Endian::Little };
        RecordLayout::new(precision, endian, framing)
    }

    /// Merge with the config file and validate. No data file is opened.
    pub fn into_request(self, config: &ViewerConfig) -> FieldResult<PlotRequest> {
        let layout = self.record_layout();
        let sources = FieldSources::parse(&self.xcoords, &self.ycoords, &self.file)?;

        let colormap = match self.style_file {
            Some(path) => ColormapSource::StyleFile {
                path,
                style: self.cmap,
            },
            None => ColormapSource::Builtin(
                self.cmap.unwrap_or_else(|| config.figure.colormap.clone()),
            ),
        };

        let colorbar = self
            .colorbar
            .then(|| self.colorbar_orientation.unwrap_or_default());

        let request = PlotRequest {
            sources,
            layout,
            decimate: self.decimate,
            calibration: CalibrationOptions {
                explicit_min: self.cmin,
                explicit_max: self.cmax,
                symmetric: self.symmetric,
                saturation: self.saturation,
            },
            mode: if self.flat {
                RenderMode::FlatTripatch
            } else {
                RenderMode::FilledContour
            },
            colormap,
            levels: self.levels.unwrap_or(config.figure.levels),
            show_points: self.points,
            figure: FigureOptions {
                width: self.width.unwrap_or(config.figure.width),
                height: self.height.unwrap_or(config.figure.height),
                title: self.title,
                colorbar,
                font_size: config.figure.font_size,
                ..FigureOptions::default()
            },
            stations: self.stations,
            source_markers: self.sources,
            output: self.output.unwrap_or_else(|| config.output.clone()),
            font_path: self.font.or_else(|| config.figure.font_path.clone()),
        };
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_common::FieldError;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["field-viewer", "x.bin", "z.bin", "vp.bin"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn param_of(err: FieldError) -> String {
        match err {
            FieldError::InvalidArgument { param, .. } => param,
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let request = parse(&[]).into_request(&ViewerConfig::default()).unwrap();
        assert_eq!(request.mode, RenderMode::FilledContour);
        assert_eq!(request.decimate, 1);
        assert_eq!(request.colormap, ColormapSource::Builtin("viridis".to_string()));
        assert_eq!(request.layout, RecordLayout::default());
        assert_eq!(request.figure.colorbar, None);
        assert_eq!(request.output, PathBuf::from("field.png"));
    }

    #[test]
    fn test_negative_limits_parse() {
        let request = parse(&["--cmin", "-2.5", "--cmax", "2.5", "--flat"])
            .into_request(&ViewerConfig::default())
            .unwrap();
        assert_eq!(request.calibration.explicit_min, Some(-2.5));
        assert_eq!(request.mode, RenderMode::FlatTripatch);
    }

    #[test]
    fn test_invalid_combinations() {
        let config = ViewerConfig::default();
        let err = parse(&["--cmin", "3", "--cmax", "1"]).into_request(&config).unwrap_err();
        assert_eq!(param_of(err), "cmin/cmax");

        let err = parse(&["--decimate", "0"]).into_request(&config).unwrap_err();
        assert_eq!(param_of(err), "decimate");

        let err = parse(&["--saturation", "0"]).into_request(&config).unwrap_err();
        assert_eq!(param_of(err), "saturation");

        let err = parse(&["--cmap", "nope"]).into_request(&config).unwrap_err();
        assert_eq!(param_of(err), "cmap");
    }

    #[test]
    fn test_orientation_requires_colorbar() {
        assert!(Args::try_parse_from([
            "field-viewer",
            "x",
            "z",
            "v",
            "--colorbar-orientation",
            "horizontal"
        ])
        .is_err());

        let request = parse(&["--colorbar", "--colorbar-orientation", "horizontal"])
            .into_request(&ViewerConfig::default())
            .unwrap();
        assert_eq!(request.figure.colorbar, Some(ColorbarOrientation::Horizontal));
    }

    #[test]
    fn test_layout_flags() {
        let args = parse(&["--framing", "raw", "--precision", "double", "--big-endian"]);
        assert_eq!(
            args.record_layout(),
            RecordLayout::new(Precision::Double, Endian::Big, Framing::Raw)
        );
    }

    #[test]
    fn test_style_file_uses_cmap_as_style_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styles.json");
        std::fs::write(
            &path,
            r##"{"version": "1.0", "styles": {"velocity": {"name": "velocity", "stops": [
                {"value": 0.0, "color": "#000000"}, {"value": 1.0, "color": "#ffffff"}]}}}"##,
        )
        .unwrap();
        let style_file = path.display().to_string();

        let request = parse(&["--style-file", style_file.as_str(), "--cmap", "velocity"])
            .into_request(&ViewerConfig::default())
            .unwrap();
        assert_eq!(
            request.colormap,
            ColormapSource::StyleFile {
                path: path.clone(),
                style: Some("velocity".to_string())
            }
        );

        let err = parse(&["--style-file", style_file.as_str(), "--cmap", "nope"])
            .into_request(&ViewerConfig::default())
            .unwrap_err();
        assert_eq!(param_of(err), "style");
    }
}
