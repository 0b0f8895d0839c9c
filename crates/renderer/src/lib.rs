//! Rendering of scalar fields sampled at scattered points.
//!
//! The pipeline pieces live in separate modules:
//! - [`decimate`]: index subsampling of the raw samples
//! - [`calibrate`]: color limits (override, symmetric, saturation)
//! - [`triangulation`]: Delaunay triangulation of the sample locations
//! - [`plot`]: filled-contour or flat-tripatch rendering into a panel
//! - [`overlay`]: station/source/node markers on top of a plot
//! - [`figure`]: axes, color bar, title and PNG output

pub mod calibrate;
pub mod colorbar;
pub mod colormap;
pub mod decimate;
pub mod figure;
pub mod overlay;
pub mod plot;
pub mod png;
pub mod style;
pub mod text;
pub mod ticks;
pub mod triangulation;
pub mod tricontour;
pub mod tripatch;
pub mod viewport;

pub use calibrate::{calibrate, calibrate_with, CalibrationOptions, ColorLimits};
pub use colorbar::ColorbarOrientation;
pub use colormap::{Color, Colormap};
pub use decimate::{decimate, decimate_field};
pub use figure::{encode_png, Figure, FigureOptions};
pub use overlay::{scatter, MarkerStyle, OverlayFormat, OverlaySet};
pub use plot::{render, render_field, render_with, Mappable, RenderMode, RenderOptions, RenderedPlot};
pub use style::StyleConfig;
pub use text::TextPainter;
pub use triangulation::{triangulate, Triangulation};
