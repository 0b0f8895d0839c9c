//! Field viewer: renders a GLL scalar-field snapshot from sequential record
//! files into a PNG figure and optionally opens it in a viewer.

pub mod cli;
pub mod config;
pub mod display;
pub mod pipeline;

pub use cli::Args;
pub use config::ViewerConfig;
pub use display::{resolve_backend, DisplayBackend, ResolvedBackend};
pub use pipeline::{run, OverlayOutcome, PlotRequest, RunReport};
