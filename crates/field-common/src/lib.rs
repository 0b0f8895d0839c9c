//! Common types shared by the gll-plot crates.

pub mod bbox;
pub mod error;
pub mod field;

pub use bbox::BoundingBox;
pub use error::{FieldError, FieldResult};
pub use field::SampledField;
