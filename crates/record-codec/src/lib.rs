//! Sequential-record binary codec.
//!
//! Reads and writes the "unformatted sequential" layout produced by Fortran
//! solvers: each record is a byte-count marker, the payload, and the same
//! marker repeated. A file holds one or more records; decoding concatenates
//! the samples of every record into one flat array.
//!
//! ```text
//! +---------+----------------------------+---------+
//! | u32 len | len bytes of f32/f64 data  | u32 len |   (repeated)
//! +---------+----------------------------+---------+
//! ```
//!
//! Headerless streams of samples are supported through [`Framing::Raw`], and
//! [`Framing::Auto`] picks between the two by checking whether the markers
//! frame the file consistently.

pub mod error;
pub mod layout;
pub mod records;

use std::fs;
use std::path::Path;

use tracing::debug;

pub use error::{CodecError, CodecResult};
pub use layout::{Endian, Framing, Precision, RecordLayout};
pub use records::{decode_bytes, encode_bytes, frames_cleanly};

/// Decode every sample stored in `path`.
///
/// The file is read fully and closed before decoding starts.
pub fn decode<P: AsRef<Path>>(path: P, layout: &RecordLayout) -> CodecResult<Vec<f32>> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    debug!(path = %path.display(), bytes = data.len(), "Read record file");

    let samples = decode_bytes(data, layout)?;
    debug!(path = %path.display(), samples = samples.len(), "Decoded record file");
    Ok(samples)
}

/// Write `values` to `path` as a single record (or a raw stream).
pub fn encode<P: AsRef<Path>>(path: P, values: &[f32], layout: &RecordLayout) -> CodecResult<()> {
    let bytes = encode_bytes(values, layout)?;
    fs::write(path, bytes)?;
    Ok(())
}
