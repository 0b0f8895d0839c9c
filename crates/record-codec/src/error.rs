//! Codec error types.

use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while decoding or encoding record files.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record {record} truncated: {reason}")]
    Truncated { record: usize, reason: String },

    #[error("Record {record} markers disagree: leading {leading} bytes, trailing {trailing} bytes")]
    MarkerMismatch {
        record: usize,
        leading: u32,
        trailing: u32,
    },

    #[error("Record {record} holds {bytes} bytes, not a multiple of the {element}-byte sample size")]
    RecordSize {
        record: usize,
        bytes: usize,
        element: usize,
    },

    #[error("Raw stream of {bytes} bytes is not a multiple of the {element}-byte sample size")]
    StreamSize { bytes: usize, element: usize },

    #[error("Payload of {0} bytes does not fit in a 4-byte record marker")]
    RecordTooLarge(usize),
}
