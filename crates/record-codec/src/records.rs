//! Record framing and sample conversion.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::error::{CodecError, CodecResult};
use crate::layout::{Endian, Framing, Precision, RecordLayout};

/// Size of a record marker in bytes (gfortran default).
const MARKER_SIZE: usize = 4;

/// Decode an in-memory record file into a flat sample array.
pub fn decode_bytes(data: impl Into<Bytes>, layout: &RecordLayout) -> CodecResult<Vec<f32>> {
    let data: Bytes = data.into();
    match layout.framing {
        Framing::Sequential => decode_sequential(data, layout),
        Framing::Raw => decode_raw(data, layout),
        Framing::Auto => {
            if frames_cleanly(&data, layout) {
                decode_sequential(data, layout)
            } else {
                debug!(bytes = data.len(), "Record markers do not frame the file, reading as raw stream");
                decode_raw(data, layout)
            }
        }
    }
}

/// Encode samples as a single record, or as a raw stream for [`Framing::Raw`].
pub fn encode_bytes(values: &[f32], layout: &RecordLayout) -> CodecResult<Vec<u8>> {
    let payload_len = values.len() * layout.precision.element_size();

    let mut buf = match layout.framing {
        Framing::Raw => BytesMut::with_capacity(payload_len),
        Framing::Sequential | Framing::Auto => {
            let marker =
                u32::try_from(payload_len).map_err(|_| CodecError::RecordTooLarge(payload_len))?;
            let mut buf = BytesMut::with_capacity(payload_len + 2 * MARKER_SIZE);
            put_marker(&mut buf, marker, layout.endian);
            buf
        }
    };

    for &value in values {
        put_sample(&mut buf, value, layout);
    }

    if layout.framing != Framing::Raw {
        put_marker(&mut buf, payload_len as u32, layout.endian);
    }

    Ok(buf.to_vec())
}

/// Check whether the record markers frame `data` exactly, with every
/// payload a whole number of samples.
pub fn frames_cleanly(data: &[u8], layout: &RecordLayout) -> bool {
    let element = layout.precision.element_size();
    let mut offset = 0;
    let mut records = 0;

    while offset < data.len() {
        let Some(leading) = read_marker_at(data, offset, layout.endian) else {
            return false;
        };
        let len = leading as usize;
        let trailer_at = offset + MARKER_SIZE + len;
        match read_marker_at(data, trailer_at, layout.endian) {
            Some(trailing) if trailing == leading && len % element == 0 => {}
            _ => return false,
        }
        offset = trailer_at + MARKER_SIZE;
        records += 1;
    }

    records > 0
}

fn decode_sequential(mut data: Bytes, layout: &RecordLayout) -> CodecResult<Vec<f32>> {
    let element = layout.precision.element_size();
    let mut samples = Vec::with_capacity(data.len() / element);
    let mut record = 0;

    while data.has_remaining() {
        if data.remaining() < MARKER_SIZE {
            return Err(CodecError::Truncated {
                record,
                reason: format!("{} trailing bytes cannot hold a record marker", data.remaining()),
            });
        }

        let leading = get_marker(&mut data, layout.endian);
        let len = leading as usize;
        if data.remaining() < len + MARKER_SIZE {
            return Err(CodecError::Truncated {
                record,
                reason: format!(
                    "marker announces {} bytes but only {} remain",
                    len,
                    data.remaining().saturating_sub(MARKER_SIZE)
                ),
            });
        }
        if len % element != 0 {
            return Err(CodecError::RecordSize {
                record,
                bytes: len,
                element,
            });
        }

        let mut payload = data.split_to(len);
        let trailing = get_marker(&mut data, layout.endian);
        if trailing != leading {
            return Err(CodecError::MarkerMismatch {
                record,
                leading,
                trailing,
            });
        }

        while payload.has_remaining() {
            samples.push(get_sample(&mut payload, layout));
        }
        record += 1;
    }

    debug!(records = record, samples = samples.len(), "Decoded sequential records");
    Ok(samples)
}

fn decode_raw(mut data: Bytes, layout: &RecordLayout) -> CodecResult<Vec<f32>> {
    let element = layout.precision.element_size();
    if data.len() % element != 0 {
        return Err(CodecError::StreamSize {
            bytes: data.len(),
            element,
        });
    }

    let mut samples = Vec::with_capacity(data.len() / element);
    while data.has_remaining() {
        samples.push(get_sample(&mut data, layout));
    }
    Ok(samples)
}

fn read_marker_at(data: &[u8], offset: usize, endian: Endian) -> Option<u32> {
    let bytes: [u8; MARKER_SIZE] = data.get(offset..offset + MARKER_SIZE)?.try_into().ok()?;
    Some(match endian {
        Endian::Little => u32::from_le_bytes(bytes),
        Endian::Big => u32::from_be_bytes(bytes),
    })
}

fn get_marker(buf: &mut Bytes, endian: Endian) -> u32 {
    match endian {
        Endian::Little => buf.get_u32_le(),
        Endian::Big => buf.get_u32(),
    }
}

fn put_marker(buf: &mut BytesMut, marker: u32, endian: Endian) {
    match endian {
        Endian::Little => buf.put_u32_le(marker),
        Endian::Big => buf.put_u32(marker),
    }
}

fn get_sample(buf: &mut Bytes, layout: &RecordLayout) -> f32 {
    match (layout.precision, layout.endian) {
        (Precision::Single, Endian::Little) => buf.get_f32_le(),
        (Precision::Single, Endian::Big) => buf.get_f32(),
        (Precision::Double, Endian::Little) => buf.get_f64_le() as f32,
        (Precision::Double, Endian::Big) => buf.get_f64() as f32,
    }
}

fn put_sample(buf: &mut BytesMut, value: f32, layout: &RecordLayout) {
    match (layout.precision, layout.endian) {
        (Precision::Single, Endian::Little) => buf.put_f32_le(value),
        (Precision::Single, Endian::Big) => buf.put_f32(value),
        (Precision::Double, Endian::Little) => buf.put_f64_le(value as f64),
        (Precision::Double, Endian::Big) => buf.put_f64(value as f64),
    }
}
