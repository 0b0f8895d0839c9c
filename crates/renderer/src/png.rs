//! PNG encoding for RGBA figures.
//!
//! Figures made of filled bands usually have few distinct colors, so the
//! encoder first tries an indexed image (color type 3) and falls back to
//! full RGBA (color type 6) when more than 256 colors are present.

use std::collections::HashMap;
use std::io::Write;

use field_common::{FieldError, FieldResult};

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Encode straight (non-premultiplied) RGBA pixels, choosing indexed output
/// when the image has at most 256 colors.
pub fn encode_auto(pixels: &[u8], width: usize, height: usize) -> FieldResult<Vec<u8>> {
    check_size(pixels.len(), width, height, 4)?;

    match extract_palette(pixels) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices),
        None => encode_rgba(pixels, width, height),
    }
}

/// Build a palette and per-pixel indices, or `None` past 256 colors.
pub fn extract_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut color_to_index: HashMap<[u8; 4], u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for chunk in pixels.chunks_exact(4) {
        let color = [chunk[0], chunk[1], chunk[2], chunk[3]];
        let index = match color_to_index.get(&color) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push(color);
                color_to_index.insert(color, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Indexed PNG (color type 3) from a palette and one index per pixel.
pub fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> FieldResult<Vec<u8>> {
    check_size(indices.len(), width, height, 1)?;
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(FieldError::invalid(
            "palette",
            format!("palette must hold 1..=256 colors, got {}", palette.len()),
        ));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, 3));

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_rows(indices, width, height, 1)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Full-color PNG (color type 6).
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> FieldResult<Vec<u8>> {
    check_size(pixels.len(), width, height, 4)?;

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, 6));
    write_chunk(&mut png, b"IDAT", &deflate_rows(pixels, width, height, 4)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn check_size(len: usize, width: usize, height: usize, bytes_per_pixel: usize) -> FieldResult<()> {
    if width == 0 || height == 0 {
        return Err(FieldError::invalid(
            "image",
            format!("image size must be non-zero, got {}x{}", width, height),
        ));
    }
    let expected = width * height * bytes_per_pixel;
    if len != expected {
        return Err(FieldError::invalid(
            "image",
            format!(
                "{}x{} image needs {} bytes, got {}",
                width, height, expected, len
            ),
        ));
    }
    Ok(())
}

fn header(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(color_type);
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    ihdr
}

/// Prefix every scanline with filter type 0 and zlib-compress.
fn deflate_rows(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> FieldResult<Vec<u8>> {
    let row_len = width * bytes_per_pixel;
    let mut raw = Vec::with_capacity(height * (row_len + 1));
    for row in data.chunks_exact(row_len) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&raw)?;
    Ok(encoder.finish()?)
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_extraction() {
        let pixels = [255, 0, 0, 255, 0, 255, 0, 255, 255, 0, 0, 255];
        let (palette, indices) = extract_palette(&pixels).unwrap();
        assert_eq!(palette, vec![[255, 0, 0, 255], [0, 255, 0, 255]]);
        assert_eq!(indices, vec![0, 1, 0]);
    }

    #[test]
    fn test_palette_overflow() {
        let pixels: Vec<u8> = (0..300u32).flat_map(|i| [i as u8, (i >> 8) as u8, 0, 255]).collect();
        assert!(extract_palette(&pixels).is_none());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        assert!(encode_rgba(&[0; 12], 2, 2).is_err());
        assert!(encode_auto(&[], 0, 0).is_err());
    }
}
