//! Tests for PNG encoding.
//!
//! Covers palette extraction, indexed/RGBA selection and that the output
//! decodes back to the same pixels.

use renderer::png::{encode_auto, encode_indexed, encode_rgba, extract_palette};
use std::collections::HashSet;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

// ============================================================================
// Helper functions
// ============================================================================

/// IHDR color type byte (signature + length + tag + width + height + depth).
fn color_type(png: &[u8]) -> u8 {
    png[25]
}

/// Band-like pixels: `bands` vertical stripes of a seismic-style ramp.
fn banded_pixels(width: usize, height: usize, bands: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for _ in 0..height {
        for x in 0..width {
            let band = x * bands / width;
            let t = band as f32 / (bands - 1).max(1) as f32;
            let r = (255.0 * t) as u8;
            let b = (255.0 * (1.0 - t)) as u8;
            pixels.extend_from_slice(&[r, 255 - r.max(b), b, 255]);
        }
    }
    pixels
}

fn count_unique_colors(pixels: &[u8]) -> usize {
    pixels
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect::<HashSet<_>>()
        .len()
}

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

// ============================================================================
// Format selection
// ============================================================================

#[test]
fn test_few_colors_use_palette() {
    let pixels = banded_pixels(64, 8, 16);
    assert_eq!(count_unique_colors(&pixels), 16);

    let png = encode_auto(&pixels, 64, 8).unwrap();
    assert_eq!(&png[0..8], &SIGNATURE);
    assert_eq!(color_type(&png), 3);
}

#[test]
fn test_many_colors_fall_back_to_rgba() {
    let mut pixels = Vec::with_capacity(257 * 4);
    for i in 0..256 {
        let v = i as u8;
        pixels.extend_from_slice(&[v, v, v, 255]);
    }
    pixels.extend_from_slice(&[128, 0, 0, 255]);

    let png = encode_auto(&pixels, 257, 1).unwrap();
    assert_eq!(color_type(&png), 6);
}

#[test]
fn test_exactly_256_colors_still_indexed() {
    let pixels: Vec<u8> = (0..256).flat_map(|i| [i as u8, i as u8, i as u8, 255]).collect();
    let png = encode_auto(&pixels, 256, 1).unwrap();
    assert_eq!(color_type(&png), 3);
}

#[test]
fn test_indexed_is_smaller_for_banded_images() {
    let pixels = banded_pixels(256, 256, 64);
    let indexed = encode_auto(&pixels, 256, 256).unwrap();
    let rgba = encode_rgba(&pixels, 256, 256).unwrap();
    assert!(
        indexed.len() <= rgba.len(),
        "indexed {} bytes vs rgba {} bytes",
        indexed.len(),
        rgba.len()
    );
}

// ============================================================================
// Decoding back
// ============================================================================

#[test]
fn test_indexed_output_decodes_to_same_pixels() {
    let pixels = banded_pixels(40, 10, 5);
    let decoded = decode(&encode_auto(&pixels, 40, 10).unwrap());
    assert_eq!(decoded.dimensions(), (40, 10));
    assert_eq!(decoded.as_raw(), &pixels);
}

#[test]
fn test_rgba_output_decodes_to_same_pixels() {
    let pixels: Vec<u8> = (0..300u32)
        .flat_map(|i| [(i % 256) as u8, (i / 2) as u8, (i / 3) as u8, 255])
        .collect();
    let decoded = decode(&encode_rgba(&pixels, 30, 10).unwrap());
    assert_eq!(decoded.as_raw(), &pixels);
}

#[test]
fn test_transparency_survives_palette() {
    let pixels = [
        255, 0, 0, 255, // red, opaque
        0, 0, 0, 0, // transparent
        0, 255, 0, 128, // green, half
        0, 0, 255, 255, // blue, opaque
    ];
    let png = encode_auto(&pixels, 2, 2).unwrap();
    assert_eq!(color_type(&png), 3);
    assert!(png.windows(4).any(|w| w == b"tRNS"));
    assert_eq!(decode(&png).as_raw(), &pixels.to_vec());
}

#[test]
fn test_opaque_palette_has_no_trns() {
    let png = encode_auto(&[10, 20, 30, 255], 1, 1).unwrap();
    assert!(!png.windows(4).any(|w| w == b"tRNS"));
}

// ============================================================================
// Palette extraction and argument checks
// ============================================================================

#[test]
fn test_palette_in_first_seen_order() {
    let pixels = [9, 9, 9, 255, 1, 1, 1, 255, 9, 9, 9, 255];
    let (palette, indices) = extract_palette(&pixels).unwrap();
    assert_eq!(palette, vec![[9, 9, 9, 255], [1, 1, 1, 255]]);
    assert_eq!(indices, vec![0, 1, 0]);
}

#[test]
fn test_single_color_image_is_small() {
    let pixels = [128u8, 64, 32, 255].repeat(100 * 100);
    let png = encode_auto(&pixels, 100, 100).unwrap();
    assert!(png.len() < 1000, "got {} bytes", png.len());
}

#[test]
fn test_size_mismatch_rejected() {
    assert!(encode_auto(&[0; 12], 2, 2).is_err());
    assert!(encode_rgba(&[], 0, 0).is_err());
    assert!(encode_indexed(2, 1, &[], &[0, 0]).is_err());
}
