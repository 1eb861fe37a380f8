use std::path::Path;

use image::{GrayImage, ImageError, Luma, RgbImage};

use crate::error::{BatchError, Result};
use crate::report::{FileKind, FileReport};

// ---------------------------------------------------------------------------
// Luma transform
// ---------------------------------------------------------------------------

/// ITU-R BT.601 weights in 16.16 fixed point: 0.299, 0.587, 0.114.
/// They sum to exactly 1.0, so gray inputs map to themselves.
const WEIGHT_R: u32 = 19_595;
const WEIGHT_G: u32 = 38_470;
const WEIGHT_B: u32 = 7_471;

/// `L = 0.299 R + 0.587 G + 0.114 B`, rounded to nearest.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = WEIGHT_R * r as u32 + WEIGHT_G * g as u32 + WEIGHT_B * b as u32;
    ((sum + 0x8000) >> 16) as u8
}

/// Reduce an RGB image to a single luma channel.
pub fn rgb_to_gray(rgb: &RgbImage) -> GrayImage {
    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    for (src, dst) in rgb.pixels().zip(gray.pixels_mut()) {
        let [r, g, b] = src.0;
        *dst = Luma([luma(r, g, b)]);
    }
    gray
}

// ---------------------------------------------------------------------------
// File-level conversion
// ---------------------------------------------------------------------------

/// Decode an image file and convert it to 8-bit grayscale.
///
/// Alpha is discarded; deeper inputs are first reduced to 8-bit RGB.
pub fn convert_to_grayscale(path: &Path) -> Result<GrayImage> {
    let img = image::open(path).map_err(|e| match e {
        ImageError::IoError(io) => BatchError::filesystem(path, io),
        other => BatchError::Decode {
            path: path.to_path_buf(),
            source: other,
        },
    })?;
    Ok(rgb_to_gray(&img.to_rgb8()))
}

/// Convert one image and save it as `output_dir/<basename>`, in the format
/// implied by its extension.
pub fn process_image(path: &Path, output_dir: &Path) -> Result<FileReport> {
    let gray = convert_to_grayscale(path)?;
    let output_path = crate::output_path_for(path, output_dir)?;

    gray.save(&output_path).map_err(|e| match e {
        ImageError::IoError(io) => BatchError::filesystem(&output_path, io),
        other => BatchError::Encode {
            path: output_path.clone(),
            source: other,
        },
    })?;

    Ok(FileReport {
        kind: FileKind::Image,
        input: path.to_path_buf(),
        output: output_path,
        detail: format!("{}x{}", gray.width(), gray.height()),
    })
}
