//! Intensity grid — the single-channel raster a widget is generated from.
//!
//! Decoding is delegated entirely to the [`image`] crate; everything here
//! operates on an 8-bit grayscale buffer.  Rendering a grid through a ramp
//! is a pure function of its inputs: identical grid, ramp, and substitution
//! always reproduce byte-identical lines.

use std::path::Path;

use image::imageops::FilterType;
use image::GrayImage;

use super::ramp::{Ramp, Substitution};

/// A 2-D grid of intensities in `[0, 255]`, origin top-left, row-major.
#[derive(Debug, Clone)]
pub struct IntensityGrid {
    pixels: GrayImage,
}

impl IntensityGrid {
    /// Decode an image file and collapse it to single-channel intensity.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let pixels = image::open(path)?.to_luma8();
        tracing::debug!(
            path = %path.display(),
            width = pixels.width(),
            height = pixels.height(),
            "decoded image"
        );
        Ok(Self { pixels })
    }

    /// Wrap a raw row-major intensity buffer.  `None` when the buffer does
    /// not match the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        GrayImage::from_raw(width, height, data).map(|pixels| Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Resample by independent horizontal/vertical factors.  The defaults
    /// (58/80 and 33/92) compensate for the tall aspect of monospace cells;
    /// they come from [`crate::config::AppConfig`], not from here.
    pub fn scale(&self, fx: f64, fy: f64) -> Self {
        let width = scaled_dim(self.pixels.width(), fx);
        let height = scaled_dim(self.pixels.height(), fy);
        self.resize_to(width, height)
    }

    /// Resample to absolute dimensions (bilinear).
    pub fn resize_to(&self, width: u32, height: u32) -> Self {
        let pixels = image::imageops::resize(
            &self.pixels,
            width.max(1),
            height.max(1),
            FilterType::Triangle,
        );
        Self { pixels }
    }

    /// Map every pixel through the ramp, producing one string per row.
    /// Row boundaries are the only line structure — no terminators.
    pub fn render(&self, ramp: &Ramp, substitution: Option<&Substitution>) -> Vec<String> {
        let effective = match substitution {
            Some(sub) => ramp.substitute(sub),
            None => ramp.clone(),
        };
        self.pixels
            .rows()
            .map(|row| row.map(|p| effective.char_for(p.0[0])).collect())
            .collect()
    }
}

/// Round a scaled dimension, never collapsing below one pixel.
fn scaled_dim(dim: u32, factor: f64) -> u32 {
    ((f64::from(dim) * factor).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ramp::DEFAULT_RAMP;

    fn checkerboard() -> IntensityGrid {
        IntensityGrid::from_raw(2, 2, vec![0, 255, 255, 0]).unwrap()
    }

    #[test]
    fn render_maps_rows_in_order() {
        let ramp = Ramp::new("ab").unwrap();
        assert_eq!(checkerboard().render(&ramp, None), vec!["ab", "ba"]);
    }

    #[test]
    fn render_is_deterministic() {
        let grid = IntensityGrid::from_raw(3, 2, vec![0, 60, 120, 180, 240, 255]).unwrap();
        let ramp = Ramp::new(DEFAULT_RAMP).unwrap();
        let sub = Substitution::new(&["}"], "#").unwrap();
        assert_eq!(grid.render(&ramp, Some(&sub)), grid.render(&ramp, Some(&sub)));
    }

    #[test]
    fn substitution_applies_to_the_ramp_not_the_grid() {
        let ramp = Ramp::new("ab").unwrap();
        let sub = Substitution::new(&["a"], "b").unwrap();
        // Both brightness levels now land on 'b'; the grid keeps its shape.
        assert_eq!(checkerboard().render(&ramp, Some(&sub)), vec!["bb", "bb"]);
    }

    #[test]
    fn resize_to_changes_dimensions() {
        let grid = checkerboard().resize_to(4, 6);
        assert_eq!((grid.width(), grid.height()), (4, 6));
    }

    #[test]
    fn scale_rounds_and_never_collapses_to_zero() {
        let grid = IntensityGrid::from_raw(10, 10, vec![128; 100]).unwrap();
        let scaled = grid.scale(0.725, 0.05);
        assert_eq!((scaled.width(), scaled.height()), (7, 1));
    }

    #[test]
    fn from_raw_rejects_mismatched_buffers() {
        assert!(IntensityGrid::from_raw(3, 3, vec![0; 4]).is_none());
    }
}
