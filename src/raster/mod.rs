//! Pixel rasters with binary foreground/background classification.
//!
//! # Modules
//!
//! - [`svg`]: SVG rendering via usvg + resvg
//!
//! The rasterizer is a seam: anything implementing [`Rasterize`] can feed the
//! packer, which keeps the batch driver testable without real SVG files.

mod svg;

use std::io;
use std::path::{Path, PathBuf};

use image::GrayImage;
use thiserror::Error;

pub use svg::SvgRasterizer;

/// Luma value treated as background. Every darker pixel is ink.
pub const BACKGROUND_LUMA: u8 = u8::MAX;

/// Errors raised while turning a source file into a raster
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("failed to parse SVG")]
    Parse(#[from] usvg::Error),

    #[error("cannot render a {width}x{height} canvas")]
    EmptyCanvas { width: u32, height: u32 },
}

/// Capability that turns a vector image file into a [`PixelRaster`].
pub trait Rasterize {
    fn render(&self, path: &Path) -> Result<PixelRaster, RenderError>;
}

/// Row-major grid of pixels, `true` meaning foreground (ink).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRaster {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl PixelRaster {
    /// Create an all-background raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width as usize * height as usize],
        }
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Threshold a grayscale image: anything but the lightest value is ink.
    ///
    /// This is a hard cutoff, not dithering, so anti-aliased edges count as ink.
    pub fn from_luma(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self::from_fn(width, height, |x, y| {
            image.get_pixel(x, y).0[0] != BACKGROUND_LUMA
        })
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Foreground state at `(x, y)`, `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<bool> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, foreground: bool) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = foreground;
        }
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = bool> + '_ {
        self.pixels.iter().copied()
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[bool]> {
        // chunks() panics on zero, and a zero-width raster has no pixels anyway
        self.pixels.chunks(self.width.max(1) as usize)
    }

    /// Same raster with row order reversed (top row becomes bottom row).
    pub fn flipped_vertically(&self) -> Self {
        let pixels = self.rows().rev().flatten().copied().collect();
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }
}
