//! SVG rendering using usvg + resvg.
//!
//! Every icon is rendered at the same fixed DPI onto an opaque white canvas,
//! so size differences between source files map directly to raster sizes.

use std::fs;
use std::path::Path;

use image::{DynamicImage, RgbaImage};
use resvg::tiny_skia::{Color, Pixmap, Transform};

use crate::debug;

use super::{PixelRaster, Rasterize, RenderError};

/// DPI used to resolve absolute units (`pt`, `in`, `mm`). One user unit is one pixel.
pub const RENDER_DPI: f32 = 72.0;

/// Production rasterizer backed by resvg
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRasterizer;

impl SvgRasterizer {
    /// Render raw SVG bytes into a bilevel raster.
    pub fn render_data(&self, data: &[u8]) -> Result<PixelRaster, RenderError> {
        let options = usvg::Options {
            dpi: RENDER_DPI,
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(data, &options)?;

        // Fractional sizes round up so partial edge pixels are kept
        let size = tree.size().to_int_size();
        let (width, height) = (size.width(), size.height());

        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::EmptyCanvas { width, height })?;
        pixmap.fill(Color::WHITE);
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
        debug!("raster"; "rendered {}x{} canvas", width, height);

        // Opaque background, so premultiplied RGBA equals straight RGBA here
        let rgba = RgbaImage::from_raw(width, height, pixmap.take())
            .ok_or(RenderError::EmptyCanvas { width, height })?;
        let luma = DynamicImage::ImageRgba8(rgba).to_luma8();

        Ok(PixelRaster::from_luma(&luma))
    }
}

impl Rasterize for SvgRasterizer {
    fn render(&self, path: &Path) -> Result<PixelRaster, RenderError> {
        let data = fs::read(path).map_err(|err| RenderError::Io(path.to_path_buf(), err))?;
        self.render_data(&data)
    }
}
