//! 1-bit-per-pixel packing.
//!
//! The packed layout is what the firmware reads back with nothing but the
//! icon's width and height, so it must stay exactly as described here:
//!
//! - pixels are visited row-major, left to right, top to bottom
//! - the earliest pixel of each byte lands in the most significant bit
//! - ink is a cleared bit, background a set bit
//! - rows are NOT padded: a row continues in the byte the previous row started
//! - a trailing partial byte is left-justified, zero bits fill the low end
//!
//! ```text
//! 3x3 raster        bit stream         bytes
//! # . #             0 1 0              0b0101_0101  0b0000_0000
//! . # .     ──►     1 0 1      ──►        0x55         0x00
//! # . #             0 1 0                             (1 bit + 7 pad)
//! ```

use crate::raster::PixelRaster;

/// Where a new row starts in the byte stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowLayout {
    /// One continuous stream: `len == ceil(width * height / 8)`.
    #[default]
    Continuous,
    /// Every row starts on a fresh byte: `len == ceil(width / 8) * height`.
    ///
    /// Never selected by the generator; only reachable through [`pack_with`].
    RowPadded,
}

/// Layout used by the generator.
pub const PACK_LAYOUT: RowLayout = RowLayout::Continuous;

/// Packed 1-bpp image data plus the dimensions needed to decode it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PackedBitmap {
    /// Byte count of a continuously packed `width` x `height` raster.
    pub const fn expected_len(width: u32, height: u32) -> usize {
        (width as usize * height as usize).div_ceil(8)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Pack a raster using [`PACK_LAYOUT`].
pub fn pack(raster: &PixelRaster) -> PackedBitmap {
    pack_with(raster, PACK_LAYOUT)
}

/// Pack a raster with an explicit row layout.
pub fn pack_with(raster: &PixelRaster, layout: RowLayout) -> PackedBitmap {
    let mut packer = BitPacker::with_capacity(PackedBitmap::expected_len(
        raster.width(),
        raster.height(),
    ));

    for row in raster.rows() {
        for &foreground in row {
            packer.push(!foreground);
        }
        if layout == RowLayout::RowPadded {
            packer.flush();
        }
    }

    PackedBitmap {
        bytes: packer.finish(),
        width: raster.width(),
        height: raster.height(),
    }
}

/// MSB-first bit accumulator
#[derive(Debug, Default)]
struct BitPacker {
    bytes: Vec<u8>,
    current: u8,
    filled: u8,
}

impl BitPacker {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    #[inline]
    fn push(&mut self, bit: bool) {
        self.current = (self.current << 1) | u8::from(bit);
        self.filled += 1;
        if self.filled == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.filled = 0;
        }
    }

    /// Emit a partial byte left-justified. No-op on a byte boundary.
    fn flush(&mut self) {
        if self.filled > 0 {
            self.bytes.push(self.current << (8 - self.filled));
            self.current = 0;
            self.filled = 0;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.bytes
    }
}
