//! Per-icon header emission.
//!
//! Generated shape (for `wifi-low.svg`, 24x24):
//!
//! ```text
//! #pragma once
//! #include <EPDIcon.h>
//! // Auto-generated from wifi-low.svg
//! inline EPD::Icon &wifi_low_icon() {
//!     static const unsigned char PROGMEM bitmap[] = {
//!         0xFF, 0xFF, ...
//!     };
//!     static const auto icon = new EPD::Icon({24, 24}, bitmap);
//!     return *icon;
//! }
//!
//! //#define wifi_low_icon wifi_low_icon()
//! ```
//!
//! `EPD::Icon` and `EPDIcon.h` belong to the firmware; the header only has
//! to match their constructor `Icon({width, height}, const unsigned char *)`.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use crate::bitmap::PackedBitmap;
use crate::symbol::Symbol;

/// Byte literals per array line.
pub const GROUP_WIDTH: usize = 12;

/// Indentation of array rows inside the accessor.
const ROW_INDENT: &str = "        ";

/// Header declaring the icon container type.
const ICON_INCLUDE: &str = "EPDIcon.h";

/// Fully qualified icon container type.
const ICON_TYPE: &str = "EPD::Icon";

/// A rendered per-icon header, not yet on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderUnit {
    pub path: PathBuf,
    pub content: String,
}

impl HeaderUnit {
    pub fn new(
        path: impl Into<PathBuf>,
        symbol: &Symbol,
        bitmap: &PackedBitmap,
        source_name: &str,
    ) -> Self {
        Self {
            path: path.into(),
            content: render_header(symbol, bitmap, source_name),
        }
    }

    /// Write to disk, creating parent directories and replacing any previous file.
    pub fn write(&self) -> io::Result<()> {
        super::write_file(&self.path, &self.content)
    }
}

/// Render the header text for one icon.
pub fn render_header(symbol: &Symbol, bitmap: &PackedBitmap, source_name: &str) -> String {
    let accessor = symbol.accessor();
    let mut out = String::with_capacity(256 + bitmap.len() * 6);

    // Infallible: writing into a String
    let _ = write!(
        out,
        "#pragma once\n\
         #include <{ICON_INCLUDE}>\n\
         // Auto-generated from {source_name}\n\
         inline {ICON_TYPE} &{accessor}() {{\n    \
         static const unsigned char PROGMEM bitmap[] = {{\n{ROW_INDENT}"
    );
    out.push_str(&hex_rows(&bitmap.bytes));
    let _ = write!(
        out,
        "\n    }};\n    \
         static const auto icon = new {ICON_TYPE}({{{}, {}}}, bitmap);\n    \
         return *icon;\n\
         }}\n\
         \n\
         //#define {accessor} {accessor}()\n",
        bitmap.width, bitmap.height
    );

    out
}

/// Render and write one header.
pub fn write_header(
    output_path: &Path,
    symbol: &Symbol,
    bitmap: &PackedBitmap,
    source_name: &str,
) -> io::Result<()> {
    HeaderUnit::new(output_path, symbol, bitmap, source_name).write()
}

/// `0xAB, 0xCD, ...` rows of [`GROUP_WIDTH`], joined with a comma and newline.
fn hex_rows(bytes: &[u8]) -> String {
    bytes
        .chunks(GROUP_WIDTH)
        .map(|row| {
            row.iter()
                .map(|b| format!("0x{b:02X}"))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join(&format!(",\n{ROW_INDENT}"))
}
