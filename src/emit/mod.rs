//! Header generation.
//!
//! # Modules
//!
//! - [`header`]: one `.h` per icon with the packed array and accessor
//! - [`index`]: `icons.h` including every generated header

pub mod header;
pub mod index;

use std::fs;
use std::io;
use std::path::Path;

pub use header::HeaderUnit;
pub use index::write_index;

/// Write `content` to `path`, creating parent directories as needed.
///
/// Existing files are overwritten.
fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
