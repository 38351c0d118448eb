//! Aggregating `icons.h` emission.

use std::io;
use std::path::{Component, Path, PathBuf};

/// File name of the index header under the output root.
pub const INDEX_FILE: &str = "icons.h";

/// Render the index header including every unit, in the given order.
///
/// Unit paths are expressed relative to `output_root` with `/` separators so
/// the directive is the same on every host.
pub fn render_index(output_root: &Path, units: &[PathBuf]) -> String {
    let mut out = String::from("#pragma once\n\n// Auto-generated index of all icons\n\n");
    for unit in units {
        out.push_str(&format!("#include \"{}\"\n", include_path(output_root, unit)));
    }
    out
}

/// Render and write `<output_root>/icons.h`, returning its path.
pub fn write_index(output_root: &Path, units: &[PathBuf]) -> io::Result<PathBuf> {
    let path = output_root.join(INDEX_FILE);
    super::write_file(&path, &render_index(output_root, units))?;
    Ok(path)
}

/// Path of `unit` relative to `root`, joined with `/`.
///
/// Units outside `root` keep their full path.
fn include_path(root: &Path, unit: &Path) -> String {
    let rel = unit.strip_prefix(root).unwrap_or(unit);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
