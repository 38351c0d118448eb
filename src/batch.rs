//! Batch conversion of an icon tree.
//!
//! ```text
//! icons/                        include/icons/
//! ├── ok.svg           ──►      ├── ok.h
//! ├── bad.svg          ──►      │   (render failed, logged, skipped)
//! └── sub/                      ├── sub/
//!     └── menu-bar.svg ──►      │   └── menu-bar.h
//!                               └── icons.h   (#include "ok.h", "sub/menu-bar.h")
//! ```
//!
//! A missing source directory aborts before anything is written. Failures on
//! individual files are logged and excluded; the rest of the batch continues.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::{Parallelism, WalkDir};
use thiserror::Error;

use crate::{
    bitmap, debug,
    config::IconsConfig,
    emit::{self, HeaderUnit},
    log,
    raster::{Rasterize, RenderError, SvgRasterizer},
    symbol::Symbol,
    utils::plural_count,
};

/// Extension of files picked up by the scan.
const SOURCE_EXTENSION: &str = "svg";

/// Extension of generated headers.
const HEADER_EXTENSION: &str = "h";

/// Reasons a single icon was skipped
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to write `{0}`")]
    Write(PathBuf, #[source] io::Error),

    #[error("symbol `{symbol}` is already generated from `{}`", .first.display())]
    SymbolCollision { symbol: Symbol, first: PathBuf },
}

/// An SVG file found under the scan root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub path: PathBuf,
    /// Path relative to the scan root.
    pub relative: PathBuf,
}

impl SourceImage {
    fn new(path: PathBuf, root: &Path) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        Self { path, relative }
    }

    /// Header path mirroring the source layout under `output_root`.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        output_root.join(self.relative.with_extension(HEADER_EXTENSION))
    }

    pub fn symbol(&self) -> Symbol {
        Symbol::from_relative_path(&self.relative)
    }

    /// Bare file name, used in the provenance comment.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Outcome of one batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Generated headers, in discovery order.
    pub converted: Vec<PathBuf>,
    /// Sources that were skipped and why. The error wraps a [`ConvertError`].
    pub failed: Vec<(PathBuf, anyhow::Error)>,
    /// Path of `icons.h`, if it was written.
    pub index: Option<PathBuf>,
    /// The source directory did not exist; nothing was written.
    pub source_missing: bool,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.converted.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Convert every icon under the configured source directory.
pub fn run(config: &IconsConfig) -> Result<BatchReport> {
    run_with(&SvgRasterizer, &config.svg_dir, &config.output_dir)
}

/// Convert every icon under `svg_dir` using `rasterizer`.
///
/// Only a missing source directory, an uncreatable output directory or an
/// unwritable index stop the run; per-file failures end up in the report.
pub fn run_with<R: Rasterize>(
    rasterizer: &R,
    svg_dir: &Path,
    output_dir: &Path,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    if !svg_dir.is_dir() {
        log!("error"; "source directory {} does not exist", svg_dir.display());
        report.source_missing = true;
        return Ok(report);
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let sources = discover_sources(svg_dir);
    debug!("scan"; "found {} in {}", plural_count(sources.len(), "svg file"), svg_dir.display());

    // symbol -> source that first claimed it
    let mut symbols: HashMap<Symbol, PathBuf> = HashMap::new();

    for source in &sources {
        match convert_one(rasterizer, source, output_dir, &symbols) {
            Ok((symbol, output)) => {
                log!("convert"; "{} -> {}", source.path.display(), output.display());
                symbols.insert(symbol, source.path.clone());
                report.converted.push(output);
            }
            Err(err) => {
                let err = anyhow::Error::from(err);
                log!("error"; "processing {}: {:#}", source.path.display(), err);
                report.failed.push((source.path.clone(), err));
            }
        }
    }

    if !report.converted.is_empty() {
        let index = emit::write_index(output_dir, &report.converted)
            .with_context(|| format!("failed to write index in {}", output_dir.display()))?;
        log!("index"; "generated {}", index.display());
        report.index = Some(index);
    }

    log!("done"; "processed {}", plural_count(report.succeeded(), "icon"));
    if report.has_failures() {
        log!("error"; "{} skipped", plural_count(report.failed.len(), "icon"));
    }

    Ok(report)
}

/// Recursively collect `*.svg` files, sorted by name at every level.
///
/// Hidden files and directories are included. The walk runs serially; the
/// sort makes the index reproducible.
pub fn discover_sources(root: &Path) -> Vec<SourceImage> {
    WalkDir::new(root)
        .skip_hidden(false)
        .sort(true)
        .parallelism(Parallelism::Serial)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == SOURCE_EXTENSION))
        .map(|p| SourceImage::new(p, root))
        .collect()
}

/// Render, pack and write one icon. Returns its symbol and header path.
fn convert_one<R: Rasterize>(
    rasterizer: &R,
    source: &SourceImage,
    output_root: &Path,
    symbols: &HashMap<Symbol, PathBuf>,
) -> Result<(Symbol, PathBuf), ConvertError> {
    let symbol = source.symbol();
    if let Some(first) = symbols.get(&symbol) {
        return Err(ConvertError::SymbolCollision {
            symbol,
            first: first.clone(),
        });
    }
    if !symbol.is_valid_identifier() {
        log!("warning"; "`{}` is not a valid C identifier ({})", symbol, source.relative.display());
    }

    let raster = rasterizer.render(&source.path)?;
    let packed = bitmap::pack(&raster);
    debug!("pack"; "{}: {}x{} -> {} bytes", symbol, packed.width, packed.height, packed.len());

    let output = source.output_path(output_root);
    HeaderUnit::new(&output, &symbol, &packed, &source.file_name())
        .write()
        .map_err(|err| ConvertError::Write(output.clone(), err))?;

    Ok((symbol, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelRaster;
    use std::fs;
    use tempfile::TempDir;

    const OK_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16">
  <rect x="4" y="4" width="8" height="8" fill="black"/>
</svg>"#;

    /// Files containing `bad` fail; everything else is an 8x1 half-inked raster.
    struct FakeRasterizer;

    impl Rasterize for FakeRasterizer {
        fn render(&self, path: &Path) -> Result<PixelRaster, RenderError> {
            let content =
                fs::read_to_string(path).map_err(|e| RenderError::Io(path.to_path_buf(), e))?;
            if content.contains("bad") {
                return Err(RenderError::EmptyCanvas {
                    width: 0,
                    height: 0,
                });
            }
            Ok(PixelRaster::from_fn(8, 1, |x, _| x < 4))
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn includes(index: &Path) -> Vec<String> {
        fs::read_to_string(index)
            .unwrap()
            .lines()
            .filter(|l| l.starts_with("#include"))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_missing_source_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("include/icons");

        let report = run_with(&FakeRasterizer, &dir.path().join("icons"), &out).unwrap();

        assert!(report.source_missing);
        assert_eq!(report.succeeded(), 0);
        assert!(report.index.is_none());
        assert!(!dir.path().join("include").exists());
    }

    #[test]
    fn test_end_to_end_ok_and_bad() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("icons");
        let out = dir.path().join("include/icons");
        write(&src, "ok.svg", OK_SVG);
        write(&src, "bad.svg", "<svg this is corrupt");

        let config = IconsConfig::new(&src, &out);
        let report = run(&config).unwrap();

        assert_eq!(report.converted, vec![out.join("ok.h")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, src.join("bad.svg"));
        assert!(matches!(
            report.failed[0].1.downcast_ref::<ConvertError>(),
            Some(ConvertError::Render(RenderError::Parse(_)))
        ));

        let header = fs::read_to_string(out.join("ok.h")).unwrap();
        assert!(header.contains("inline EPD::Icon &ok_icon() {"));
        assert!(header.contains("new EPD::Icon({16, 16}, bitmap);"));
        // 16x16 -> 32 bytes -> 3 rows of 12
        assert_eq!(header.matches("0x").count(), 32);
        assert!(!out.join("bad.h").exists());

        assert_eq!(report.index, Some(out.join("icons.h")));
        assert_eq!(includes(&out.join("icons.h")), vec!["#include \"ok.h\""]);
    }

    #[test]
    fn test_one_failure_among_many() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("icons");
        let out = dir.path().join("out");
        write(&src, "a.svg", "fine");
        write(&src, "b.svg", "bad");
        write(&src, "c.svg", "fine");

        let report = run_with(&FakeRasterizer, &src, &out).unwrap();

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(
            includes(&out.join("icons.h")),
            vec!["#include \"a.h\"", "#include \"c.h\""]
        );
    }

    #[test]
    fn test_nested_layout_and_symbols() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("icons");
        let out = dir.path().join("out");
        write(&src, "menu-bar.svg", "fine");
        write(&src, "sub/menu-bar.svg", "fine");

        let report = run_with(&FakeRasterizer, &src, &out).unwrap();
        assert_eq!(report.succeeded(), 2);

        let top = fs::read_to_string(out.join("menu-bar.h")).unwrap();
        assert!(top.contains("&menu_bar_icon()"));
        assert!(top.contains("// Auto-generated from menu-bar.svg"));
        assert!(top.contains("0x0F"));

        let nested = fs::read_to_string(out.join("sub/menu-bar.h")).unwrap();
        assert!(nested.contains("&sub_menu_bar_icon()"));

        assert_eq!(
            includes(&out.join("icons.h")),
            vec!["#include \"menu-bar.h\"", "#include \"sub/menu-bar.h\""]
        );
    }

    #[test]
    fn test_non_svg_files_ignored() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("icons");
        let out = dir.path().join("out");
        write(&src, "readme.txt", "fine");
        write(&src, "logo.png", "fine");
        write(&src, "only.svg", "fine");

        let report = run_with(&FakeRasterizer, &src, &out).unwrap();
        assert_eq!(report.converted, vec![out.join("only.h")]);
    }

    #[test]
    fn test_empty_tree_has_no_index() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("icons");
        let out = dir.path().join("out");
        fs::create_dir_all(&src).unwrap();

        let report = run_with(&FakeRasterizer, &src, &out).unwrap();
        assert!(!report.source_missing);
        assert!(report.index.is_none());
        assert!(out.is_dir());
        assert!(!out.join("icons.h").exists());
    }

    #[test]
    fn test_symbol_collision_skips_second_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("icons");
        let out = dir.path().join("out");
        write(&src, "a-b.svg", "fine");
        write(&src, "a_b.svg", "fine");

        let report = run_with(&FakeRasterizer, &src, &out).unwrap();

        assert_eq!(report.converted, vec![out.join("a-b.h")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, src.join("a_b.svg"));
        assert!(matches!(
            report.failed[0].1.downcast_ref::<ConvertError>(),
            Some(ConvertError::SymbolCollision { .. })
        ));
    }

    #[test]
    fn test_failed_file_does_not_claim_symbol() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("icons");
        let out = dir.path().join("out");
        write(&src, "a-b.svg", "bad");
        write(&src, "a_b.svg", "fine");

        let report = run_with(&FakeRasterizer, &src, &out).unwrap();
        assert_eq!(report.converted, vec![out.join("a_b.h")]);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("icons");
        write(&src, "z.svg", OK_SVG);
        write(&src, "a/b.svg", OK_SVG);
        write(&src, "m.svg", OK_SVG);

        let first = dir.path().join("first");
        let second = dir.path().join("second");
        run_with(&SvgRasterizer, &src, &first).unwrap();
        run_with(&SvgRasterizer, &src, &second).unwrap();

        for rel in ["z.h", "a/b.h", "m.h", "icons.h"] {
            assert_eq!(
                fs::read(first.join(rel)).unwrap(),
                fs::read(second.join(rel)).unwrap(),
                "{rel}"
            );
        }
        assert_eq!(
            includes(&first.join("icons.h")),
            vec!["#include \"a/b.h\"", "#include \"m.h\"", "#include \"z.h\""]
        );
    }

    #[test]
    fn test_rerun_overwrites() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("icons");
        let out = dir.path().join("out");
        write(&src, "icon.svg", "fine");

        run_with(&FakeRasterizer, &src, &out).unwrap();
        fs::write(out.join("icon.h"), "stale").unwrap();
        run_with(&FakeRasterizer, &src, &out).unwrap();

        let header = fs::read_to_string(out.join("icon.h")).unwrap();
        assert!(header.starts_with("#pragma once"));
        assert_eq!(includes(&out.join("icons.h")).len(), 1);
    }

    #[test]
    fn test_source_image_paths() {
        let root = Path::new("/src/icons");
        let source = SourceImage::new(root.join("dnd/dice-d4.svg"), root);

        assert_eq!(source.relative, Path::new("dnd/dice-d4.svg"));
        assert_eq!(source.output_path(Path::new("/out")), Path::new("/out/dnd/dice-d4.h"));
        assert_eq!(source.symbol().as_str(), "dnd_dice_d4");
        assert_eq!(source.file_name(), "dice-d4.svg");
    }

    #[test]
    fn test_failure_message_includes_cause() {
        let err = anyhow::Error::from(ConvertError::Write(
            PathBuf::from("out/a.h"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        ));
        let message = format!("{err:#}");
        assert!(message.contains("out/a.h"));
        assert!(message.ends_with("denied"));
    }

    #[test]
    fn test_hidden_entries_are_discovered() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("icons");
        write(&src, "a.svg", "fine");
        write(&src, ".b.svg", "fine");
        write(&src, ".theme/c.svg", "fine");

        let sources = discover_sources(&src);
        let relative: Vec<_> = sources.iter().map(|s| s.relative.clone()).collect();
        assert_eq!(relative.len(), 3);
        assert!(relative.contains(&PathBuf::from(".b.svg")));
        assert!(relative.contains(&PathBuf::from(".theme/c.svg")));

        let out = dir.path().join("out");
        let report = run_with(&FakeRasterizer, &src, &out).unwrap();
        assert_eq!(report.succeeded(), 3);
        assert!(out.join(".theme/c.h").is_file());
    }
}
