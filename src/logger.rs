//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output shown only with `--verbose`
//! - `banner` for the separator lines printed around a run
//!
//! # Example
//!
//! ```ignore
//! log!("convert"; "{} -> {}", source.display(), output.display());
//! debug!("raster"; "{}x{} canvas", width, height);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Print the separator line used to frame a generator run.
pub fn banner(title: &str) {
    let mut stdout = stdout().lock();
    writeln!(stdout, "{}", paint(&"=".repeat(50), Style::new().dimmed())).ok();
    writeln!(stdout, "{}", paint(title, Style::new().bold())).ok();
    stdout.flush().ok();
}

/// Print the closing separator line of a generator run.
pub fn banner_end(title: &str) {
    let mut stdout = stdout().lock();
    writeln!(stdout, "{}", paint(title, Style::new().bold())).ok();
    writeln!(stdout, "{}", paint(&"=".repeat(50), Style::new().dimmed())).ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let style = match module_lower {
        "convert" | "index" => Style::new().bright_green().bold(),
        "error" => Style::new().bright_red().bold(),
        "warning" => Style::new().bright_magenta().bold(),
        "done" => Style::new().bright_blue().bold(),
        _ => Style::new().bright_yellow().bold(),
    };
    paint(&format!("[{module}]"), style)
}

/// Style `text` for stdout, honoring the `--color` override.
fn paint(text: &str, style: Style) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.style(style))
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================
