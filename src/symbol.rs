//! Identifier derivation for generated icons.
//!
//! A symbol is derived from the icon's path relative to the scan root:
//!
//! ```text
//! menu-bar.svg           -> menu_bar       -> menu_bar_icon()
//! sub/menu-bar.svg       -> sub_menu_bar   -> sub_menu_bar_icon()
//! dnd/dice-d20.svg       -> dnd_dice_d20   -> dnd_dice_d20_icon()
//! ```
//!
//! Only `-` is rewritten. Other characters pass through untouched, so a
//! file named `my icon.svg` yields a symbol that will not compile;
//! [`Symbol::is_valid_identifier`] lets the caller warn about it.

use std::fmt;
use std::path::{Component, Path};

/// Separator placed between path components.
const JOINER: char = '_';

/// Suffix of the generated accessor function.
const ACCESSOR_SUFFIX: &str = "_icon";

/// Sanitized identifier for one icon
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Derive a symbol from a path relative to the scan root.
    ///
    /// The extension of the final component is dropped; `.` and `..`
    /// components are skipped.
    pub fn from_relative_path(path: &Path) -> Self {
        let stemmed = path.with_extension("");
        let parts: Vec<String> = stemmed
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Self::from_parts(&parts)
    }

    /// Join already-split path components (extension already removed).
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Self {
        let joined = parts
            .iter()
            .map(|part| part.as_ref().replace('-', "_"))
            .collect::<Vec<_>>()
            .join(&JOINER.to_string());
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the generated accessor function, e.g. `menu_bar_icon`.
    pub fn accessor(&self) -> String {
        format!("{}{ACCESSOR_SUFFIX}", self.0)
    }

    /// Whether the symbol is a legal C/C++ identifier.
    pub fn is_valid_identifier(&self) -> bool {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
