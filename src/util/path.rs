//! Path helpers: guide file naming and shell-style expansion.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Stem used when a title has no usable characters.
pub const UNTITLED: &str = "untitled";

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w \-]").expect("static regex"))
}

/// File name for a guide derived from its title: keeps word characters,
/// spaces and hyphens, trims, replaces spaces with `_` and appends `ext`.
pub fn guide_file_name(title: &str, ext: &str) -> String {
    let cleaned = unsafe_chars().replace_all(title, "");
    let stem = cleaned.trim().replace(' ', "_");
    let stem = if stem.is_empty() { UNTITLED } else { stem.as_str() };
    format!("{}{}", stem, normalize_extension(ext))
}

/// `tsg` and `.tsg` both become `.tsg`.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// True when `path` ends in one of `extensions` (given with or without the dot).
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(actual) = path.extension().and_then(OsStr::to_str) else {
        return false;
    };
    extensions
        .iter()
        .any(|e| e.as_ref().trim_start_matches('.').eq_ignore_ascii_case(actual))
}

/// Expand `~`, `$VAR` and `${VAR}`. Unknown variables leave the input as is.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(raw.as_ref()) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}
