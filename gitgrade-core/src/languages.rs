//! Language detection for a repository.

use std::path::Path;

use log::debug;

use crate::domain::{FileEntry, LanguageSet};
use crate::payload::LanguageMap;

/// Placeholder reported when no language could be identified.
pub const UNKNOWN_LANGUAGE: &str = "Mixed / Unknown";

/// Detect languages, preferring the host's language map.
///
/// When the map is absent or empty, the sampled paths are matched against a
/// fixed extension table. The result always contains at least one entry.
pub fn detect_languages(authoritative: Option<&LanguageMap>, sample: &[FileEntry]) -> LanguageSet {
    if let Some(map) = authoritative.filter(|map| !map.is_empty()) {
        return map.keys().cloned().collect();
    }

    let mut found: LanguageSet = sample
        .iter()
        .filter_map(|entry| language_for_path(&entry.path))
        .map(str::to_string)
        .collect();
    debug!("extension fallback matched {} languages", found.len());
    if found.is_empty() {
        found.insert(UNKNOWN_LANGUAGE.to_string());
    }
    found
}

/// Language for a path's final extension, if it is one of the known ones.
pub fn language_for_path(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension().and_then(|ext| ext.to_str())?;
    match ext {
        "py" => Some("Python"),
        "js" => Some("JavaScript"),
        "java" => Some("Java"),
        "cpp" => Some("C++"),
        "c" => Some("C"),
        "html" => Some("HTML"),
        "css" => Some("CSS"),
        _ => None,
    }
}
