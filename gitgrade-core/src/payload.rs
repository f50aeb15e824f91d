//! Upstream payload records.
//!
//! Every field is optional: the transport may hand back partial documents,
//! and a missing field must fall back to a default instead of failing the
//! evaluation.

use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::FileEntry;

/// One element of an owner's repository list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepoListingEntry {
    /// Repository name.
    pub name: Option<String>,
    /// Last update, ISO-8601.
    pub updated_at: Option<String>,
}

/// Repository metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepoMetadata {
    /// Branch the host considers primary.
    pub default_branch: Option<String>,
}

/// Language name to byte count, as reported by the host.
pub type LanguageMap = BTreeMap<String, Value>;

/// Recursive tree listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TreeListing {
    /// Entries in upstream order.
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    /// Whether the host cut the listing short.
    pub truncated: Option<bool>,
}

impl TreeListing {
    /// Entries in the listing, including those without a path.
    pub fn entry_count(&self) -> usize {
        self.tree.len()
    }

    /// Convert into file entries, preserving order and skipping path-less
    /// entries.
    pub fn into_entries(self) -> Vec<FileEntry> {
        self.tree
            .into_iter()
            .filter_map(|entry| entry.path.map(FileEntry::new))
            .collect()
    }
}

/// A raw tree entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    /// Repository-relative path.
    pub path: Option<String>,
}

/// README metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReadmeMetadata {
    /// Encoded README body.
    pub content: Option<String>,
}

impl ReadmeMetadata {
    /// Length of the encoded content field in characters, 0 when missing.
    pub fn content_length(&self) -> usize {
        self.content
            .as_deref()
            .map(|content| content.chars().count())
            .unwrap_or(0)
    }
}

/// Decode an optional JSON value into a typed record.
///
/// Returns `None` when the value is absent or does not have the expected
/// shape.
pub fn decode<T: DeserializeOwned>(value: Option<Value>, what: &str) -> Option<T> {
    let value = value?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            debug!("ignoring malformed {what} payload: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tree_listing_keeps_order_and_skips_missing_paths() {
        let listing: TreeListing = decode(
            Some(json!({
                "tree": [
                    {"path": "z.py", "type": "blob"},
                    {"type": "tree"},
                    {"path": "a.py", "type": "blob", "size": 12}
                ],
                "truncated": false
            })),
            "tree",
        )
        .expect("tree decodes");

        assert_eq!(listing.entry_count(), 3);
        let entries = listing.into_entries();
        assert_eq!(entries, vec![FileEntry::new("z.py"), FileEntry::new("a.py")]);
    }

    #[test]
    fn tree_listing_without_tree_field_is_empty() {
        let listing: TreeListing = decode(Some(json!({"sha": "abc"})), "tree").expect("decodes");
        assert!(listing.into_entries().is_empty());
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        let listing: Option<Vec<RepoListingEntry>> =
            decode(Some(json!({"message": "API rate limit exceeded"})), "repo list");
        assert!(listing.is_none());
        let absent: Option<RepoMetadata> = decode(None, "metadata");
        assert!(absent.is_none());
    }

    #[test]
    fn readme_length_counts_encoded_characters() {
        let readme = ReadmeMetadata {
            content: Some("aGVsbG8=\n".to_string()),
        };
        assert_eq!(readme.content_length(), 9);
        assert_eq!(ReadmeMetadata::default().content_length(), 0);
    }
}
