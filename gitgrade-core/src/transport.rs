//! Transport abstraction consumed by the engine.

use serde_json::Value;

/// Fetches upstream documents by URL.
///
/// Implementations never fail: any network error, non-success status, empty
/// body or malformed payload collapses to absence.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Fetch and parse a JSON document, or `None` when unavailable.
    fn fetch_json(&self, url: &str) -> Option<Value>;
    /// Fetch a text body, or an empty string when unavailable.
    fn fetch_text(&self, url: &str) -> String;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn fetch_json(&self, url: &str) -> Option<Value> {
        (**self).fetch_json(url)
    }

    fn fetch_text(&self, url: &str) -> String {
        (**self).fetch_text(url)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn fetch_json(&self, url: &str) -> Option<Value> {
        (**self).fetch_json(url)
    }

    fn fetch_text(&self, url: &str) -> String {
        (**self).fetch_text(url)
    }
}
