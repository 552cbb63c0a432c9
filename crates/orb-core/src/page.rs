//! Cursor-paginated list envelope.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::validate::Validate;

/// Cursor state of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    /// Whether more items exist after this page.
    pub has_more: bool,
    /// Cursor for the next page; `None` on the last page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// One page of a list endpoint.
///
/// A page never fetches further pages on its own. Pass [`Page::next_cursor`]
/// back as the `cursor` of the next list call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Cursor state.
    pub pagination_metadata: PaginationMetadata,
}

impl<T> Page<T> {
    /// Cursor for the next page, exactly as the server sent it.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.pagination_metadata.next_cursor.as_deref()
    }

    /// Whether another page can be fetched.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pagination_metadata.has_more && self.pagination_metadata.next_cursor.is_some()
    }
}

impl<T: Validate> Validate for Page<T> {
    fn validate(&self) -> Result<(), ModelError> {
        self.data.validate()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::alert::Threshold;

    #[test]
    fn exposes_data_and_cursor_unchanged() {
        let page: Page<Threshold> = serde_json::from_value(json!({
            "data": [{"value": 1.0}, {"value": 2.0}],
            "pagination_metadata": {"has_more": true, "next_cursor": "X"}
        }))
        .unwrap();
        assert_eq!(
            page.data,
            vec![Threshold { value: 1.0 }, Threshold { value: 2.0 }]
        );
        assert_eq!(page.next_cursor(), Some("X"));
        assert!(page.has_more());
    }

    #[test]
    fn last_page_has_no_cursor() {
        let page: Page<Threshold> = serde_json::from_value(json!({
            "data": [],
            "pagination_metadata": {"has_more": false, "next_cursor": null}
        }))
        .unwrap();
        assert!(page.next_cursor().is_none());
        assert!(!page.has_more());
    }
}
