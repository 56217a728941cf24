//! Reading-list items as the rest of the app sees them.

/// One saved entry of the remote reading list.
///
/// Items are immutable once fetched; a refresh replaces the whole
/// snapshot rather than patching individual entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Provider-side identifier, used for archive / delete requests.
    pub id: String,
    pub title: String,
    pub url: String,
    /// Short body excerpt shown in the preview panel (may be empty).
    pub excerpt: String,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        excerpt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            excerpt: excerpt.into(),
        }
    }
}
