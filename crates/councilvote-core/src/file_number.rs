//! File-number keys that join API agenda items to scraped vote popups.
//!
//! Council file numbers look like `24-0001`: a two-digit year, a hyphen, and
//! a numeric sequence. The API carries them in `EventItemMatterFile`; when it
//! doesn't, the number is usually embedded in the item title. Meeting pages
//! print them in the first cell of each agenda row.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMBEDDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}-\d+").expect("file number pattern"));
static EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-\d+$").expect("exact file number pattern"));

/// Correlation key between an agenda item and its vote popup.
///
/// May be empty, in which case no popup can correlate with the item. Popups
/// whose row carries no recognizable number get a synthetic `item_<n>` key
/// that never matches an agenda item.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileNumber(String);

impl FileNumber {
    /// Key for an agenda item: `matter_file` verbatim when non-empty,
    /// otherwise the first file-number pattern in `title`, otherwise empty.
    pub fn for_item(matter_file: &str, title: &str) -> Self {
        if !matter_file.is_empty() {
            return Self(matter_file.to_string());
        }
        Self::find_in(title).unwrap_or_default()
    }

    /// First `NN-N+` substring of `text`.
    pub fn find_in(text: &str) -> Option<Self> {
        EMBEDDED.find(text).map(|m| Self(m.as_str().to_string()))
    }

    /// `text` (trimmed) if it is exactly a file number.
    pub fn parse_exact(text: &str) -> Option<Self> {
        let text = text.trim();
        EXACT.is_match(text).then(|| Self(text.to_string()))
    }

    /// Placeholder key for the popup at `index` whose row had no file number.
    pub fn synthetic(index: usize) -> Self {
        Self(format!("item_{index}"))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
