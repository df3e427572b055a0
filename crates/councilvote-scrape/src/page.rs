//! The browser primitives the extractor consumes, expressed as owned
//! snapshots of DOM query results.

use std::time::Duration;

use async_trait::async_trait;

use crate::PageError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub text: String,
    pub href: String,
}

impl Anchor {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
        }
    }
}

/// A `td` cell: its trimmed text and its first anchor, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub anchor: Option<Anchor>,
}

impl TableCell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchor: None,
        }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            anchor: Some(Anchor::new(text.clone(), href)),
            text,
        }
    }
}

/// A `tr` and its `td` cells. Header (`th`) cells are not included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Two plain-text cells, the shape of a vote popup row.
    pub fn pair(name: &str, vote: &str) -> Self {
        Self::new(vec![TableCell::text(name), TableCell::text(vote)])
    }
}

/// One "Action details" control on the meeting page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionControl {
    /// Position among the page's action controls.
    pub index: usize,
    /// Text of the nearest enclosing table row.
    pub row_text: String,
    /// Where opening the control leads; empty when the driver cannot tell.
    pub target: String,
}

/// A live meeting page. One instance is owned by one worker at a time.
///
/// Query methods report the state of the page as last loaded; an open
/// popup contributes extra frames to [`MeetingPage::frame_rows`].
#[async_trait]
pub trait MeetingPage: Send {
    /// Load `url` and wait for it to settle.
    async fn goto(&mut self, url: &str) -> Result<(), PageError>;

    async fn anchors(&mut self) -> Result<Vec<Anchor>, PageError>;

    /// Rows of every table in the main document.
    async fn table_rows(&mut self) -> Result<Vec<TableRow>, PageError>;

    async fn action_controls(&mut self) -> Result<Vec<ActionControl>, PageError>;

    async fn open_popup(&mut self, control: &ActionControl) -> Result<(), PageError>;

    /// Wait up to `timeout` for a dialog to appear. `Ok(false)` means none did.
    async fn wait_for_dialog(&mut self, timeout: Duration) -> Result<bool, PageError>;

    /// Table rows per rendering frame, main document first.
    async fn frame_rows(&mut self) -> Result<Vec<Vec<TableRow>>, PageError>;

    /// Click the popup's close control.
    async fn close_popup(&mut self) -> Result<(), PageError>;

    /// Send a cancel/escape signal, closing whatever is open.
    async fn dismiss(&mut self) -> Result<(), PageError>;

    /// Trimmed text of every `p` element in the main document.
    async fn paragraphs(&mut self) -> Result<Vec<String>, PageError>;
}

/// Opens an isolated page per worker; pages are never shared.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self, headless: bool) -> Result<Box<dyn MeetingPage>, PageError>;
}
