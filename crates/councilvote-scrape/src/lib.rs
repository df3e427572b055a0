//! Meeting page extraction.
//!
//! [`MeetingExtractor`] drives a [`MeetingPage`] through load, document
//! links, the file-number index and the vote-popup loop, and returns one
//! self-contained `MeetingScrapeResult` per meeting.

mod error;
pub mod extract;
pub mod page;
pub mod summary;

pub use error::PageError;
pub use extract::{ExtractorConfig, MeetingExtractor};
pub use page::{ActionControl, Anchor, MeetingPage, SessionFactory, TableCell, TableRow};

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{HttpPage, HttpSessionFactory};
