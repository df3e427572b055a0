//! Event/item source: Legistar Web API client and the `EventSource` seam the
//! runner consumes.

mod error;
mod retry;
mod source;

pub use error::SourceError;
pub use retry::RetryPolicy;
pub use source::EventSource;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::LegistarClient;
