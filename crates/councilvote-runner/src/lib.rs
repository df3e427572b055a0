//! Run lifecycle: resolve the roster, list meetings, process each meeting
//! (API items plus page scrape) on one or many workers, then reconcile and
//! assemble rows in a stable order.

pub mod bundle;
pub mod config;
mod error;
pub mod orchestrate;
pub mod pipeline;
pub mod process;

pub use bundle::MeetingBundle;
pub use config::RunConfig;
pub use error::RunError;
pub use orchestrate::{run_parallel, run_sequential};
pub use pipeline::{RunOutput, RunSummary, run};
pub use process::{ProcessOptions, process_event};
