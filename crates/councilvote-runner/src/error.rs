use std::path::PathBuf;

use councilvote_core::RosterError;
use councilvote_legistar::SourceError;
use thiserror::Error;

/// The failures that halt a run. Everything else degrades to partial rows.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("could not read roster file {}: {source}", .path.display())]
    RosterFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not list meetings: {0}")]
    Source(#[from] SourceError),
}
