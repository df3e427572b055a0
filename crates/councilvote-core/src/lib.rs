pub mod assemble;
pub mod config;
pub mod error;
pub mod file_number;
pub mod model;
pub mod reconcile;
pub mod roster;
pub mod schema;
pub mod url;
pub mod vote;

pub use assemble::{AssembledTable, assemble, header};
pub use config::{MonthRange, SiteConfig};
pub use error::{MonthRangeError, RosterError};
pub use file_number::FileNumber;
pub use model::{AgendaItem, Event, MeetingScrapeResult, RollCall, VoteMap};
pub use reconcile::{ReconciledRow, reconcile};
pub use roster::{RosterRegistry, RosterYear, resolve_roster};
pub use vote::VoteValue;
