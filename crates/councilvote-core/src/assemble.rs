//! Projects reconciled rows onto the output table: a header of fixed columns
//! plus seat labels, then one record per row in input order.

use crate::reconcile::ReconciledRow;
use crate::roster::RosterYear;
use crate::schema::FIXED_COLUMNS;

/// A header and its records, ready for a delimited-text writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledTable {
    pub header: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl AssembledTable {
    /// Header first, then records.
    pub fn lines(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.header.as_slice()).chain(self.records.iter().map(Vec::as_slice))
    }
}

/// Column header for `roster`'s year.
pub fn header(roster: &RosterYear) -> Vec<String> {
    FIXED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(roster.seats().iter().cloned())
        .collect()
}

/// Emit the header once and one record per row, preserving order.
///
/// Every row must have been reconciled against `roster`; a row with a
/// different seat count is a caller bug and is logged, not padded.
pub fn assemble(rows: impl IntoIterator<Item = ReconciledRow>, roster: &RosterYear) -> AssembledTable {
    let header = header(roster);
    let records = rows
        .into_iter()
        .map(|row| {
            if row.votes().len() != roster.seats().len() {
                tracing::error!(
                    file_number = row.file_number(),
                    votes = row.votes().len(),
                    seats = roster.seats().len(),
                    "row reconciled against a different roster"
                );
            }
            row.into_fields()
        })
        .collect();
    AssembledTable { header, records }
}
