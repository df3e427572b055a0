use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("no council roster for year {year} (supported: {supported:?})")]
    UnsupportedYear { year: i32, supported: Vec<i32> },

    #[error("roster {year}: {person:?} maps to undeclared seat {seat:?}")]
    UnknownSeat {
        year: i32,
        person: String,
        seat: String,
    },

    #[error("roster {year}: seat {seat:?} declared twice")]
    DuplicateSeat { year: i32, seat: String },

    #[error("roster {year}: person {person:?} mapped twice")]
    DuplicatePerson { year: i32, person: String },

    #[error("roster {year} has no seats")]
    EmptyRoster { year: i32 },

    #[error("roster file: {0}")]
    Json(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MonthRangeError {
    #[error("start month {0} outside 1..=12")]
    StartOutOfRange(u32),

    #[error("end month {0} outside 2..=13 (exclusive bound)")]
    EndOutOfRange(u32),

    #[error("empty month range {start}..{end}")]
    Empty { start: u32, end: u32 },
}
