pub const FIXED_COLUMN_COUNT: usize = 30;

/// Fixed output columns, in order. Seat columns follow, in roster order.
pub const FIXED_COLUMNS: [&str; FIXED_COLUMN_COUNT] = [
    "MeetingDate",
    "MeetingType",
    "BodyName",
    "EventInSiteURL",
    "EventAgendaFile",
    "EventMinutesFile",
    "EventVideoPath",
    "MatterTypeName",
    "MatterRequester",
    "AgendaItemNumber",
    "AgendaItemTitle",
    "AgendaItemDescription",
    "MatterPassedDate",
    "MatterNotes",
    "EventItemConsent",
    "EventItemPassedFlag",
    "EventItemTally",
    "IndexName",
    "ActionName",
    "ActionText",
    "EventItemAgendaNote",
    "EventItemMinutesNote",
    "Mover",
    "Seconder",
    "MatterSponsors",
    "MatterAttachmentURLs",
    "EventItemVideo",
    "ResultsURL",
    "FileNumber",
    "FileDetailURL",
];

/// Value of the `MeetingType` column; only formal meetings are fetched.
pub const MEETING_TYPE: &str = "Formal";

/// Position of a fixed column by name.
pub fn column_index(name: &str) -> Option<usize> {
    FIXED_COLUMNS.iter().position(|&c| c == name)
}
