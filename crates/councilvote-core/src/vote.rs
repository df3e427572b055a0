//! Vote labels as printed by the meeting site.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Labels observed on meeting pages or derived by the reconciler.
pub const KNOWN_LABELS: &[&str] = &[
    "Aye",
    "Nay",
    "Absent",
    "Excused",
    "Recused",
    "Abstain",
    "Present",
    "Consent",
    "Voice Vote",
];

/// An open vote label.
///
/// The upstream UI is not contractually stable, so any label is accepted and
/// carried through verbatim; [`is_recognized`](Self::is_recognized) lets
/// callers warn about new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteValue(String);

impl VoteValue {
    pub const ABSENT: &'static str = "Absent";
    pub const CONSENT: &'static str = "Consent";
    pub const VOICE_VOTE: &'static str = "Voice Vote";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn absent() -> Self {
        Self::new(Self::ABSENT)
    }

    pub fn consent() -> Self {
        Self::new(Self::CONSENT)
    }

    pub fn voice_vote() -> Self {
        Self::new(Self::VOICE_VOTE)
    }

    /// The unresolved value.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive match on "Absent".
    pub fn is_absent(&self) -> bool {
        self.0.eq_ignore_ascii_case(Self::ABSENT)
    }

    pub fn is_recognized(&self) -> bool {
        KNOWN_LABELS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(&self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoteValue {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
