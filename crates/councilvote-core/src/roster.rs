//! Versioned council rosters.
//!
//! Council composition changes through staggered elections: odd districts
//! (1, 3, 5, 7) elect in one cycle, even districts (2, 4, 6, 8) in another,
//! with the Mayor every four years. Vote attribution therefore has to be
//! parameterized by the meeting year. Each [`RosterYear`] fixes the seat
//! column order for that year and maps the person names the meeting pages
//! print onto those seats.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::error::RosterError;

/// One person-to-seat assignment, in seat column order.
type Assignment = (&'static str, &'static str);

const MAYOR: Assignment = ("Kate Gallego", "Kate Gallego (Mayor)");
const WARING: Assignment = ("Jim Waring", "Jim Waring (D2)");
const STARK: Assignment = ("Debra Stark", "Debra Stark (D3)");
const PASTOR: Assignment = ("Laura Pastor", "Laura Pastor (D4)");
const GUARDADO: Assignment = ("Betty Guardado", "Betty Guardado (D5)");

const ROSTER_2020: &[Assignment] = &[
    MAYOR,
    ("Thelda Williams", "Thelda Williams (D1-Vice Mayor)"),
    WARING,
    STARK,
    PASTOR,
    GUARDADO,
    ("Sal DiCiccio", "Sal DiCiccio (D6)"),
    ("Michael Nowakowski", "Michael Nowakowski (D7)"),
    ("Carlos Garcia", "Carlos Garcia (D8)"),
];

const ROSTER_2022: &[Assignment] = &[
    MAYOR,
    ("Ann O'Brien", "Ann O'Brien (D1-Vice Mayor)"),
    WARING,
    STARK,
    PASTOR,
    GUARDADO,
    ("Sal DiCiccio", "Sal DiCiccio (D6)"),
    ("Yassamin Ansari", "Yassamin Ansari (D7)"),
    ("Carlos Garcia", "Carlos Garcia (D8)"),
];

const ROSTER_2023: &[Assignment] = &[
    MAYOR,
    ("Ann O'Brien", "Ann O'Brien (D1-Vice Mayor)"),
    WARING,
    STARK,
    PASTOR,
    GUARDADO,
    ("Kevin Robinson", "Kevin Robinson (D6)"),
    ("Yassamin Ansari", "Yassamin Ansari (D7)"),
    ("Kesha Hodge Washington", "Kesha Hodge Washington (D8)"),
];

const ROSTER_2025: &[Assignment] = &[
    MAYOR,
    ("Ann O'Brien", "Ann O'Brien (D1-Vice Mayor)"),
    WARING,
    STARK,
    PASTOR,
    GUARDADO,
    ("Kevin Robinson", "Kevin Robinson (D6)"),
    ("Anna Hernandez", "Anna Hernandez (D7)"),
    ("Kesha Hodge Washington", "Kesha Hodge Washington (D8)"),
];

/// Built-in table. 2021 repeats 2020 and 2024 repeats 2023: no election
/// changed the composition in those years.
const BUILTIN: &[(i32, &[Assignment])] = &[
    (2020, ROSTER_2020),
    (2021, ROSTER_2020),
    (2022, ROSTER_2022),
    (2023, ROSTER_2023),
    (2024, ROSTER_2023),
    (2025, ROSTER_2025),
];

static BUILTIN_REGISTRY: LazyLock<Result<RosterRegistry, RosterError>> = LazyLock::new(|| {
    RosterRegistry::from_years(BUILTIN.iter().map(|&(year, assignments)| {
        RosterYear::from_assignments(year, assignments.iter().copied())
    }))
});

/// The seats and name mapping in force for one calendar year.
///
/// Immutable once built; construction validates that every mapped seat is
/// declared and that seats and persons are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterYear {
    year: i32,
    seats: Vec<String>,
    name_map: Vec<(String, String)>,
}

impl RosterYear {
    /// Build a roster from an explicit seat order and person → seat mapping.
    pub fn new(
        year: i32,
        seats: Vec<String>,
        name_map: Vec<(String, String)>,
    ) -> Result<Self, RosterError> {
        if seats.is_empty() {
            return Err(RosterError::EmptyRoster { year });
        }
        for (i, seat) in seats.iter().enumerate() {
            if seats[..i].contains(seat) {
                return Err(RosterError::DuplicateSeat {
                    year,
                    seat: seat.clone(),
                });
            }
        }
        for (i, (person, seat)) in name_map.iter().enumerate() {
            if !seats.contains(seat) {
                return Err(RosterError::UnknownSeat {
                    year,
                    person: person.clone(),
                    seat: seat.clone(),
                });
            }
            if name_map[..i].iter().any(|(p, _)| p == person) {
                return Err(RosterError::DuplicatePerson {
                    year,
                    person: person.clone(),
                });
            }
        }
        Ok(Self {
            year,
            seats,
            name_map,
        })
    }

    /// Build a roster from `(person, seat)` pairs. Seat order is the order
    /// in which each seat first appears; a seat may be listed more than once
    /// to attach name aliases.
    pub fn from_assignments<P, S>(
        year: i32,
        assignments: impl IntoIterator<Item = (P, S)>,
    ) -> Result<Self, RosterError>
    where
        P: Into<String>,
        S: Into<String>,
    {
        let mut seats: Vec<String> = Vec::new();
        let mut name_map = Vec::new();
        for (person, seat) in assignments {
            let seat = seat.into();
            if !seats.contains(&seat) {
                seats.push(seat.clone());
            }
            name_map.push((person.into(), seat));
        }
        Self::new(year, seats, name_map)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Seat labels in output column order.
    pub fn seats(&self) -> &[String] {
        &self.seats
    }

    /// Seat held by `person`, if the person is on this roster.
    pub fn seat_for(&self, person: &str) -> Option<&str> {
        self.name_map
            .iter()
            .find(|(p, _)| p == person)
            .map(|(_, s)| s.as_str())
    }

    /// Every canonical person name attributed to `seat`, in mapping order.
    pub fn persons_for_seat<'a>(&'a self, seat: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.name_map
            .iter()
            .filter(move |(_, s)| s == seat)
            .map(|(p, _)| p.as_str())
    }
}

#[derive(Deserialize)]
struct FileAssignment {
    person: String,
    seat: String,
}

/// Year-keyed lookup table of [`RosterYear`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterRegistry {
    years: BTreeMap<i32, RosterYear>,
}

impl RosterRegistry {
    /// The built-in table covering the known operational range.
    pub fn builtin() -> Result<&'static RosterRegistry, RosterError> {
        BUILTIN_REGISTRY.as_ref().map_err(Clone::clone)
    }

    /// Collect validated rosters; a later entry for the same year replaces
    /// an earlier one.
    pub fn from_years(
        rosters: impl IntoIterator<Item = Result<RosterYear, RosterError>>,
    ) -> Result<Self, RosterError> {
        let mut years = BTreeMap::new();
        for roster in rosters {
            let roster = roster?;
            years.insert(roster.year, roster);
        }
        Ok(Self { years })
    }

    /// Parse a roster file of the form
    /// `{"2026": [{"person": "...", "seat": "..."}, ...]}`.
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let raw: BTreeMap<i32, Vec<FileAssignment>> =
            serde_json::from_str(json).map_err(|e| RosterError::Json(e.to_string()))?;
        Self::from_years(raw.into_iter().map(|(year, entries)| {
            RosterYear::from_assignments(year, entries.into_iter().map(|a| (a.person, a.seat)))
        }))
    }

    /// Overlay `other` on top of `self`; years present in both take `other`'s roster.
    pub fn merged_with(mut self, other: RosterRegistry) -> Self {
        self.years.extend(other.years);
        self
    }

    /// Roster for `year`, or [`RosterError::UnsupportedYear`].
    pub fn resolve(&self, year: i32) -> Result<&RosterYear, RosterError> {
        self.years
            .get(&year)
            .ok_or_else(|| RosterError::UnsupportedYear {
                year,
                supported: self.years(),
            })
    }

    pub fn years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }
}

/// Resolve `year` against the built-in table.
pub fn resolve_roster(year: i32) -> Result<&'static RosterYear, RosterError> {
    RosterRegistry::builtin()?.resolve(year)
}
