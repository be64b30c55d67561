//! [`Absence`] definitions.

use common::{define_kind, unit, DateOf, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::employee;
#[cfg(doc)]
use crate::domain::{Employee, Job};

/// Period of an [`Employee`] unavailability.
///
/// An [`Absence`] never blocks an assignment on its own. It only surfaces as
/// a conflict for staff to acknowledge.
#[derive(Clone, Debug)]
pub struct Absence {
    /// ID of this [`Absence`].
    pub id: Id,

    /// ID of the [`Employee`] this [`Absence`] is about.
    pub employee_id: employee::Id,

    /// [`Kind`] of this [`Absence`].
    pub kind: Kind,

    /// First [`Date`] of this [`Absence`].
    ///
    /// [`Date`]: common::Date
    pub start_date: StartDate,

    /// Last [`Date`] of this [`Absence`] (inclusive).
    ///
    /// [`Date`]: common::Date
    pub end_date: EndDate,

    /// Optional note about this [`Absence`].
    pub note: Option<Note>,

    /// [`DateTime`] when this [`Absence`] was recorded.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

impl Absence {
    /// Indicates whether this [`Absence`] covers the provided [`Date`].
    ///
    /// [`Date`]: common::Date
    #[must_use]
    pub fn contains(&self, date: common::Date) -> bool {
        self.start_date.coerce() <= date && date <= self.end_date.coerce()
    }
}

/// ID of an [`Absence`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Kind of an [`Absence`]."]
    enum Kind {
        #[doc = "Planned vacation."]
        Vacation = 1,

        #[doc = "Sick leave."]
        Sickness = 2,

        #[doc = "Any other kind of unavailability."]
        Other = 3,
    }
}

/// Free-form note about an [`Absence`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Note(String);

impl Note {
    /// Creates a new [`Note`] if the given `note` is valid.
    #[must_use]
    pub fn new(note: impl Into<String>) -> Option<Self> {
        let note = note.into();
        (!note.trim().is_empty() && note.len() <= 512).then_some(Self(note))
    }
}

impl FromStr for Note {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Note`")
    }
}

/// Marker type indicating a period start.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type indicating a period end.
#[derive(Clone, Copy, Debug)]
pub struct End;

/// [`Date`] when an [`Absence`] starts.
///
/// [`Date`]: common::Date
pub type StartDate = DateOf<(Absence, Start)>;

/// [`Date`] when an [`Absence`] ends.
///
/// [`Date`]: common::Date
pub type EndDate = DateOf<(Absence, End)>;

/// [`DateTime`] when an [`Absence`] was recorded.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Absence, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{Date, DateTime};

    use super::{Absence, Id, Kind};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn absence(start: &str, end: &str) -> Absence {
        Absence {
            id: Id::new(),
            employee_id: crate::domain::employee::Id::new(),
            kind: Kind::Vacation,
            start_date: date(start).coerce(),
            end_date: date(end).coerce(),
            note: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let a = absence("2024-07-01", "2024-07-14");

        assert!(a.contains(date("2024-07-01")));
        assert!(a.contains(date("2024-07-07")));
        assert!(a.contains(date("2024-07-14")));

        assert!(!a.contains(date("2024-06-30")));
        assert!(!a.contains(date("2024-07-15")));
    }

    #[test]
    fn single_day_absence_covers_only_that_day() {
        let a = absence("2024-07-01", "2024-07-01");

        assert!(a.contains(date("2024-07-01")));
        assert!(!a.contains(date("2024-07-02")));
    }
}
