//! [`Contract`] definitions.

use common::{define_kind, unit, Date, DateOf, DateTimeOf, Money, Percent};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{customer, offer};
#[cfg(doc)]
use crate::domain::{Customer, Job, Offer};

/// Recurring service agreement with a [`Customer`].
///
/// A [`Contract`] owns the schedule cursor: [`Job`]s are generated from
/// [`next_execution_date`] up to the current date, and the cursor is advanced
/// per [`Interval`] step.
///
/// [`next_execution_date`]: Contract::next_execution_date
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the [`Customer`] this [`Contract`] is made with.
    pub customer_id: customer::Id,

    /// ID of the [`Offer`] this [`Contract`] originates from, if any.
    pub offer_id: Option<offer::Id>,

    /// Name of the provided service.
    pub service_name: Name,

    /// Net price of a single execution.
    pub price: Money,

    /// VAT rate applied on billing.
    pub vat: Percent,

    /// Address the service is provided at.
    pub address: customer::Address,

    /// Execution [`Interval`] of this [`Contract`].
    pub interval: Interval,

    /// [`Date`] of the first execution.
    pub start_date: StartDate,

    /// [`Date`] of the next execution to generate a [`Job`] for.
    ///
    /// [`None`] means the schedule is exhausted (a `ONCE` [`Contract`] that
    /// already produced its [`Job`]).
    pub next_execution_date: Option<NextExecutionDate>,

    /// Checklist applied to generated [`Job`]s.
    pub checklist: offer::Checklist,

    /// Indicator whether this [`Contract`] takes part in schedule
    /// generation.
    pub is_active: bool,

    /// [`DateTime`] when this [`Contract`] was paused, if it is.
    ///
    /// [`DateTime`]: common::DateTime
    pub paused_at: Option<PauseDateTime>,

    /// [`DateTime`] when this [`Contract`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

impl Contract {
    /// Returns the [`Date`]s this [`Contract`] is due for, up to the provided
    /// `today` inclusively, together with the advanced cursor.
    ///
    /// One [`Date`] is produced per missed [`Interval`] period. The returned
    /// cursor is [`None`] once the schedule is exhausted, and strictly
    /// greater than `today` otherwise.
    #[must_use]
    pub fn due_dates(
        &self,
        today: Date,
    ) -> (Vec<Date>, Option<NextExecutionDate>) {
        let mut due = Vec::new();
        let mut cursor = self.next_execution_date;
        while let Some(next) = cursor {
            if next.coerce() > today {
                break;
            }
            due.push(next.coerce());
            cursor = self
                .interval
                .advance(next.coerce())
                .map(DateOf::coerce);
        }
        (due, cursor)
    }
}

/// ID of a [`Contract`].
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

/// Name of the service provided under a [`Contract`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

define_kind! {
    #[doc = "Execution interval of a [`Contract`]."]
    enum Interval {
        #[doc = "Single execution."]
        Once = 1,

        #[doc = "Execution every 7 days."]
        Weekly = 2,

        #[doc = "Execution every 14 days."]
        Biweekly = 3,

        #[doc = "Execution every calendar month, clamped to the last valid \
                 day of the month."]
        Monthly = 4,
    }
}

impl Interval {
    /// Returns the execution [`Date`] following the provided one.
    ///
    /// [`None`] is returned for [`Interval::Once`], or if the resulting
    /// [`Date`] is out of the supported range.
    #[must_use]
    pub fn advance(self, from: Date) -> Option<Date> {
        match self {
            Self::Once => None,
            Self::Weekly => from.plus_days(7),
            Self::Biweekly => from.plus_days(14),
            Self::Monthly => from.plus_month_clamped(),
        }
    }
}

/// [`Date`] when a [`Contract`] starts.
pub type StartDate = DateOf<(Contract, unit::Creation)>;

/// Marker type indicating the next [`Contract`] execution.
#[derive(Clone, Copy, Debug)]
pub struct NextExecution;

/// [`Date`] of the next [`Contract`] execution.
pub type NextExecutionDate = DateOf<(Contract, NextExecution)>;

/// Marker type indicating a [`Contract`] pause.
#[derive(Clone, Copy, Debug)]
pub struct Pause;

/// [`DateTime`] when a [`Contract`] was paused.
///
/// [`DateTime`]: common::DateTime
pub type PauseDateTime = DateTimeOf<(Contract, Pause)>;

/// [`DateTime`] when a [`Contract`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{Date, DateTime, Money, Percent};
    use rust_decimal::Decimal;

    use crate::domain::{customer, offer};

    use super::{Contract, Id, Interval};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn contract(interval: Interval, next: &str) -> Contract {
        Contract {
            id: Id::new(),
            customer_id: customer::Id::new(),
            offer_id: None,
            service_name: "Office cleaning".parse().unwrap(),
            price: "120EUR".parse().unwrap(),
            vat: Percent::new(Decimal::from(19)).unwrap(),
            address: "Hauptstr. 1, 10115 Berlin".parse().unwrap(),
            interval,
            start_date: date(next).coerce(),
            next_execution_date: Some(date(next).coerce()),
            checklist: offer::Checklist::default(),
            is_active: true,
            paused_at: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn advance_shifts_per_interval() {
        assert_eq!(Interval::Once.advance(date("2024-03-01")), None);
        assert_eq!(
            Interval::Weekly.advance(date("2024-03-01")),
            Some(date("2024-03-08")),
        );
        assert_eq!(
            Interval::Biweekly.advance(date("2024-03-01")),
            Some(date("2024-03-15")),
        );
        assert_eq!(
            Interval::Monthly.advance(date("2024-01-31")),
            Some(date("2024-02-29")),
        );
    }

    #[test]
    fn due_dates_produce_one_date_per_missed_period() {
        let c = contract(Interval::Weekly, "2024-03-01");

        // 3 periods behind: exactly 3 dates, no duplicates.
        let (due, cursor) = c.due_dates(date("2024-03-15"));
        assert_eq!(
            due,
            vec![
                date("2024-03-01"),
                date("2024-03-08"),
                date("2024-03-15"),
            ],
        );
        assert_eq!(cursor.map(|d| d.coerce()), Some(date("2024-03-22")));
    }

    #[test]
    fn due_dates_leave_future_cursor_untouched() {
        let c = contract(Interval::Weekly, "2024-03-08");

        let (due, cursor) = c.due_dates(date("2024-03-01"));
        assert!(due.is_empty());
        assert_eq!(cursor, c.next_execution_date);
    }

    #[test]
    fn once_contract_exhausts_after_single_date() {
        let c = contract(Interval::Once, "2024-03-01");

        let (due, cursor) = c.due_dates(date("2024-03-05"));
        assert_eq!(due, vec![date("2024-03-01")]);
        assert_eq!(cursor, None);
    }

    #[test]
    fn monthly_cursor_rolls_with_clamping() {
        let c = contract(Interval::Monthly, "2024-01-31");

        let (due, cursor) = c.due_dates(date("2024-03-01"));
        assert_eq!(due, vec![date("2024-01-31"), date("2024-02-29")]);
        assert_eq!(cursor.map(|d| d.coerce()), Some(date("2024-03-29")));
    }
}
