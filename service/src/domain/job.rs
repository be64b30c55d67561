//! [`Job`] definitions.

use common::{define_kind, unit, DateOf, DateTimeOf, Money, Percent};
use derive_more::{
    AsRef, Display, Error, From, FromStr, Into,
};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{assignment, contract, customer, invoice, offer, Assignment};
#[cfg(doc)]
use crate::domain::{Contract, Customer, Employee, Invoice};

/// Single execution of a service on a scheduled [`Date`].
///
/// A [`Job`] snapshots the commercial terms of its [`Contract`] at generation
/// time, so later [`Contract`] edits never affect already generated work.
///
/// [`Date`]: common::Date
#[derive(Clone, Debug)]
pub struct Job {
    /// ID of this [`Job`].
    pub id: Id,

    /// ID of the [`Contract`] this [`Job`] was generated from, if any.
    ///
    /// Ad-hoc [`Job`]s have none.
    pub contract_id: Option<contract::Id>,

    /// ID of the [`Customer`] this [`Job`] is performed for.
    pub customer_id: customer::Id,

    /// Name of the performed service.
    pub service_name: contract::Name,

    /// Net price of this [`Job`].
    pub price: Money,

    /// VAT rate applied on billing.
    pub vat: Percent,

    /// Address this [`Job`] is performed at.
    pub address: customer::Address,

    /// Checklist of steps to perform.
    pub checklist: offer::Checklist,

    /// [`Date`] this [`Job`] is scheduled on.
    ///
    /// [`Date`]: common::Date
    pub scheduled_date: ScheduledDate,

    /// [`Status`] of this [`Job`].
    pub status: Status,

    /// Actual duration of this [`Job`], once completed.
    pub actual_duration: Option<DurationMinutes>,

    /// ID of the [`Invoice`] this [`Job`] is billed on, if it is.
    pub invoice_id: Option<invoice::Id>,

    /// Completion [`Proof`]s attached to this [`Job`].
    pub proofs: Vec<Proof>,

    /// [`DateTime`] when this [`Job`] was completed, if it was.
    ///
    /// [`DateTime`]: common::DateTime
    pub completed_at: Option<CompletionDateTime>,

    /// [`DateTime`] when this [`Job`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

impl Job {
    /// Checks whether [`Employee`]s may still be assigned to or time may be
    /// tracked on this [`Job`].
    ///
    /// # Errors
    ///
    /// If this [`Job`] is completed or cancelled already.
    pub fn ensure_workable(&self) -> Result<(), TransitionError> {
        match self.status {
            Status::Scheduled | Status::InProgress => Ok(()),
            Status::Completed => Err(TransitionError::AlreadyCompleted),
            Status::Cancelled => Err(TransitionError::AlreadyCancelled),
        }
    }

    /// Checks whether this [`Job`] may be cancelled.
    ///
    /// # Errors
    ///
    /// If this [`Job`] is completed or cancelled already.
    pub fn ensure_cancellable(&self) -> Result<(), TransitionError> {
        match self.status {
            Status::Scheduled | Status::InProgress => Ok(()),
            Status::Completed => Err(TransitionError::AlreadyCompleted),
            Status::Cancelled => Err(TransitionError::AlreadyCancelled),
        }
    }

    /// Indicates whether this [`Job`] may appear on an [`Invoice`].
    #[must_use]
    pub fn is_billable(&self) -> bool {
        self.status == Status::Completed && self.invoice_id.is_none()
    }

    /// Derives the actual duration of this [`Job`] from the provided
    /// [`Assignment`]s.
    ///
    /// Assigned [`Employee`]s work in parallel, so the longest tracked time
    /// wins. [`None`] is returned if no [`Assignment`] has a completed time
    /// entry.
    #[must_use]
    pub fn derived_duration(
        assignments: &[Assignment],
    ) -> Option<DurationMinutes> {
        assignments.iter().filter_map(Assignment::duration).max()
    }

    /// Indicates whether all the provided [`Assignment`]s have settled their
    /// work, so the [`Job`] may be closed out.
    #[must_use]
    pub fn assignments_settled(assignments: &[Assignment]) -> bool {
        assignments
            .iter()
            .all(|a| a.status == assignment::Status::Completed)
    }

    /// Resolves the actual duration to close a [`Job`] out with.
    ///
    /// Unsettled `assignments` block the close-out unless `force` is set, and
    /// derive no duration, so a forced close-out requires an `explicit` one.
    ///
    /// # Errors
    ///
    /// If some `assignments` have not settled their work and `force` is not
    /// set, or no duration is available.
    pub fn completion_duration(
        assignments: &[Assignment],
        explicit: Option<DurationMinutes>,
        force: bool,
    ) -> Result<DurationMinutes, CompletionError> {
        use CompletionError as E;

        if Self::assignments_settled(assignments) {
            explicit.or_else(|| Self::derived_duration(assignments))
        } else if force {
            explicit
        } else {
            return Err(E::AssignmentsPending);
        }
        .ok_or(E::NoDuration)
    }
}

/// ID of a [`Job`].
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
    #[doc = "Status of a [`Job`]."]
    enum Status {
        #[doc = "Scheduled, no work started yet."]
        Scheduled = 1,

        #[doc = "Work is in progress."]
        InProgress = 2,

        #[doc = "Work is completed."]
        Completed = 3,

        #[doc = "Cancelled, never to be billed."]
        Cancelled = 4,
    }
}

/// Duration of a [`Job`] in whole minutes.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct DurationMinutes(i32);

/// Error of closing a [`Job`] out.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum CompletionError {
    /// Some [`Assignment`]s have not settled their work yet.
    #[display("Some `Assignment`s have not settled their work yet")]
    AssignmentsPending,

    /// No duration is available for the [`Job`].
    #[display("No tracked time and no explicit duration")]
    NoDuration,
}

/// Error of an invalid [`Job`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum TransitionError {
    /// [`Job`] is completed already.
    #[display("`Job` is completed already")]
    AlreadyCompleted,

    /// [`Job`] is cancelled already.
    #[display("`Job` is cancelled already")]
    AlreadyCancelled,
}

/// Proof of a [`Job`] completion.
#[derive(Clone, Debug)]
pub struct Proof {
    /// [`Kind`] of this [`Proof`].
    ///
    /// [`Kind`]: ProofKind
    pub kind: ProofKind,

    /// Reference to the stored artifact (URL or storage key).
    pub reference: ProofReference,

    /// [`DateTime`] when this [`Proof`] was attached.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: ProofDateTime,
}

define_kind! {
    #[doc = "Kind of a [`Job`] completion [`Proof`]."]
    enum ProofKind {
        #[doc = "Photo of the performed work."]
        Photo = 1,

        #[doc = "Signature of the [`Customer`]."]
        Signature = 2,
    }
}

/// Reference of a [`Proof`] artifact.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ProofReference(String);

impl ProofReference {
    /// Creates a new [`ProofReference`] if the given `reference` is valid.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Option<Self> {
        let reference = reference.into();
        (!reference.trim().is_empty() && reference.len() <= 512)
            .then_some(Self(reference))
    }
}

impl FromStr for ProofReference {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ProofReference`")
    }
}

/// Marker type indicating a [`Job`] schedule.
#[derive(Clone, Copy, Debug)]
pub struct Schedule;

/// [`Date`] a [`Job`] is scheduled on.
///
/// [`Date`]: common::Date
pub type ScheduledDate = DateOf<(Job, Schedule)>;

/// Marker type indicating a [`Job`] completion.
#[derive(Clone, Copy, Debug)]
pub struct Completion;

/// [`DateTime`] when a [`Job`] was completed.
///
/// [`DateTime`]: common::DateTime
pub type CompletionDateTime = DateTimeOf<(Job, Completion)>;

/// [`DateTime`] when a [`Proof`] was attached.
///
/// [`DateTime`]: common::DateTime
pub type ProofDateTime = DateTimeOf<(Proof, unit::Creation)>;

/// [`DateTime`] when a [`Job`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Job, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{DateTime, Percent};
    use rust_decimal::Decimal;

    use crate::domain::{assignment, contract, customer, employee, offer};

    use super::{CompletionError, Id, Job, Status, TransitionError};

    fn dt(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn job(status: Status) -> Job {
        Job {
            id: Id::new(),
            contract_id: Some(contract::Id::new()),
            customer_id: customer::Id::new(),
            service_name: "Office cleaning".parse().unwrap(),
            price: "120EUR".parse().unwrap(),
            vat: Percent::new(Decimal::from(19)).unwrap(),
            address: "Hauptstr. 1, 10115 Berlin".parse().unwrap(),
            checklist: offer::Checklist::default(),
            scheduled_date: "2024-03-01".parse().unwrap(),
            status,
            actual_duration: None,
            invoice_id: None,
            proofs: vec![],
            completed_at: None,
            created_at: DateTime::now().coerce(),
        }
    }

    fn tracked(start: &str, finish: &str) -> assignment::Assignment {
        let mut a = assignment::Assignment {
            id: assignment::Id::new(),
            job_id: Id::new(),
            employee_id: employee::Id::new(),
            status: assignment::Status::Pending,
            started_at: None,
            finished_at: None,
            created_at: DateTime::now().coerce(),
        };
        a.record(dt(start).coerce(), dt(finish).coerce()).unwrap();
        a
    }

    #[test]
    fn workable_only_until_terminal_status() {
        assert!(job(Status::Scheduled).ensure_workable().is_ok());
        assert!(job(Status::InProgress).ensure_workable().is_ok());

        assert_eq!(
            job(Status::Completed).ensure_workable(),
            Err(TransitionError::AlreadyCompleted),
        );
        assert_eq!(
            job(Status::Cancelled).ensure_workable(),
            Err(TransitionError::AlreadyCancelled),
        );
    }

    #[test]
    fn billable_once_completed_and_unbilled() {
        assert!(!job(Status::Scheduled).is_billable());
        assert!(!job(Status::Cancelled).is_billable());

        let mut j = job(Status::Completed);
        assert!(j.is_billable());

        j.invoice_id = Some(crate::domain::invoice::Id::new());
        assert!(!j.is_billable());
    }

    #[test]
    fn derived_duration_takes_the_longest_entry() {
        let assignments = vec![
            tracked("2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z"),
            tracked("2024-03-01T09:00:00Z", "2024-03-01T11:30:00Z"),
            tracked("2024-03-01T09:30:00Z", "2024-03-01T10:15:00Z"),
        ];

        assert_eq!(Job::derived_duration(&assignments), Some(150.into()));
    }

    #[test]
    fn settles_only_once_every_assignment_is_completed() {
        let done = tracked("2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z");
        let mut pending = tracked(
            "2024-03-01T09:00:00Z",
            "2024-03-01T10:00:00Z",
        );
        pending.status = assignment::Status::Pending;

        assert!(Job::assignments_settled(&[]));
        assert!(Job::assignments_settled(&[done.clone()]));
        assert!(!Job::assignments_settled(&[done, pending]));
    }

    #[test]
    fn derived_duration_ignores_incomplete_entries() {
        let mut running = tracked("2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z");
        running.finished_at = None;

        assert_eq!(Job::derived_duration(&[running]), None);
    }

    #[test]
    fn completion_prefers_the_explicit_duration() {
        let settled =
            vec![tracked("2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z")];

        assert_eq!(
            Job::completion_duration(&settled, Some(45.into()), false),
            Ok(45.into()),
        );
        assert_eq!(
            Job::completion_duration(&settled, None, false),
            Ok(60.into()),
        );
        assert_eq!(
            Job::completion_duration(&[], None, false),
            Err(CompletionError::NoDuration),
        );
    }

    #[test]
    fn completion_over_unsettled_assignments_requires_force() {
        let mut running =
            tracked("2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z");
        running.status = assignment::Status::InProgress;
        running.finished_at = None;
        let unsettled = vec![running];

        assert_eq!(
            Job::completion_duration(&unsettled, Some(90.into()), false),
            Err(CompletionError::AssignmentsPending),
        );
        assert_eq!(
            Job::completion_duration(&unsettled, Some(90.into()), true),
            Ok(90.into()),
        );

        // Forcing derives nothing: the duration must be explicit.
        assert_eq!(
            Job::completion_duration(&unsettled, None, true),
            Err(CompletionError::NoDuration),
        );
    }
}
