//! [`Assignment`] definitions.

use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{employee, job};
#[cfg(doc)]
use crate::domain::{Employee, Job};

/// [`Employee`] assigned to work on a [`Job`], with tracked time.
#[derive(Clone, Debug)]
pub struct Assignment {
    /// ID of this [`Assignment`].
    pub id: Id,

    /// ID of the [`Job`] worked on.
    pub job_id: job::Id,

    /// ID of the assigned [`Employee`].
    pub employee_id: employee::Id,

    /// [`Status`] of this [`Assignment`].
    pub status: Status,

    /// [`DateTime`] when the work was started, if it was.
    ///
    /// [`DateTime`]: common::DateTime
    pub started_at: Option<StartDateTime>,

    /// [`DateTime`] when the work was finished, if it was.
    ///
    /// [`DateTime`]: common::DateTime
    pub finished_at: Option<FinishDateTime>,

    /// [`DateTime`] when this [`Assignment`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

impl Assignment {
    /// Starts a time entry on this [`Assignment`].
    ///
    /// # Errors
    ///
    /// If a time entry was started or completed already.
    pub fn start(&mut self, at: StartDateTime) -> Result<(), TransitionError> {
        use TransitionError as E;

        match self.status {
            Status::Pending => {
                self.status = Status::InProgress;
                self.started_at = Some(at);
                Ok(())
            }
            Status::InProgress => Err(E::AlreadyStarted),
            Status::Completed => Err(E::AlreadyCompleted),
        }
    }

    /// Stops the running time entry on this [`Assignment`].
    ///
    /// # Errors
    ///
    /// If no time entry is running, or the provided `at` precedes the start.
    pub fn stop(&mut self, at: FinishDateTime) -> Result<(), TransitionError> {
        use TransitionError as E;

        match self.status {
            Status::InProgress => {
                let started =
                    self.started_at.ok_or(E::NotStarted)?;
                if at.coerce::<()>() <= started.coerce() {
                    return Err(E::EndBeforeStart);
                }
                self.status = Status::Completed;
                self.finished_at = Some(at);
                Ok(())
            }
            Status::Pending => Err(E::NotStarted),
            Status::Completed => Err(E::AlreadyCompleted),
        }
    }

    /// Records a manual time entry on this [`Assignment`].
    ///
    /// Only allowed while no time entry has been tracked: a running entry
    /// must be stopped explicitly first.
    ///
    /// # Errors
    ///
    /// If a time entry is running or completed already, or `finished` does
    /// not come after `started`.
    pub fn record(
        &mut self,
        started: StartDateTime,
        finished: FinishDateTime,
    ) -> Result<(), TransitionError> {
        use TransitionError as E;

        match self.status {
            Status::InProgress => return Err(E::AlreadyStarted),
            Status::Completed => return Err(E::AlreadyCompleted),
            Status::Pending => {}
        }
        if finished.coerce::<()>() <= started.coerce() {
            return Err(E::EndBeforeStart);
        }

        self.status = Status::Completed;
        self.started_at = Some(started);
        self.finished_at = Some(finished);
        Ok(())
    }

    /// Returns the tracked duration of this [`Assignment`] in whole minutes,
    /// rounded up.
    ///
    /// [`None`] is returned until the time entry is completed.
    #[must_use]
    pub fn duration(&self) -> Option<job::DurationMinutes> {
        let started = self.started_at?;
        let finished = self.finished_at?;
        let secs = (finished.coerce::<()>() - started.coerce()).as_secs();
        i32::try_from(secs.div_ceil(60))
            .ok()
            .map(job::DurationMinutes::from)
    }
}

/// ID of an [`Assignment`].
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
    #[doc = "Status of an [`Assignment`]."]
    enum Status {
        #[doc = "Assigned, no time entry yet."]
        Pending = 1,

        #[doc = "Time entry is running."]
        InProgress = 2,

        #[doc = "Time entry is completed."]
        Completed = 3,
    }
}

/// Error of an invalid [`Assignment`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum TransitionError {
    /// Time entry is running already.
    #[display("Time entry is running already")]
    AlreadyStarted,

    /// Time entry is completed already.
    #[display("Time entry is completed already")]
    AlreadyCompleted,

    /// No time entry has been started.
    #[display("No time entry has been started")]
    NotStarted,

    /// Time entry ends before it starts.
    #[display("Time entry ends before it starts")]
    EndBeforeStart,
}

/// Marker type indicating a work start.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type indicating a work finish.
#[derive(Clone, Copy, Debug)]
pub struct Finish;

/// [`DateTime`] when work on an [`Assignment`] was started.
///
/// [`DateTime`]: common::DateTime
pub type StartDateTime = DateTimeOf<(Assignment, Start)>;

/// [`DateTime`] when work on an [`Assignment`] was finished.
///
/// [`DateTime`]: common::DateTime
pub type FinishDateTime = DateTimeOf<(Assignment, Finish)>;

/// [`DateTime`] when an [`Assignment`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Assignment, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{employee, job};

    use super::{Assignment, Id, Status, TransitionError};

    fn dt(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn assignment() -> Assignment {
        Assignment {
            id: Id::new(),
            job_id: job::Id::new(),
            employee_id: employee::Id::new(),
            status: Status::Pending,
            started_at: None,
            finished_at: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn tracks_a_full_start_stop_cycle() {
        let mut a = assignment();

        a.start(dt("2024-03-01T09:00:00Z").coerce()).unwrap();
        assert_eq!(a.status, Status::InProgress);

        a.stop(dt("2024-03-01T10:30:00Z").coerce()).unwrap();
        assert_eq!(a.status, Status::Completed);
        assert_eq!(a.duration(), Some(90.into()));
    }

    #[test]
    fn rejects_double_start_and_stop_without_start() {
        let mut a = assignment();

        assert_eq!(
            a.stop(dt("2024-03-01T10:00:00Z").coerce()),
            Err(TransitionError::NotStarted),
        );

        a.start(dt("2024-03-01T09:00:00Z").coerce()).unwrap();
        assert_eq!(
            a.start(dt("2024-03-01T09:05:00Z").coerce()),
            Err(TransitionError::AlreadyStarted),
        );
    }

    #[test]
    fn rejects_stop_not_after_start() {
        let mut a = assignment();
        a.start(dt("2024-03-01T09:00:00Z").coerce()).unwrap();

        assert_eq!(
            a.stop(dt("2024-03-01T09:00:00Z").coerce()),
            Err(TransitionError::EndBeforeStart),
        );
        assert_eq!(
            a.stop(dt("2024-03-01T08:59:00Z").coerce()),
            Err(TransitionError::EndBeforeStart),
        );
    }

    #[test]
    fn manual_entry_completes_a_pending_assignment() {
        let mut a = assignment();

        a.record(
            dt("2024-03-01T13:00:00Z").coerce(),
            dt("2024-03-01T14:15:00Z").coerce(),
        )
        .unwrap();
        assert_eq!(a.status, Status::Completed);
        assert_eq!(a.duration(), Some(75.into()));

        assert_eq!(
            a.record(
                dt("2024-03-01T15:00:00Z").coerce(),
                dt("2024-03-01T16:00:00Z").coerce(),
            ),
            Err(TransitionError::AlreadyCompleted),
        );
    }

    #[test]
    fn manual_entry_rejects_a_running_one() {
        let mut a = assignment();
        a.start(dt("2024-03-01T09:00:00Z").coerce()).unwrap();

        assert_eq!(
            a.record(
                dt("2024-03-01T13:00:00Z").coerce(),
                dt("2024-03-01T14:15:00Z").coerce(),
            ),
            Err(TransitionError::AlreadyStarted),
        );
        assert_eq!(a.status, Status::InProgress);
        assert_eq!(a.finished_at, None);
    }

    #[test]
    fn manual_entry_requires_a_positive_span() {
        let mut a = assignment();

        assert_eq!(
            a.record(
                dt("2024-03-01T14:00:00Z").coerce(),
                dt("2024-03-01T13:00:00Z").coerce(),
            ),
            Err(TransitionError::EndBeforeStart),
        );
        assert_eq!(a.status, Status::Pending);
    }

    #[test]
    fn partial_minutes_round_up() {
        let mut a = assignment();
        a.record(
            dt("2024-03-01T09:00:00Z").coerce(),
            dt("2024-03-01T09:10:30Z").coerce(),
        )
        .unwrap();

        assert_eq!(a.duration(), Some(11.into()));
    }
}
