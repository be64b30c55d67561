//! [`Command`] for recording a manual time entry on an [`Assignment`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{assignment, employee, job, Assignment, Job},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a manual time entry on a pending
/// [`Assignment`].
///
/// A running entry must be stopped explicitly before a manual one may be
/// recorded.
#[derive(Clone, Copy, Debug)]
pub struct RecordManualTime {
    /// ID of the [`Job`] worked on.
    pub job_id: job::Id,

    /// ID of the working [`Employee`].
    ///
    /// [`Employee`]: crate::domain::Employee
    pub employee_id: employee::Id,

    /// [`DateTime`] the work started at.
    ///
    /// [`DateTime`]: common::DateTime
    pub started_at: assignment::StartDateTime,

    /// [`DateTime`] the work finished at.
    ///
    /// [`DateTime`]: common::DateTime
    pub finished_at: assignment::FinishDateTime,
}

impl<Db, Ext> Command<RecordManualTime> for Service<Db, Ext>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Job>, job::Id>>,
            Ok = Option<Job>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Assignment>, (job::Id, employee::Id)>>,
            Ok = Option<Assignment>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Job, job::Id>>, Err = Traced<database::Error>>
        + Database<Update<Assignment>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Assignment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordManualTime,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordManualTime {
            job_id,
            employee_id,
            started_at,
            finished_at,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Job`.
        tx.execute(Lock(By::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let job = tx
            .execute(Select(By::<Option<Job>, _>::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::JobNotExists(job_id))
            .map_err(tracerr::wrap!())?;
        job.ensure_workable()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let mut assignment = tx
            .execute(Select(By::<Option<Assignment>, _>::new((
                job_id,
                employee_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotAssigned {
                job_id,
                employee_id,
            })
            .map_err(tracerr::wrap!())?;

        assignment
            .record(started_at, finished_at)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        tx.execute(Update(assignment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(assignment)
    }
}

/// Error of [`RecordManualTime`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Job`] with the provided ID does not exist.
    #[display("`Job(id: {_0})` does not exist")]
    JobNotExists(#[error(not(source))] job::Id),

    /// [`Job`] cannot be worked on in its current state.
    #[display("`Job` cannot be worked on: {_0}")]
    #[from]
    JobTransition(job::TransitionError),

    /// [`Employee`] is not assigned to the [`Job`].
    ///
    /// [`Employee`]: crate::domain::Employee
    #[display(
        "`Employee(id: {employee_id})` is not assigned to `Job(id: {job_id})`"
    )]
    NotAssigned {
        /// ID of the [`Job`].
        job_id: job::Id,

        /// ID of the [`Employee`].
        ///
        /// [`Employee`]: crate::domain::Employee
        employee_id: employee::Id,
    },

    /// Provided time entry is invalid for the [`Assignment`]'s state.
    #[display("Time entry cannot be recorded: {_0}")]
    #[from]
    Transition(assignment::TransitionError),
}
