//! [`Command`] for unassigning an [`Employee`] from a [`Job`].

use common::operations::{By, Commit, Delete, Lock, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{assignment, employee, job, Assignment, Job},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for unassigning an [`Employee`] from a [`Job`].
///
/// Only a pending [`Assignment`] may be removed: started or completed ones
/// carry tracked time.
#[derive(Clone, Copy, Debug)]
pub struct UnassignEmployee {
    /// ID of the [`Job`] to unassign from.
    pub job_id: job::Id,

    /// ID of the [`Employee`] to unassign.
    pub employee_id: employee::Id,
}

impl<Db, Ext> Command<UnassignEmployee> for Service<Db, Ext>
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
        + Database<
            Delete<By<Assignment, (job::Id, employee::Id)>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Assignment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UnassignEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UnassignEmployee {
            job_id,
            employee_id,
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

        let assignment = tx
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

        if assignment.status != assignment::Status::Pending {
            return Err(tracerr::new!(E::TimeTracked {
                job_id,
                employee_id,
            }));
        }

        tx.execute(Delete(By::new((job_id, employee_id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(assignment)
    }
}

/// Error of [`UnassignEmployee`] [`Command`] execution.
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
    Transition(job::TransitionError),

    /// [`Employee`] is not assigned to the [`Job`].
    #[display(
        "`Employee(id: {employee_id})` is not assigned to `Job(id: {job_id})`"
    )]
    NotAssigned {
        /// ID of the [`Job`].
        job_id: job::Id,

        /// ID of the [`Employee`].
        employee_id: employee::Id,
    },

    /// [`Assignment`] carries tracked time already.
    #[display(
        "`Assignment` of `Employee(id: {employee_id})` to \
         `Job(id: {job_id})` carries tracked time already"
    )]
    TimeTracked {
        /// ID of the [`Job`].
        job_id: job::Id,

        /// ID of the [`Employee`].
        employee_id: employee::Id,
    },
}
