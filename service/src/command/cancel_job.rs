//! [`Command`] for cancelling a [`Job`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{job, Job},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for cancelling a [`Job`] that won't be performed.
#[derive(Clone, Copy, Debug)]
pub struct CancelJob {
    /// ID of the [`Job`] to cancel.
    pub job_id: job::Id,
}

impl<Db, Ext> Command<CancelJob> for Service<Db, Ext>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Job>, job::Id>>,
            Ok = Option<Job>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Job, job::Id>>, Err = Traced<database::Error>>
        + Database<Update<Job>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Job;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CancelJob) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelJob { job_id } = cmd;

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

        let mut job = tx
            .execute(Select(By::<Option<Job>, _>::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(job_id))
            .map_err(tracerr::wrap!())?;
        job.ensure_cancellable()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        job.status = job::Status::Cancelled;
        tx.execute(Update(job.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(job)
    }
}

/// Error of [`CancelJob`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Job`] with the provided ID does not exist.
    #[display("`Job(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] job::Id),

    /// [`Job`] cannot be cancelled in its current state.
    #[display("`Job` cannot be cancelled: {_0}")]
    #[from]
    Transition(job::TransitionError),
}
