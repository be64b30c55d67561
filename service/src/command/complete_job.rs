//! [`Command`] for completing a [`Job`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{job, Assignment, Job},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for closing out a [`Job`].
///
/// Every [`Assignment`] must have settled its time entry first, unless
/// [`force`] is set. The actual duration defaults to the longest
/// [`Assignment`] duration, overridable with an explicit value.
///
/// [`force`]: CompleteJob::force
#[derive(Clone, Debug)]
pub struct CompleteJob {
    /// ID of the [`Job`] to complete.
    pub job_id: job::Id,

    /// Explicit duration override, in whole minutes.
    pub duration: Option<job::DurationMinutes>,

    /// Completion [`Proof`]s to attach.
    ///
    /// [`Proof`]: job::Proof
    pub proofs: Vec<ProofInput>,

    /// Indicator whether to close the [`Job`] out over unsettled
    /// [`Assignment`]s.
    ///
    /// No duration can be derived then, so an explicit [`duration`] is
    /// required.
    ///
    /// [`duration`]: CompleteJob::duration
    pub force: bool,
}

/// Completion [`Proof`] provided to [`CompleteJob`].
///
/// [`Proof`]: job::Proof
#[derive(Clone, Debug)]
pub struct ProofInput {
    /// Kind of the [`Proof`].
    ///
    /// [`Proof`]: job::Proof
    pub kind: job::ProofKind,

    /// Reference to the stored artifact.
    pub reference: job::ProofReference,
}

impl<Db, Ext> Command<CompleteJob> for Service<Db, Ext>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Job>, job::Id>>,
            Ok = Option<Job>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Assignment>, job::Id>>,
            Ok = Vec<Assignment>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Job, job::Id>>, Err = Traced<database::Error>>
        + Database<Update<Job>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Job;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CompleteJob) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CompleteJob {
            job_id,
            duration,
            proofs,
            force,
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

        let mut job = tx
            .execute(Select(By::<Option<Job>, _>::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(job_id))
            .map_err(tracerr::wrap!())?;
        job.ensure_workable()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let assignments = tx
            .execute(Select(By::<Vec<Assignment>, _>::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let duration = Job::completion_duration(&assignments, duration, force)
            .map_err(|e| E::Completion(job_id, e))
            .map_err(tracerr::wrap!())?;

        let now = DateTime::now();
        job.status = job::Status::Completed;
        job.actual_duration = Some(duration);
        job.completed_at = Some(now.coerce());
        job.proofs
            .extend(proofs.into_iter().map(|p| job::Proof {
                kind: p.kind,
                reference: p.reference,
                created_at: now.coerce(),
            }));
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

/// Error of [`CompleteJob`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Job`] with the provided ID does not exist.
    #[display("`Job(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] job::Id),

    /// [`Job`] cannot be completed in its current state.
    #[display("`Job` cannot be completed: {_0}")]
    #[from]
    Transition(job::TransitionError),

    /// [`Job`] cannot be closed out with the provided inputs.
    #[display("`Job(id: {_0})` cannot be closed out: {_1}")]
    Completion(
        #[error(not(source))] job::Id,
        #[error(source)] job::CompletionError,
    ),
}
