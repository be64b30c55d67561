//! [`Command`] for assigning an [`Employee`] to a [`Job`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        assignment, employee, job, Absence, Assignment, Employee, Job,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for assigning an [`Employee`] to a [`Job`].
///
/// An [`Absence`] overlapping the [`Job`]'s scheduled date is an advisory,
/// not a hard block: the [`Assignment`] is only persisted over it once
/// [`acknowledge_absences`] is set, and the overlapping [`Absence`]s are
/// returned either way.
///
/// [`acknowledge_absences`]: AssignEmployee::acknowledge_absences
#[derive(Clone, Copy, Debug)]
pub struct AssignEmployee {
    /// ID of the [`Job`] to assign to.
    pub job_id: job::Id,

    /// ID of the [`Employee`] to assign.
    pub employee_id: employee::Id,

    /// Indicator whether to persist the [`Assignment`] despite overlapping
    /// [`Absence`]s.
    pub acknowledge_absences: bool,
}

/// Output of [`AssignEmployee`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Persisted [`Assignment`], or [`None`] if unacknowledged [`Absence`]s
    /// prevented it.
    pub assignment: Option<Assignment>,

    /// [`Absence`]s overlapping the [`Job`]'s scheduled date.
    pub conflicts: Vec<Absence>,
}

impl<Db, Ext> Command<AssignEmployee> for Service<Db, Ext>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Absence>, (employee::Id, job::ScheduledDate)>>,
            Ok = Vec<Absence>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Select<By<Option<Job>, job::Id>>,
            Ok = Option<Job>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Assignment>, (job::Id, employee::Id)>>,
            Ok = Option<Assignment>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Job, job::Id>>, Err = Traced<database::Error>>
        + Database<Insert<Assignment>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AssignEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignEmployee {
            job_id,
            employee_id,
            acknowledge_absences,
        } = cmd;

        let employee = self
            .database()
            .execute(Select(By::<Option<Employee>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;

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

        if tx
            .execute(Select(By::<Option<Assignment>, _>::new((
                job_id,
                employee_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some()
        {
            return Err(tracerr::new!(E::AlreadyAssigned {
                job_id,
                employee_id,
            }));
        }

        let conflicts = self
            .database()
            .execute(Select(By::<Vec<Absence>, _>::new((
                employee.id,
                job.scheduled_date,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if !conflicts.is_empty() && !acknowledge_absences {
            return Ok(Output {
                assignment: None,
                conflicts,
            });
        }

        let assignment = Assignment {
            id: assignment::Id::new(),
            job_id: job.id,
            employee_id: employee.id,
            status: assignment::Status::Pending,
            started_at: None,
            finished_at: None,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(assignment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output {
            assignment: Some(assignment),
            conflicts,
        })
    }
}

/// Error of [`AssignEmployee`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Job`] with the provided ID does not exist.
    #[display("`Job(id: {_0})` does not exist")]
    JobNotExists(#[error(not(source))] job::Id),

    /// [`Employee`] with the provided ID does not exist.
    #[display("`Employee(id: {_0})` does not exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),

    /// [`Job`] cannot be worked on in its current state.
    #[display("`Job` cannot be worked on: {_0}")]
    #[from]
    Transition(job::TransitionError),

    /// [`Employee`] is assigned to the [`Job`] already.
    #[display(
        "`Employee(id: {employee_id})` is assigned to `Job(id: {job_id})` \
         already"
    )]
    AlreadyAssigned {
        /// ID of the [`Job`].
        job_id: job::Id,

        /// ID of the [`Employee`].
        employee_id: employee::Id,
    },
}
