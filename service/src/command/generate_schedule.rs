//! [`Command`] for generating [`Job`]s out of due [`Contract`]s.

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{contract, job, Contract, Job},
    infra::{database, Database},
    read::contract::Due,
    Service,
};

use super::Command;

/// [`Command`] for generating [`Job`]s out of all active [`Contract`]s whose
/// schedule cursor has reached the provided date.
///
/// One [`Job`] is created per missed occurrence, and the cursor is advanced
/// past the provided date. Each [`Contract`] is processed in its own
/// transaction, so a failing one never aborts the whole run.
#[derive(Clone, Copy, Debug)]
pub struct GenerateSchedule {
    /// [`Date`] to generate the schedule up to (inclusive).
    pub today: Date,
}

/// Output of [`GenerateSchedule`] [`Command`].
#[derive(Debug)]
pub struct Output {
    /// [`Job`]s generated by this run.
    pub generated: Vec<Job>,

    /// Per-[`Contract`] failures of this run.
    pub failures: Vec<Failure>,
}

/// Failure of generating [`Job`]s for a single [`Contract`].
#[derive(Debug)]
pub struct Failure {
    /// ID of the failed [`Contract`].
    pub contract_id: contract::Id,

    /// Error the [`Contract`] failed with.
    pub error: Traced<database::Error>,
}

impl<Db, Ext> Command<GenerateSchedule> for Service<Db, Ext>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Due<Vec<contract::Id>>, Date>>,
            Ok = Due<Vec<contract::Id>>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Job>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GenerateSchedule,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GenerateSchedule { today } = cmd;

        let Due(due) = self
            .database()
            .execute(Select(By::new(today)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut generated = Vec::new();
        let mut failures = Vec::new();
        for contract_id in due {
            match self.generate_for(contract_id, today).await {
                Ok(jobs) => generated.extend(jobs),
                Err(error) => {
                    log::warn!(
                        %contract_id,
                        "schedule generation failed: {error}",
                    );
                    failures.push(Failure { contract_id, error });
                }
            }
        }

        Ok(Output {
            generated,
            failures,
        })
    }
}

impl<Db, Ext> Service<Db, Ext>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Job>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    /// Generates [`Job`]s for a single due [`Contract`] inside its own
    /// transaction.
    async fn generate_for(
        &self,
        contract_id: contract::Id,
        today: Date,
    ) -> Result<Vec<Job>, Traced<database::Error>> {
        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        // Avoid concurrent generation upon the same `Contract`.
        tx.execute(Lock(By::new(contract_id)))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        // The cursor is re-read under the lock, so a concurrent run cannot
        // produce the same occurrence twice. The `(contract_id,
        // scheduled_date)` uniqueness constraint backstops it.
        let Some(mut contract) = tx
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(vec![]);
        };
        if !contract.is_active {
            return Ok(vec![]);
        }

        let (due_dates, cursor) = contract.due_dates(today);

        let mut jobs = Vec::with_capacity(due_dates.len());
        for date in due_dates {
            let job = Job {
                id: job::Id::new(),
                contract_id: Some(contract.id),
                customer_id: contract.customer_id,
                service_name: contract.service_name.clone(),
                price: contract.price,
                vat: contract.vat,
                address: contract.address.clone(),
                checklist: contract.checklist.clone(),
                scheduled_date: date.coerce(),
                status: job::Status::Scheduled,
                actual_duration: None,
                invoice_id: None,
                proofs: vec![],
                completed_at: None,
                created_at: DateTime::now().coerce(),
            };
            tx.execute(Insert(job.clone()))
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;
            jobs.push(job);
        }

        contract.next_execution_date = cursor;
        if cursor.is_none() {
            // A `ONCE` schedule is exhausted after its single occurrence.
            contract.is_active = false;
        }
        tx.execute(Update(contract))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(jobs)
    }
}

/// Error of [`GenerateSchedule`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
