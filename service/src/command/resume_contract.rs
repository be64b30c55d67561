//! [`Command`] for resuming a paused [`Contract`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for resuming a paused [`Contract`].
///
/// The schedule cursor is fast-forwarded past the paused period, so no
/// [`Job`]s are generated retroactively for it.
///
/// [`Job`]: crate::domain::Job
#[derive(Clone, Copy, Debug)]
pub struct ResumeContract {
    /// ID of the [`Contract`] to resume.
    pub id: contract::Id,
}

impl<Db, Ext> Command<ResumeContract> for Service<Db, Ext>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ResumeContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ResumeContract { id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing the schedule generation upon the same `Contract`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        if contract.is_active {
            return Err(tracerr::new!(E::NotPaused(id)));
        }

        // Skip the occurrences missed while paused.
        let today = Date::today();
        let mut cursor = contract.next_execution_date;
        while let Some(next) = cursor {
            if next.coerce() >= today {
                break;
            }
            cursor = contract
                .interval
                .advance(next.coerce())
                .map(common::DateOf::coerce);
        }

        contract.is_active = true;
        contract.paused_at = None;
        contract.next_execution_date = cursor;
        tx.execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`ResumeContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] contract::Id),

    /// [`Contract`] is not paused.
    #[display("`Contract(id: {_0})` is not paused")]
    NotPaused(#[error(not(source))] contract::Id),
}
