//! [`Command`] for escalating the dunning of an [`Invoice`].

use common::{
    operations::{
        By, Commit, Lock, Notify, Select, Transact, Transacted, Update,
    },
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{invoice, Invoice},
    infra::{database, external, Database, External},
    Service,
};

use super::Command;

/// [`Command`] for escalating the dunning of an overdue [`Invoice`] by one
/// [`DunningLevel`].
///
/// A sent [`Invoice`] already past its due date is marked as overdue on the
/// way, without waiting for the periodic detection.
///
/// Escalations never happen automatically: an operator triggers each one.
///
/// [`DunningLevel`]: invoice::DunningLevel
#[derive(Clone, Copy, Debug)]
pub struct ExecuteDunning {
    /// ID of the [`Invoice`] to escalate.
    pub id: invoice::Id,
}

impl<Db, Ext> Command<ExecuteDunning> for Service<Db, Ext>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Invoice>, invoice::Id>>,
            Ok = Option<Invoice>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Invoice, invoice::Id>>, Err = Traced<database::Error>>
        + Database<Update<Invoice>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ext: External<
        Notify<external::Event>,
        Ok = (),
        Err = Traced<external::Error>,
    >,
{
    type Ok = Invoice;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ExecuteDunning,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ExecuteDunning { id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Invoice`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut invoice = tx
            .execute(Select(By::<Option<Invoice>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        let level = invoice
            .escalate(
                Date::today(),
                DateTime::now().coerce(),
                self.config().dunning_cooldown,
            )
            .map_err(tracerr::from_and_wrap!(=> E))?;
        tx.execute(Update(invoice.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.external()
            .execute(Notify(external::Event::DunningEscalated {
                invoice_id: invoice.id,
                customer_id: invoice.customer_id,
                level,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(invoice)
    }
}

/// Error of [`ExecuteDunning`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`External`] notifier error.
    #[display("`External` notifier failed: {_0}")]
    #[from]
    Notify(external::Error),

    /// [`Invoice`] with the provided ID does not exist.
    #[display("`Invoice(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] invoice::Id),

    /// [`Invoice`] cannot be escalated.
    #[display("Dunning cannot be escalated: {_0}")]
    #[from]
    Escalation(invoice::EscalationError),
}
