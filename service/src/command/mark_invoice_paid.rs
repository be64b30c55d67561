//! [`Command`] for marking an [`Invoice`] as paid.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{invoice, Invoice},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking a sent or overdue [`Invoice`] as paid.
///
/// The dunning history of the [`Invoice`] is preserved for auditing.
#[derive(Clone, Copy, Debug)]
pub struct MarkInvoicePaid {
    /// ID of the [`Invoice`] to settle.
    pub id: invoice::Id,
}

impl<Db, Ext> Command<MarkInvoicePaid> for Service<Db, Ext>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Invoice>, invoice::Id>>,
            Ok = Option<Invoice>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Invoice, invoice::Id>>, Err = Traced<database::Error>>
        + Database<Update<Invoice>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Invoice;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MarkInvoicePaid,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let MarkInvoicePaid { id } = cmd;

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
        invoice
            .ensure_payable()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        invoice.status = invoice::Status::Paid;
        invoice.paid_at = Some(DateTime::now().coerce());
        tx.execute(Update(invoice.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(invoice)
    }
}

/// Error of [`MarkInvoicePaid`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Invoice`] with the provided ID does not exist.
    #[display("`Invoice(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] invoice::Id),

    /// [`Invoice`] cannot be settled in its current state.
    #[display("`Invoice` cannot be settled: {_0}")]
    #[from]
    Transition(invoice::TransitionError),
}
