//! [`Command`] for sending an [`Invoice`] out.

use common::{
    operations::{
        By, Commit, Lock, Notify, Render, Select, Transact, Transacted, Update,
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

/// [`Command`] for sending a draft [`Invoice`] out to its [`Customer`].
///
/// [`Customer`]: crate::domain::Customer
#[derive(Clone, Copy, Debug)]
pub struct SendInvoice {
    /// ID of the [`Invoice`] to send.
    pub id: invoice::Id,
}

/// Outcome of a [`SendInvoice`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Sent [`Invoice`].
    pub invoice: Invoice,

    /// Rendered [`Invoice`] document.
    pub document: external::Document,
}

impl<Db, Ext> Command<SendInvoice> for Service<Db, Ext>
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
        > + External<
            Render<invoice::Id>,
            Ok = external::Document,
            Err = Traced<external::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SendInvoice) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SendInvoice { id } = cmd;

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
            .ensure_sendable()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let payment_days =
            i64::try_from(self.config().payment_terms.as_secs() / 86400)
                .unwrap_or(i64::MAX);
        invoice.status = invoice::Status::Sent;
        invoice.due_date = Some(
            Date::today()
                .plus_days(payment_days)
                .ok_or(E::DueDateOverflow)
                .map_err(tracerr::wrap!())?
                .coerce(),
        );
        invoice.sent_at = Some(DateTime::now().coerce());
        tx.execute(Update(invoice.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let document = self
            .external()
            .execute(Render(invoice.id))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        self.external()
            .execute(Notify(external::Event::InvoiceSent {
                invoice_id: invoice.id,
                customer_id: invoice.customer_id,
                number: invoice.number,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(Output { invoice, document })
    }
}

/// Error of [`SendInvoice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`External`] collaborator error.
    #[display("`External` collaborator failed: {_0}")]
    #[from]
    External(external::Error),

    /// [`Invoice`] with the provided ID does not exist.
    #[display("`Invoice(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] invoice::Id),

    /// [`Invoice`] cannot be sent in its current state.
    #[display("`Invoice` cannot be sent: {_0}")]
    #[from]
    Transition(invoice::TransitionError),

    /// Due [`Date`] does not fit into the calendar.
    ///
    /// [`Date`]: common::Date
    #[display("Due `Date` does not fit into the calendar")]
    DueDateOverflow,
}
