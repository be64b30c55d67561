//! [`Command`] for generating an [`Invoice`] for a [`Customer`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, invoice, Customer, Invoice, Job},
    infra::{database, Database},
    read::job::Unbilled,
    Service,
};

use super::Command;

/// [`Command`] for generating a draft [`Invoice`] aggregating all the billable
/// [`Job`]s of a [`Customer`].
#[derive(Clone, Copy, Debug)]
pub struct GenerateInvoice {
    /// ID of the [`Customer`] to bill.
    pub customer_id: customer::Id,
}

/// Outcome of a [`GenerateInvoice`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Generated [`Invoice`], or [`None`] if there was nothing to bill.
    pub invoice: Option<Invoice>,

    /// [`Job`]s billed on the [`Invoice`].
    pub jobs: Vec<Job>,
}

impl<Db, Ext> Command<GenerateInvoice> for Service<Db, Ext>
where
    Db: Database<
        Select<By<Option<Customer>, customer::Id>>,
        Ok = Option<Customer>,
        Err = Traced<database::Error>,
    > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Unbilled<Vec<Job>>, customer::Id>>,
            Ok = Unbilled<Vec<Job>>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Customer, customer::Id>>, Err = Traced<database::Error>>
        + Database<
            Insert<By<invoice::Number, i32>>,
            Ok = invoice::Number,
            Err = Traced<database::Error>,
        > + Database<Insert<Invoice>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Job>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GenerateInvoice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GenerateInvoice { customer_id } = cmd;

        _ = self
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent billing of the same `Customer`.
        tx.execute(Lock(By::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let Unbilled(mut jobs) = tx
            .execute(Select(By::<Unbilled<Vec<Job>>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let Some(totals) = invoice::Totals::of(&jobs)
            .map_err(tracerr::from_and_wrap!(=> E))?
        else {
            // Nothing to bill is a regular outcome, not a failure.
            return Ok(Output {
                invoice: None,
                jobs: vec![],
            });
        };

        // The counter row stays locked until the commit, serializing
        // allocations within the year.
        let number = tx
            .execute(Insert(By::<invoice::Number, _>::new(
                Date::today().year(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let now = DateTime::now();
        let invoice = Invoice {
            id: invoice::Id::new(),
            customer_id,
            number,
            status: invoice::Status::Draft,
            total_net: totals.net,
            total_vat: totals.vat,
            total_gross: totals.gross,
            issued_at: now.coerce(),
            due_date: None,
            dunning_level: invoice::DunningLevel::default(),
            last_dunning_at: None,
            sent_at: None,
            paid_at: None,
            created_at: now.coerce(),
        };
        tx.execute(Insert(invoice.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for job in &mut jobs {
            job.invoice_id = Some(invoice.id);
            tx.execute(Update(job.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output {
            invoice: Some(invoice),
            jobs,
        })
    }
}

/// Error of [`GenerateInvoice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// Billable [`Job`]s are priced in different currencies.
    #[display("`Job`s cannot be billed together: {_0}")]
    #[from]
    CurrencyMismatch(invoice::CurrencyMismatchError),
}
