//! [`Command`] for creating an ad-hoc [`Job`].

use common::{
    operations::{By, Insert, Select},
    DateTime, Money, Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, customer, job, offer, Customer, Job},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating an ad-hoc [`Job`], outside any [`Contract`]
/// schedule.
///
/// [`Contract`]: crate::domain::Contract
#[derive(Clone, Debug)]
pub struct CreateJob {
    /// ID of the [`Customer`] the [`Job`] is performed for.
    pub customer_id: customer::Id,

    /// Name of the performed service.
    pub service_name: contract::Name,

    /// Net price of a new [`Job`].
    pub price: Money,

    /// VAT rate applied on billing.
    pub vat: Percent,

    /// Address the [`Job`] is performed at.
    ///
    /// Defaults to the [`Customer`]'s billing address.
    pub address: Option<customer::Address>,

    /// Checklist of steps to perform.
    pub checklist: offer::Checklist,

    /// [`Date`] the [`Job`] is scheduled on.
    ///
    /// [`Date`]: common::Date
    pub scheduled_date: job::ScheduledDate,
}

impl<Db, Ext> Command<CreateJob> for Service<Db, Ext>
where
    Db: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<Insert<Job>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Job;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateJob) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateJob {
            customer_id,
            service_name,
            price,
            vat,
            address,
            checklist,
            scheduled_date,
        } = cmd;

        let customer = self
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        let job = Job {
            id: job::Id::new(),
            contract_id: None,
            customer_id: customer.id,
            service_name,
            price,
            vat,
            address: address.unwrap_or(customer.billing_address),
            checklist,
            scheduled_date,
            status: job::Status::Scheduled,
            actual_duration: None,
            invoice_id: None,
            proofs: vec![],
            completed_at: None,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(job.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(job)
    }
}

/// Error of [`CreateJob`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),
}
