//! [`Command`] for creating a new [`Contract`] manually.

use common::{
    operations::{By, Insert, Select},
    DateTime, Money, Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, customer, offer, Contract, Customer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`] without an originating
/// [`Offer`].
///
/// [`Offer`]: crate::domain::Offer
#[derive(Clone, Debug)]
pub struct CreateContract {
    /// ID of the [`Customer`] to make a [`Contract`] with.
    pub customer_id: customer::Id,

    /// Name of the provided service.
    pub service_name: contract::Name,

    /// Net price of a single execution.
    pub price: Money,

    /// VAT rate applied on billing.
    pub vat: Percent,

    /// Address the service is provided at.
    ///
    /// Defaults to the [`Customer`]'s billing address.
    pub address: Option<customer::Address>,

    /// Execution [`Interval`] of a new [`Contract`].
    ///
    /// [`Interval`]: contract::Interval
    pub interval: contract::Interval,

    /// [`Date`] of the first execution.
    ///
    /// [`Date`]: common::Date
    pub start_date: contract::StartDate,

    /// Checklist applied to generated [`Job`]s.
    ///
    /// [`Job`]: crate::domain::Job
    pub checklist: offer::Checklist,
}

impl<Db, Ext> Command<CreateContract> for Service<Db, Ext>
where
    Db: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            customer_id,
            service_name,
            price,
            vat,
            address,
            interval,
            start_date,
            checklist,
        } = cmd;

        let customer = self
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        let contract = Contract {
            id: contract::Id::new(),
            customer_id: customer.id,
            offer_id: None,
            service_name,
            price,
            vat,
            address: address.unwrap_or(customer.billing_address),
            interval,
            start_date,
            next_execution_date: Some(start_date.coerce()),
            checklist,
            is_active: true,
            paused_at: None,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(contract)
    }
}

/// Error of [`CreateContract`] [`Command`] execution.
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
