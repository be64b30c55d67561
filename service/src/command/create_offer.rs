//! [`Command`] for creating a new [`Offer`].

use common::{operations::{By, Insert, Select}, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, customer, offer, Customer, Offer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Offer`] in a draft state.
#[derive(Clone, Debug)]
pub struct CreateOffer {
    /// ID of the [`Customer`] to make an [`Offer`] to.
    pub customer_id: customer::Id,

    /// Name of the proposed service.
    pub service_name: contract::Name,

    /// Priced [`offer::LineItem`]s of a new [`Offer`].
    pub items: Vec<offer::LineItem>,

    /// VAT rate applied on billing under the resulting [`Contract`].
    ///
    /// [`Contract`]: crate::domain::Contract
    pub vat: common::Percent,

    /// Proposed execution [`Interval`].
    ///
    /// [`Interval`]: contract::Interval
    pub interval: contract::Interval,

    /// Preferred [`offer::TimeOfDay`] for executions, if any.
    pub preferred_time: Option<offer::TimeOfDay>,

    /// [`offer::Checklist`] applied to the resulting [`Contract`].
    ///
    /// [`Contract`]: crate::domain::Contract
    pub checklist: offer::Checklist,

    /// [`Date`] a new [`Offer`] is valid until (inclusive), if limited.
    ///
    /// [`Date`]: common::Date
    pub valid_until: Option<offer::ValidityDate>,
}

impl<Db, Ext> Command<CreateOffer> for Service<Db, Ext>
where
    Db: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<Insert<Offer>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Offer;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateOffer) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateOffer {
            customer_id,
            service_name,
            items,
            vat,
            interval,
            preferred_time,
            checklist,
            valid_until,
        } = cmd;

        let customer = self
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        let offer = Offer {
            id: offer::Id::new(),
            customer_id: customer.id,
            service_name,
            items,
            vat,
            interval,
            preferred_time,
            checklist,
            valid_until,
            status: offer::Status::Draft,
            sent_at: None,
            decided_at: None,
            signature: None,
            created_at: DateTime::now().coerce(),
        };
        // Single-currency pricing is validated upfront, so a later conversion
        // into a `Contract` cannot fail on it.
        _ = offer.total_price().map_err(tracerr::from_and_wrap!(=> E))?;

        self.database()
            .execute(Insert(offer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(offer)
    }
}

/// Error of [`CreateOffer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// Provided [`offer::LineItem`]s cannot be priced.
    #[display("Cannot price the provided `LineItem`s: {_0}")]
    #[from]
    Pricing(offer::PricingError),
}
