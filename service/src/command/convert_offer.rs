//! [`Command`] for converting an accepted [`Offer`] into a [`Contract`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Notify, Select, Transact, Transacted, Update,
    },
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, customer, offer, Contract, Customer, Offer},
    infra::{database, external, Database, External},
    Service,
};

use super::Command;

/// [`Command`] for deciding a sent [`Offer`].
///
/// Either converts the [`Offer`] into a [`Contract`] right away, or, with
/// [`send_link`], mints a single-use signing token and defers the conversion
/// to [`CompleteOfferSigning`].
///
/// [`CompleteOfferSigning`]: super::CompleteOfferSigning
/// [`send_link`]: ConvertOffer::send_link
#[derive(Clone, Copy, Debug)]
pub struct ConvertOffer {
    /// ID of the [`Offer`] to convert.
    pub offer_id: offer::Id,

    /// [`Date`] of the first execution under the resulting [`Contract`].
    ///
    /// Defaults to the current date.
    pub start_date: Option<contract::StartDate>,

    /// Indicator whether to mint a signing token instead of converting
    /// immediately.
    pub send_link: bool,
}

/// Output of [`ConvertOffer`] [`Command`].
#[derive(Clone, Debug)]
pub enum Output {
    /// [`Offer`] has been accepted and converted into a [`Contract`].
    Converted {
        /// Accepted [`Offer`].
        offer: Offer,

        /// [`Contract`] created from the [`Offer`].
        contract: Contract,
    },

    /// Signing link has been minted, conversion is deferred.
    SigningLink {
        /// [`Offer`] awaiting its signature.
        offer: Offer,

        /// Minted signing [`Token`].
        ///
        /// [`Token`]: offer::signing::Token
        token: offer::signing::Token,

        /// [`DateTime`] when the [`Token`] expires.
        ///
        /// [`DateTime`]: common::DateTime
        /// [`Token`]: offer::signing::Token
        expires_at: offer::signing::ExpirationDateTime,
    },
}

impl<Db, Ext> Command<ConvertOffer> for Service<Db, Ext>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Offer, offer::Id>>, Err = Traced<database::Error>>
        + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Update<Offer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ext: External<
        Notify<external::Event>,
        Ok = (),
        Err = Traced<external::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ConvertOffer) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ConvertOffer {
            offer_id,
            start_date,
            send_link,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent decisions upon the same `Offer`.
        tx.execute(Lock(By::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut offer = tx
            .execute(Select(By::<Option<Offer>, _>::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(offer_id))
            .map_err(tracerr::wrap!())?;

        offer
            .ensure_decidable()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        if offer.is_expired(Date::today()) {
            return Err(tracerr::new!(E::Expired(offer_id)));
        }

        if send_link {
            let expires_at =
                (DateTime::now() + self.config().signing_ttl).coerce();
            let token = jsonwebtoken::encode::<offer::signing::Claims>(
                &jsonwebtoken::Header::default(),
                &offer::signing::Claims {
                    offer_id: offer.id,
                    expires_at,
                    fingerprint: offer.fingerprint(),
                },
                &self.config().signing_encoding_key,
            )
            .map_err(tracerr::from_and_wrap!(=> E))?;

            // SAFETY: `jsonwebtoken::encode` always returns a valid
            //         `signing::Token`.
            #[expect(unsafe_code, reason = "invariants are preserved")]
            let token = unsafe { offer::signing::Token::new_unchecked(token) };

            tx.execute(Commit)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            self.external()
                .execute(Notify(external::Event::SignatureRequested {
                    offer_id: offer.id,
                    customer_id: offer.customer_id,
                    token: token.clone(),
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;

            return Ok(Output::SigningLink {
                offer,
                token,
                expires_at,
            });
        }

        let customer = self
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(offer.customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(offer.customer_id))
            .map_err(tracerr::wrap!())?;

        let contract = contract_of(&offer, &customer, start_date)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        offer.status = offer::Status::Accepted;
        offer.decided_at = Some(DateTime::now().coerce());
        tx.execute(Update(offer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output::Converted { offer, contract })
    }
}

/// Builds a [`Contract`] out of the provided accepted [`Offer`].
pub(super) fn contract_of(
    offer: &Offer,
    customer: &Customer,
    start_date: Option<contract::StartDate>,
) -> Result<Contract, offer::PricingError> {
    let start_date = start_date.unwrap_or_else(|| Date::today().coerce());
    Ok(Contract {
        id: contract::Id::new(),
        customer_id: offer.customer_id,
        offer_id: Some(offer.id),
        service_name: offer.service_name.clone(),
        price: offer.total_price()?,
        vat: offer.vat,
        address: customer.billing_address.clone(),
        interval: offer.interval,
        start_date,
        next_execution_date: Some(start_date.coerce()),
        checklist: offer.checklist.clone(),
        is_active: true,
        paused_at: None,
        created_at: DateTime::now().coerce(),
    })
}

/// Error of [`ConvertOffer`] [`Command`] execution.
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

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    #[from]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`Offer`] with the provided ID does not exist.
    #[display("`Offer(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] offer::Id),

    /// [`Customer`] of the [`Offer`] does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Offer`] cannot be decided in its current state.
    #[display("`Offer` cannot be decided: {_0}")]
    #[from]
    Transition(offer::TransitionError),

    /// [`Offer`] validity has expired.
    #[display("`Offer(id: {_0})` validity has expired")]
    Expired(#[error(not(source))] offer::Id),

    /// [`Offer`]'s [`offer::LineItem`]s cannot be priced.
    #[display("Cannot price the `Offer`'s `LineItem`s: {_0}")]
    #[from]
    Pricing(offer::PricingError),
}
