//! [`Command`] for completing a deferred [`Offer`] signing.

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, offer, Contract, Customer, Offer},
    infra::{database, Database},
    Service,
};

use super::{convert_offer::contract_of, Command};

/// [`Command`] for completing an [`Offer`] signing started by
/// [`ConvertOffer`] with a signing link.
///
/// Validates the signing token, stores the captured signature artifact
/// reference, and performs the deferred conversion into a [`Contract`].
///
/// [`ConvertOffer`]: super::ConvertOffer
#[derive(Clone, Debug)]
pub struct CompleteOfferSigning {
    /// Single-use signing [`Token`].
    ///
    /// [`Token`]: offer::signing::Token
    pub token: offer::signing::Token,

    /// Reference to the captured signature artifact.
    pub signature: offer::SignatureReference,
}

/// Output of [`CompleteOfferSigning`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Signed [`Offer`].
    pub offer: Offer,

    /// [`Contract`] created from the [`Offer`].
    pub contract: Contract,
}

impl<Db, Ext> Command<CompleteOfferSigning> for Service<Db, Ext>
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
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CompleteOfferSigning,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CompleteOfferSigning { token, signature } = cmd;

        let claims = jsonwebtoken::decode::<offer::signing::Claims>(
            token.as_ref(),
            &self.config().signing_decoding_key,
            &jsonwebtoken::Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent decisions upon the same `Offer`.
        tx.execute(Lock(By::new(claims.offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut offer = tx
            .execute(Select(By::<Option<Offer>, _>::new(claims.offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(claims.offer_id))
            .map_err(tracerr::wrap!())?;

        offer
            .ensure_decidable()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        // A token minted before the `Offer`'s items changed must not sign the
        // changed content.
        if offer.fingerprint() != claims.fingerprint {
            return Err(tracerr::new!(E::StaleToken(offer.id)));
        }

        let customer = self
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(offer.customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(offer.customer_id))
            .map_err(tracerr::wrap!())?;

        let contract = contract_of(&offer, &customer, None)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        offer.status = offer::Status::Accepted;
        offer.decided_at = Some(DateTime::now().coerce());
        offer.signature = Some(signature);
        tx.execute(Update(offer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { offer, contract })
    }
}

/// Error of [`CompleteOfferSigning`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Signing token is invalid or expired.
    #[display("Invalid signing token: {_0}")]
    #[from]
    InvalidToken(jsonwebtoken::errors::Error),

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

    /// Signing token was minted for a different [`Offer`] content.
    #[display("Signing token is stale for `Offer(id: {_0})`")]
    StaleToken(#[error(not(source))] offer::Id),

    /// [`Offer`]'s [`offer::LineItem`]s cannot be priced.
    #[display("Cannot price the `Offer`'s `LineItem`s: {_0}")]
    #[from]
    Pricing(offer::PricingError),
}
