//! [`Command`] for sending an [`Offer`] out.

use common::{
    operations::{By, Commit, Lock, Notify, Select, Transact, Transacted, Update},
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{offer, Offer},
    infra::{database, external, Database, External},
    Service,
};

use super::Command;

/// [`Command`] for sending an [`Offer`] out to its [`Customer`].
///
/// Re-sending an already sent [`Offer`] is allowed.
///
/// [`Customer`]: crate::domain::Customer
#[derive(Clone, Copy, Debug)]
pub struct SendOffer {
    /// ID of the [`Offer`] to send.
    pub id: offer::Id,
}

impl<Db, Ext> Command<SendOffer> for Service<Db, Ext>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Offer, offer::Id>>, Err = Traced<database::Error>>
        + Database<Update<Offer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ext: External<
        Notify<external::Event>,
        Ok = (),
        Err = Traced<external::Error>,
    >,
{
    type Ok = Offer;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SendOffer) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SendOffer { id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent decisions upon the same `Offer`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut offer = tx
            .execute(Select(By::<Option<Offer>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        offer
            .ensure_sendable()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        if offer.is_expired(Date::today()) {
            return Err(tracerr::new!(E::Expired(id)));
        }

        offer.status = offer::Status::Sent;
        offer.sent_at = Some(DateTime::now().coerce());
        tx.execute(Update(offer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.external()
            .execute(Notify(external::Event::OfferSent {
                offer_id: offer.id,
                customer_id: offer.customer_id,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(offer)
    }
}

/// Error of [`SendOffer`] [`Command`] execution.
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

    /// [`Offer`] with the provided ID does not exist.
    #[display("`Offer(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] offer::Id),

    /// [`Offer`] cannot be sent in its current state.
    #[display("`Offer` cannot be sent: {_0}")]
    #[from]
    Transition(offer::TransitionError),

    /// [`Offer`] validity has expired.
    #[display("`Offer(id: {_0})` validity has expired")]
    Expired(#[error(not(source))] offer::Id),
}
