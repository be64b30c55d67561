//! External collaborators of the service.

use common::{
    operations::{Notify, Render},
    Date,
};
use derive_more::Display;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{Customer, Employee, Invoice, Offer};
use crate::domain::{customer, invoice, offer};

/// External collaborator of the service.
pub use common::Handler as External;

/// Event the service notifies an [`External`] collaborator about.
#[derive(Clone, Debug)]
pub enum Event {
    /// [`Offer`] has been sent to a [`Customer`].
    OfferSent {
        /// ID of the sent [`Offer`].
        offer_id: offer::Id,

        /// ID of the receiving [`Customer`].
        customer_id: customer::Id,
    },

    /// [`Customer`] has been asked to sign an [`Offer`].
    SignatureRequested {
        /// ID of the [`Offer`] to sign.
        offer_id: offer::Id,

        /// ID of the signing [`Customer`].
        customer_id: customer::Id,

        /// One-off signing [`offer::signing::Token`].
        token: offer::signing::Token,
    },

    /// [`Invoice`] has been sent to a [`Customer`].
    InvoiceSent {
        /// ID of the sent [`Invoice`].
        invoice_id: invoice::Id,

        /// ID of the receiving [`Customer`].
        customer_id: customer::Id,

        /// [`invoice::Number`] of the sent [`Invoice`].
        number: invoice::Number,
    },

    /// Dunning of an [`Invoice`] has been escalated.
    DunningEscalated {
        /// ID of the escalated [`Invoice`].
        invoice_id: invoice::Id,

        /// ID of the owing [`Customer`].
        customer_id: customer::Id,

        /// Reached [`invoice::DunningLevel`].
        level: invoice::DunningLevel,
    },
}

/// Period a payroll document is rendered for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PayrollPeriod {
    /// First [`Date`] of the period (inclusive).
    pub start: Date,

    /// Last [`Date`] of the period (inclusive).
    pub end: Date,
}

/// Opaque document produced by an [`External`] renderer.
#[derive(Clone, Debug)]
pub struct Document {
    /// File name of this [`Document`].
    pub name: String,

    /// MIME type of this [`Document`].
    pub mime: String,

    /// Raw bytes of this [`Document`].
    pub bytes: Vec<u8>,
}

/// Error of an [`External`] collaborator operation.
#[derive(Debug, Display, derive_more::Error)]
#[display("`External` collaborator failed: {_0}")]
pub struct Error(#[error(not(source))] pub String);

/// [`External`] collaborator writing everything to logs.
///
/// Ships as the default, so the service is fully operational without any
/// delivery or rendering infrastructure attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct Log;

impl External<Notify<Event>> for Log {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Notify(event): Notify<Event>,
    ) -> Result<Self::Ok, Self::Err> {
        match event {
            Event::OfferSent {
                offer_id,
                customer_id,
            } => {
                log::info!(%offer_id, %customer_id, "offer sent");
            }
            Event::SignatureRequested {
                offer_id,
                customer_id,
                token: _,
            } => {
                log::info!(%offer_id, %customer_id, "signature requested");
            }
            Event::InvoiceSent {
                invoice_id,
                customer_id,
                number,
            } => {
                log::info!(%invoice_id, %customer_id, %number, "invoice sent");
            }
            Event::DunningEscalated {
                invoice_id,
                customer_id,
                level,
            } => {
                log::info!(
                    %invoice_id, %customer_id, %level,
                    "dunning escalated",
                );
            }
        }
        Ok(())
    }
}

impl External<Render<invoice::Id>> for Log {
    type Ok = Document;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Render(id): Render<invoice::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        log::debug!(invoice_id = %id, "rendering invoice placeholder");
        Ok(Document {
            name: format!("invoice-{id}.txt"),
            mime: "text/plain".into(),
            bytes: format!("Invoice {id}\n").into_bytes(),
        })
    }
}

impl External<Render<PayrollPeriod>> for Log {
    type Ok = Document;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Render(period): Render<PayrollPeriod>,
    ) -> Result<Self::Ok, Self::Err> {
        let PayrollPeriod { start, end } = period;
        log::debug!(%start, %end, "rendering payroll placeholder");
        Ok(Document {
            name: format!("payroll-{start}-{end}.txt"),
            mime: "text/plain".into(),
            bytes: format!("Payroll {start}..{end}\n").into_bytes(),
        })
    }
}
