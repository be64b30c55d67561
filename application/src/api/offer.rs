//! [`Offer`]-related definitions.

use std::future;

use common::{Date, DateTime, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::{command, domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A priced offer prepared for a customer.
#[derive(Clone, Debug, From)]
pub struct Offer {
    /// ID of this [`Offer`].
    pub id: Id,

    /// Underlying [`domain::Offer`].
    offer: OnceCell<domain::Offer>,
}

impl From<domain::Offer> for Offer {
    fn from(offer: domain::Offer) -> Self {
        Self {
            id: offer.id.into(),
            offer: OnceCell::new_with(Some(offer)),
        }
    }
}

impl Offer {
    /// Creates a new [`Offer`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Offer`] with the provided ID exists,
    /// otherwise accessing this [`Offer`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            offer: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Offer`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Offer`] doesn't exist.
    async fn offer(&self, ctx: &Context) -> Result<&domain::Offer, Error> {
        let id = self.id.into();
        self.offer
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::offer::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|o| {
                        future::ready(o.ok_or_else(|| {
                            api::query::OfferError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A priced offer prepared for a customer.
#[graphql_object(context = Context)]
impl Offer {
    /// Unique identifier of this `Offer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Customer` this `Offer` is prepared for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.customer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        let customer_id = self.offer(ctx).await?.customer_id;
        #[expect(
            unsafe_code,
            reason = "`Offer` loaded from repository guarantees `Customer` \
                      existence"
        )]
        Ok(unsafe { api::Customer::new_unchecked(customer_id) })
    }

    /// Name of the offered service.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.serviceName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn service_name(
        &self,
        ctx: &Context,
    ) -> Result<api::contract::Name, Error> {
        Ok(self.offer(ctx).await?.service_name.clone().into())
    }

    /// Line items this `Offer` is priced with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.items",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn items(&self, ctx: &Context) -> Result<Vec<LineItem>, Error> {
        Ok(self
            .offer(ctx)
            .await?
            .items
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// VAT rate applied on billing.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.vat",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn vat(&self, ctx: &Context) -> Result<Percent, Error> {
        Ok(self.offer(ctx).await?.vat)
    }

    /// Execution interval of the offered service.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.interval",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn interval(
        &self,
        ctx: &Context,
    ) -> Result<api::contract::Interval, Error> {
        Ok(self.offer(ctx).await?.interval.into())
    }

    /// Preferred time of day of the executions.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.preferredTime",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn preferred_time(
        &self,
        ctx: &Context,
    ) -> Result<Option<TimeOfDay>, Error> {
        Ok(self.offer(ctx).await?.preferred_time.map(Into::into))
    }

    /// Checklist of steps applied to generated `Job`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.checklist",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn checklist(&self, ctx: &Context) -> Result<Vec<String>, Error> {
        Ok(self.offer(ctx).await?.checklist.as_ref().to_vec())
    }

    /// `Date` this `Offer` remains valid until (inclusive).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.validUntil",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn valid_until(
        &self,
        ctx: &Context,
    ) -> Result<Option<Date>, Error> {
        Ok(self.offer(ctx).await?.valid_until.map(|d| d.coerce()))
    }

    /// Status of this `Offer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.offer(ctx).await?.status.into())
    }

    /// `DateTime` when this `Offer` was sent to the `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.sentAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn sent_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.offer(ctx).await?.sent_at.map(|at| at.coerce()))
    }

    /// `DateTime` when this `Offer` was accepted or rejected.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.decidedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn decided_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.offer(ctx).await?.decided_at.map(|at| at.coerce()))
    }

    /// Reference to the stored signature artifact, if signed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.signature",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn signature(
        &self,
        ctx: &Context,
    ) -> Result<Option<SignatureReference>, Error> {
        Ok(self.offer(ctx).await?.signature.clone().map(Into::into))
    }

    /// Total net price of this `Offer`, if its items are consistent.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.totalPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_price(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        Ok(self.offer(ctx).await?.total_price().ok())
    }

    /// `DateTime` when this `Offer` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Offer.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.offer(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of an `Offer`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::offer::Id)]
#[into(domain::offer::Id)]
#[graphql(name = "OfferId", transparent)]
pub struct Id(Uuid);

/// Line item of an `Offer`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "OfferLineItem")]
pub struct LineItem {
    /// Description of this line item.
    pub description: ItemDescription,

    /// Net price of this line item.
    pub price: Money,
}

impl From<domain::offer::LineItem> for LineItem {
    fn from(item: domain::offer::LineItem) -> Self {
        let domain::offer::LineItem { description, price } = item;
        Self {
            description: description.into(),
            price,
        }
    }
}

/// Line item provided on `Offer` creation.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "OfferLineItemInput")]
pub struct LineItemInput {
    /// Description of the line item.
    pub description: ItemDescription,

    /// Net price of the line item.
    pub price: Money,
}

impl From<LineItemInput> for domain::offer::LineItem {
    fn from(input: LineItemInput) -> Self {
        let LineItemInput { description, price } = input;
        Self {
            description: description.into(),
            price,
        }
    }
}

/// Description of an `Offer` line item.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "OfferItemDescription",
    with = scalar::Via::<domain::offer::ItemDescription>,
)]
pub struct ItemDescription(domain::offer::ItemDescription);

/// Reference to a stored signature artifact of an `Offer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "OfferSignatureReference",
    with = scalar::Via::<domain::offer::SignatureReference>,
)]
pub struct SignatureReference(domain::offer::SignatureReference);

/// Signing token of an `Offer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "OfferSigningToken",
    with = scalar::Via::<domain::offer::signing::Token>,
)]
pub struct SigningToken(domain::offer::signing::Token);

/// Status of an `Offer`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "OfferStatus")]
pub enum Status {
    /// Being drafted, not sent to the `Customer` yet.
    Draft,

    /// Sent to the `Customer`, awaiting a decision.
    Sent,

    /// Accepted by the `Customer`.
    Accepted,

    /// Rejected by the `Customer`.
    Rejected,
}

impl From<domain::offer::Status> for Status {
    fn from(status: domain::offer::Status) -> Self {
        use domain::offer::Status as S;
        match status {
            S::Draft => Self::Draft,
            S::Sent => Self::Sent,
            S::Accepted => Self::Accepted,
            S::Rejected => Self::Rejected,
        }
    }
}

impl From<Status> for domain::offer::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => Self::Draft,
            Status::Sent => Self::Sent,
            Status::Accepted => Self::Accepted,
            Status::Rejected => Self::Rejected,
        }
    }
}

/// Preferred time of day of the offered executions.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "OfferTimeOfDay")]
pub enum TimeOfDay {
    /// Morning hours.
    Morning,

    /// Afternoon hours.
    Afternoon,

    /// Evening hours.
    Evening,
}

impl From<domain::offer::TimeOfDay> for TimeOfDay {
    fn from(time: domain::offer::TimeOfDay) -> Self {
        use domain::offer::TimeOfDay as T;
        match time {
            T::Morning => Self::Morning,
            T::Afternoon => Self::Afternoon,
            T::Evening => Self::Evening,
        }
    }
}

impl From<TimeOfDay> for domain::offer::TimeOfDay {
    fn from(time: TimeOfDay) -> Self {
        match time {
            TimeOfDay::Morning => Self::Morning,
            TimeOfDay::Afternoon => Self::Afternoon,
            TimeOfDay::Evening => Self::Evening,
        }
    }
}

/// Result of an `Offer` conversion.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "ConvertOfferResult")]
pub struct ConvertResult {
    /// Converted `Offer`.
    pub offer: Offer,

    /// `Contract` created from the `Offer`, if accepted in place.
    pub contract: Option<api::Contract>,

    /// Minted signing token, if the conversion is deferred to a signature.
    pub signing_token: Option<SigningToken>,

    /// `DateTime` when the signing token expires.
    pub signing_expires_at: Option<DateTime>,
}

impl From<command::convert_offer::Output> for ConvertResult {
    fn from(output: command::convert_offer::Output) -> Self {
        use command::convert_offer::Output as O;
        match output {
            O::Converted { offer, contract } => Self {
                offer: offer.into(),
                contract: Some(contract.into()),
                signing_token: None,
                signing_expires_at: None,
            },
            O::SigningLink {
                offer,
                token,
                expires_at,
            } => Self {
                offer: offer.into(),
                contract: None,
                signing_token: Some(token.into()),
                signing_expires_at: Some(expires_at.coerce()),
            },
        }
    }
}

/// Result of a completed `Offer` signing.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "CompleteOfferSigningResult")]
pub struct SigningResult {
    /// Signed `Offer`.
    pub offer: Offer,

    /// `Contract` created from the `Offer`.
    pub contract: api::Contract,
}

impl From<command::complete_offer_signing::Output> for SigningResult {
    fn from(output: command::complete_offer_signing::Output) -> Self {
        let command::complete_offer_signing::Output { offer, contract } =
            output;
        Self {
            offer: offer.into(),
            contract: contract.into(),
        }
    }
}

pub mod list {
    //! Definitions related to the [`Offer`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Offer};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Offer` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::offer::list::Cursor)]
    #[graphql(
        name = "OfferListCursor",
        with = scalar::Via::<read::offer::list::Cursor>,
    )]
    pub struct Cursor(pub read::offer::list::Cursor);

    /// Edge in the [`Offer`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::offer::list::Edge);

    /// Edge in the `Offer` list.
    #[graphql_object(name = "OfferListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `OfferListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `OfferListEdge`.
        #[must_use]
        pub fn node(&self) -> Offer {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Offer` \
                          existence"
            )]
            unsafe {
                Offer::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Offer`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::offer::list::Connection);

    /// Connection of the `Offer` list.
    #[graphql_object(name = "OfferListConnection", context = Context)]
    impl Connection {
        /// Edges of this `OfferListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.0.page_info(),
                start_cursor: self.0.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.0.edges.last().map(|e| e.cursor.into()),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::offer::list::PageInfo`].
        info: read::offer::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about an `OfferListConnection` page.
    #[graphql_object(name = "OfferListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total `Offer`s count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::offers::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
