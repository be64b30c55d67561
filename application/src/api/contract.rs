//! [`Contract`]-related definitions.

use std::future;

use common::{Date, DateTime, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A recurring service contract with a customer.
#[derive(Clone, Debug, From)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// Underlying [`domain::Contract`].
    contract: OnceCell<domain::Contract>,
}

impl From<domain::Contract> for Contract {
    fn from(contract: domain::Contract) -> Self {
        Self {
            id: contract.id.into(),
            contract: OnceCell::new_with(Some(contract)),
        }
    }
}

impl Contract {
    /// Creates a new [`Contract`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Contract`] with the provided ID exists,
    /// otherwise accessing this [`Contract`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            contract: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Contract`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Contract`] doesn't exist.
    async fn contract(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Contract, Error> {
        let id = self.id.into();
        self.contract
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::contract::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::ContractError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A recurring service contract with a customer.
#[graphql_object(context = Context)]
impl Contract {
    /// Unique identifier of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Customer` this `Contract` is made with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.customer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        let customer_id = self.contract(ctx).await?.customer_id;
        #[expect(
            unsafe_code,
            reason = "`Contract` loaded from repository guarantees \
                      `Customer` existence"
        )]
        Ok(unsafe { api::Customer::new_unchecked(customer_id) })
    }

    /// `Offer` this `Contract` originates from, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.offer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn offer(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Offer>, Error> {
        let offer_id = self.contract(ctx).await?.offer_id;
        #[expect(
            unsafe_code,
            reason = "`Contract` loaded from repository guarantees `Offer` \
                      existence"
        )]
        Ok(offer_id.map(|id| unsafe { api::Offer::new_unchecked(id) }))
    }

    /// Name of the provided service.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.serviceName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn service_name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.contract(ctx).await?.service_name.clone().into())
    }

    /// Net price of a single execution.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.contract(ctx).await?.price)
    }

    /// VAT rate applied on billing.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.vat",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn vat(&self, ctx: &Context) -> Result<Percent, Error> {
        Ok(self.contract(ctx).await?.vat)
    }

    /// Address the service is provided at.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn address(
        &self,
        ctx: &Context,
    ) -> Result<api::customer::Address, Error> {
        Ok(self.contract(ctx).await?.address.clone().into())
    }

    /// Execution interval of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.interval",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn interval(&self, ctx: &Context) -> Result<Interval, Error> {
        Ok(self.contract(ctx).await?.interval.into())
    }

    /// `Date` of the first execution.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.startDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn start_date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.contract(ctx).await?.start_date.coerce())
    }

    /// `Date` of the next execution a `Job` will be generated for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.nextExecutionDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn next_execution_date(
        &self,
        ctx: &Context,
    ) -> Result<Option<Date>, Error> {
        Ok(self
            .contract(ctx)
            .await?
            .next_execution_date
            .map(|d| d.coerce()))
    }

    /// Checklist of steps applied to generated `Job`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.checklist",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn checklist(&self, ctx: &Context) -> Result<Vec<String>, Error> {
        Ok(self.contract(ctx).await?.checklist.as_ref().to_vec())
    }

    /// Indicator whether this `Contract` takes part in schedule generation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.isActive",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_active(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.contract(ctx).await?.is_active)
    }

    /// `DateTime` when this `Contract` was paused, if it is.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.pausedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn paused_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.contract(ctx).await?.paused_at.map(|at| at.coerce()))
    }

    /// `DateTime` when this `Contract` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.contract(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Contract`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::contract::Id)]
#[into(domain::contract::Id)]
#[graphql(name = "ContractId", transparent)]
pub struct Id(Uuid);

/// Name of a contracted service.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ContractName",
    with = scalar::Via::<domain::contract::Name>,
)]
pub struct Name(domain::contract::Name);

/// Execution interval of a `Contract`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ContractInterval")]
pub enum Interval {
    /// Single execution.
    Once,

    /// Every week.
    Weekly,

    /// Every two weeks.
    Biweekly,

    /// Every month.
    Monthly,
}

impl From<domain::contract::Interval> for Interval {
    fn from(interval: domain::contract::Interval) -> Self {
        use domain::contract::Interval as I;
        match interval {
            I::Once => Self::Once,
            I::Weekly => Self::Weekly,
            I::Biweekly => Self::Biweekly,
            I::Monthly => Self::Monthly,
        }
    }
}

impl From<Interval> for domain::contract::Interval {
    fn from(interval: Interval) -> Self {
        match interval {
            Interval::Once => Self::Once,
            Interval::Weekly => Self::Weekly,
            Interval::Biweekly => Self::Biweekly,
            Interval::Monthly => Self::Monthly,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Contract`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Contract, Id};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Contract` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::contract::list::Cursor)]
    #[graphql(
        name = "ContractListCursor",
        with = scalar::Via::<read::contract::list::Cursor>,
    )]
    pub struct Cursor(pub read::contract::list::Cursor);

    /// Edge in the [`Contract`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::contract::list::Edge);

    /// Edge in the `Contract` list.
    #[graphql_object(name = "ContractListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `ContractListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `ContractListEdge`.
        #[must_use]
        pub fn node(&self) -> Contract {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Contract` existence"
            )]
            unsafe {
                Contract::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Contract`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::contract::list::Connection);

    /// Connection of the `Contract` list.
    #[graphql_object(name = "ContractListConnection", context = Context)]
    impl Connection {
        /// Edges of this `ContractListConnection`.
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
        /// Underlying [`read::contract::list::PageInfo`].
        info: read::contract::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `ContractListConnection` page.
    #[graphql_object(name = "ContractListPageInfo", context = Context)]
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

        /// Total `Contract`s count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::contracts::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
