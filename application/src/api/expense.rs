//! [`Expense`]-related definitions.

use std::future;

use common::{Date, DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// An operational expense of the cleaning company.
#[derive(Clone, Debug, From)]
pub struct Expense {
    /// ID of this [`Expense`].
    pub id: Id,

    /// Underlying [`domain::Expense`].
    expense: OnceCell<domain::Expense>,
}

impl From<domain::Expense> for Expense {
    fn from(expense: domain::Expense) -> Self {
        Self {
            id: expense.id.into(),
            expense: OnceCell::new_with(Some(expense)),
        }
    }
}

impl Expense {
    /// Creates a new [`Expense`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Expense`] with the provided ID exists,
    /// otherwise accessing this [`Expense`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            expense: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Expense`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Expense`] doesn't exist.
    async fn expense(&self, ctx: &Context) -> Result<&domain::Expense, Error> {
        let id = self.id.into();
        self.expense
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::expense::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|e| {
                        future::ready(e.ok_or_else(|| {
                            api::query::ExpenseError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// An operational expense of the cleaning company.
#[graphql_object(context = Context)]
impl Expense {
    /// Unique identifier of this `Expense`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Expense.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Description of this `Expense`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Expense.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Description, Error> {
        Ok(self.expense(ctx).await?.description.clone().into())
    }

    /// Spent amount.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Expense.amount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn amount(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.expense(ctx).await?.amount)
    }

    /// Free-form category of this `Expense`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Expense.category",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn category(&self, ctx: &Context) -> Result<Category, Error> {
        Ok(self.expense(ctx).await?.category.clone().into())
    }

    /// `Date` the amount was spent on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Expense.date",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.expense(ctx).await?.date.coerce())
    }

    /// `DateTime` when this `Expense` was recorded.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Expense.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.expense(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of an `Expense`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::expense::Id)]
#[into(domain::expense::Id)]
#[graphql(name = "ExpenseId", transparent)]
pub struct Id(Uuid);

/// Description of an `Expense`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ExpenseDescription",
    with = scalar::Via::<domain::expense::Description>,
)]
pub struct Description(domain::expense::Description);

/// Free-form category of an `Expense`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ExpenseCategory",
    with = scalar::Via::<domain::expense::Category>,
)]
pub struct Category(domain::expense::Category);

pub mod list {
    //! Definitions related to the [`Expense`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Expense, Id};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Expense` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::expense::list::Cursor)]
    #[graphql(
        name = "ExpenseListCursor",
        with = scalar::Via::<read::expense::list::Cursor>,
    )]
    pub struct Cursor(pub read::expense::list::Cursor);

    /// Edge in the [`Expense`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::expense::list::Edge);

    /// Edge in the `Expense` list.
    #[graphql_object(name = "ExpenseListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `ExpenseListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `ExpenseListEdge`.
        #[must_use]
        pub fn node(&self) -> Expense {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Expense` existence"
            )]
            unsafe {
                Expense::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Expense`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::expense::list::Connection);

    /// Connection of the `Expense` list.
    #[graphql_object(name = "ExpenseListConnection", context = Context)]
    impl Connection {
        /// Edges of this `ExpenseListConnection`.
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
        /// Underlying [`read::expense::list::PageInfo`].
        info: read::expense::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about an `ExpenseListConnection` page.
    #[graphql_object(name = "ExpenseListPageInfo", context = Context)]
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

        /// Total `Expense`s count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::expenses::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
