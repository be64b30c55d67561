//! [`Invoice`]-related definitions.

use std::future;

use common::{Date, DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLObject, GraphQLScalar};
use service::{command, domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// An invoice aggregating billable jobs of a customer.
#[derive(Clone, Debug, From)]
pub struct Invoice {
    /// ID of this [`Invoice`].
    pub id: Id,

    /// Underlying [`domain::Invoice`].
    invoice: OnceCell<domain::Invoice>,
}

impl From<domain::Invoice> for Invoice {
    fn from(invoice: domain::Invoice) -> Self {
        Self {
            id: invoice.id.into(),
            invoice: OnceCell::new_with(Some(invoice)),
        }
    }
}

impl Invoice {
    /// Creates a new [`Invoice`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Invoice`] with the provided ID exists,
    /// otherwise accessing this [`Invoice`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            invoice: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Invoice`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Invoice`] doesn't exist.
    async fn invoice(&self, ctx: &Context) -> Result<&domain::Invoice, Error> {
        let id = self.id.into();
        self.invoice
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::invoice::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|i| {
                        future::ready(i.ok_or_else(|| {
                            api::query::InvoiceError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// An invoice aggregating billable jobs of a customer.
#[graphql_object(context = Context)]
impl Invoice {
    /// Unique identifier of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Customer` this `Invoice` is issued to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.customer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        let customer_id = self.invoice(ctx).await?.customer_id;
        #[expect(
            unsafe_code,
            reason = "`Invoice` loaded from repository guarantees \
                      `Customer` existence"
        )]
        Ok(unsafe { api::Customer::new_unchecked(customer_id) })
    }

    /// Gap-free number of this `Invoice`, unique within a year.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.number",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn number(&self, ctx: &Context) -> Result<Number, Error> {
        Ok(self.invoice(ctx).await?.number.into())
    }

    /// Status of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.invoice(ctx).await?.status.into())
    }

    /// Net total of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.totalNet",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_net(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.invoice(ctx).await?.total_net)
    }

    /// VAT total of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.totalVat",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_vat(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.invoice(ctx).await?.total_vat)
    }

    /// Gross total of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.totalGross",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_gross(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.invoice(ctx).await?.total_gross)
    }

    /// `DateTime` when this `Invoice` was issued.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.issuedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn issued_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.invoice(ctx).await?.issued_at.coerce())
    }

    /// `Date` the payment is due by, set once sent.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.dueDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn due_date(
        &self,
        ctx: &Context,
    ) -> Result<Option<Date>, Error> {
        Ok(self.invoice(ctx).await?.due_date.map(|d| d.coerce()))
    }

    /// Current dunning escalation level of this `Invoice`.
    ///
    /// `0` means no dunning has happened yet.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.dunningLevel",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn dunning_level(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(i32::from(i16::from(self.invoice(ctx).await?.dunning_level)))
    }

    /// `DateTime` of the last dunning escalation, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.lastDunningAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn last_dunning_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self
            .invoice(ctx)
            .await?
            .last_dunning_at
            .map(|at| at.coerce()))
    }

    /// `DateTime` when this `Invoice` was sent, if it was.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.sentAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn sent_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.invoice(ctx).await?.sent_at.map(|at| at.coerce()))
    }

    /// `DateTime` when this `Invoice` was paid, if it was.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.paidAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn paid_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.invoice(ctx).await?.paid_at.map(|at| at.coerce()))
    }

    /// `DateTime` when this `Invoice` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.invoice(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of an `Invoice`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::invoice::Id)]
#[into(domain::invoice::Id)]
#[graphql(name = "InvoiceId", transparent)]
pub struct Id(Uuid);

/// Gap-free number of an `Invoice` in `{year}-{seq}` format.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "InvoiceNumber",
    with = scalar::Via::<domain::invoice::Number>,
)]
pub struct Number(domain::invoice::Number);

/// Status of an `Invoice`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "InvoiceStatus")]
pub enum Status {
    /// Being drafted, not issued to the `Customer` yet.
    Draft,

    /// Sent out, awaiting payment.
    Sent,

    /// Paid in full.
    Paid,

    /// Past its due date without payment.
    Overdue,

    /// Cancelled, never to be paid.
    Cancelled,
}

impl From<domain::invoice::Status> for Status {
    fn from(status: domain::invoice::Status) -> Self {
        use domain::invoice::Status as S;
        match status {
            S::Draft => Self::Draft,
            S::Sent => Self::Sent,
            S::Paid => Self::Paid,
            S::Overdue => Self::Overdue,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::invoice::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => Self::Draft,
            Status::Sent => Self::Sent,
            Status::Paid => Self::Paid,
            Status::Overdue => Self::Overdue,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

/// Rendered document of an `Invoice`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "InvoiceDocument")]
pub struct Document {
    /// File name of the document.
    pub name: String,

    /// MIME type of the document.
    pub mime: String,
}

impl From<service::infra::external::Document> for Document {
    fn from(document: service::infra::external::Document) -> Self {
        let service::infra::external::Document { name, mime, .. } = document;
        Self { name, mime }
    }
}

/// Result of an `Invoice` generation.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "GenerateInvoiceResult")]
pub struct GenerateResult {
    /// Generated `Invoice`, or none if there was nothing to bill.
    pub invoice: Option<Invoice>,

    /// `Job`s billed on the `Invoice`.
    pub jobs: Vec<api::Job>,
}

impl From<command::generate_invoice::Output> for GenerateResult {
    fn from(output: command::generate_invoice::Output) -> Self {
        let command::generate_invoice::Output { invoice, jobs } = output;
        Self {
            invoice: invoice.map(Into::into),
            jobs: jobs.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of sending an `Invoice` out.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "SendInvoiceResult")]
pub struct SendResult {
    /// Sent `Invoice`.
    pub invoice: Invoice,

    /// Rendered `Invoice` document.
    pub document: Document,
}

impl From<command::send_invoice::Output> for SendResult {
    fn from(output: command::send_invoice::Output) -> Self {
        let command::send_invoice::Output { invoice, document } = output;
        Self {
            invoice: invoice.into(),
            document: document.into(),
        }
    }
}

pub mod list {
    //! Definitions related to the [`Invoice`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Invoice};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Invoice` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::invoice::list::Cursor)]
    #[graphql(
        name = "InvoiceListCursor",
        with = scalar::Via::<read::invoice::list::Cursor>,
    )]
    pub struct Cursor(pub read::invoice::list::Cursor);

    /// Edge in the [`Invoice`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::invoice::list::Edge);

    /// Edge in the `Invoice` list.
    #[graphql_object(name = "InvoiceListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `InvoiceListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `InvoiceListEdge`.
        #[must_use]
        pub fn node(&self) -> Invoice {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Invoice` existence"
            )]
            unsafe {
                Invoice::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Invoice`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::invoice::list::Connection);

    /// Connection of the `Invoice` list.
    #[graphql_object(name = "InvoiceListConnection", context = Context)]
    impl Connection {
        /// Edges of this `InvoiceListConnection`.
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
        /// Underlying [`read::invoice::list::PageInfo`].
        info: read::invoice::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about an `InvoiceListConnection` page.
    #[graphql_object(name = "InvoiceListPageInfo", context = Context)]
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

        /// Total `Invoice`s count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::invoices::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
