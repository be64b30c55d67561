//! GraphQL [`Query`]s definitions.

use common::Date;
use itertools::Itertools as _;
use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Customer` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "customer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::customer::list::Edge, Error> {
        Self::customers(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| CustomerError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Customer`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "customers",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customers(
        first: Option<i32>,
        after: Option<api::customer::list::Cursor>,
        last: Option<i32>,
        before: Option<api::customer::list::Cursor>,
        name: Option<api::customer::Name>,
        ctx: &Context,
    ) -> Result<api::customer::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::customers::List::by(
                read::customer::list::Selector {
                    arguments: read::customer::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: read::customer::list::Filter {
                        name: name.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Employee` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMPLOYEE_NOT_EXISTS` - the `Employee` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "employee",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn employee(
        id: api::employee::Id,
        ctx: &Context,
    ) -> Result<api::employee::list::Edge, Error> {
        Self::employees(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| EmployeeError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Employee`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "employees",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn employees(
        first: Option<i32>,
        after: Option<api::employee::list::Cursor>,
        last: Option<i32>,
        before: Option<api::employee::list::Cursor>,
        name: Option<api::employee::Name>,
        ctx: &Context,
    ) -> Result<api::employee::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::employees::List::by(
                read::employee::list::Selector {
                    arguments: read::employee::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: read::employee::list::Filter {
                        name: name.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Offer` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `OFFER_NOT_EXISTS` - the `Offer` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "offer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn offer(
        id: api::offer::Id,
        ctx: &Context,
    ) -> Result<api::offer::list::Edge, Error> {
        Self::offers(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| OfferError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Offer`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            customer_id = ?customer_id,
            first = ?first,
            gql.name = "offers",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn offers(
        first: Option<i32>,
        after: Option<api::offer::list::Cursor>,
        last: Option<i32>,
        before: Option<api::offer::list::Cursor>,
        customer_id: Option<api::customer::Id>,
        status: Option<api::offer::Status>,
        ctx: &Context,
    ) -> Result<api::offer::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::offers::List::by(read::offer::list::Selector {
                arguments: read::offer::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter: read::offer::list::Filter {
                    customer_id: customer_id.map(Into::into),
                    status: status.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Contract` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "contract",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::contract::list::Edge, Error> {
        Self::contracts(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| ContractError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Contract`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            customer_id = ?customer_id,
            first = ?first,
            gql.name = "contracts",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contracts(
        first: Option<i32>,
        after: Option<api::contract::list::Cursor>,
        last: Option<i32>,
        before: Option<api::contract::list::Cursor>,
        customer_id: Option<api::customer::Id>,
        name: Option<api::contract::Name>,
        ctx: &Context,
    ) -> Result<api::contract::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::contracts::List::by(
                read::contract::list::Selector {
                    arguments: read::contract::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: read::contract::list::Filter {
                        customer_id: customer_id.map(Into::into),
                        name: name.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Job` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `JOB_NOT_EXISTS` - the `Job` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "job",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn job(
        id: api::job::Id,
        ctx: &Context,
    ) -> Result<api::job::list::Edge, Error> {
        Self::jobs(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            None,
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| JobError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Job`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            contract_id = ?contract_id,
            customer_id = ?customer_id,
            first = ?first,
            from = ?from,
            gql.name = "jobs",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            status = ?status,
            until = ?until,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "needed as is")]
    pub async fn jobs(
        first: Option<i32>,
        after: Option<api::job::list::Cursor>,
        last: Option<i32>,
        before: Option<api::job::list::Cursor>,
        contract_id: Option<api::contract::Id>,
        customer_id: Option<api::customer::Id>,
        status: Option<api::job::Status>,
        from: Option<Date>,
        until: Option<Date>,
        ctx: &Context,
    ) -> Result<api::job::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::jobs::List::by(read::job::list::Selector {
                arguments: read::job::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter: read::job::list::Filter {
                    contract_id: contract_id.map(Into::into),
                    customer_id: customer_id.map(Into::into),
                    status: status.map(Into::into),
                    from: from.map(|d| d.coerce()),
                    until: until.map(|d| d.coerce()),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Invoice` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "invoice",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn invoice(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<api::invoice::list::Edge, Error> {
        Self::invoices(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| InvoiceError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Invoice`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            customer_id = ?customer_id,
            first = ?first,
            gql.name = "invoices",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn invoices(
        first: Option<i32>,
        after: Option<api::invoice::list::Cursor>,
        last: Option<i32>,
        before: Option<api::invoice::list::Cursor>,
        customer_id: Option<api::customer::Id>,
        status: Option<api::invoice::Status>,
        ctx: &Context,
    ) -> Result<api::invoice::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::invoices::List::by(
                read::invoice::list::Selector {
                    arguments: read::invoice::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: read::invoice::list::Filter {
                        customer_id: customer_id.map(Into::into),
                        status: status.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Expense` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EXPENSE_NOT_EXISTS` - the `Expense` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "expense",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn expense(
        id: api::expense::Id,
        ctx: &Context,
    ) -> Result<api::expense::list::Edge, Error> {
        Self::expenses(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| ExpenseError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Expense`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            category = ?category.as_ref().map(ToString::to_string),
            first = ?first,
            from = ?from,
            gql.name = "expenses",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            until = ?until,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "needed as is")]
    pub async fn expenses(
        first: Option<i32>,
        after: Option<api::expense::list::Cursor>,
        last: Option<i32>,
        before: Option<api::expense::list::Cursor>,
        category: Option<api::expense::Category>,
        from: Option<Date>,
        until: Option<Date>,
        ctx: &Context,
    ) -> Result<api::expense::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::expenses::List::by(
                read::expense::list::Selector {
                    arguments: read::expense::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: read::expense::list::Filter {
                        category: category.map(Into::into),
                        from: from.map(|d| d.coerce()),
                        until: until.map(|d| d.coerce()),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Calculates the `PayrollReport` for the specified period.
    #[tracing::instrument(
        skip_all,
        fields(
            end = ?end,
            gql.name = "payrollReport",
            otel.name = Self::SPAN_NAME,
            start = ?start,
        ),
    )]
    pub async fn payroll_report(
        start: Date,
        end: Date,
        ctx: &Context,
    ) -> Result<api::report::Payroll, Error> {
        ctx.service()
            .execute(query::report::Payroll { start, end })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum ContractError {
        #[code = "CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Contract` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum CustomerError {
        #[code = "CUSTOMER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Customer` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum EmployeeError {
        #[code = "EMPLOYEE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Employee` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ExpenseError {
        #[code = "EXPENSE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Expense` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum InvoiceError {
        #[code = "INVOICE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Invoice` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum JobError {
        #[code = "JOB_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Job` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum OfferError {
        #[code = "OFFER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Offer` with the specified ID does not exist"]
        NotExists,
    }
}
