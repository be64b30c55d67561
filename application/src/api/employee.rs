//! [`Employee`]-related definitions.

use std::future;

use common::{Date, DateTime};
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

/// An employee performing cleaning jobs.
#[derive(Clone, Debug, From)]
pub struct Employee {
    /// ID of this [`Employee`].
    pub id: Id,

    /// Underlying [`domain::Employee`].
    employee: OnceCell<domain::Employee>,
}

impl From<domain::Employee> for Employee {
    fn from(employee: domain::Employee) -> Self {
        Self {
            id: employee.id.into(),
            employee: OnceCell::new_with(Some(employee)),
        }
    }
}

impl Employee {
    /// Creates a new [`Employee`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Employee`] with the provided ID exists,
    /// otherwise accessing this [`Employee`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            employee: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Employee`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Employee`] doesn't exist.
    async fn employee(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Employee, Error> {
        let id = self.id.into();
        self.employee
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::employee::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|e| {
                        future::ready(e.ok_or_else(|| {
                            api::query::EmployeeError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// An employee performing cleaning jobs.
#[graphql_object(context = Context)]
impl Employee {
    /// Unique identifier of this `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.employee(ctx).await?.name.clone().into())
    }

    /// Email of this `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::customer::Email>, Error> {
        Ok(self.employee(ctx).await?.email.clone().map(Into::into))
    }

    /// Phone of this `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::customer::Phone>, Error> {
        Ok(self.employee(ctx).await?.phone.clone().map(Into::into))
    }

    /// `Absence`s of this `Employee` overlapping the provided `Date`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.absencesOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn absences_on(
        &self,
        date: Date,
        ctx: &Context,
    ) -> Result<Vec<absence::Absence>, Error> {
        ctx.service()
            .execute(query::employee::AbsencesOn::by((
                self.id.into(),
                date.coerce(),
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|absences| absences.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `Employee` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.employee(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of an `Employee`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::employee::Id)]
#[into(domain::employee::Id)]
#[graphql(name = "EmployeeId", transparent)]
pub struct Id(Uuid);

/// Name of an `Employee`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EmployeeName",
    with = scalar::Via::<domain::employee::Name>,
)]
pub struct Name(domain::employee::Name);

pub mod absence {
    //! [`Absence`]-related definitions.

    use common::{Date, DateTime};
    use derive_more::{AsRef, Display, From, Into};
    use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
    use service::domain;
    use uuid::Uuid;

    use crate::{
        api::{self, scalar},
        Context,
    };

    /// A period an `Employee` is unavailable in.
    #[derive(Clone, Debug, From, Into)]
    pub struct Absence(domain::Absence);

    /// A period an `Employee` is unavailable in.
    #[graphql_object(context = Context)]
    impl Absence {
        /// Unique identifier of this `Absence`.
        #[must_use]
        pub fn id(&self) -> Id {
            self.0.id.into()
        }

        /// `Employee` this `Absence` belongs to.
        #[must_use]
        pub fn employee(&self) -> api::Employee {
            #[expect(
                unsafe_code,
                reason = "`Absence` loaded from repository guarantees \
                          `Employee` existence"
            )]
            unsafe {
                api::Employee::new_unchecked(self.0.employee_id)
            }
        }

        /// Kind of this `Absence`.
        #[must_use]
        pub fn kind(&self) -> Kind {
            self.0.kind.into()
        }

        /// First `Date` of this `Absence` (inclusive).
        #[must_use]
        pub fn start_date(&self) -> Date {
            self.0.start_date.coerce()
        }

        /// Last `Date` of this `Absence` (inclusive).
        #[must_use]
        pub fn end_date(&self) -> Date {
            self.0.end_date.coerce()
        }

        /// Free-form note attached to this `Absence`.
        #[must_use]
        pub fn note(&self) -> Option<Note> {
            self.0.note.clone().map(Into::into)
        }

        /// `DateTime` when this `Absence` was recorded.
        #[must_use]
        pub fn created_at(&self) -> DateTime {
            self.0.created_at.coerce()
        }
    }

    /// Unique identifier of an `Absence`.
    #[derive(
        Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
    )]
    #[from(domain::absence::Id)]
    #[into(domain::absence::Id)]
    #[graphql(name = "AbsenceId", transparent)]
    pub struct Id(Uuid);

    /// Kind of an `Absence`.
    #[derive(Clone, Copy, Debug, GraphQLEnum)]
    #[graphql(name = "AbsenceKind")]
    pub enum Kind {
        /// Planned vacation.
        Vacation,

        /// Sickness leave.
        Sickness,

        /// Any other reason.
        Other,
    }

    impl From<domain::absence::Kind> for Kind {
        fn from(kind: domain::absence::Kind) -> Self {
            use domain::absence::Kind as K;
            match kind {
                K::Vacation => Self::Vacation,
                K::Sickness => Self::Sickness,
                K::Other => Self::Other,
            }
        }
    }

    impl From<Kind> for domain::absence::Kind {
        fn from(kind: Kind) -> Self {
            match kind {
                Kind::Vacation => Self::Vacation,
                Kind::Sickness => Self::Sickness,
                Kind::Other => Self::Other,
            }
        }
    }

    /// Free-form note of an `Absence`.
    #[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
    #[graphql(
        name = "AbsenceNote",
        with = scalar::Via::<domain::absence::Note>,
    )]
    pub struct Note(domain::absence::Note);
}

pub mod list {
    //! Definitions related to the [`Employee`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Employee, Id};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Employee` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::employee::list::Cursor)]
    #[graphql(
        name = "EmployeeListCursor",
        with = scalar::Via::<read::employee::list::Cursor>,
    )]
    pub struct Cursor(pub read::employee::list::Cursor);

    /// Edge in the [`Employee`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::employee::list::Edge);

    /// Edge in the `Employee` list.
    #[graphql_object(name = "EmployeeListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `EmployeeListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `EmployeeListEdge`.
        #[must_use]
        pub fn node(&self) -> Employee {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Employee` existence"
            )]
            unsafe {
                Employee::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Employee`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::employee::list::Connection);

    /// Connection of the `Employee` list.
    #[graphql_object(name = "EmployeeListConnection", context = Context)]
    impl Connection {
        /// Edges of this `EmployeeListConnection`.
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
        /// Underlying [`read::employee::list::PageInfo`].
        info: read::employee::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about an `EmployeeListConnection` page.
    #[graphql_object(name = "EmployeeListPageInfo", context = Context)]
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

        /// Total `Employee`s count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::employees::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
