//! [`Job`]-related definitions.

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

/// A single cleaning job on a concrete date.
#[derive(Clone, Debug, From)]
pub struct Job {
    /// ID of this [`Job`].
    pub id: Id,

    /// Underlying [`domain::Job`].
    job: OnceCell<domain::Job>,
}

impl From<domain::Job> for Job {
    fn from(job: domain::Job) -> Self {
        Self {
            id: job.id.into(),
            job: OnceCell::new_with(Some(job)),
        }
    }
}

impl Job {
    /// Creates a new [`Job`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Job`] with the provided ID exists, otherwise
    /// accessing this [`Job`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            job: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Job`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Job`] doesn't exist.
    async fn job(&self, ctx: &Context) -> Result<&domain::Job, Error> {
        let id = self.id.into();
        self.job
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::job::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|j| {
                        future::ready(j.ok_or_else(|| {
                            api::query::JobError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A single cleaning job on a concrete date.
#[graphql_object(context = Context)]
impl Job {
    /// Unique identifier of this `Job`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Contract` this `Job` was generated from, if any.
    ///
    /// Ad-hoc `Job`s have none.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.contract",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn contract(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Contract>, Error> {
        let contract_id = self.job(ctx).await?.contract_id;
        #[expect(
            unsafe_code,
            reason = "`Job` loaded from repository guarantees `Contract` \
                      existence"
        )]
        Ok(contract_id.map(|id| unsafe { api::Contract::new_unchecked(id) }))
    }

    /// `Customer` this `Job` is performed for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.customer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        let customer_id = self.job(ctx).await?.customer_id;
        #[expect(
            unsafe_code,
            reason = "`Job` loaded from repository guarantees `Customer` \
                      existence"
        )]
        Ok(unsafe { api::Customer::new_unchecked(customer_id) })
    }

    /// Name of the performed service.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.serviceName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn service_name(
        &self,
        ctx: &Context,
    ) -> Result<api::contract::Name, Error> {
        Ok(self.job(ctx).await?.service_name.clone().into())
    }

    /// Net price of this `Job`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.job(ctx).await?.price)
    }

    /// VAT rate applied on billing.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.vat",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn vat(&self, ctx: &Context) -> Result<Percent, Error> {
        Ok(self.job(ctx).await?.vat)
    }

    /// Address this `Job` is performed at.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn address(
        &self,
        ctx: &Context,
    ) -> Result<api::customer::Address, Error> {
        Ok(self.job(ctx).await?.address.clone().into())
    }

    /// Checklist of steps to perform.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.checklist",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn checklist(&self, ctx: &Context) -> Result<Vec<String>, Error> {
        Ok(self.job(ctx).await?.checklist.as_ref().to_vec())
    }

    /// `Date` this `Job` is scheduled on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.scheduledDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn scheduled_date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.job(ctx).await?.scheduled_date.coerce())
    }

    /// Status of this `Job`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.job(ctx).await?.status.into())
    }

    /// Actual duration of this `Job` in whole minutes, once completed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.actualDuration",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn actual_duration(
        &self,
        ctx: &Context,
    ) -> Result<Option<i32>, Error> {
        Ok(self.job(ctx).await?.actual_duration.map(Into::into))
    }

    /// `Invoice` this `Job` is billed on, if it is.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.invoice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn invoice(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Invoice>, Error> {
        let invoice_id = self.job(ctx).await?.invoice_id;
        #[expect(
            unsafe_code,
            reason = "`Job` loaded from repository guarantees `Invoice` \
                      existence"
        )]
        Ok(invoice_id.map(|id| unsafe { api::Invoice::new_unchecked(id) }))
    }

    /// Completion proofs attached to this `Job`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.proofs",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn proofs(&self, ctx: &Context) -> Result<Vec<Proof>, Error> {
        Ok(self
            .job(ctx)
            .await?
            .proofs
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// `Assignment`s of this `Job`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.assignments",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn assignments(
        &self,
        ctx: &Context,
    ) -> Result<Vec<assignment::Assignment>, Error> {
        ctx.service()
            .execute(query::job::Assignments::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|assignments| {
                assignments.into_iter().map(Into::into).collect()
            })
    }

    /// `DateTime` when this `Job` was completed, if it was.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.completedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn completed_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.job(ctx).await?.completed_at.map(|at| at.coerce()))
    }

    /// `DateTime` when this `Job` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.job(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Job`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::job::Id)]
#[into(domain::job::Id)]
#[graphql(name = "JobId", transparent)]
pub struct Id(Uuid);

/// Status of a `Job`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "JobStatus")]
pub enum Status {
    /// Scheduled, not started yet.
    Scheduled,

    /// Being worked on.
    InProgress,

    /// Completed and billable.
    Completed,

    /// Cancelled, never to be performed.
    Cancelled,
}

impl From<domain::job::Status> for Status {
    fn from(status: domain::job::Status) -> Self {
        use domain::job::Status as S;
        match status {
            S::Scheduled => Self::Scheduled,
            S::InProgress => Self::InProgress,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::job::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Scheduled => Self::Scheduled,
            Status::InProgress => Self::InProgress,
            Status::Completed => Self::Completed,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

/// Completion proof attached to a `Job`.
#[derive(Clone, Debug)]
pub struct Proof(domain::job::Proof);

impl From<domain::job::Proof> for Proof {
    fn from(proof: domain::job::Proof) -> Self {
        Self(proof)
    }
}

/// Completion proof attached to a `Job`.
#[graphql_object(name = "JobProof", context = Context)]
impl Proof {
    /// Kind of this `JobProof`.
    #[must_use]
    pub fn kind(&self) -> ProofKind {
        self.0.kind.into()
    }

    /// Reference to the stored artifact.
    #[must_use]
    pub fn reference(&self) -> ProofReference {
        self.0.reference.clone().into()
    }

    /// `DateTime` when this `JobProof` was attached.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Completion proof provided on `Job` completion.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "JobProofInput")]
pub struct ProofInput {
    /// Kind of the proof.
    pub kind: ProofKind,

    /// Reference to the stored artifact.
    pub reference: ProofReference,
}

impl From<ProofInput> for command::complete_job::ProofInput {
    fn from(input: ProofInput) -> Self {
        let ProofInput { kind, reference } = input;
        Self {
            kind: kind.into(),
            reference: reference.into(),
        }
    }
}

/// Kind of a `Job` completion proof.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "JobProofKind")]
pub enum ProofKind {
    /// Photo of the performed work.
    Photo,

    /// Signature of the customer.
    Signature,
}

impl From<domain::job::ProofKind> for ProofKind {
    fn from(kind: domain::job::ProofKind) -> Self {
        use domain::job::ProofKind as K;
        match kind {
            K::Photo => Self::Photo,
            K::Signature => Self::Signature,
        }
    }
}

impl From<ProofKind> for domain::job::ProofKind {
    fn from(kind: ProofKind) -> Self {
        match kind {
            ProofKind::Photo => Self::Photo,
            ProofKind::Signature => Self::Signature,
        }
    }
}

/// Reference to a stored `Job` proof artifact.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "JobProofReference",
    with = scalar::Via::<domain::job::ProofReference>,
)]
pub struct ProofReference(domain::job::ProofReference);

/// Result of assigning an `Employee` to a `Job`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "AssignEmployeeResult")]
pub struct AssignResult {
    /// Persisted `Assignment`, or none if unacknowledged `Absence`s
    /// prevented it.
    pub assignment: Option<assignment::Assignment>,

    /// `Absence`s overlapping the `Job`'s scheduled date.
    pub conflicts: Vec<api::employee::absence::Absence>,
}

impl From<command::assign_employee::Output> for AssignResult {
    fn from(output: command::assign_employee::Output) -> Self {
        let command::assign_employee::Output {
            assignment,
            conflicts,
        } = output;
        Self {
            assignment: assignment.map(Into::into),
            conflicts: conflicts.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of a schedule generation run.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "GenerateScheduleResult")]
pub struct ScheduleResult {
    /// `Job`s generated by the run.
    pub generated: Vec<Job>,

    /// Per-`Contract` failures of the run.
    pub failures: Vec<ScheduleFailure>,
}

/// Failure of generating `Job`s for a single `Contract`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "GenerateScheduleFailure")]
pub struct ScheduleFailure {
    /// `Contract` the generation failed for.
    pub contract: api::Contract,

    /// Message of the failure.
    pub message: String,
}

impl From<command::generate_schedule::Output> for ScheduleResult {
    fn from(output: command::generate_schedule::Output) -> Self {
        let command::generate_schedule::Output {
            generated,
            failures,
        } = output;
        Self {
            generated: generated.into_iter().map(Into::into).collect(),
            failures: failures
                .into_iter()
                .map(|f| ScheduleFailure {
                    #[expect(
                        unsafe_code,
                        reason = "failed `Contract` was loaded from \
                                  repository"
                    )]
                    contract: unsafe {
                        api::Contract::new_unchecked(f.contract_id)
                    },
                    message: f.error.to_string(),
                })
                .collect(),
        }
    }
}

pub mod assignment {
    //! [`Assignment`]-related definitions.

    use common::DateTime;
    use derive_more::{Display, From, Into};
    use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
    use service::domain;
    use uuid::Uuid;

    use crate::{api, Context};

    /// An `Employee` assigned to work on a `Job`.
    #[derive(Clone, Debug, From, Into)]
    pub struct Assignment(domain::Assignment);

    /// An `Employee` assigned to work on a `Job`.
    #[graphql_object(context = Context)]
    impl Assignment {
        /// Unique identifier of this `Assignment`.
        #[must_use]
        pub fn id(&self) -> Id {
            self.0.id.into()
        }

        /// `Job` worked on.
        #[must_use]
        pub fn job(&self) -> api::Job {
            #[expect(
                unsafe_code,
                reason = "`Assignment` loaded from repository guarantees \
                          `Job` existence"
            )]
            unsafe {
                api::Job::new_unchecked(self.0.job_id)
            }
        }

        /// Assigned `Employee`.
        #[must_use]
        pub fn employee(&self) -> api::Employee {
            #[expect(
                unsafe_code,
                reason = "`Assignment` loaded from repository guarantees \
                          `Employee` existence"
            )]
            unsafe {
                api::Employee::new_unchecked(self.0.employee_id)
            }
        }

        /// Status of this `Assignment`.
        #[must_use]
        pub fn status(&self) -> Status {
            self.0.status.into()
        }

        /// `DateTime` when the work was started, if it was.
        #[must_use]
        pub fn started_at(&self) -> Option<DateTime> {
            self.0.started_at.map(|at| at.coerce())
        }

        /// `DateTime` when the work was finished, if it was.
        #[must_use]
        pub fn finished_at(&self) -> Option<DateTime> {
            self.0.finished_at.map(|at| at.coerce())
        }

        /// `DateTime` when this `Assignment` was created.
        #[must_use]
        pub fn created_at(&self) -> DateTime {
            self.0.created_at.coerce()
        }
    }

    /// Unique identifier of an `Assignment`.
    #[derive(
        Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
    )]
    #[from(domain::assignment::Id)]
    #[into(domain::assignment::Id)]
    #[graphql(name = "AssignmentId", transparent)]
    pub struct Id(Uuid);

    /// Status of an `Assignment`.
    #[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
    #[graphql(name = "AssignmentStatus")]
    pub enum Status {
        /// Assigned, no time tracked yet.
        Pending,

        /// Time entry is running.
        InProgress,

        /// Time entry is settled.
        Completed,
    }

    impl From<domain::assignment::Status> for Status {
        fn from(status: domain::assignment::Status) -> Self {
            use domain::assignment::Status as S;
            match status {
                S::Pending => Self::Pending,
                S::InProgress => Self::InProgress,
                S::Completed => Self::Completed,
            }
        }
    }
}

pub mod list {
    //! Definitions related to the [`Job`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Job};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Job` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::job::list::Cursor)]
    #[graphql(
        name = "JobListCursor",
        with = scalar::Via::<read::job::list::Cursor>,
    )]
    pub struct Cursor(pub read::job::list::Cursor);

    /// Edge in the [`Job`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::job::list::Edge);

    /// Edge in the `Job` list.
    #[graphql_object(name = "JobListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `JobListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `JobListEdge`.
        #[must_use]
        pub fn node(&self) -> Job {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Job` \
                          existence"
            )]
            unsafe {
                Job::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Job`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::job::list::Connection);

    /// Connection of the `Job` list.
    #[graphql_object(name = "JobListConnection", context = Context)]
    impl Connection {
        /// Edges of this `JobListConnection`.
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
        /// Underlying [`read::job::list::PageInfo`].
        info: read::job::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `JobListConnection` page.
    #[graphql_object(name = "JobListPageInfo", context = Context)]
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

        /// Total `Job`s count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::jobs::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
