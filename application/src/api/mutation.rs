//! GraphQL [`Mutation`]s definitions.

use common::{Date, DateTime, Money, Percent};
use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Customer` with the provided contact info.
    #[tracing::instrument(
        skip_all,
        fields(
            billing_address = %billing_address,
            email = ?email,
            gql.name = "createCustomer",
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
        ),
    )]
    pub async fn create_customer(
        name: api::customer::Name,
        email: Option<api::customer::Email>,
        phone: Option<api::customer::Phone>,
        billing_address: api::customer::Address,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(command::CreateCustomer {
                name: name.into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
                billing_address: billing_address.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Employee` with the provided contact info.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email,
            gql.name = "createEmployee",
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
        ),
    )]
    pub async fn create_employee(
        name: api::employee::Name,
        email: Option<api::customer::Email>,
        phone: Option<api::customer::Phone>,
        ctx: &Context,
    ) -> Result<api::Employee, Error> {
        ctx.service()
            .execute(command::CreateEmployee {
                name: name.into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records an `Absence` of the `Employee` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMPLOYEE_NOT_EXISTS` - the `Employee` with the provided ID does not
    ///                           exist;
    /// - `ABSENCE_ENDS_BEFORE_START` - the provided period ends before it
    ///                                 starts.
    #[tracing::instrument(
        skip_all,
        fields(
            employee_id = %employee_id,
            end_date = ?end_date,
            gql.name = "recordAbsence",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
            start_date = ?start_date,
        ),
    )]
    pub async fn record_absence(
        employee_id: api::employee::Id,
        kind: api::employee::absence::Kind,
        start_date: Date,
        end_date: Date,
        note: Option<api::employee::absence::Note>,
        ctx: &Context,
    ) -> Result<api::employee::absence::Absence, Error> {
        ctx.service()
            .execute(command::RecordAbsence {
                employee_id: employee_id.into(),
                kind: kind.into(),
                start_date: start_date.coerce(),
                end_date: end_date.coerce(),
                note: note.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new draft `Offer` for the `Customer` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the provided ID does not
    ///                           exist;
    /// - `INVALID_CHECKLIST` - the provided checklist steps are malformed;
    /// - `UNPRICEABLE_ITEMS` - the provided line items cannot be priced.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            gql.name = "createOffer",
            interval = ?interval,
            otel.name = Self::SPAN_NAME,
            preferred_time = ?preferred_time,
            service_name = %service_name,
            valid_until = ?valid_until,
            vat = %vat,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_offer(
        customer_id: api::customer::Id,
        service_name: api::contract::Name,
        items: Vec<api::offer::LineItemInput>,
        vat: Percent,
        interval: api::contract::Interval,
        preferred_time: Option<api::offer::TimeOfDay>,
        checklist: Option<Vec<String>>,
        valid_until: Option<Date>,
        ctx: &Context,
    ) -> Result<api::Offer, Error> {
        let checklist = domain::offer::Checklist::new(
            checklist.unwrap_or_default(),
        )
        .ok_or_else(|| ChecklistError::Invalid.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateOffer {
                customer_id: customer_id.into(),
                service_name: service_name.into(),
                items: items.into_iter().map(Into::into).collect(),
                vat,
                interval: interval.into(),
                preferred_time: preferred_time.map(Into::into),
                checklist,
                valid_until: valid_until.map(|d| d.coerce()),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sends the `Offer` with the provided ID to its `Customer`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `OFFER_NOT_EXISTS` - the `Offer` with the provided ID does not exist;
    /// - `OFFER_DECIDED` - the `Offer` has been accepted or rejected already;
    /// - `OFFER_EXPIRED` - the `Offer` validity has expired.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "sendOffer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn send_offer(
        id: api::offer::Id,
        ctx: &Context,
    ) -> Result<api::Offer, Error> {
        ctx.service()
            .execute(command::SendOffer { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Converts the `Offer` with the provided ID into a `Contract`, or mints
    /// a signing link for the `Customer` to sign first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `OFFER_NOT_EXISTS` - the `Offer` with the provided ID does not exist;
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` of the `Offer` does not exist;
    /// - `OFFER_DECIDED` - the `Offer` has been accepted or rejected already;
    /// - `OFFER_EXPIRED` - the `Offer` validity has expired;
    /// - `UNPRICEABLE_ITEMS` - the `Offer`'s line items cannot be priced.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "convertOffer",
            id = %id,
            otel.name = Self::SPAN_NAME,
            send_link = ?send_link,
            start_date = ?start_date,
        ),
    )]
    pub async fn convert_offer(
        id: api::offer::Id,
        start_date: Option<Date>,
        send_link: Option<bool>,
        ctx: &Context,
    ) -> Result<api::offer::ConvertResult, Error> {
        ctx.service()
            .execute(command::ConvertOffer {
                offer_id: id.into(),
                start_date: start_date.map(|d| d.coerce()),
                send_link: send_link.unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Completes a deferred `Offer` signing with the provided token and
    /// signature.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_SIGNING_TOKEN` - the provided token is invalid or expired;
    /// - `STALE_SIGNING_TOKEN` - the `Offer` content changed since the token
    ///                           was minted;
    /// - `OFFER_NOT_EXISTS` - the `Offer` the token refers to does not exist;
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` of the `Offer` does not exist;
    /// - `OFFER_DECIDED` - the `Offer` has been accepted or rejected already;
    /// - `UNPRICEABLE_ITEMS` - the `Offer`'s line items cannot be priced.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "completeOfferSigning",
            otel.name = Self::SPAN_NAME,
            signature = %signature,
        ),
    )]
    pub async fn complete_offer_signing(
        token: api::offer::SigningToken,
        signature: api::offer::SignatureReference,
        ctx: &Context,
    ) -> Result<api::offer::SigningResult, Error> {
        ctx.service()
            .execute(command::CompleteOfferSigning {
                token: token.into(),
                signature: signature.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Contract` with the provided details, bypassing the
    /// `Offer` flow.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the provided ID does not
    ///                           exist;
    /// - `INVALID_CHECKLIST` - the provided checklist steps are malformed.
    #[tracing::instrument(
        skip_all,
        fields(
            address = ?address.as_ref().map(ToString::to_string),
            customer_id = %customer_id,
            gql.name = "createContract",
            interval = ?interval,
            otel.name = Self::SPAN_NAME,
            price = %price,
            service_name = %service_name,
            start_date = ?start_date,
            vat = %vat,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_contract(
        customer_id: api::customer::Id,
        service_name: api::contract::Name,
        price: Money,
        vat: Percent,
        address: Option<api::customer::Address>,
        interval: api::contract::Interval,
        start_date: Date,
        checklist: Option<Vec<String>>,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        let checklist = domain::offer::Checklist::new(
            checklist.unwrap_or_default(),
        )
        .ok_or_else(|| ChecklistError::Invalid.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateContract {
                customer_id: customer_id.into(),
                service_name: service_name.into(),
                price,
                vat,
                address: address.map(Into::into),
                interval: interval.into(),
                start_date: start_date.coerce(),
                checklist,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Pauses the `Contract` with the provided ID, so no `Job`s are generated
    /// under it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the provided ID does not
    ///                           exist;
    /// - `CONTRACT_PAUSED` - the `Contract` is paused already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "pauseContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn pause_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        ctx.service()
            .execute(command::PauseContract { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Resumes the paused `Contract` with the provided ID, fast-forwarding
    /// its schedule cursor to the future.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the provided ID does not
    ///                           exist;
    /// - `CONTRACT_NOT_PAUSED` - the `Contract` is not paused.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "resumeContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn resume_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        ctx.service()
            .execute(command::ResumeContract { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Generates `Job`s for all active `Contract`s due up to the provided
    /// date (the current date, if omitted).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "generateSchedule",
            otel.name = Self::SPAN_NAME,
            today = ?today,
        ),
    )]
    pub async fn generate_schedule(
        today: Option<Date>,
        ctx: &Context,
    ) -> Result<api::job::ScheduleResult, Error> {
        ctx.service()
            .execute(command::GenerateSchedule {
                today: today.unwrap_or_else(Date::today),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new one-off `Job` with the provided details.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the provided ID does not
    ///                           exist;
    /// - `INVALID_CHECKLIST` - the provided checklist steps are malformed.
    #[tracing::instrument(
        skip_all,
        fields(
            address = ?address.as_ref().map(ToString::to_string),
            customer_id = %customer_id,
            gql.name = "createJob",
            otel.name = Self::SPAN_NAME,
            price = %price,
            scheduled_date = ?scheduled_date,
            service_name = %service_name,
            vat = %vat,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_job(
        customer_id: api::customer::Id,
        service_name: api::contract::Name,
        price: Money,
        vat: Percent,
        address: Option<api::customer::Address>,
        checklist: Option<Vec<String>>,
        scheduled_date: Date,
        ctx: &Context,
    ) -> Result<api::Job, Error> {
        let checklist = domain::offer::Checklist::new(
            checklist.unwrap_or_default(),
        )
        .ok_or_else(|| ChecklistError::Invalid.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateJob {
                customer_id: customer_id.into(),
                service_name: service_name.into(),
                price,
                vat,
                address: address.map(Into::into),
                checklist,
                scheduled_date: scheduled_date.coerce(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Assigns the `Employee` with the provided ID to the `Job`.
    ///
    /// Overlapping `Absence`s are returned as conflicts, and prevent the
    /// `Assignment` unless acknowledged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `JOB_NOT_EXISTS` - the `Job` with the provided ID does not exist;
    /// - `EMPLOYEE_NOT_EXISTS` - the `Employee` with the provided ID does not
    ///                           exist;
    /// - `JOB_NOT_WORKABLE` - the `Job` cannot be worked on in its current
    ///                        state;
    /// - `EMPLOYEE_ALREADY_ASSIGNED` - the `Employee` is assigned to the
    ///                                 `Job` already.
    #[tracing::instrument(
        skip_all,
        fields(
            acknowledge_absences = ?acknowledge_absences,
            employee_id = %employee_id,
            gql.name = "assignEmployee",
            job_id = %job_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn assign_employee(
        job_id: api::job::Id,
        employee_id: api::employee::Id,
        acknowledge_absences: Option<bool>,
        ctx: &Context,
    ) -> Result<api::job::AssignResult, Error> {
        ctx.service()
            .execute(command::AssignEmployee {
                job_id: job_id.into(),
                employee_id: employee_id.into(),
                acknowledge_absences: acknowledge_absences.unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Unassigns the `Employee` with the provided ID from the `Job`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `JOB_NOT_EXISTS` - the `Job` with the provided ID does not exist;
    /// - `JOB_NOT_WORKABLE` - the `Job` cannot be worked on in its current
    ///                        state;
    /// - `EMPLOYEE_NOT_ASSIGNED` - the `Employee` is not assigned to the
    ///                             `Job`;
    /// - `TIME_TRACKED` - the `Assignment` carries tracked time already.
    #[tracing::instrument(
        skip_all,
        fields(
            employee_id = %employee_id,
            gql.name = "unassignEmployee",
            job_id = %job_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn unassign_employee(
        job_id: api::job::Id,
        employee_id: api::employee::Id,
        ctx: &Context,
    ) -> Result<api::job::assignment::Assignment, Error> {
        ctx.service()
            .execute(command::UnassignEmployee {
                job_id: job_id.into(),
                employee_id: employee_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Starts a time entry of the `Employee` on the `Job`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `JOB_NOT_EXISTS` - the `Job` with the provided ID does not exist;
    /// - `JOB_NOT_WORKABLE` - the `Job` cannot be worked on in its current
    ///                        state;
    /// - `EMPLOYEE_NOT_ASSIGNED` - the `Employee` is not assigned to the
    ///                             `Job`;
    /// - `INVALID_TIME_ENTRY` - the time entry cannot be started in the
    ///                          `Assignment`'s current state.
    #[tracing::instrument(
        skip_all,
        fields(
            employee_id = %employee_id,
            gql.name = "startTimeEntry",
            job_id = %job_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn start_time_entry(
        job_id: api::job::Id,
        employee_id: api::employee::Id,
        ctx: &Context,
    ) -> Result<api::job::assignment::Assignment, Error> {
        ctx.service()
            .execute(command::StartTimeEntry {
                job_id: job_id.into(),
                employee_id: employee_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Stops the running time entry of the `Employee` on the `Job`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `JOB_NOT_EXISTS` - the `Job` with the provided ID does not exist;
    /// - `JOB_NOT_WORKABLE` - the `Job` cannot be worked on in its current
    ///                        state;
    /// - `EMPLOYEE_NOT_ASSIGNED` - the `Employee` is not assigned to the
    ///                             `Job`;
    /// - `INVALID_TIME_ENTRY` - no running time entry to stop.
    #[tracing::instrument(
        skip_all,
        fields(
            employee_id = %employee_id,
            gql.name = "stopTimeEntry",
            job_id = %job_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn stop_time_entry(
        job_id: api::job::Id,
        employee_id: api::employee::Id,
        ctx: &Context,
    ) -> Result<api::job::assignment::Assignment, Error> {
        ctx.service()
            .execute(command::StopTimeEntry {
                job_id: job_id.into(),
                employee_id: employee_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records a manual time entry of the `Employee` on the `Job`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `JOB_NOT_EXISTS` - the `Job` with the provided ID does not exist;
    /// - `JOB_NOT_WORKABLE` - the `Job` cannot be worked on in its current
    ///                        state;
    /// - `EMPLOYEE_NOT_ASSIGNED` - the `Employee` is not assigned to the
    ///                             `Job`;
    /// - `INVALID_TIME_ENTRY` - the provided period is invalid for the
    ///                          `Assignment`'s state.
    #[tracing::instrument(
        skip_all,
        fields(
            employee_id = %employee_id,
            finished_at = ?finished_at.to_rfc3339(),
            gql.name = "recordManualTime",
            job_id = %job_id,
            otel.name = Self::SPAN_NAME,
            started_at = ?started_at.to_rfc3339(),
        ),
    )]
    pub async fn record_manual_time(
        job_id: api::job::Id,
        employee_id: api::employee::Id,
        started_at: DateTime,
        finished_at: DateTime,
        ctx: &Context,
    ) -> Result<api::job::assignment::Assignment, Error> {
        ctx.service()
            .execute(command::RecordManualTime {
                job_id: job_id.into(),
                employee_id: employee_id.into(),
                started_at: started_at.coerce(),
                finished_at: finished_at.coerce(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Completes the `Job` with the provided ID, deriving its duration from
    /// the tracked time entries unless overridden.
    ///
    /// With `force`, the `Job` is closed out even over unsettled
    /// `Assignment`s, in which case an explicit `duration` is required.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `JOB_NOT_EXISTS` - the `Job` with the provided ID does not exist;
    /// - `JOB_NOT_WORKABLE` - the `Job` cannot be completed in its current
    ///                        state;
    /// - `ASSIGNMENTS_PENDING` - some `Assignment`s have not settled their
    ///                           work yet, and `force` was not set;
    /// - `NO_DURATION` - no duration was provided, and none can be derived.
    #[tracing::instrument(
        skip_all,
        fields(
            duration = ?duration,
            force = ?force,
            gql.name = "completeJob",
            job_id = %job_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn complete_job(
        job_id: api::job::Id,
        duration: Option<i32>,
        proofs: Option<Vec<api::job::ProofInput>>,
        force: Option<bool>,
        ctx: &Context,
    ) -> Result<api::Job, Error> {
        ctx.service()
            .execute(command::CompleteJob {
                job_id: job_id.into(),
                duration: duration.map(Into::into),
                proofs: proofs
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                force: force.unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `Job` with the provided ID, so it is never billed.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `JOB_NOT_EXISTS` - the `Job` with the provided ID does not exist;
    /// - `JOB_NOT_WORKABLE` - the `Job` cannot be cancelled in its current
    ///                        state.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelJob",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_job(
        id: api::job::Id,
        ctx: &Context,
    ) -> Result<api::Job, Error> {
        ctx.service()
            .execute(command::CancelJob { job_id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Aggregates all unbilled completed `Job`s of the `Customer` into a
    /// draft `Invoice`.
    ///
    /// Returns no `Invoice` if there is nothing to bill.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the provided ID does not
    ///                           exist;
    /// - `CURRENCY_MISMATCH` - the unbilled `Job`s are priced in different
    ///                         currencies.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            gql.name = "generateInvoice",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn generate_invoice(
        customer_id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::invoice::GenerateResult, Error> {
        ctx.service()
            .execute(command::GenerateInvoice {
                customer_id: customer_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sends the `Invoice` with the provided ID to its `Customer`, rendering
    /// its document and starting the payment terms.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` with the provided ID does not
    ///                          exist;
    /// - `INVALID_INVOICE_STATE` - the `Invoice` cannot be sent in its
    ///                             current state.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "sendInvoice",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn send_invoice(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<api::invoice::SendResult, Error> {
        ctx.service()
            .execute(command::SendInvoice { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `Invoice` with the provided ID as paid, resetting any
    /// dunning escalation.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` with the provided ID does not
    ///                          exist;
    /// - `INVALID_INVOICE_STATE` - the `Invoice` cannot be settled in its
    ///                             current state.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markInvoicePaid",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_invoice_paid(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        ctx.service()
            .execute(command::MarkInvoicePaid { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Escalates the dunning of the overdue `Invoice` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` with the provided ID does not
    ///                          exist;
    /// - `INVOICE_NOT_OVERDUE` - the `Invoice` is not overdue;
    /// - `DUNNING_TOO_SOON` - the previous escalation happened too recently;
    /// - `MAX_DUNNING_LEVEL` - the maximum dunning level is reached.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "executeDunning",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn execute_dunning(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        ctx.service()
            .execute(command::ExecuteDunning { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Resets the dunning escalation of the `Invoice` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` with the provided ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "resetDunning",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reset_dunning(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        ctx.service()
            .execute(command::ResetDunning { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records a new `Expense` with the provided details.
    #[tracing::instrument(
        skip_all,
        fields(
            amount = %amount,
            category = %category,
            date = ?date,
            description = %description,
            gql.name = "createExpense",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_expense(
        description: api::expense::Description,
        amount: Money,
        category: api::expense::Category,
        date: Date,
        ctx: &Context,
    ) -> Result<api::Expense, Error> {
        ctx.service()
            .execute(command::CreateExpense {
                description: description.into(),
                amount,
                category: category.into(),
                date: date.coerce(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Expense` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EXPENSE_NOT_EXISTS` - the `Expense` with the provided ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteExpense",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_expense(
        id: api::expense::Id,
        ctx: &Context,
    ) -> Result<api::Expense, Error> {
        ctx.service()
            .execute(command::DeleteExpense { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum ChecklistError {
        #[code = "INVALID_CHECKLIST"]
        #[status = BAD_REQUEST]
        #[message = "Provided checklist steps are malformed or too numerous"]
        Invalid,
    }
}

impl AsError for command::create_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_employee::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::record_absence::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMPLOYEE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Employee` with the provided ID does not exist"]
                EmployeeNotExists,

                #[code = "ABSENCE_ENDS_BEFORE_START"]
                #[status = BAD_REQUEST]
                #[message = "Provided `Absence` period ends before it starts"]
                EndBeforeStart,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EmployeeNotExists(_) => Error::EmployeeNotExists.into(),
            Self::EndBeforeStart => Error::EndBeforeStart.into(),
        })
    }
}

impl AsError for command::create_offer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CUSTOMER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Customer` with the provided ID does not exist"]
                CustomerNotExists,

                #[code = "UNPRICEABLE_ITEMS"]
                #[status = BAD_REQUEST]
                #[message = "Provided line items cannot be priced"]
                Pricing,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CustomerNotExists(_) => Error::CustomerNotExists.into(),
            Self::Pricing(_) => Error::Pricing.into(),
        })
    }
}

impl AsError for command::send_offer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "OFFER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Offer` with the provided ID does not exist"]
                OfferNotExists,

                #[code = "OFFER_DECIDED"]
                #[status = CONFLICT]
                #[message = "`Offer` has been accepted or rejected already"]
                OfferDecided,

                #[code = "OFFER_EXPIRED"]
                #[status = CONFLICT]
                #[message = "`Offer` validity has expired"]
                OfferExpired,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Notify(_) => return None,
            Self::NotExists(_) => Error::OfferNotExists.into(),
            Self::Transition(_) => Error::OfferDecided.into(),
            Self::Expired(_) => Error::OfferExpired.into(),
        })
    }
}

impl AsError for command::convert_offer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "OFFER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Offer` with the provided ID does not exist"]
                OfferNotExists,

                #[code = "CUSTOMER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Customer` of the `Offer` does not exist"]
                CustomerNotExists,

                #[code = "OFFER_DECIDED"]
                #[status = CONFLICT]
                #[message = "`Offer` has been accepted or rejected already"]
                OfferDecided,

                #[code = "OFFER_EXPIRED"]
                #[status = CONFLICT]
                #[message = "`Offer` validity has expired"]
                OfferExpired,

                #[code = "UNPRICEABLE_ITEMS"]
                #[status = BAD_REQUEST]
                #[message = "`Offer`'s line items cannot be priced"]
                Pricing,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Notify(_) | Self::JsonWebTokenEncodeError(_) => return None,
            Self::NotExists(_) => Error::OfferNotExists.into(),
            Self::CustomerNotExists(_) => Error::CustomerNotExists.into(),
            Self::Transition(_) => Error::OfferDecided.into(),
            Self::Expired(_) => Error::OfferExpired.into(),
            Self::Pricing(_) => Error::Pricing.into(),
        })
    }
}

impl AsError for command::complete_offer_signing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_SIGNING_TOKEN"]
                #[status = FORBIDDEN]
                #[message = "Provided signing token is invalid or expired"]
                InvalidToken,

                #[code = "STALE_SIGNING_TOKEN"]
                #[status = CONFLICT]
                #[message = "`Offer` content changed since the signing token \
                             was minted"]
                StaleToken,

                #[code = "OFFER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Offer` the signing token refers to does not \
                             exist"]
                OfferNotExists,

                #[code = "CUSTOMER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Customer` of the `Offer` does not exist"]
                CustomerNotExists,

                #[code = "OFFER_DECIDED"]
                #[status = CONFLICT]
                #[message = "`Offer` has been accepted or rejected already"]
                OfferDecided,

                #[code = "UNPRICEABLE_ITEMS"]
                #[status = BAD_REQUEST]
                #[message = "`Offer`'s line items cannot be priced"]
                Pricing,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidToken(_) => Error::InvalidToken.into(),
            Self::NotExists(_) => Error::OfferNotExists.into(),
            Self::CustomerNotExists(_) => Error::CustomerNotExists.into(),
            Self::Transition(_) => Error::OfferDecided.into(),
            Self::StaleToken(_) => Error::StaleToken.into(),
            Self::Pricing(_) => Error::Pricing.into(),
        })
    }
}

impl AsError for command::create_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CUSTOMER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Customer` with the provided ID does not exist"]
                CustomerNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CustomerNotExists(_) => Error::CustomerNotExists.into(),
        })
    }
}

impl AsError for command::pause_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CONTRACT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Contract` with the provided ID does not exist"]
                ContractNotExists,

                #[code = "CONTRACT_PAUSED"]
                #[status = CONFLICT]
                #[message = "`Contract` with the provided ID is paused \
                             already"]
                AlreadyPaused,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotExists(_) => Error::ContractNotExists.into(),
            Self::AlreadyPaused(_) => Error::AlreadyPaused.into(),
        })
    }
}

impl AsError for command::resume_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CONTRACT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Contract` with the provided ID does not exist"]
                ContractNotExists,

                #[code = "CONTRACT_NOT_PAUSED"]
                #[status = CONFLICT]
                #[message = "`Contract` with the provided ID is not paused"]
                NotPaused,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotExists(_) => Error::ContractNotExists.into(),
            Self::NotPaused(_) => Error::NotPaused.into(),
        })
    }
}

impl AsError for command::generate_schedule::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_job::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CUSTOMER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Customer` with the provided ID does not exist"]
                CustomerNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CustomerNotExists(_) => Error::CustomerNotExists.into(),
        })
    }
}

impl AsError for command::assign_employee::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "JOB_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Job` with the provided ID does not exist"]
                JobNotExists,

                #[code = "EMPLOYEE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Employee` with the provided ID does not exist"]
                EmployeeNotExists,

                #[code = "JOB_NOT_WORKABLE"]
                #[status = CONFLICT]
                #[message = "`Job` cannot be worked on in its current state"]
                JobNotWorkable,

                #[code = "EMPLOYEE_ALREADY_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`Employee` is assigned to the `Job` already"]
                AlreadyAssigned,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::JobNotExists(_) => Error::JobNotExists.into(),
            Self::EmployeeNotExists(_) => Error::EmployeeNotExists.into(),
            Self::Transition(_) => Error::JobNotWorkable.into(),
            Self::AlreadyAssigned { .. } => Error::AlreadyAssigned.into(),
        })
    }
}

impl AsError for command::unassign_employee::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "JOB_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Job` with the provided ID does not exist"]
                JobNotExists,

                #[code = "JOB_NOT_WORKABLE"]
                #[status = CONFLICT]
                #[message = "`Job` cannot be worked on in its current state"]
                JobNotWorkable,

                #[code = "EMPLOYEE_NOT_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`Employee` is not assigned to the `Job`"]
                NotAssigned,

                #[code = "TIME_TRACKED"]
                #[status = CONFLICT]
                #[message = "`Assignment` carries tracked time already"]
                TimeTracked,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::JobNotExists(_) => Error::JobNotExists.into(),
            Self::Transition(_) => Error::JobNotWorkable.into(),
            Self::NotAssigned { .. } => Error::NotAssigned.into(),
            Self::TimeTracked { .. } => Error::TimeTracked.into(),
        })
    }
}

impl AsError for command::start_time_entry::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "JOB_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Job` with the provided ID does not exist"]
                JobNotExists,

                #[code = "JOB_NOT_WORKABLE"]
                #[status = CONFLICT]
                #[message = "`Job` cannot be worked on in its current state"]
                JobNotWorkable,

                #[code = "EMPLOYEE_NOT_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`Employee` is not assigned to the `Job`"]
                NotAssigned,

                #[code = "INVALID_TIME_ENTRY"]
                #[status = CONFLICT]
                #[message = "Time entry cannot be started in the \
                             `Assignment`'s current state"]
                InvalidTimeEntry,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::JobNotExists(_) => Error::JobNotExists.into(),
            Self::JobTransition(_) => Error::JobNotWorkable.into(),
            Self::NotAssigned { .. } => Error::NotAssigned.into(),
            Self::Transition(_) => Error::InvalidTimeEntry.into(),
        })
    }
}

impl AsError for command::stop_time_entry::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "JOB_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Job` with the provided ID does not exist"]
                JobNotExists,

                #[code = "JOB_NOT_WORKABLE"]
                #[status = CONFLICT]
                #[message = "`Job` cannot be worked on in its current state"]
                JobNotWorkable,

                #[code = "EMPLOYEE_NOT_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`Employee` is not assigned to the `Job`"]
                NotAssigned,

                #[code = "INVALID_TIME_ENTRY"]
                #[status = CONFLICT]
                #[message = "Time entry cannot be stopped in the \
                             `Assignment`'s current state"]
                InvalidTimeEntry,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::JobNotExists(_) => Error::JobNotExists.into(),
            Self::JobTransition(_) => Error::JobNotWorkable.into(),
            Self::NotAssigned { .. } => Error::NotAssigned.into(),
            Self::Transition(_) => Error::InvalidTimeEntry.into(),
        })
    }
}

impl AsError for command::record_manual_time::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "JOB_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Job` with the provided ID does not exist"]
                JobNotExists,

                #[code = "JOB_NOT_WORKABLE"]
                #[status = CONFLICT]
                #[message = "`Job` cannot be worked on in its current state"]
                JobNotWorkable,

                #[code = "EMPLOYEE_NOT_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`Employee` is not assigned to the `Job`"]
                NotAssigned,

                #[code = "INVALID_TIME_ENTRY"]
                #[status = BAD_REQUEST]
                #[message = "Provided time entry is invalid for the \
                             `Assignment`'s state"]
                InvalidTimeEntry,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::JobNotExists(_) => Error::JobNotExists.into(),
            Self::JobTransition(_) => Error::JobNotWorkable.into(),
            Self::NotAssigned { .. } => Error::NotAssigned.into(),
            Self::Transition(_) => Error::InvalidTimeEntry.into(),
        })
    }
}

impl AsError for command::complete_job::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "JOB_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Job` with the provided ID does not exist"]
                JobNotExists,

                #[code = "JOB_NOT_WORKABLE"]
                #[status = CONFLICT]
                #[message = "`Job` cannot be completed in its current state"]
                JobNotWorkable,

                #[code = "ASSIGNMENTS_PENDING"]
                #[status = CONFLICT]
                #[message = "Some `Assignment`s of the `Job` have not settled \
                             their work yet"]
                AssignmentsPending,

                #[code = "NO_DURATION"]
                #[status = BAD_REQUEST]
                #[message = "No duration was provided, and none can be \
                             derived from the tracked time"]
                NoDuration,
            }
        }

        use domain::job::CompletionError as C;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotExists(_) => Error::JobNotExists.into(),
            Self::Transition(_) => Error::JobNotWorkable.into(),
            Self::Completion(_, C::AssignmentsPending) => {
                Error::AssignmentsPending.into()
            }
            Self::Completion(_, C::NoDuration) => Error::NoDuration.into(),
        })
    }
}

impl AsError for command::cancel_job::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "JOB_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Job` with the provided ID does not exist"]
                JobNotExists,

                #[code = "JOB_NOT_WORKABLE"]
                #[status = CONFLICT]
                #[message = "`Job` cannot be cancelled in its current state"]
                JobNotWorkable,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotExists(_) => Error::JobNotExists.into(),
            Self::Transition(_) => Error::JobNotWorkable.into(),
        })
    }
}

impl AsError for command::generate_invoice::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CUSTOMER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Customer` with the provided ID does not exist"]
                CustomerNotExists,

                #[code = "CURRENCY_MISMATCH"]
                #[status = CONFLICT]
                #[message = "Unbilled `Job`s of the `Customer` are priced in \
                             different currencies"]
                CurrencyMismatch,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CustomerNotExists(_) => Error::CustomerNotExists.into(),
            Self::CurrencyMismatch(_) => Error::CurrencyMismatch.into(),
        })
    }
}

impl AsError for command::send_invoice::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVOICE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Invoice` with the provided ID does not exist"]
                InvoiceNotExists,

                #[code = "INVALID_INVOICE_STATE"]
                #[status = CONFLICT]
                #[message = "`Invoice` cannot be sent in its current state"]
                InvalidState,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::External(_) | Self::DueDateOverflow => return None,
            Self::NotExists(_) => Error::InvoiceNotExists.into(),
            Self::Transition(_) => Error::InvalidState.into(),
        })
    }
}

impl AsError for command::mark_invoice_paid::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVOICE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Invoice` with the provided ID does not exist"]
                InvoiceNotExists,

                #[code = "INVALID_INVOICE_STATE"]
                #[status = CONFLICT]
                #[message = "`Invoice` cannot be settled in its current state"]
                InvalidState,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotExists(_) => Error::InvoiceNotExists.into(),
            Self::Transition(_) => Error::InvalidState.into(),
        })
    }
}

impl AsError for command::execute_dunning::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use domain::invoice::EscalationError as Esc;

        define_error! {
            enum Error {
                #[code = "INVOICE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Invoice` with the provided ID does not exist"]
                InvoiceNotExists,

                #[code = "INVOICE_NOT_OVERDUE"]
                #[status = CONFLICT]
                #[message = "`Invoice` with the provided ID is not overdue"]
                NotOverdue,

                #[code = "DUNNING_TOO_SOON"]
                #[status = CONFLICT]
                #[message = "Previous dunning escalation happened too \
                             recently"]
                TooSoon,

                #[code = "MAX_DUNNING_LEVEL"]
                #[status = CONFLICT]
                #[message = "Maximum dunning level is reached"]
                MaxLevel,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Notify(_) => return None,
            Self::NotExists(_) => Error::InvoiceNotExists.into(),
            Self::Escalation(Esc::NotOverdue(_)) => Error::NotOverdue.into(),
            Self::Escalation(Esc::TooSoon) => Error::TooSoon.into(),
            Self::Escalation(Esc::MaxLevel) => Error::MaxLevel.into(),
        })
    }
}

impl AsError for command::reset_dunning::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVOICE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Invoice` with the provided ID does not exist"]
                InvoiceNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotExists(_) => Error::InvoiceNotExists.into(),
        })
    }
}

impl AsError for command::create_expense::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_expense::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EXPENSE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Expense` with the provided ID does not exist"]
                ExpenseNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotExists(_) => Error::ExpenseNotExists.into(),
        })
    }
}
