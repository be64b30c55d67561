//! [`Payroll`] report definition.

use std::sync::OnceLock;

use juniper::graphql_object;
use service::query;

#[cfg(doc)]
use crate::api::Employee;
use crate::{api, Context};

/// Report summing up the tracked working time per [`Employee`].
#[derive(Clone, Debug)]
pub struct Payroll {
    /// Underlying [`query::report::payroll::Output`].
    output: query::report::payroll::Output,

    /// [`Row`]s of this report.
    rows: OnceLock<Vec<Row>>,
}

impl From<query::report::payroll::Output> for Payroll {
    fn from(output: query::report::payroll::Output) -> Self {
        Self {
            output,
            rows: OnceLock::new(),
        }
    }
}

/// Report summing up the tracked working time per `Employee`.
#[graphql_object(name = "PayrollReport", context = Context)]
impl Payroll {
    /// `PayrollReportRow`s of this report.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PayrollReport.rows",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        self.rows
            .get_or_init(|| {
                self.output.rows.iter().cloned().map(Row::from).collect()
            })
            .as_slice()
    }
}

/// Row of a [`Payroll`] report.
#[derive(Clone, Debug)]
pub struct Row {
    /// Underlying [`query::report::payroll::Row`].
    row: query::report::payroll::Row,

    /// [`Employee`] this [`Row`] is about.
    ///
    /// [`Employee`]: api::Employee
    employee: api::Employee,
}

impl From<query::report::payroll::Row> for Row {
    fn from(row: query::report::payroll::Row) -> Self {
        Self {
            employee: row.employee.clone().into(),
            row,
        }
    }
}

/// Row of a `PayrollReport`.
#[graphql_object(name = "PayrollReportRow", context = Context)]
impl Row {
    /// `Employee` this `Row` is about.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PayrollReportRow.employee",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn employee(&self) -> &api::Employee {
        &self.employee
    }

    /// Total tracked time of the `Employee` within the report period, in
    /// whole minutes.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PayrollReportRow.minutes",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn minutes(&self) -> i32 {
        self.row.minutes.into()
    }

    /// Number of completed `Job`s the `Employee` worked on within the report
    /// period.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PayrollReportRow.jobsCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn jobs_count(&self) -> i32 {
        self.row.jobs.into()
    }
}
