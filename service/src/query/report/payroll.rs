//! [`Payroll`] definition.

use std::{collections::HashMap, ops::RangeInclusive};

use common::{
    operations::{By, Select},
    Date,
};
use tracerr::Traced;

use crate::{
    domain::{employee, job, Employee},
    infra::{database, Database},
    read,
    Query, Service,
};

/// [`Query`] to sum up the tracked working time per [`Employee`] for a given
/// period.
///
/// Only completed [`Job`]s count, so a period is safe to pay out once its
/// [`Job`]s are closed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Payroll {
    /// First [`Date`] of the period (inclusive).
    pub start: Date,

    /// Last [`Date`] of the period (inclusive).
    pub end: Date,
}

/// Output of the [`Payroll`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Rows of the report.
    pub rows: Vec<Row>,
}

/// Row in the [`Output`] of the [`Payroll`] [`Query`].
#[derive(Clone, Debug)]
pub struct Row {
    /// [`Employee`] the time is summed up for.
    pub employee: Employee,

    /// Total tracked time in the period, in whole minutes.
    pub minutes: job::DurationMinutes,

    /// Number of completed [`Job`]s the [`Employee`] worked on.
    pub jobs: read::job::list::TotalCount,
}

impl<Db, Ext> Query<Payroll> for Service<Db, Ext>
where
    Db: Database<
            Select<
                By<
                    HashMap<
                        employee::Id,
                        (job::DurationMinutes, read::job::list::TotalCount),
                    >,
                    RangeInclusive<job::ScheduledDate>,
                >,
            >,
            Ok = HashMap<
                employee::Id,
                (job::DurationMinutes, read::job::list::TotalCount),
            >,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<employee::Id, Employee>, Vec<employee::Id>>>,
            Ok = HashMap<employee::Id, Employee>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Payroll { start, end }: Payroll,
    ) -> Result<Self::Ok, Self::Err> {
        let range = RangeInclusive::new(start.coerce(), end.coerce());

        let time_by_employee = self
            .database()
            .execute(Select(By::<
                HashMap<
                    employee::Id,
                    (job::DurationMinutes, read::job::list::TotalCount),
                >,
                _,
            >::new(range)))
            .await
            .map_err(tracerr::wrap!())?;
        if time_by_employee.is_empty() {
            return Ok(Output { rows: vec![] });
        }

        let employee_ids =
            time_by_employee.keys().copied().collect::<Vec<_>>();
        let employees = self
            .database()
            .execute(Select(
                By::<HashMap<employee::Id, Employee>, _>::new(employee_ids),
            ))
            .await
            .map_err(tracerr::wrap!())?;

        let mut rows = time_by_employee
            .into_iter()
            .filter_map(|(employee_id, (minutes, jobs))| {
                Some(Row {
                    employee: employees.get(&employee_id)?.clone(),
                    minutes,
                    jobs,
                })
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| {
            AsRef::<str>::as_ref(&a.employee.name)
                .cmp(b.employee.name.as_ref())
        });

        Ok(Output { rows })
    }
}
