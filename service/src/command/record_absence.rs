//! [`Command`] for recording an [`Absence`] of an [`Employee`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{absence, employee, Absence, Employee},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording an [`Absence`] of an [`Employee`].
#[derive(Clone, Debug)]
pub struct RecordAbsence {
    /// ID of the absent [`Employee`].
    pub employee_id: employee::Id,

    /// [`Kind`] of the [`Absence`].
    ///
    /// [`Kind`]: absence::Kind
    pub kind: absence::Kind,

    /// First [`Date`] of the [`Absence`] (inclusive).
    ///
    /// [`Date`]: common::Date
    pub start_date: absence::StartDate,

    /// Last [`Date`] of the [`Absence`] (inclusive).
    ///
    /// [`Date`]: common::Date
    pub end_date: absence::EndDate,

    /// Optional note on the [`Absence`].
    pub note: Option<absence::Note>,
}

impl<Db, Ext> Command<RecordAbsence> for Service<Db, Ext>
where
    Db: Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<Insert<Absence>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Absence;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: RecordAbsence) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordAbsence {
            employee_id,
            kind,
            start_date,
            end_date,
            note,
        } = cmd;

        if end_date.coerce::<()>() < start_date.coerce::<()>() {
            return Err(tracerr::new!(E::EndBeforeStart));
        }

        let employee = self
            .database()
            .execute(Select(By::<Option<Employee>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;

        let absence = Absence {
            id: absence::Id::new(),
            employee_id: employee.id,
            kind,
            start_date,
            end_date,
            note,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(absence.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(absence)
    }
}

/// Error of [`RecordAbsence`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Employee`] with the provided ID does not exist.
    #[display("`Employee(id: {_0})` does not exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),

    /// Provided [`Absence`] period ends before it starts.
    #[display("`Absence` period ends before it starts")]
    EndBeforeStart,
}
