//! [`Command`] for creating a new [`Employee`].

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, employee, Employee},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Employee`].
#[derive(Clone, Debug)]
pub struct CreateEmployee {
    /// Name of a new [`Employee`].
    pub name: employee::Name,

    /// Email address of a new [`Employee`].
    pub email: Option<customer::Email>,

    /// Phone number of a new [`Employee`].
    pub phone: Option<customer::Phone>,
}

impl<Db, Ext> Command<CreateEmployee> for Service<Db, Ext>
where
    Db: Database<Insert<Employee>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Employee;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateEmployee { name, email, phone } = cmd;

        let employee = Employee {
            id: employee::Id::new(),
            name,
            email,
            phone,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };
        self.database()
            .execute(Insert(employee.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(employee)
    }
}

/// Error of [`CreateEmployee`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
