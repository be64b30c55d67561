//! [`Command`] for creating a new [`Customer`].

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Customer`].
#[derive(Clone, Debug)]
pub struct CreateCustomer {
    /// Name of a new [`Customer`].
    pub name: customer::Name,

    /// Email address of a new [`Customer`].
    pub email: Option<customer::Email>,

    /// Phone number of a new [`Customer`].
    pub phone: Option<customer::Phone>,

    /// Billing address of a new [`Customer`].
    pub billing_address: customer::Address,
}

impl<Db, Ext> Command<CreateCustomer> for Service<Db, Ext>
where
    Db: Database<Insert<Customer>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCustomer {
            name,
            email,
            phone,
            billing_address,
        } = cmd;

        let customer = Customer {
            id: customer::Id::new(),
            name,
            email,
            phone,
            billing_address,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };
        self.database()
            .execute(Insert(customer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(customer)
    }
}

/// Error of [`CreateCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
