//! [`Command`] for recording a new [`Expense`].

use common::{operations::Insert, DateTime, Money};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{expense, Expense},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a new [`Expense`].
#[derive(Clone, Debug)]
pub struct CreateExpense {
    /// Description of a new [`Expense`].
    pub description: expense::Description,

    /// Spent amount.
    pub amount: Money,

    /// Free-form category of a new [`Expense`].
    pub category: expense::Category,

    /// [`Date`] the amount was spent on.
    ///
    /// [`Date`]: common::Date
    pub date: expense::SpentDate,
}

impl<Db, Ext> Command<CreateExpense> for Service<Db, Ext>
where
    Db: Database<Insert<Expense>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Expense;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateExpense) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateExpense {
            description,
            amount,
            category,
            date,
        } = cmd;

        let expense = Expense {
            id: expense::Id::new(),
            description,
            amount,
            category,
            date,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(expense.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(expense)
    }
}

/// Error of [`CreateExpense`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
