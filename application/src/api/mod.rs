//! GraphQL API definitions.

pub mod contract;
pub mod customer;
pub mod employee;
pub mod expense;
pub mod invoice;
pub mod job;
mod mutation;
pub mod offer;
mod query;
pub mod report;
pub mod scalar;

use crate::{define_error, Context};

pub use self::{
    contract::Contract, customer::Customer, employee::Employee,
    expense::Expense, invoice::Invoice, job::Job, mutation::Mutation,
    offer::Offer, query::Query,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<
    'static,
    Query,
    Mutation,
    juniper::EmptySubscription<Context>,
>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
