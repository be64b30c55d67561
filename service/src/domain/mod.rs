//! Domain definitions.

pub mod absence;
pub mod assignment;
pub mod contract;
pub mod customer;
pub mod employee;
pub mod expense;
pub mod invoice;
pub mod job;
pub mod offer;

pub use self::{
    absence::Absence, assignment::Assignment, contract::Contract,
    customer::Customer, employee::Employee, expense::Expense,
    invoice::Invoice, job::Job, offer::Offer,
};
