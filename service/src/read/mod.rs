//! Read entities definitions.

pub mod contract;
pub mod customer;
pub mod employee;
pub mod expense;
pub mod invoice;
pub mod job;
pub mod offer;
