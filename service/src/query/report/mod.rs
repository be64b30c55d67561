//! Report [`Query`] definitions.
//!
//! [`Query`]: crate::Query

pub mod payroll;

pub use self::payroll::Payroll;
