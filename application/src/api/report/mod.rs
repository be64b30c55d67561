//! Report definitions.

pub mod payroll;

pub use self::payroll::Payroll;
