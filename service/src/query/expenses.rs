//! [`Query`] collection related to the multiple [`Expense`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{expense, Expense},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Expense`]s by their [`expense::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<expense::Id, Expense>, Vec<expense::Id>>>;

/// Queries a list of [`Expense`]s.
pub type List = DatabaseQuery<
    By<read::expense::list::Page, read::expense::list::Selector>,
>;

/// Queries total count of [`Expense`]s.
pub type TotalCount = DatabaseQuery<By<read::expense::list::TotalCount, ()>>;
