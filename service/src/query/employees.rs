//! [`Query`] collection related to the multiple [`Employee`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{employee, Employee},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Employee`]s by their [`employee::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<employee::Id, Employee>, Vec<employee::Id>>>;

/// Queries a list of [`Employee`]s.
pub type List = DatabaseQuery<
    By<read::employee::list::Page, read::employee::list::Selector>,
>;

/// Queries total count of [`Employee`]s.
pub type TotalCount = DatabaseQuery<By<read::employee::list::TotalCount, ()>>;
