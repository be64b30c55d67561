//! [`Query`] collection related to the multiple [`Contract`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{contract, Contract},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Contract`]s by their [`contract::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<contract::Id, Contract>, Vec<contract::Id>>>;

/// Queries a list of [`Contract`]s.
pub type List = DatabaseQuery<
    By<read::contract::list::Page, read::contract::list::Selector>,
>;

/// Queries total count of [`Contract`]s.
pub type TotalCount = DatabaseQuery<By<read::contract::list::TotalCount, ()>>;
