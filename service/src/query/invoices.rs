//! [`Query`] collection related to the multiple [`Invoice`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{invoice, Invoice},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Invoice`]s by their [`invoice::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<invoice::Id, Invoice>, Vec<invoice::Id>>>;

/// Queries a list of [`Invoice`]s.
pub type List = DatabaseQuery<
    By<read::invoice::list::Page, read::invoice::list::Selector>,
>;

/// Queries total count of [`Invoice`]s.
pub type TotalCount = DatabaseQuery<By<read::invoice::list::TotalCount, ()>>;
