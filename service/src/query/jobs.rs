//! [`Query`] collection related to the multiple [`Job`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{job, Job},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Job`]s by their [`job::Id`]s.
pub type ByIds = DatabaseQuery<By<HashMap<job::Id, Job>, Vec<job::Id>>>;

/// Queries a list of [`Job`]s.
pub type List =
    DatabaseQuery<By<read::job::list::Page, read::job::list::Selector>>;

/// Queries total count of [`Job`]s.
pub type TotalCount = DatabaseQuery<By<read::job::list::TotalCount, ()>>;
