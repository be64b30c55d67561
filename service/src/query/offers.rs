//! [`Query`] collection related to the multiple [`Offer`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{offer, Offer},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Offer`]s by their [`offer::Id`]s.
pub type ByIds = DatabaseQuery<By<HashMap<offer::Id, Offer>, Vec<offer::Id>>>;

/// Queries a list of [`Offer`]s.
pub type List =
    DatabaseQuery<By<read::offer::list::Page, read::offer::list::Selector>>;

/// Queries total count of [`Offer`]s.
pub type TotalCount = DatabaseQuery<By<read::offer::list::TotalCount, ()>>;
