//! [`Query`] collection related to a single [`Job`].

use common::operations::By;

use crate::domain::{job, Assignment, Job};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Job`] by its [`job::Id`].
pub type ById = DatabaseQuery<By<Option<Job>, job::Id>>;

/// Queries the [`Assignment`]s of a [`Job`].
pub type Assignments = DatabaseQuery<By<Vec<Assignment>, job::Id>>;
