//! [`Query`] collection related to a single [`Employee`].

use common::operations::By;

use crate::domain::{employee, job, Absence, Employee};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an [`Employee`] by its [`employee::Id`].
pub type ById = DatabaseQuery<By<Option<Employee>, employee::Id>>;

/// Queries the [`Absence`]s of an [`Employee`] overlapping the provided
/// [`job::ScheduledDate`].
pub type AbsencesOn =
    DatabaseQuery<By<Vec<Absence>, (employee::Id, job::ScheduledDate)>>;
