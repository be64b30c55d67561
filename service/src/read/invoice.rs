//! [`Invoice`] read model definition.

use std::time::Duration;

use common::DateTime;

#[cfg(doc)]
use crate::domain::Invoice;

/// Wrapper around [`Invoice`] indicating that it is overdue.
#[derive(Clone, Copy, Debug)]
pub struct Overdue<T>(pub T);

/// Criteria selecting [`Invoice`]s eligible for a dunning escalation.
///
/// Matches overdue [`Invoice`]s below the maximum dunning level whose last
/// escalation (if any) happened at least `cooldown` ago.
#[derive(Clone, Copy, Debug)]
pub struct DunningCandidates {
    /// Current [`DateTime`].
    pub now: DateTime,

    /// Minimum [`Duration`] between two escalations.
    pub cooldown: Duration,
}

pub mod list {
    //! [`Invoice`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{customer, invoice};
    #[cfg(doc)]
    use crate::domain::{Customer, Invoice};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = invoice::Id;

    /// Cursor pointing to a specific [`Invoice`] in a list.
    pub type Cursor = invoice::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Customer`] to list [`Invoice`]s of.
        pub customer_id: Option<customer::Id>,

        /// [`invoice::Status`] to list [`Invoice`]s with.
        pub status: Option<invoice::Status>,
    }

    /// Total count of [`Invoice`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
