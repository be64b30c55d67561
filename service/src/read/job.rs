//! [`Job`] read model definition.

#[cfg(doc)]
use crate::domain::{Invoice, Job};

/// Wrapper around [`Job`] indicating that it is completed and not billed on
/// any [`Invoice`] yet.
#[derive(Clone, Copy, Debug)]
pub struct Unbilled<T>(pub T);

pub mod list {
    //! [`Job`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{contract, customer, job};
    #[cfg(doc)]
    use crate::domain::{Contract, Customer, Job};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = job::Id;

    /// Cursor pointing to a specific [`Job`] in a list.
    pub type Cursor = job::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Contract`] to list [`Job`]s of.
        pub contract_id: Option<contract::Id>,

        /// ID of the [`Customer`] to list [`Job`]s of.
        pub customer_id: Option<customer::Id>,

        /// [`job::Status`] to list [`Job`]s with.
        pub status: Option<job::Status>,

        /// Earliest [`job::ScheduledDate`] to list [`Job`]s from.
        pub from: Option<job::ScheduledDate>,

        /// Latest [`job::ScheduledDate`] to list [`Job`]s until.
        pub until: Option<job::ScheduledDate>,
    }

    /// Total count of [`Job`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
