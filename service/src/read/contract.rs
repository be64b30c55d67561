//! [`Contract`] read model definition.

#[cfg(doc)]
use crate::domain::Contract;

/// Wrapper around [`Contract`] indicating that it is active and its
/// [`next_execution_date`] is not in the future.
///
/// [`next_execution_date`]: Contract::next_execution_date
#[derive(Clone, Copy, Debug)]
pub struct Due<T>(pub T);

pub mod list {
    //! [`Contract`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{contract, customer};
    #[cfg(doc)]
    use crate::domain::{Contract, Customer};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = contract::Id;

    /// Cursor pointing to a specific [`Contract`] in a list.
    pub type Cursor = contract::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Customer`] to list [`Contract`]s of.
        pub customer_id: Option<customer::Id>,

        /// [`contract::Name`] (or its part) to fuzzy search for.
        pub name: Option<contract::Name>,
    }

    /// Total count of [`Contract`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
