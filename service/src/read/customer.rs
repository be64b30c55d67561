//! [`Customer`] read model definition.
//!
//! [`Customer`]: crate::domain::Customer

pub mod list {
    //! [`Customer`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::customer;
    #[cfg(doc)]
    use crate::domain::Customer;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = customer::Id;

    /// Cursor pointing to a specific [`Customer`] in a list.
    pub type Cursor = customer::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`customer::Name`] (or its part) to fuzzy search for.
        pub name: Option<customer::Name>,
    }

    /// Total count of [`Customer`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
