//! [`Employee`] read model definition.
//!
//! [`Employee`]: crate::domain::Employee

pub mod list {
    //! [`Employee`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::employee;
    #[cfg(doc)]
    use crate::domain::Employee;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = employee::Id;

    /// Cursor pointing to a specific [`Employee`] in a list.
    pub type Cursor = employee::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`employee::Name`] (or its part) to fuzzy search for.
        pub name: Option<employee::Name>,
    }

    /// Total count of [`Employee`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
