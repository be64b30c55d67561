//! [`Expense`] read model definition.
//!
//! [`Expense`]: crate::domain::Expense

pub mod list {
    //! [`Expense`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::expense;
    #[cfg(doc)]
    use crate::domain::Expense;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = expense::Id;

    /// Cursor pointing to a specific [`Expense`] in a list.
    pub type Cursor = expense::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`expense::Category`] to list [`Expense`]s of.
        pub category: Option<expense::Category>,

        /// Earliest [`expense::SpentDate`] to list [`Expense`]s from.
        pub from: Option<expense::SpentDate>,

        /// Latest [`expense::SpentDate`] to list [`Expense`]s until.
        pub until: Option<expense::SpentDate>,
    }

    /// Total count of [`Expense`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
