//! [`Offer`] read model definition.
//!
//! [`Offer`]: crate::domain::Offer

pub mod list {
    //! [`Offer`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{customer, offer};
    #[cfg(doc)]
    use crate::domain::{Customer, Offer};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = offer::Id;

    /// Cursor pointing to a specific [`Offer`] in a list.
    pub type Cursor = offer::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Customer`] to list [`Offer`]s of.
        pub customer_id: Option<customer::Id>,

        /// [`offer::Status`] to list [`Offer`]s with.
        pub status: Option<offer::Status>,
    }

    /// Total count of [`Offer`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
