//! [`Expense`] definitions.

use common::{unit, DateOf, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operational expense of the company.
#[derive(Clone, Debug)]
pub struct Expense {
    /// ID of this [`Expense`].
    pub id: Id,

    /// Description of this [`Expense`].
    pub description: Description,

    /// Amount of this [`Expense`].
    pub amount: Money,

    /// [`Category`] of this [`Expense`].
    pub category: Category,

    /// [`Date`] this [`Expense`] was spent on.
    ///
    /// [`Date`]: common::Date
    pub date: SpentDate,

    /// [`DateTime`] when this [`Expense`] was recorded.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

/// ID of an [`Expense`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Description of an [`Expense`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `desc` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(desc: impl Into<String>) -> Self {
        Self(desc.into())
    }

    /// Creates a new [`Description`] if the given `desc` is valid.
    #[must_use]
    pub fn new(desc: impl Into<String>) -> Option<Self> {
        let desc = desc.into();
        Self::check(&desc).then_some(Self(desc))
    }

    /// Checks whether the given `desc` is a valid [`Description`].
    fn check(desc: impl AsRef<str>) -> bool {
        let desc = desc.as_ref();
        desc.trim() == desc && !desc.is_empty() && desc.len() <= 512
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Free-form category of an [`Expense`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Category(String);

impl Category {
    /// Creates a new [`Category`] if the given `category` is valid.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Option<Self> {
        let category = category.into();
        Self::check(&category).then_some(Self(category))
    }

    /// Checks whether the given `category` is a valid [`Category`].
    fn check(category: impl AsRef<str>) -> bool {
        let category = category.as_ref();
        category.trim() == category
            && !category.is_empty()
            && category.len() <= 128
    }
}

impl FromStr for Category {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Category`")
    }
}

/// Marker type indicating an [`Expense`] spending.
#[derive(Clone, Copy, Debug)]
pub struct Spending;

/// [`Date`] an [`Expense`] was spent on.
///
/// [`Date`]: common::Date
pub type SpentDate = DateOf<(Expense, Spending)>;

/// [`DateTime`] when an [`Expense`] was recorded.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Expense, unit::Creation)>;
