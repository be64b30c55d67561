//! [`Offer`] definitions.

use common::{define_kind, unit, DateOf, DateTimeOf, Money, Percent};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xxhash_rust::xxh3;

use crate::domain::{contract, customer};
#[cfg(doc)]
use crate::domain::{Contract, Customer};

/// Quote for a [`Customer`], convertible into a [`Contract`] once accepted.
#[derive(Clone, Debug)]
pub struct Offer {
    /// ID of this [`Offer`].
    pub id: Id,

    /// ID of the [`Customer`] this [`Offer`] is made to.
    pub customer_id: customer::Id,

    /// Name of the proposed service, carried over into the resulting
    /// [`Contract`].
    pub service_name: contract::Name,

    /// Priced [`LineItem`]s of this [`Offer`].
    pub items: Vec<LineItem>,

    /// VAT rate applied on billing under the resulting [`Contract`].
    pub vat: Percent,

    /// Proposed execution [`Interval`] of the resulting [`Contract`].
    ///
    /// [`Interval`]: contract::Interval
    pub interval: contract::Interval,

    /// Preferred [`TimeOfDay`] for executions, if any.
    pub preferred_time: Option<TimeOfDay>,

    /// [`Checklist`] applied to the resulting [`Contract`].
    pub checklist: Checklist,

    /// [`Date`] this [`Offer`] is valid until (inclusive), if limited.
    ///
    /// [`Date`]: common::Date
    pub valid_until: Option<ValidityDate>,

    /// [`Status`] of this [`Offer`].
    pub status: Status,

    /// [`DateTime`] when this [`Offer`] was sent, if it was.
    ///
    /// [`DateTime`]: common::DateTime
    pub sent_at: Option<SendDateTime>,

    /// [`DateTime`] when this [`Offer`] was accepted or rejected, if it was.
    ///
    /// [`DateTime`]: common::DateTime
    pub decided_at: Option<DecisionDateTime>,

    /// Reference to the captured signature artifact, if this [`Offer`] was
    /// accepted by signing.
    pub signature: Option<SignatureReference>,

    /// [`DateTime`] when this [`Offer`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

impl Offer {
    /// Checks whether this [`Offer`] may still be sent out.
    ///
    /// Re-sending an already sent [`Offer`] is allowed.
    ///
    /// # Errors
    ///
    /// If this [`Offer`] has been decided already.
    pub fn ensure_sendable(&self) -> Result<(), TransitionError> {
        match self.status {
            Status::Draft | Status::Sent => Ok(()),
            s @ (Status::Accepted | Status::Rejected) => {
                Err(TransitionError::AlreadyDecided(s))
            }
        }
    }

    /// Checks whether this [`Offer`] may be accepted or rejected.
    ///
    /// # Errors
    ///
    /// If this [`Offer`] is still a draft, or has been decided already.
    pub fn ensure_decidable(&self) -> Result<(), TransitionError> {
        match self.status {
            Status::Sent => Ok(()),
            Status::Draft => Err(TransitionError::NotSent),
            s @ (Status::Accepted | Status::Rejected) => {
                Err(TransitionError::AlreadyDecided(s))
            }
        }
    }

    /// Indicates whether this [`Offer`] has outlived its validity by the
    /// provided [`Date`].
    ///
    /// [`Date`]: common::Date
    #[must_use]
    pub fn is_expired(&self, today: common::Date) -> bool {
        self.valid_until.is_some_and(|until| until.coerce() < today)
    }

    /// Calculates the [`Fingerprint`] of this [`Offer`]'s content.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.items)
    }

    /// Sums the [`LineItem`]s of this [`Offer`] into a per-execution price.
    ///
    /// # Errors
    ///
    /// If this [`Offer`] has no [`LineItem`]s, or they are priced in
    /// different currencies.
    pub fn total_price(&self) -> Result<Money, PricingError> {
        let first = self.items.first().ok_or(PricingError::NoItems)?;

        let currency = first.price.currency;
        let mut amount = rust_decimal::Decimal::ZERO;
        for item in &self.items {
            if item.price.currency != currency {
                return Err(PricingError::CurrencyMismatch {
                    expected: currency,
                    actual: item.price.currency,
                });
            }
            amount += item.price.amount;
        }

        Ok(Money { amount, currency })
    }
}

/// ID of an [`Offer`].
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

/// Single priced position of an [`Offer`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineItem {
    /// Description of this [`LineItem`].
    pub description: ItemDescription,

    /// Net price of this [`LineItem`].
    pub price: Money,
}

/// Description of a [`LineItem`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ItemDescription(String);

impl ItemDescription {
    /// Creates a new [`ItemDescription`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `desc` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(desc: impl Into<String>) -> Self {
        Self(desc.into())
    }

    /// Creates a new [`ItemDescription`] if the given `desc` is valid.
    #[must_use]
    pub fn new(desc: impl Into<String>) -> Option<Self> {
        let desc = desc.into();
        Self::check(&desc).then_some(Self(desc))
    }

    /// Checks whether the given `desc` is a valid [`ItemDescription`].
    fn check(desc: impl AsRef<str>) -> bool {
        let desc = desc.as_ref();
        desc.trim() == desc && !desc.is_empty() && desc.len() <= 512
    }
}

impl FromStr for ItemDescription {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ItemDescription`")
    }
}

/// Ordered checklist of steps to perform on an execution.
#[derive(AsRef, Clone, Debug, Default, Eq, PartialEq)]
#[as_ref([String])]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Checklist(Vec<String>);

impl Checklist {
    /// Maximum number of steps in a [`Checklist`].
    pub const MAX_STEPS: usize = 100;

    /// Creates a new [`Checklist`] if the given `steps` are valid.
    #[must_use]
    pub fn new(steps: Vec<String>) -> Option<Self> {
        (steps.len() <= Self::MAX_STEPS
            && steps.iter().all(|s| {
                s.trim() == s && !s.is_empty() && s.len() <= 512
            }))
        .then_some(Self(steps))
    }

    /// Creates a new [`Checklist`] without checking the given `steps`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `steps` are valid.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(steps: Vec<String>) -> Self {
        Self(steps)
    }
}

/// Content fingerprint of an [`Offer`].
///
/// Baked into signing [`Token`]s, so editing the [`Offer`]'s [`LineItem`]s
/// invalidates any previously issued [`Token`].
///
/// [`Token`]: signing::Token
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Fingerprint(Uuid);

impl Fingerprint {
    /// Calculates a new [`Fingerprint`] of the provided [`LineItem`]s.
    #[must_use]
    pub fn of(items: &[LineItem]) -> Self {
        use std::hash::Hash as _;

        // WARNING: Avoid changing the hashed representation, because it will
        //          invalidate all signing tokens issued before the change.
        let mut hasher = xxh3::Xxh3Builder::new().build();
        for item in items {
            item.description.hash(&mut hasher);
            item.price.to_string().hash(&mut hasher);
        }

        Self(Uuid::from_u128(hasher.digest128()))
    }
}

define_kind! {
    #[doc = "Status of an [`Offer`]."]
    enum Status {
        #[doc = "Being drafted, not visible to the [`Customer`] yet."]
        Draft = 1,

        #[doc = "Sent out, awaiting a decision."]
        Sent = 2,

        #[doc = "Accepted by the [`Customer`]."]
        Accepted = 3,

        #[doc = "Rejected by the [`Customer`]."]
        Rejected = 4,
    }
}

define_kind! {
    #[doc = "Preferred time of day for executions."]
    enum TimeOfDay {
        #[doc = "Morning hours."]
        Morning = 1,

        #[doc = "Afternoon hours."]
        Afternoon = 2,

        #[doc = "Evening hours."]
        Evening = 3,
    }
}

/// Reference to a captured signature artifact (URL or storage key).
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct SignatureReference(String);

impl SignatureReference {
    /// Creates a new [`SignatureReference`] if the given `reference` is
    /// valid.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Option<Self> {
        let reference = reference.into();
        (!reference.trim().is_empty() && reference.len() <= 512)
            .then_some(Self(reference))
    }
}

impl FromStr for SignatureReference {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `SignatureReference`")
    }
}

/// Error of pricing an [`Offer`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum PricingError {
    /// [`Offer`] has no [`LineItem`]s.
    #[display("`Offer` has no `LineItem`s")]
    NoItems,

    /// [`LineItem`]s are priced in different currencies.
    #[display("`LineItem`s are priced in different currencies: \
               expected {expected}, got {actual}")]
    CurrencyMismatch {
        /// [`Currency`] of the first [`LineItem`].
        ///
        /// [`Currency`]: common::money::Currency
        expected: common::money::Currency,

        /// Mismatched [`Currency`].
        ///
        /// [`Currency`]: common::money::Currency
        actual: common::money::Currency,
    },
}

/// Error of an invalid [`Offer`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum TransitionError {
    /// [`Offer`] has been decided already.
    #[display("`Offer` has been decided already: {_0}")]
    AlreadyDecided(#[error(not(source))] Status),

    /// [`Offer`] has not been sent out yet.
    #[display("`Offer` has not been sent out yet")]
    NotSent,
}

/// Marker type indicating an [`Offer`] validity.
#[derive(Clone, Copy, Debug)]
pub struct Validity;

/// [`Date`] an [`Offer`] is valid until.
///
/// [`Date`]: common::Date
pub type ValidityDate = DateOf<(Offer, Validity)>;

/// Marker type indicating an [`Offer`] being sent.
#[derive(Clone, Copy, Debug)]
pub struct Send;

/// [`DateTime`] when an [`Offer`] was sent.
///
/// [`DateTime`]: common::DateTime
pub type SendDateTime = DateTimeOf<(Offer, Send)>;

/// Marker type indicating a decision on an [`Offer`].
#[derive(Clone, Copy, Debug)]
pub struct Decision;

/// [`DateTime`] when an [`Offer`] was decided.
///
/// [`DateTime`]: common::DateTime
pub type DecisionDateTime = DateTimeOf<(Offer, Decision)>;

/// [`DateTime`] when an [`Offer`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Offer, unit::Creation)>;

pub mod signing {
    //! Definitions of [`Offer`] signing tokens.

    use common::DateTimeOf;
    use derive_more::{AsRef, Display, FromStr};
    use serde::{Deserialize, Serialize};

    #[cfg(doc)]
    use super::Offer;
    use super::{Fingerprint, Id};

    /// Claims baked into a signing [`Token`].
    #[derive(Clone, Copy, Debug, Deserialize, Serialize)]
    pub struct Claims {
        /// ID of the [`Offer`] to sign.
        #[serde(rename = "sub")]
        pub offer_id: Id,

        /// [`DateTime`] when the [`Token`] expires.
        ///
        /// [`DateTime`]: common::DateTime
        #[serde(
            rename = "exp",
            with = "common::datetime::serde::unix_timestamp"
        )]
        pub expires_at: ExpirationDateTime,

        /// [`Fingerprint`] of the [`Offer`]'s content at issue time.
        #[serde(rename = "fpt")]
        pub fingerprint: Fingerprint,
    }

    /// Signing token granting a one-off signature on an [`Offer`].
    #[derive(AsRef, Clone, Debug, Display, FromStr)]
    pub struct Token(String);

    impl Token {
        /// Creates a new [`Token`] without checking its contents.
        ///
        /// # Safety
        ///
        /// The provided `token` must be a valid [`Token`] representation.
        #[expect(unsafe_code, reason = "bypass")]
        #[must_use]
        pub const unsafe fn new_unchecked(token: String) -> Self {
            Self(token)
        }
    }

    /// Marker type indicating a [`Token`] expiration.
    #[derive(Clone, Copy, Debug)]
    pub struct Expiration;

    /// [`DateTime`] of a [`Token`] expiration.
    ///
    /// [`DateTime`]: common::DateTime
    pub type ExpirationDateTime = DateTimeOf<(Claims, Expiration)>;
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Percent};
    use rust_decimal::Decimal;

    use crate::domain::{contract, customer};

    use super::{
        Checklist, Fingerprint, Id, LineItem, Offer, PricingError, Status,
        TransitionError,
    };

    fn item(description: &str, price: &str) -> LineItem {
        LineItem {
            description: description.parse().unwrap(),
            price: price.parse().unwrap(),
        }
    }

    fn offer(status: Status) -> Offer {
        Offer {
            id: Id::new(),
            customer_id: customer::Id::new(),
            service_name: "Window cleaning".parse().unwrap(),
            items: vec![item("Window cleaning", "80EUR")],
            vat: Percent::new(Decimal::from(19)).unwrap(),
            interval: contract::Interval::Weekly,
            preferred_time: None,
            checklist: Checklist::default(),
            valid_until: None,
            status,
            sent_at: None,
            decided_at: None,
            signature: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn draft_and_sent_offers_are_sendable() {
        assert!(offer(Status::Draft).ensure_sendable().is_ok());
        assert!(offer(Status::Sent).ensure_sendable().is_ok());

        assert_eq!(
            offer(Status::Accepted).ensure_sendable(),
            Err(TransitionError::AlreadyDecided(Status::Accepted)),
        );
        assert_eq!(
            offer(Status::Rejected).ensure_sendable(),
            Err(TransitionError::AlreadyDecided(Status::Rejected)),
        );
    }

    #[test]
    fn only_sent_offers_are_decidable() {
        assert!(offer(Status::Sent).ensure_decidable().is_ok());

        assert_eq!(
            offer(Status::Draft).ensure_decidable(),
            Err(TransitionError::NotSent),
        );
        assert_eq!(
            offer(Status::Accepted).ensure_decidable(),
            Err(TransitionError::AlreadyDecided(Status::Accepted)),
        );
    }

    #[test]
    fn expiry_is_inclusive_of_the_validity_date() {
        let mut o = offer(Status::Sent);
        o.valid_until = Some("2024-06-30".parse().unwrap());

        assert!(!o.is_expired("2024-06-30".parse().unwrap()));
        assert!(o.is_expired("2024-07-01".parse().unwrap()));
    }

    #[test]
    fn fingerprint_tracks_item_changes() {
        let items = vec![item("Window cleaning", "80EUR")];
        assert_eq!(Fingerprint::of(&items), Fingerprint::of(&items));

        let repriced = vec![item("Window cleaning", "90EUR")];
        assert_ne!(Fingerprint::of(&items), Fingerprint::of(&repriced));

        let renamed = vec![item("Facade cleaning", "80EUR")];
        assert_ne!(Fingerprint::of(&items), Fingerprint::of(&renamed));
    }

    #[test]
    fn total_price_sums_items_of_one_currency() {
        let mut o = offer(Status::Draft);
        o.items = vec![
            item("Window cleaning", "80EUR"),
            item("Carpet cleaning", "45.50EUR"),
        ];
        assert_eq!(o.total_price().unwrap(), "125.50EUR".parse().unwrap());

        o.items.push(item("Facade cleaning", "200USD"));
        assert!(matches!(
            o.total_price(),
            Err(PricingError::CurrencyMismatch { .. }),
        ));

        o.items.clear();
        assert_eq!(o.total_price(), Err(PricingError::NoItems));
    }

    #[test]
    fn checklist_rejects_malformed_steps() {
        assert!(Checklist::new(vec!["Vacuum floors".into()]).is_some());
        assert!(Checklist::new(vec![]).is_some());

        assert!(Checklist::new(vec![String::new()]).is_none());
        assert!(Checklist::new(vec![" padded ".into()]).is_none());
        assert!(Checklist::new(vec!["ok".into(); 101]).is_none());
    }
}
