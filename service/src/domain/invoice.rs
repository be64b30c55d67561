//! [`Invoice`] definitions.

use std::{fmt, time::Duration};

use common::{define_kind, unit, DateOf, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{customer, Job};
#[cfg(doc)]
use crate::domain::Customer;

/// Bill aggregating completed [`Job`]s of a [`Customer`].
#[derive(Clone, Debug)]
pub struct Invoice {
    /// ID of this [`Invoice`].
    pub id: Id,

    /// ID of the [`Customer`] this [`Invoice`] is issued to.
    pub customer_id: customer::Id,

    /// Gap-free [`Number`] of this [`Invoice`].
    pub number: Number,

    /// [`Status`] of this [`Invoice`].
    pub status: Status,

    /// Net total of this [`Invoice`].
    pub total_net: Money,

    /// VAT total of this [`Invoice`].
    pub total_vat: Money,

    /// Gross total of this [`Invoice`].
    pub total_gross: Money,

    /// [`DateTime`] when this [`Invoice`] was issued.
    ///
    /// [`DateTime`]: common::DateTime
    pub issued_at: IssueDateTime,

    /// [`Date`] the payment is due by, set once sent.
    ///
    /// [`Date`]: common::Date
    pub due_date: Option<DueDate>,

    /// Current [`DunningLevel`] of this [`Invoice`].
    pub dunning_level: DunningLevel,

    /// [`DateTime`] of the last dunning escalation, if any.
    ///
    /// [`DateTime`]: common::DateTime
    pub last_dunning_at: Option<DunningDateTime>,

    /// [`DateTime`] when this [`Invoice`] was sent, if it was.
    ///
    /// [`DateTime`]: common::DateTime
    pub sent_at: Option<SendDateTime>,

    /// [`DateTime`] when this [`Invoice`] was paid, if it was.
    ///
    /// [`DateTime`]: common::DateTime
    pub paid_at: Option<PaymentDateTime>,

    /// [`DateTime`] when this [`Invoice`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

impl Invoice {
    /// Checks whether this [`Invoice`] may be sent out.
    ///
    /// # Errors
    ///
    /// If this [`Invoice`] has left the [`Status::Draft`] already.
    pub fn ensure_sendable(&self) -> Result<(), TransitionError> {
        use TransitionError as E;

        match self.status {
            Status::Draft => Ok(()),
            Status::Sent | Status::Overdue => Err(E::AlreadySent),
            Status::Paid => Err(E::AlreadyPaid),
            Status::Cancelled => Err(E::Cancelled),
        }
    }

    /// Checks whether this [`Invoice`] may be marked as paid.
    ///
    /// # Errors
    ///
    /// If this [`Invoice`] has not been sent, or is settled already.
    pub fn ensure_payable(&self) -> Result<(), TransitionError> {
        use TransitionError as E;

        match self.status {
            Status::Sent | Status::Overdue => Ok(()),
            Status::Draft => Err(E::NotSent),
            Status::Paid => Err(E::AlreadyPaid),
            Status::Cancelled => Err(E::Cancelled),
        }
    }

    /// Escalates the dunning of this [`Invoice`] by one [`DunningLevel`].
    ///
    /// A sent [`Invoice`] already past its due [`Date`] by `today` is marked
    /// as overdue on the way, without waiting for the periodic detection.
    ///
    /// # Errors
    ///
    /// If this [`Invoice`] is not overdue, the previous escalation happened
    /// less than `cooldown` ago, or the maximum [`DunningLevel`] is reached.
    ///
    /// [`Date`]: common::Date
    pub fn escalate(
        &mut self,
        today: common::Date,
        now: DunningDateTime,
        cooldown: Duration,
    ) -> Result<DunningLevel, EscalationError> {
        use EscalationError as E;

        match self.status {
            Status::Overdue => {}
            Status::Sent
                if self.due_date.is_some_and(|due| due.coerce() < today) =>
            {
                self.status = Status::Overdue;
            }
            _ => return Err(E::NotOverdue(self.status)),
        }
        if let Some(last) = self.last_dunning_at {
            if last + cooldown > now {
                return Err(E::TooSoon);
            }
        }

        let escalated = self.dunning_level.incremented().ok_or(E::MaxLevel)?;
        self.dunning_level = escalated;
        self.last_dunning_at = Some(now);
        Ok(escalated)
    }

    /// Resets the dunning state of this [`Invoice`].
    pub fn reset_dunning(&mut self) {
        self.dunning_level = DunningLevel::default();
        self.last_dunning_at = None;
    }
}

/// ID of an [`Invoice`].
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

/// Gap-free number of an [`Invoice`], unique within a year.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Number {
    /// Calendar year this [`Number`] was allocated in.
    pub year: i32,

    /// Sequence number within the year, starting from 1.
    pub seq: i32,
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { year, seq } = self;
        write!(f, "{year}-{seq:05}")
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, seq) = s.split_once('-').ok_or("missing `-` separator")?;
        Ok(Self {
            year: year.parse().map_err(|_| "invalid year")?,
            seq: seq.parse().map_err(|_| "invalid sequence number")?,
        })
    }
}

define_kind! {
    #[doc = "Status of an [`Invoice`]."]
    enum Status {
        #[doc = "Being drafted, not issued to the [`Customer`] yet."]
        Draft = 1,

        #[doc = "Sent out, awaiting payment."]
        Sent = 2,

        #[doc = "Paid in full."]
        Paid = 3,

        #[doc = "Past its due date without payment."]
        Overdue = 4,

        #[doc = "Cancelled, never to be paid."]
        Cancelled = 5,
    }
}

/// Dunning escalation level of an [`Invoice`].
///
/// `0` means no dunning has happened yet.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct DunningLevel(i16);

impl DunningLevel {
    /// Maximum [`DunningLevel`] an [`Invoice`] may reach.
    pub const MAX: Self = Self(3);

    /// Returns the next [`DunningLevel`], or [`None`] if [`MAX`] is reached.
    ///
    /// [`MAX`]: Self::MAX
    #[must_use]
    pub fn incremented(self) -> Option<Self> {
        (self < Self::MAX).then_some(Self(self.0 + 1))
    }
}

/// Monetary totals of an [`Invoice`], derived from its [`Job`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Totals {
    /// Sum of the net prices.
    pub net: Money,

    /// Sum of the VAT amounts.
    pub vat: Money,

    /// Sum of the gross amounts.
    pub gross: Money,
}

impl Totals {
    /// Calculates the [`Totals`] of the provided [`Job`]s.
    ///
    /// [`None`] is returned if there are no [`Job`]s to bill.
    ///
    /// # Errors
    ///
    /// If the [`Job`]s are priced in different currencies.
    pub fn of(jobs: &[Job]) -> Result<Option<Self>, CurrencyMismatchError> {
        let Some(first) = jobs.first() else {
            return Ok(None);
        };

        let currency = first.price.currency;
        let mut net = rust_decimal::Decimal::ZERO;
        let mut vat = rust_decimal::Decimal::ZERO;
        for job in jobs {
            if job.price.currency != currency {
                return Err(CurrencyMismatchError {
                    expected: currency,
                    actual: job.price.currency,
                });
            }
            net += job.price.amount;
            vat += job.vat.of(job.price.amount);
        }

        Ok(Some(Self {
            net: Money { amount: net, currency },
            vat: Money { amount: vat, currency },
            gross: Money { amount: net + vat, currency },
        }))
    }
}

/// Error of aggregating [`Job`]s priced in different currencies.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Job`s are priced in different currencies: \
           expected {expected}, got {actual}")]
pub struct CurrencyMismatchError {
    /// [`Currency`] of the first aggregated [`Job`].
    ///
    /// [`Currency`]: common::money::Currency
    pub expected: common::money::Currency,

    /// Mismatched [`Currency`].
    ///
    /// [`Currency`]: common::money::Currency
    pub actual: common::money::Currency,
}

/// Error of an invalid [`Invoice`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum TransitionError {
    /// [`Invoice`] has been sent already.
    #[display("`Invoice` has been sent already")]
    AlreadySent,

    /// [`Invoice`] has been paid already.
    #[display("`Invoice` has been paid already")]
    AlreadyPaid,

    /// [`Invoice`] has not been sent yet.
    #[display("`Invoice` has not been sent yet")]
    NotSent,

    /// [`Invoice`] is cancelled.
    #[display("`Invoice` is cancelled")]
    Cancelled,
}

/// Error of escalating an [`Invoice`] dunning.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum EscalationError {
    /// [`Invoice`] is not overdue.
    #[display("`Invoice` is not overdue: {_0}")]
    NotOverdue(#[error(not(source))] Status),

    /// Previous escalation happened too recently.
    #[display("Previous escalation happened too recently")]
    TooSoon,

    /// Maximum [`DunningLevel`] is reached.
    #[display("Maximum `DunningLevel` is reached")]
    MaxLevel,
}

/// Marker type indicating an [`Invoice`] issue.
#[derive(Clone, Copy, Debug)]
pub struct Issue;

/// [`DateTime`] when an [`Invoice`] was issued.
///
/// [`DateTime`]: common::DateTime
pub type IssueDateTime = DateTimeOf<(Invoice, Issue)>;

/// Marker type indicating a payment due.
#[derive(Clone, Copy, Debug)]
pub struct Due;

/// [`Date`] an [`Invoice`] payment is due by.
///
/// [`Date`]: common::Date
pub type DueDate = DateOf<(Invoice, Due)>;

/// Marker type indicating a dunning escalation.
#[derive(Clone, Copy, Debug)]
pub struct Dunning;

/// [`DateTime`] of an [`Invoice`] dunning escalation.
///
/// [`DateTime`]: common::DateTime
pub type DunningDateTime = DateTimeOf<(Invoice, Dunning)>;

/// Marker type indicating an [`Invoice`] being sent.
#[derive(Clone, Copy, Debug)]
pub struct Send;

/// [`DateTime`] when an [`Invoice`] was sent.
///
/// [`DateTime`]: common::DateTime
pub type SendDateTime = DateTimeOf<(Invoice, Send)>;

/// Marker type indicating an [`Invoice`] payment.
#[derive(Clone, Copy, Debug)]
pub struct Payment;

/// [`DateTime`] when an [`Invoice`] was paid.
///
/// [`DateTime`]: common::DateTime
pub type PaymentDateTime = DateTimeOf<(Invoice, Payment)>;

/// [`DateTime`] when an [`Invoice`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Invoice, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{DateTime, Money, Percent};
    use rust_decimal::Decimal;

    use crate::domain::{customer, job, offer};

    use super::{
        DunningLevel, EscalationError, Id, Invoice, Number, Status, Totals,
    };

    fn dt(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn d(s: &str) -> common::Date {
        s.parse().unwrap()
    }

    fn job(price: &str, vat: u32) -> job::Job {
        job::Job {
            id: job::Id::new(),
            contract_id: None,
            customer_id: customer::Id::new(),
            service_name: "Office cleaning".parse().unwrap(),
            price: price.parse().unwrap(),
            vat: Percent::new(Decimal::from(vat)).unwrap(),
            address: "Hauptstr. 1, 10115 Berlin".parse().unwrap(),
            checklist: offer::Checklist::default(),
            scheduled_date: "2024-03-01".parse().unwrap(),
            status: job::Status::Completed,
            actual_duration: None,
            invoice_id: None,
            proofs: vec![],
            completed_at: None,
            created_at: DateTime::now().coerce(),
        }
    }

    fn invoice(status: Status) -> Invoice {
        let zero = Money {
            amount: Decimal::ZERO,
            currency: common::money::Currency::Eur,
        };
        Invoice {
            id: Id::new(),
            customer_id: customer::Id::new(),
            number: Number { year: 2024, seq: 1 },
            status,
            total_net: zero,
            total_vat: zero,
            total_gross: zero,
            issued_at: DateTime::now().coerce(),
            due_date: None,
            dunning_level: DunningLevel::default(),
            last_dunning_at: None,
            sent_at: None,
            paid_at: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn number_formats_with_zero_padding() {
        let n = Number { year: 2024, seq: 7 };
        assert_eq!(n.to_string(), "2024-00007");
        assert_eq!("2024-00007".parse::<Number>().unwrap(), n);

        assert!("202400007".parse::<Number>().is_err());
    }

    #[test]
    fn totals_sum_net_and_vat_per_job() {
        let jobs = vec![job("100EUR", 19), job("50.50EUR", 19)];

        let totals = Totals::of(&jobs).unwrap().unwrap();
        assert_eq!(totals.net, "150.50EUR".parse().unwrap());
        assert_eq!(totals.vat, "28.5950EUR".parse().unwrap());
        assert_eq!(totals.gross, "179.0950EUR".parse().unwrap());
    }

    #[test]
    fn totals_of_nothing_is_nothing() {
        assert_eq!(Totals::of(&[]).unwrap(), None);
    }

    #[test]
    fn totals_reject_mixed_currencies() {
        let jobs = vec![job("100EUR", 19), job("100USD", 19)];

        assert!(Totals::of(&jobs).is_err());
    }

    #[test]
    fn dunning_escalates_monotonically_up_to_the_cap() {
        let mut inv = invoice(Status::Overdue);
        let cooldown = Duration::from_secs(7 * 24 * 60 * 60);

        let l1 = inv
            .escalate(
                d("2024-03-01"),
                dt("2024-03-01T00:00:00Z").coerce(),
                cooldown,
            )
            .unwrap();
        assert_eq!(l1, DunningLevel::from(1));

        let l2 = inv
            .escalate(
                d("2024-03-10"),
                dt("2024-03-10T00:00:00Z").coerce(),
                cooldown,
            )
            .unwrap();
        assert_eq!(l2, DunningLevel::from(2));

        let l3 = inv
            .escalate(
                d("2024-03-20"),
                dt("2024-03-20T00:00:00Z").coerce(),
                cooldown,
            )
            .unwrap();
        assert_eq!(l3, DunningLevel::MAX);

        assert_eq!(
            inv.escalate(
                d("2024-03-30"),
                dt("2024-03-30T00:00:00Z").coerce(),
                cooldown,
            ),
            Err(EscalationError::MaxLevel),
        );
    }

    #[test]
    fn dunning_respects_the_cooldown() {
        let mut inv = invoice(Status::Overdue);
        let cooldown = Duration::from_secs(7 * 24 * 60 * 60);

        inv.escalate(
            d("2024-03-01"),
            dt("2024-03-01T00:00:00Z").coerce(),
            cooldown,
        )
        .unwrap();

        assert_eq!(
            inv.escalate(
                d("2024-03-05"),
                dt("2024-03-05T00:00:00Z").coerce(),
                cooldown,
            ),
            Err(EscalationError::TooSoon),
        );

        assert!(inv
            .escalate(
                d("2024-03-08"),
                dt("2024-03-08T00:00:00Z").coerce(),
                cooldown,
            )
            .is_ok());
    }

    #[test]
    fn dunning_requires_an_overdue_invoice() {
        let cooldown = Duration::from_secs(0);

        assert_eq!(
            invoice(Status::Sent).escalate(
                d("2024-03-01"),
                dt("2024-03-01T00:00:00Z").coerce(),
                cooldown,
            ),
            Err(EscalationError::NotOverdue(Status::Sent)),
        );
        assert_eq!(
            invoice(Status::Draft).escalate(
                d("2024-03-01"),
                dt("2024-03-01T00:00:00Z").coerce(),
                cooldown,
            ),
            Err(EscalationError::NotOverdue(Status::Draft)),
        );
    }

    #[test]
    fn dunning_marks_a_sent_invoice_past_due_as_overdue() {
        let cooldown = Duration::from_secs(0);

        let mut inv = invoice(Status::Sent);
        inv.due_date = Some(d("2024-03-01").coerce());

        // Due date itself is not past due yet.
        assert_eq!(
            inv.escalate(
                d("2024-03-01"),
                dt("2024-03-01T12:00:00Z").coerce(),
                cooldown,
            ),
            Err(EscalationError::NotOverdue(Status::Sent)),
        );

        let level = inv
            .escalate(
                d("2024-03-02"),
                dt("2024-03-02T00:00:00Z").coerce(),
                cooldown,
            )
            .unwrap();
        assert_eq!(level, DunningLevel::from(1));
        assert_eq!(inv.status, Status::Overdue);
    }

    #[test]
    fn reset_clears_the_dunning_state() {
        let mut inv = invoice(Status::Overdue);
        inv.escalate(
            d("2024-03-01"),
            dt("2024-03-01T00:00:00Z").coerce(),
            Duration::from_secs(0),
        )
        .unwrap();

        inv.reset_dunning();
        assert_eq!(inv.dunning_level, DunningLevel::default());
        assert_eq!(inv.last_dunning_at, None);
    }
}
