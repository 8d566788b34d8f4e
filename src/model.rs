//! Core domain types: delivery offers and the driver actions applied to the ledger.

use crate::Rupiah;

/// Order identifier, unique within one catalog load.
pub type OrderId = u32;

/// Cash the driver pays upfront on the customer's behalf, reimbursed on delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatAdvance {
    amount: Rupiah,
    note: String,
}

impl FloatAdvance {
    /// Create a float advance. Returns `None` unless `amount` is strictly positive,
    /// since a zero amount means the order carries no advance at all.
    pub fn new(amount: Rupiah, note: impl Into<String>) -> Option<Self> {
        amount.is_positive().then(|| Self {
            amount,
            note: note.into(),
        })
    }

    pub fn amount(&self) -> Rupiah {
        self.amount
    }

    /// What the advance pays for (e.g. a prescription or a utility bill).
    pub fn note(&self) -> &str {
        &self.note
    }
}

/// A delivery offer. Immutable once produced by a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_phone: String,
    pub pickup_label: String,
    pub delivery_label: String,
    /// Display string only, never computed.
    pub distance_label: String,
    pub fare: Rupiah,
    pub float_advance: Option<FloatAdvance>,
    pub estimated_duration_minutes: u32,
}

impl Order {
    /// Float advance required by this order, zero for regular orders.
    pub fn float_advance_amount(&self) -> Rupiah {
        self.float_advance
            .as_ref()
            .map_or(Rupiah::ZERO, FloatAdvance::amount)
    }

    pub fn float_advance_note(&self) -> Option<&str> {
        self.float_advance.as_ref().map(FloatAdvance::note)
    }

    pub fn has_float_advance(&self) -> bool {
        self.float_advance.is_some()
    }
}

/// The driver's answer on the float-advance confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decision {
    Accept,
    /// Also the answer when the confirmation is dismissed.
    #[default]
    Reject,
}

/// A driver action, the input of [`Ledger::run`](crate::Ledger::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle the online switch.
    SetOnline { online: bool },
    /// Tap "accept" on an offer; `decision` answers the confirmation step
    /// when the order carries a float advance and is ignored otherwise.
    Accept { order: OrderId, decision: Decision },
    /// Withdraw from the balance.
    Withdraw { amount: Rupiah },
}
