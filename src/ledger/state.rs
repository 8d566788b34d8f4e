use serde::{Deserialize, Serialize};

use crate::Rupiah;

/// The driver's counters, as persisted and as handed back to callers.
///
/// Missing keys in a stored document fall back to the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LedgerState {
    /// Cumulative gross fare revenue.
    pub earnings: Rupiah,
    /// Withdrawable cash.
    pub balance: Rupiah,
    pub is_online: bool,
}

impl LedgerState {
    pub const DEFAULT_EARNINGS: Rupiah = Rupiah::new(150_000);
    pub const DEFAULT_BALANCE: Rupiah = Rupiah::new(850_000);

    /// Book a completed order: the full fare counts as earnings, the
    /// driver's commission lands in the balance.
    pub fn credit_fare(&mut self, fare: Rupiah) {
        self.earnings += fare;
        self.balance += fare.commission();
    }

    /// Take cash out of the balance, for a float advance or a withdrawal.
    pub fn debit(&mut self, amount: Rupiah) {
        self.balance -= amount;
    }

    pub fn covers(&self, amount: Rupiah) -> bool {
        self.balance >= amount
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            earnings: Self::DEFAULT_EARNINGS,
            balance: Self::DEFAULT_BALANCE,
            is_online: true,
        }
    }
}
