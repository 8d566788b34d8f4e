use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-rupiah money value. The currency has no decimal subunit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rupiah(i64);

impl Rupiah {
    /// Driver's share of a fare, in percent.
    pub const COMMISSION_PERCENT: i64 = 70;

    pub const ZERO: Rupiah = Rupiah(0);

    /// Largest fare or float advance a single order may carry.
    pub const MAX_ORDER_AMOUNT: Rupiah = Rupiah(1_000_000_000_000);

    pub const fn new(value: i64) -> Self {
        Rupiah(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Driver commission on this fare, rounded half-up to the whole rupiah.
    pub fn commission(self) -> Self {
        // floor((x * 70 + 50) / 100) rounds .5 upward for either sign;
        // widened so the product cannot overflow, and 70% of any i64 fits back
        let scaled = i128::from(self.0) * i128::from(Self::COMMISSION_PERCENT) + 50;
        Rupiah(scaled.div_euclid(100) as i64)
    }
}

/// Formats as `Rp 1.234.567`: dot-grouped thousands, no decimals.
impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "Rp {sign}{grouped}")
    }
}

impl std::ops::Add for Rupiah {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Rupiah(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Rupiah {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Rupiah(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Rupiah {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Rupiah {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}
