//! Error types for ledger operations.

use thiserror::Error;

use super::Notice;
use crate::Rupiah;
use crate::model::OrderId;
use crate::store::StoreError;

/// Top-level error returned by [`Ledger`](super::Ledger) operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("order rejected: {0}")]
    Order(#[from] OrderError),

    #[error("float advance rejected: {0}")]
    FloatAdvance(#[from] FloatAdvanceError),

    #[error("withdrawal failed: {0}")]
    Withdrawal(#[from] WithdrawalError),

    #[error("failed to persist ledger: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// The rejection message to show the driver.
    ///
    /// Storage failures have none: the driver cannot act on them.
    pub fn notice(&self) -> Option<Notice> {
        let notice = match self {
            LedgerError::Order(OrderError::Offline(_)) => Notice::Offline,
            LedgerError::Order(OrderError::UnknownOrder(order)) => {
                Notice::OrderUnavailable { order: *order }
            }
            LedgerError::Order(OrderError::FloatAdvanceRequired(order)) => {
                Notice::ConfirmationRequired { order: *order }
            }
            LedgerError::Order(OrderError::NoFloatAdvance(order)) => {
                Notice::NoFloatAdvance { order: *order }
            }
            LedgerError::FloatAdvance(FloatAdvanceError::InsufficientBalance {
                order,
                balance,
                required,
            }) => Notice::InsufficientBalance {
                order: *order,
                balance: *balance,
                required: *required,
            },
            LedgerError::Withdrawal(WithdrawalError::InsufficientMinimum { minimum, .. }) => {
                Notice::WithdrawalBelowMinimum { minimum: *minimum }
            }
            LedgerError::Withdrawal(WithdrawalError::InsufficientFunds { balance, .. }) => {
                Notice::WithdrawalExceedsBalance { balance: *balance }
            }
            LedgerError::Store(_) => return None,
        };
        Some(notice)
    }
}

/// Error when picking an order.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("driver is offline, order {0} is not available")]
    Offline(OrderId),

    #[error("order {0} is not in the catalog")]
    UnknownOrder(OrderId),

    #[error("order {0} carries a float advance and needs confirmation")]
    FloatAdvanceRequired(OrderId),

    #[error("order {0} carries no float advance")]
    NoFloatAdvance(OrderId),
}

/// Error when confirming a float-advance order.
#[derive(Debug, Error)]
pub enum FloatAdvanceError {
    #[error("order {order}: balance {balance} does not cover float advance {required}")]
    InsufficientBalance {
        order: OrderId,
        balance: Rupiah,
        required: Rupiah,
    },
}

/// Error during withdrawal processing.
#[derive(Debug, Error)]
pub enum WithdrawalError {
    #[error("requested {requested} is below the minimum withdrawal of {}", .minimum.value())]
    InsufficientMinimum { minimum: Rupiah, requested: Rupiah },

    #[error("insufficient balance: available {balance}, requested {requested}")]
    InsufficientFunds { balance: Rupiah, requested: Rupiah },
}
