use std::fmt;

use crate::Rupiah;
use crate::model::OrderId;

/// A user-facing message produced by a ledger operation, accepted or rejected.
///
/// `Display` renders the driver app's Indonesian text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    WentOnline,
    WentOffline,
    OrderAccepted { order: OrderId },
    FloatAdvanceOrderAccepted { order: OrderId },
    FloatAdvanceOrderDeclined { order: OrderId },
    Withdrawn { amount: Rupiah },

    Offline,
    OrderUnavailable { order: OrderId },
    ConfirmationRequired { order: OrderId },
    NoFloatAdvance { order: OrderId },
    InsufficientBalance {
        order: OrderId,
        balance: Rupiah,
        required: Rupiah,
    },
    WithdrawalBelowMinimum { minimum: Rupiah },
    WithdrawalExceedsBalance { balance: Rupiah },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::WentOnline => write!(f, "Status Online - Siap menerima order baru"),
            Notice::WentOffline => write!(f, "Status Offline - Tidak akan menerima order baru"),
            Notice::OrderAccepted { order } => {
                write!(f, "Order #{order} berhasil diterima! Menuju lokasi pickup...")
            }
            Notice::FloatAdvanceOrderAccepted { order } => {
                write!(f, "Order #{order} dengan talangan berhasil diterima!")
            }
            Notice::FloatAdvanceOrderDeclined { order } => {
                write!(f, "Order #{order} dengan talangan ditolak")
            }
            Notice::Withdrawn { amount } => write!(f, "Penarikan {amount} berhasil!"),
            Notice::Offline => write!(
                f,
                "Status Offline - Aktifkan status online untuk menerima order"
            ),
            Notice::OrderUnavailable { order } => write!(f, "Order #{order} tidak tersedia"),
            Notice::ConfirmationRequired { order } => {
                write!(f, "Order #{order} memerlukan konfirmasi talangan")
            }
            Notice::NoFloatAdvance { order } => {
                write!(f, "Order #{order} tidak memerlukan talangan")
            }
            Notice::InsufficientBalance {
                order,
                balance,
                required,
            } => write!(
                f,
                "Saldo Tidak Cukup untuk talangan order #{order}: dibutuhkan {required}, saldo {balance}"
            ),
            Notice::WithdrawalBelowMinimum { minimum } => {
                write!(f, "Saldo tidak mencukupi! Minimal penarikan {minimum}")
            }
            Notice::WithdrawalExceedsBalance { balance } => {
                write!(f, "Saldo tidak mencukupi! Saldo tersedia {balance}")
            }
        }
    }
}
