use super::FloatAdvanceError;
use crate::Rupiah;
use crate::model::{Decision, Order, OrderId};

/// A pending float-advance order, handed to the confirmation step.
///
/// Snapshots the driver's balance when the confirmation opened. The request
/// never touches the ledger; only a resolved acceptance does. It is not
/// `Clone`: resolving consumes it, so it resolves at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct FloatAdvanceRequest {
    order_id: OrderId,
    customer_name: String,
    customer_phone: String,
    note: String,
    fare: Rupiah,
    float_advance_amount: Rupiah,
    balance: Rupiah,
}

/// Payload of an accepted float-advance confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acceptance {
    pub order_id: OrderId,
    pub fare: Rupiah,
    pub float_advance_amount: Rupiah,
}

impl FloatAdvanceRequest {
    pub(super) fn new(order: &Order, balance: Rupiah) -> Self {
        Self {
            order_id: order.id,
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            note: order.float_advance_note().unwrap_or_default().to_string(),
            fare: order.fare,
            float_advance_amount: order.float_advance_amount(),
            balance,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_phone(&self) -> &str {
        &self.customer_phone
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn fare(&self) -> Rupiah {
        self.fare
    }

    pub fn float_advance_amount(&self) -> Rupiah {
        self.float_advance_amount
    }

    /// Balance at the time the confirmation opened.
    pub fn balance(&self) -> Rupiah {
        self.balance
    }

    pub fn commission(&self) -> Rupiah {
        self.fare.commission()
    }

    /// Commission minus the advance. Negative when the advance outweighs the fare.
    pub fn net_income(&self) -> Rupiah {
        self.commission() - self.float_advance_amount
    }

    /// Whether accepting is allowed. When false the confirmation step only offers rejection.
    pub fn is_feasible(&self) -> bool {
        self.balance >= self.float_advance_amount
    }

    /// Turn the driver's answer into an acceptance payload, or `None` on rejection.
    pub fn decide(self, decision: Decision) -> Result<Option<Acceptance>, FloatAdvanceError> {
        match decision {
            Decision::Reject => Ok(None),
            Decision::Accept if !self.is_feasible() => {
                Err(FloatAdvanceError::InsufficientBalance {
                    order: self.order_id,
                    balance: self.balance,
                    required: self.float_advance_amount,
                })
            }
            Decision::Accept => Ok(Some(Acceptance {
                order_id: self.order_id,
                fare: self.fare,
                float_advance_amount: self.float_advance_amount,
            })),
        }
    }
}

/// The modal confirmation round-trip, as a blocking call.
pub trait ConfirmationStep {
    fn confirm(&mut self, request: &FloatAdvanceRequest) -> Decision;
}

impl<F> ConfirmationStep for F
where
    F: FnMut(&FloatAdvanceRequest) -> Decision,
{
    fn confirm(&mut self, request: &FloatAdvanceRequest) -> Decision {
        self(request)
    }
}

/// A pre-recorded answer, as read from a command script.
impl ConfirmationStep for Decision {
    fn confirm(&mut self, _request: &FloatAdvanceRequest) -> Decision {
        *self
    }
}
