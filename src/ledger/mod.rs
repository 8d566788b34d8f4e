//! Driver ledger and order acceptance workflow.
//!
//! The ledger owns the driver's earnings, withdrawable balance and online
//! status. Every mutation is saved through the injected [`LedgerStore`] before
//! it becomes visible in memory. Also consumes an async stream of driver
//! commands.

use tokio_stream::{Stream, StreamExt};
use tracing::{error, info};

use crate::Rupiah;
use crate::catalog::OrderSource;
use crate::model::{Command, Decision, Order, OrderId};
use crate::store::LedgerStore;

mod state;
pub use state::LedgerState;

mod error;
pub use error::{FloatAdvanceError, LedgerError, OrderError, WithdrawalError};

mod notice;
pub use notice::Notice;

mod request;
pub use request::{Acceptance, ConfirmationStep, FloatAdvanceRequest};

/// Smallest amount a driver may withdraw.
pub const MINIMUM_WITHDRAWAL: Rupiah = Rupiah::new(50_000);

/// Result of a ledger operation: the counters after it ran and what to tell the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub snapshot: LedgerState,
    pub notice: Notice,
}

/// The driver ledger.
///
/// Operations run strictly one after another; each either commits a new
/// state to the store and to memory, or leaves both untouched.
pub struct Ledger<S> {
    state: LedgerState,
    store: S,
}

/// Public API
impl<S: LedgerStore> Ledger<S> {
    /// Restore the ledger from `store`.
    pub fn open(store: S) -> Result<Self, LedgerError> {
        let state = store.load()?;
        info!(
            earnings = %state.earnings,
            balance = %state.balance,
            online = state.is_online,
            "ledger loaded"
        );
        Ok(Self { state, store })
    }

    /// Current counters.
    pub fn state(&self) -> LedgerState {
        self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Orders the driver can see: the whole catalog when online, nothing otherwise.
    pub fn visible_orders(&self, source: &impl OrderSource) -> Vec<Order> {
        if self.state.is_online {
            source.open_orders()
        } else {
            Vec::new()
        }
    }

    /// Flip the online switch.
    pub fn set_online(&mut self, online: bool) -> Result<Outcome, LedgerError> {
        let mut next = self.state;
        next.is_online = online;
        let result = self.commit(next).map(|snapshot| Outcome {
            snapshot,
            notice: if online {
                Notice::WentOnline
            } else {
                Notice::WentOffline
            },
        });
        Self::log_result("set online", None, None, &result);
        result
    }

    /// Accept an order without a float advance.
    pub fn accept_regular_order(&mut self, order: &Order) -> Result<Outcome, LedgerError> {
        let result = self.apply_regular_order(order);
        Self::log_result("regular order", Some(order.id), Some(order.fare), &result);
        result
    }

    /// Open the confirmation for a float-advance order. Does not touch the ledger.
    pub fn begin_float_advance_order(
        &self,
        order: &Order,
    ) -> Result<FloatAdvanceRequest, LedgerError> {
        if !self.state.is_online {
            return Err(OrderError::Offline(order.id).into());
        }
        if !order.has_float_advance() {
            return Err(OrderError::NoFloatAdvance(order.id).into());
        }

        let request = FloatAdvanceRequest::new(order, self.state.balance);
        info!(
            order = order.id,
            fare = %request.fare(),
            advance = %request.float_advance_amount(),
            net = %request.net_income(),
            feasible = request.is_feasible(),
            "float advance confirmation opened"
        );
        Ok(request)
    }

    /// Close the confirmation opened by [`begin_float_advance_order`](Self::begin_float_advance_order).
    ///
    /// Consumes the request, so each confirmation resolves exactly once. A
    /// rejection leaves the ledger as is. An acceptance books the fare and
    /// pays the advance out of the balance.
    pub fn resolve_float_advance_order(
        &mut self,
        request: FloatAdvanceRequest,
        decision: impl Into<Decision>,
    ) -> Result<Outcome, LedgerError> {
        let order = request.order_id();
        let amount = request.float_advance_amount();
        let result = self.apply_float_advance_order(request, decision.into());
        Self::log_result("float advance order", Some(order), Some(amount), &result);
        result
    }

    /// Accept `order`, routing float-advance orders through `step`.
    pub fn accept_order(
        &mut self,
        order: &Order,
        step: &mut impl ConfirmationStep,
    ) -> Result<Outcome, LedgerError> {
        if !order.has_float_advance() {
            return self.accept_regular_order(order);
        }

        let request = self.begin_float_advance_order(order)?;
        let decision = step.confirm(&request);
        self.resolve_float_advance_order(request, decision)
    }

    /// Withdraw `amount` from the balance.
    pub fn withdraw(&mut self, amount: Rupiah) -> Result<Outcome, LedgerError> {
        let result = self.apply_withdrawal(amount);
        Self::log_result("withdrawal", None, Some(amount), &result);
        result
    }

    /// Apply a single driver command, looking orders up in `catalog`
    pub fn apply(
        &mut self,
        catalog: &impl OrderSource,
        command: Command,
    ) -> Result<Outcome, LedgerError> {
        match command {
            Command::SetOnline { online } => self.set_online(online),
            Command::Accept {
                order,
                mut decision,
            } => {
                let order = self.find_visible(catalog, order)?;
                self.accept_order(&order, &mut decision)
            }
            Command::Withdraw { amount } => self.withdraw(amount),
        }
    }

    /// Run the ledger over a stream of commands, returning every notice in order.
    ///
    /// Rejected commands do not stop the run; a storage failure does.
    pub async fn run(
        &mut self,
        catalog: &impl OrderSource,
        mut stream: impl Stream<Item = Command> + Unpin,
    ) -> Result<Vec<Notice>, LedgerError> {
        let mut notices = Vec::new();

        while let Some(command) = stream.next().await {
            match self.apply(catalog, command) {
                Ok(outcome) => notices.push(outcome.notice),
                Err(e) => match e.notice() {
                    Some(notice) => notices.push(notice),
                    None => return Err(e),
                },
            }
        }

        Ok(notices)
    }
}

/// Private API
impl<S: LedgerStore> Ledger<S> {
    /// Small helper to log operation results
    fn log_result(
        operation: &str,
        order: Option<OrderId>,
        amount: Option<Rupiah>,
        result: &Result<Outcome, LedgerError>,
    ) {
        match result {
            Ok(outcome) => info!(
                order = ?order,
                amount = amount.map(tracing::field::display),
                earnings = %outcome.snapshot.earnings,
                balance = %outcome.snapshot.balance,
                "{operation} applied"
            ),
            Err(e @ LedgerError::Store(_)) => error!(
                order = ?order,
                amount = amount.map(tracing::field::display),
                reason = %e,
                "{operation} not persisted"
            ),
            Err(e) => info!(
                order = ?order,
                amount = amount.map(tracing::field::display),
                reason = %e,
                "{operation} skipped"
            ),
        }
    }

    /// Save `next` and only then make it the in-memory state.
    fn commit(&mut self, next: LedgerState) -> Result<LedgerState, LedgerError> {
        self.store.save(&next)?;
        self.state = next;
        Ok(next)
    }

    /// Resolve an order id against what the driver currently sees.
    fn find_visible(
        &self,
        catalog: &impl OrderSource,
        order: OrderId,
    ) -> Result<Order, LedgerError> {
        if !self.state.is_online {
            return Err(OrderError::Offline(order).into());
        }
        catalog
            .find(order)
            .ok_or_else(|| OrderError::UnknownOrder(order).into())
    }

    /// Accept a regular order:
    /// - Ensure the driver is online
    /// - Ensure the order carries no float advance
    /// - Book the fare into earnings and its commission into the balance
    fn apply_regular_order(&mut self, order: &Order) -> Result<Outcome, LedgerError> {
        if !self.state.is_online {
            return Err(OrderError::Offline(order.id).into());
        }
        if order.has_float_advance() {
            return Err(OrderError::FloatAdvanceRequired(order.id).into());
        }

        let mut next = self.state;
        next.credit_fare(order.fare);

        Ok(Outcome {
            snapshot: self.commit(next)?,
            notice: Notice::OrderAccepted { order: order.id },
        })
    }

    /// Resolve a float-advance confirmation:
    /// - Rejections return the current state untouched
    /// - Ensure the balance covered the advance when the confirmation opened
    /// - Ensure the driver is still online and the balance still covers it
    /// - Book the fare and commission, pay the advance out of the balance
    fn apply_float_advance_order(
        &mut self,
        request: FloatAdvanceRequest,
        decision: Decision,
    ) -> Result<Outcome, LedgerError> {
        let order = request.order_id();
        let Some(acceptance) = request.decide(decision)? else {
            return Ok(Outcome {
                snapshot: self.state,
                notice: Notice::FloatAdvanceOrderDeclined { order },
            });
        };

        if !self.state.is_online {
            return Err(OrderError::Offline(order).into());
        }

        // the balance may have moved since the confirmation opened
        if !self.state.covers(acceptance.float_advance_amount) {
            return Err(FloatAdvanceError::InsufficientBalance {
                order: acceptance.order_id,
                balance: self.state.balance,
                required: acceptance.float_advance_amount,
            }
            .into());
        }

        let mut next = self.state;
        next.credit_fare(acceptance.fare);
        next.debit(acceptance.float_advance_amount);

        if next.balance < self.state.balance {
            info!(
                order = acceptance.order_id,
                advance = %acceptance.float_advance_amount,
                balance = %next.balance,
                "float advance exceeds commission, balance decreases"
            );
        }

        Ok(Outcome {
            snapshot: self.commit(next)?,
            notice: Notice::FloatAdvanceOrderAccepted {
                order: acceptance.order_id,
            },
        })
    }

    /// Apply a withdrawal:
    /// - Ensure the amount reaches the minimum
    /// - Ensure the balance covers it
    /// - Decrement the balance by the amount
    fn apply_withdrawal(&mut self, amount: Rupiah) -> Result<Outcome, LedgerError> {
        if amount < MINIMUM_WITHDRAWAL {
            return Err(WithdrawalError::InsufficientMinimum {
                minimum: MINIMUM_WITHDRAWAL,
                requested: amount,
            }
            .into());
        }
        if !self.state.covers(amount) {
            return Err(WithdrawalError::InsufficientFunds {
                balance: self.state.balance,
                requested: amount,
            }
            .into());
        }

        let mut next = self.state;
        next.debit(amount);

        Ok(Outcome {
            snapshot: self.commit(next)?,
            notice: Notice::Withdrawn { amount },
        })
    }
}

impl From<bool> for Decision {
    fn from(accepted: bool) -> Self {
        if accepted {
            Decision::Accept
        } else {
            Decision::Reject
        }
    }
}
