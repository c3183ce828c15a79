//! Reentrancy guards for funds-release operations
//!
//! Inter-canister calls yield control, so two messages could both pass the
//! existence/ownership checks for the same trade before either removes it.
//! Cancellation and execution are the only funds-release paths; each holds a
//! per-trade guard for its whole duration so they stay mutually exclusive.
//!
//! Different trades can be released concurrently. Entry needs no guard:
//! allocation happens synchronously after the single fund pull.

use std::cell::RefCell;
use std::collections::HashSet;
use crate::infrastructure::{Result, EngineError, SystemError};
use crate::types::TradeId;

/// Set of trades with a release operation in flight
#[derive(Default)]
pub struct TradeLocks {
    active: RefCell<HashSet<TradeId>>,
}

impl TradeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the guard for `id`, failing if another operation holds it
    pub fn acquire(&self, id: TradeId) -> Result<TradeGuard<'_>> {
        let acquired = self.active.borrow_mut().insert(id);

        if acquired {
            Ok(TradeGuard { locks: self, id })
        } else {
            ic_cdk::println!("⚠️ Trade {} already has an operation in flight", id);
            Err(EngineError::System(SystemError::TradeOperationInProgress { id }))
        }
    }

    pub fn is_locked(&self, id: TradeId) -> bool {
        self.active.borrow().contains(&id)
    }
}

/// Releases the trade on drop, on success and failure paths alike
pub struct TradeGuard<'a> {
    locks: &'a TradeLocks,
    id: TradeId,
}

impl Drop for TradeGuard<'_> {
    fn drop(&mut self) {
        self.locks.active.borrow_mut().remove(&self.id);
    }
}
