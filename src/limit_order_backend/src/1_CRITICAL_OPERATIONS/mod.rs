//! Critical Operations - Entry, cancellation and execution of trades
//!
//! The order engine owns the escrow discipline: a trade record exists if and
//! only if its escrowed amount is held and not yet refunded or swapped.
//!
//! Escrow holds the amount plus a reserve of two ledger fees. Refunds and
//! swaps pay their fees out of that reserve, so one trade's fees never come
//! out of another trade's escrow.
//!
//! Every mutating operation applies its state change only after the last
//! awaited collaborator call has succeeded, so a failure at any step leaves
//! records and balances as they were. The one exception is a swap that
//! fails after the router was approved: the approval fee is gone and is
//! charged to the trade.

pub mod entry;
pub mod cancellation;
pub mod execution;
pub mod native_swap;
pub mod keeper;
pub mod engine_state;

#[cfg(test)]
pub(crate) mod test_doubles;

use std::cell::RefCell;
use candid::{CandidType, Deserialize, Int, Nat, Principal};
use crate::infrastructure::{Result, TradeLocks};
use crate::_2_CRITICAL_DATA::{PairRegistry, TradeStore};
use crate::_3_PRICE_FEEDS::PriceOracle;
use crate::_4_TRADING_EXECUTION::{quote_swap, FundsLedger, SwapExecutor};
use crate::_4_TRADING_EXECUTION::slippage::report_receipt;
use crate::types::{SwapReceipt, Trade, TradeId};

pub use execution::ExecutionReport;
pub use keeper::SweepReport;

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct EngineStats {
    pub open_trades: u64,
    pub next_trade_id: TradeId,
    pub registered_pairs: u64,
    pub native_asset: Principal,
}

/// Outcome of swapping escrowed funds
pub(crate) struct EscrowSwap {
    /// Ledger fees paid out of escrow, whether or not the swap settled
    pub fees_spent: Nat,
    pub result: Result<SwapReceipt>,
}

/// Conditional order engine over injected ledger, oracle and router ports
pub struct OrderEngine<L, O, S> {
    registry: PairRegistry,
    store: RefCell<TradeStore>,
    locks: TradeLocks,
    native_asset: Principal,
    ledger: L,
    oracle: O,
    swaps: S,
}

impl<L: FundsLedger, O: PriceOracle, S: SwapExecutor> OrderEngine<L, O, S> {
    pub fn new(
        registry: PairRegistry,
        store: TradeStore,
        native_asset: Principal,
        ledger: L,
        oracle: O,
        swaps: S,
    ) -> Self {
        Self {
            registry,
            store: RefCell::new(store),
            locks: TradeLocks::new(),
            native_asset,
            ledger,
            oracle,
            swaps,
        }
    }

    pub fn registry(&self) -> &PairRegistry {
        &self.registry
    }

    /// Ids of the caller's open trades, in allocation order
    pub fn current_trades(&self, caller: Principal) -> Vec<TradeId> {
        self.store.borrow().ids_by_owner(caller)
    }

    pub fn current_trade_details(&self, caller: Principal) -> Vec<Trade> {
        self.store.borrow().list_by_owner(caller)
    }

    pub fn trade(&self, id: TradeId) -> Result<Trade> {
        self.store.borrow().get(id)
    }

    pub fn open_trade_ids(&self) -> Vec<TradeId> {
        self.store.borrow().open_ids()
    }

    pub fn is_in_flight(&self, id: TradeId) -> bool {
        self.locks.is_locked(id)
    }

    /// Latest answer of any feed, registered or not
    pub async fn latest_answer(&self, feed: Principal) -> Result<Int> {
        self.oracle.latest_answer(feed).await
    }

    pub async fn feed_decimals(&self, feed: Principal) -> Result<u8> {
        self.oracle.decimals(feed).await
    }

    pub fn stats(&self) -> EngineStats {
        let store = self.store.borrow();
        EngineStats {
            open_trades: store.len() as u64,
            next_trade_id: store.next_id(),
            registered_pairs: self.registry.len() as u64,
            native_asset: self.native_asset,
        }
    }

    /// Snapshot of the store for stable storage
    pub fn export_store(&self) -> (Vec<Trade>, TradeId) {
        self.store.borrow().export()
    }

    /// Quote, approve the router and swap `pay_amount` held in escrow
    ///
    /// `fee` is the pay ledger's transfer fee. The approval and the
    /// router's pull each cost one fee.
    pub(crate) async fn swap_escrow(
        &self,
        pay_asset: Principal,
        pay_amount: Nat,
        receive_asset: Principal,
        tolerance: u32,
        recipient: Principal,
        fee: &Nat,
    ) -> EscrowSwap {
        let no_fees = || Nat::from(0u64);

        let request = match quote_swap(&self.swaps, pay_asset, pay_amount, receive_asset, tolerance, recipient).await {
            Ok(request) => request,
            Err(e) => return EscrowSwap { fees_spent: no_fees(), result: Err(e) },
        };

        let allowance = request.pay_amount.clone() + fee.clone();
        if let Err(e) = self.ledger.approve_spender(pay_asset, self.swaps.spender(), allowance).await {
            return EscrowSwap { fees_spent: no_fees(), result: Err(e) };
        }

        match self.swaps.swap(request.clone()).await {
            Ok(receipt) => {
                if let Err(e) = report_receipt(&request, &receipt) {
                    ic_cdk::println!("⚠️ Could not compare receipt with quote: {}", e);
                }
                EscrowSwap {
                    fees_spent: fee.clone() + fee.clone(),
                    result: Ok(receipt),
                }
            }
            Err(e) => EscrowSwap { fees_spent: fee.clone(), result: Err(e) },
        }
    }
}
