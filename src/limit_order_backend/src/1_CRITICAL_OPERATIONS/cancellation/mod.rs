//! # Trade Cancellation
//!
//! Returns the escrow to the owner and deletes the record. The refund is
//! the amount plus whatever fee reserve the refund transfer leaves over.
//! Cancellation stays available while the engine is paused so owners can
//! always recover their funds.

use candid::Principal;
use crate::infrastructure::Result;
use crate::_3_PRICE_FEEDS::PriceOracle;
use crate::_4_TRADING_EXECUTION::{net_of_fees, FundsLedger, SwapExecutor};
use crate::types::{Trade, TradeId};
use super::OrderEngine;

impl<L: FundsLedger, O: PriceOracle, S: SwapExecutor> OrderEngine<L, O, S> {
    /// Cancel an open trade owned by `caller`
    ///
    /// Existence is checked before ownership. The record is only removed
    /// once the refund transfer has succeeded.
    pub async fn cancel_trade(&self, caller: Principal, id: TradeId) -> Result<Trade> {
        self.store.borrow().assert_owner(id, caller)?;

        let _guard = self.locks.acquire(id)?;
        let trade = self.store.borrow().get(id)?;

        let fee = self.ledger.transfer_fee(trade.sell_asset).await?;
        let held = trade.amount.clone() + trade.fee_reserve.clone();
        let refund = net_of_fees(trade.sell_asset, &held, &fee, 1)?;

        ic_cdk::println!("↩️ Cancelling trade {}: refunding {} of {} to {}",
            id, refund, trade.sell_asset, trade.owner);

        self.ledger
            .release_funds(trade.sell_asset, trade.owner, refund)
            .await?;

        self.store.borrow_mut().remove(id)?;

        ic_cdk::println!("✅ Trade {} cancelled", id);
        Ok(trade)
    }
}
