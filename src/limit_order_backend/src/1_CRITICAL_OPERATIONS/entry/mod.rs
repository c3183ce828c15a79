//! # Trade Entry
//!
//! Opens bracket and limit orders.
//!
//! ## Flow
//! 1. Validate (feed, sell, buy) against the pair registry
//! 2. Check the caller's orientation hint against the derived one
//! 3. Pull `amount` of the sell asset plus a reserve of two ledger fees
//!    into escrow
//! 4. Allocate the trade record
//!
//! Nothing is written before the pull succeeds, and the record is allocated
//! synchronously right after it, so a failed entry leaves no trace.

use candid::{Nat, Principal};
use crate::infrastructure::{Result, EngineError, PairError};
use crate::_3_PRICE_FEEDS::PriceOracle;
use crate::_4_TRADING_EXECUTION::{fee_reserve, FundsLedger, SwapExecutor};
use crate::types::{BracketOrderRequest, LimitOrderRequest, TradeFields, TradeId, TradeKind};
use super::OrderEngine;

/// Common shape of both order requests once the condition is split off
struct EntryOrder {
    feed: Principal,
    sell_asset: Principal,
    buy_asset: Principal,
    amount: Nat,
    tolerance: u32,
    reversed: bool,
}

impl<L: FundsLedger, O: PriceOracle, S: SwapExecutor> OrderEngine<L, O, S> {
    /// Open a take-profit / stop-loss order
    pub async fn enter_new_trade(
        &self,
        caller: Principal,
        request: BracketOrderRequest,
        now: u64,
    ) -> Result<TradeId> {
        let kind = TradeKind::Bracket {
            take_profit: request.take_profit,
            stop_loss: request.stop_loss,
        };
        let order = EntryOrder {
            feed: request.feed,
            sell_asset: request.sell_asset,
            buy_asset: request.buy_asset,
            amount: request.amount,
            tolerance: request.tolerance,
            reversed: request.reversed,
        };

        self.enter(caller, order, kind, now).await
    }

    /// Open a single-trigger limit order
    pub async fn enter_new_limit(
        &self,
        caller: Principal,
        request: LimitOrderRequest,
        now: u64,
    ) -> Result<TradeId> {
        let kind = TradeKind::Limit {
            trigger_price: request.trigger_price,
        };
        let order = EntryOrder {
            feed: request.feed,
            sell_asset: request.sell_asset,
            buy_asset: request.buy_asset,
            amount: request.amount,
            tolerance: request.tolerance,
            reversed: request.reversed,
        };

        self.enter(caller, order, kind, now).await
    }

    async fn enter(
        &self,
        caller: Principal,
        order: EntryOrder,
        kind: TradeKind,
        now: u64,
    ) -> Result<TradeId> {
        let reversed = self.registry.validate(order.feed, order.sell_asset, order.buy_asset)?;

        if reversed != order.reversed {
            ic_cdk::println!(
                "❌ Orientation hint {} does not match feed {} (derived {})",
                order.reversed,
                order.feed,
                reversed
            );
            return Err(EngineError::Pair(PairError::ContractCallProvidedWrongTokenPairOrPriceFeed {
                feed: order.feed,
                sell_asset: order.sell_asset,
                buy_asset: order.buy_asset,
            }));
        }

        let fee = self.ledger.transfer_fee(order.sell_asset).await?;
        let reserve = fee_reserve(&fee);

        self.ledger
            .pull_funds(order.sell_asset, caller, order.amount.clone() + reserve.clone())
            .await?;

        let kind_name = kind.as_str();
        let id = self.store.borrow_mut().allocate(
            caller,
            TradeFields {
                feed: order.feed,
                sell_asset: order.sell_asset,
                buy_asset: order.buy_asset,
                amount: order.amount.clone(),
                fee_reserve: reserve.clone(),
                reversed,
                kind,
                tolerance: order.tolerance,
                created_at: now,
            },
        );

        ic_cdk::println!(
            "✅ Trade {} opened ({}): {} escrowed {} (+{} fees) of {} for {}",
            id,
            kind_name,
            caller,
            order.amount,
            reserve,
            order.sell_asset,
            order.buy_asset
        );

        Ok(id)
    }
}
