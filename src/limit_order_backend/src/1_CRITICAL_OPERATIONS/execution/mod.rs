//! # Trade Execution
//!
//! Permissionless: anyone may ask the engine to execute any open trade.
//! The trade's own condition, evaluated against the feed's latest answer,
//! is the only gate.
//!
//! ## Flow
//! 1. Look up the trade and take its guard
//! 2. Read the feed's latest answer (and decimals, for reversed trades)
//! 3. Evaluate the condition
//! 4. Swap the escrow, less the approval and pull fees, into the buy
//!    asset, owner as recipient
//! 5. Remove the record
//!
//! Any failure before step 5 leaves the trade open with its escrow intact,
//! less an approval fee already paid when the swap itself failed.

pub mod conditions;

use candid::{CandidType, Deserialize, Int, Nat, Principal};
use num_traits::Zero;
use crate::infrastructure::{Result, ESCROW_FEE_TRANSFERS};
use crate::_3_PRICE_FEEDS::PriceOracle;
use crate::_4_TRADING_EXECUTION::{net_of_fees, FundsLedger, SwapExecutor};
use crate::types::TradeId;
use super::OrderEngine;

pub use conditions::{check_condition, oriented_price};

/// Outcome of a successful execution
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub id: TradeId,
    pub owner: Principal,
    pub price: Int,
    pub sold: Nat,
    pub received: Nat,
}

impl<L: FundsLedger, O: PriceOracle, S: SwapExecutor> OrderEngine<L, O, S> {
    pub async fn execute_trade(&self, caller: Principal, id: TradeId) -> Result<ExecutionReport> {
        let trade = self.store.borrow().get(id)?;
        let _guard = self.locks.acquire(id)?;

        ic_cdk::println!("⚡ Execution of trade {} requested by {}", id, caller);

        let answer = self.oracle.latest_answer(trade.feed).await?;
        let price = if trade.reversed {
            let decimals = self.oracle.decimals(trade.feed).await?;
            oriented_price(&answer, true, decimals)?
        } else {
            answer.clone()
        };
        check_condition(id, &trade.kind, &price)?;

        ic_cdk::println!("🎯 Trade {} ({}) triggered at price {} (feed answer {})",
            id, trade.kind.as_str(), price, answer);

        let fee = self.ledger.transfer_fee(trade.sell_asset).await?;
        let held = trade.amount.clone() + trade.fee_reserve.clone();
        let pay_amount = net_of_fees(trade.sell_asset, &held, &fee, ESCROW_FEE_TRANSFERS)?;

        let swap = self
            .swap_escrow(trade.sell_asset, pay_amount.clone(), trade.buy_asset, trade.tolerance, trade.owner, &fee)
            .await;

        let receipt = match swap.result {
            Ok(receipt) => receipt,
            Err(e) => {
                if !swap.fees_spent.0.is_zero() {
                    let charged = self.store.borrow_mut().spend_fees(id, &swap.fees_spent)?;
                    ic_cdk::println!("⚠️ Trade {} paid {} in approval fees; {} escrowed, reserve {}",
                        id, swap.fees_spent, charged.amount, charged.fee_reserve);
                }
                return Err(e);
            }
        };

        self.store.borrow_mut().remove(id)?;

        ic_cdk::println!("✅ Trade {} executed: {} received {} of {}",
            id, trade.owner, receipt.receive_amount, trade.buy_asset);

        Ok(ExecutionReport {
            id,
            owner: trade.owner,
            price: answer,
            sold: pay_amount,
            received: receipt.receive_amount,
        })
    }
}
