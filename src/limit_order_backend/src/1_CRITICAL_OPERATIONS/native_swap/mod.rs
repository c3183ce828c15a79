//! # Native Swap
//!
//! One-shot conversion of the native asset (ICP by default) into any token
//! the router lists, delivered straight to the caller. No trade record is
//! created.
//!
//! The native amount plus a reserve of two ledger fees is pulled with the
//! caller's ICRC-2 allowance first; the reserve pays for the router's
//! approval and pull. If the swap then fails, whatever the failed attempt
//! did not spend is released back, less the refund's own fee, before the
//! swap error is returned.

use candid::{Nat, Principal};
use crate::infrastructure::Result;
use crate::_3_PRICE_FEEDS::PriceOracle;
use crate::_4_TRADING_EXECUTION::{fee_reserve, net_of_fees, FundsLedger, SwapExecutor};
use crate::types::SwapReceipt;
use super::OrderEngine;

impl<L: FundsLedger, O: PriceOracle, S: SwapExecutor> OrderEngine<L, O, S> {
    pub async fn swap_native_to_token(
        &self,
        caller: Principal,
        target_asset: Principal,
        amount: Nat,
        tolerance: u32,
    ) -> Result<SwapReceipt> {
        let native = self.native_asset;

        ic_cdk::println!("💱 Native swap: {} of {} → {} for {}", amount, native, target_asset, caller);

        let fee = self.ledger.transfer_fee(native).await?;
        let pulled = amount.clone() + fee_reserve(&fee);
        self.ledger.pull_funds(native, caller, pulled.clone()).await?;

        let swap = self.swap_escrow(native, amount, target_asset, tolerance, caller, &fee).await;

        match swap.result {
            Ok(receipt) => Ok(receipt),
            Err(swap_err) => {
                let spent = swap.fees_spent + fee;
                let refunded = match net_of_fees(native, &pulled, &spent, 1) {
                    Ok(refund) => {
                        ic_cdk::println!("❌ Native swap failed, refunding {} to {}: {}", refund, caller, swap_err);
                        self.ledger.release_funds(native, caller, refund).await
                    }
                    Err(e) => Err(e),
                };

                if let Err(refund_err) = refunded {
                    ic_cdk::println!(
                        "🚨 CRITICAL: refund of {} {} to {} failed: {}",
                        pulled,
                        native,
                        caller,
                        refund_err
                    );
                }
                Err(swap_err)
            }
        }
    }
}
