//! # Swap Execution Module
//!
//! Converts an amount of one asset into another at the router's prevailing
//! rate, crediting a given recipient.
//!
//! ## Swap Flow
//! 1. Quote the expected output
//! 2. Derive the minimum output from the tolerance
//! 3. Approve the router for the pay amount (ICRC-2, done by the engine)
//! 4. Execute with the recipient as receive address
//! 5. Report slippage against the quote

use async_trait::async_trait;
use candid::{Nat, Principal};
use crate::infrastructure::{Result, EngineError, SwapError};
use crate::types::{SwapRequest, SwapReceipt};
use crate::types::kongswap::{kong_token_id, SwapArgs, SwapReply, SwapAmountsResult};
use super::rejected_call_reason;

#[async_trait(?Send)]
pub trait SwapExecutor {
    /// Principal that pulls the pay amount and must be approved for it
    fn spender(&self) -> Principal;

    /// Expected output for `pay_amount` of `pay_asset`, without trading
    async fn quote(&self, pay_asset: Principal, pay_amount: Nat, receive_asset: Principal) -> Result<Nat>;

    /// Swap approved escrow funds, crediting `request.recipient` with at
    /// least `request.min_receive` or failing with no funds moved
    async fn swap(&self, request: SwapRequest) -> Result<SwapReceipt>;
}

/// Quote a swap and plan its minimum output
pub async fn quote_swap<S: SwapExecutor + ?Sized>(
    swaps: &S,
    pay_asset: Principal,
    pay_amount: Nat,
    receive_asset: Principal,
    tolerance: u32,
    recipient: Principal,
) -> Result<SwapRequest> {
    let expected = swaps.quote(pay_asset, pay_amount.clone(), receive_asset).await?;

    super::slippage::plan_swap(
        pay_asset,
        pay_amount,
        receive_asset,
        expected,
        tolerance,
        recipient,
    )
}

/// Kongswap router reached by inter-canister calls
#[derive(Debug, Clone, Copy)]
pub struct KongSwapExecutor {
    router: Principal,
}

impl KongSwapExecutor {
    pub fn new(router: Principal) -> Self {
        Self { router }
    }
}

#[async_trait(?Send)]
impl SwapExecutor for KongSwapExecutor {
    fn spender(&self) -> Principal {
        self.router
    }

    async fn quote(&self, pay_asset: Principal, pay_amount: Nat, receive_asset: Principal) -> Result<Nat> {
        let (result,): (SwapAmountsResult,) = ic_cdk::call(
            self.router,
            "swap_amounts",
            (kong_token_id(&pay_asset), pay_amount.clone(), kong_token_id(&receive_asset)),
        )
        .await
        .map_err(|(code, msg)| {
            EngineError::Swap(SwapError::QuoteFailed {
                pay_asset,
                receive_asset,
                reason: format!("Call failed: {} - {}", code as u32, msg),
            })
        })?;

        match result {
            SwapAmountsResult::Ok(reply) => {
                ic_cdk::println!("📊 Quote: {} {} → {} {}",
                    pay_amount, reply.pay_symbol, reply.receive_amount, reply.receive_symbol);
                Ok(reply.receive_amount)
            }
            SwapAmountsResult::Err(e) => Err(EngineError::Swap(SwapError::QuoteFailed {
                pay_asset,
                receive_asset,
                reason: format!("Query failed: {}", e),
            })),
        }
    }

    async fn swap(&self, request: SwapRequest) -> Result<SwapReceipt> {
        ic_cdk::println!(
            "🔄 Executing swap: {} {} → {} (expected {}, min {}, recipient {})",
            request.pay_amount,
            request.pay_asset,
            request.receive_asset,
            request.expected_receive,
            request.min_receive,
            request.recipient
        );

        // Kong takes slippage in percent: 10_000 ppm = 1.0
        let max_slippage = request.tolerance as f64 / 10_000.0;

        let swap_args = SwapArgs {
            pay_token: kong_token_id(&request.pay_asset),
            pay_amount: request.pay_amount.clone(),
            pay_tx_id: None, // None = ICRC-2 flow (approval-based)
            receive_token: kong_token_id(&request.receive_asset),
            receive_amount: Some(request.expected_receive.clone()),
            receive_address: Some(request.recipient.to_text()),
            max_slippage: Some(max_slippage),
            referred_by: None,
        };

        let (swap_result,): (std::result::Result<SwapReply, String>,) =
            ic_cdk::call(self.router, "swap", (swap_args,))
                .await
                .map_err(|(code, msg)| {
                    ic_cdk::println!("❌ Swap call failed: {:?} - {}", code, msg);
                    swap_failed(&request, rejected_call_reason("swap", code, &msg))
                })?;

        let reply = swap_result.map_err(|e| {
            ic_cdk::println!("❌ Swap rejected by Kongswap: {}", e);
            swap_failed(&request, e)
        })?;

        ic_cdk::println!(
            "✅ Swap complete: {} {} → {} {} (slippage: {:.2}%, price: {}, tx {})",
            reply.pay_amount,
            reply.pay_symbol,
            reply.receive_amount,
            reply.receive_symbol,
            reply.slippage,
            reply.price,
            reply.tx_id
        );

        Ok(SwapReceipt {
            receive_amount: reply.receive_amount,
            recipient: request.recipient,
        })
    }
}

fn swap_failed(request: &SwapRequest, reason: String) -> EngineError {
    EngineError::Swap(SwapError::SwapFailed {
        pay_asset: request.pay_asset,
        receive_asset: request.receive_asset,
        amount: request.pay_amount.clone(),
        reason,
    })
}
