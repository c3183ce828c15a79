//! # Slippage Protection Module
//!
//! Turns a trade's tolerance into the minimum output a swap must deliver
//! and checks settled receipts against it.
//!
//! Tolerance is in parts per million of the quoted output: 10_000 = 1%.

use candid::{Nat, Principal};
use num_traits::Zero;
use crate::infrastructure::{Result, EngineError, SwapError};
use crate::infrastructure::math::{min_receive_for_tolerance, shortfall_ppm, clamp_tolerance};
use crate::types::{SwapRequest, SwapReceipt};

/// Build a swap request from a fresh quote
///
/// ## Example
/// - Quote: 1_000 units, tolerance 10_000 (1%)
/// - Result: `min_receive` = 990 units
pub fn plan_swap(
    pay_asset: Principal,
    pay_amount: Nat,
    receive_asset: Principal,
    expected_receive: Nat,
    tolerance: u32,
    recipient: Principal,
) -> Result<SwapRequest> {
    if expected_receive.0.is_zero() {
        return Err(EngineError::Swap(SwapError::QuoteFailed {
            pay_asset,
            receive_asset,
            reason: "Router quoted zero output".to_string(),
        }));
    }

    let min_receive = min_receive_for_tolerance(&expected_receive, tolerance)?;

    Ok(SwapRequest {
        pay_asset,
        pay_amount,
        receive_asset,
        expected_receive,
        min_receive,
        tolerance: clamp_tolerance(tolerance),
        recipient,
    })
}

/// Log how a settled swap compares with its quote
///
/// The swap has already settled, so a shortfall beyond tolerance is
/// reported, not reverted.
pub fn report_receipt(request: &SwapRequest, receipt: &SwapReceipt) -> Result<()> {
    let shortfall = shortfall_ppm(&request.expected_receive, &receipt.receive_amount)?;

    if receipt.receive_amount < request.min_receive {
        ic_cdk::println!(
            "🚨 Router delivered {} below minimum {} (shortfall {} ppm, tolerance {} ppm)",
            receipt.receive_amount,
            request.min_receive,
            shortfall,
            request.tolerance
        );
    } else if shortfall == 0 {
        ic_cdk::println!("✅ Positive slippage: expected {}, got {}", request.expected_receive, receipt.receive_amount);
    } else {
        ic_cdk::println!("✅ Slippage acceptable: {} ppm (max: {} ppm)", shortfall, request.tolerance);
    }

    Ok(())
}
