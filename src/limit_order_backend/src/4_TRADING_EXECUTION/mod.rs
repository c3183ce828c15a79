//! # Trading Execution Module
//!
//! Moves funds: escrow pulls/refunds on the asset ledgers and swaps on the
//! router.
//!
//! ## Architecture
//! - **escrow/**: `FundsLedger` port, ICRC-2 pull into escrow, ICRC-1 release,
//!   per-escrow fee reserve
//! - **approvals/**: ICRC-2 approval of the router before a swap
//! - **swaps/**: `SwapExecutor` port and the Kongswap adapter
//! - **slippage/**: tolerance → minimum output, receipt checks
//!
//! ## Key Constraints
//! - **Approve-then-pull**: callers pre-authorize the engine on the sell
//!   ledger; the engine never pushes funds to itself
//! - **Proceeds go straight to the owner**: the router's receive address is
//!   the trade owner, never the engine
//! - **Tolerance enforced by the router**: the minimum output travels with
//!   the swap request

pub mod escrow;
pub mod approvals;
pub mod swaps;
pub mod slippage;

pub use escrow::{FundsLedger, IcrcLedger, fee_reserve, net_of_fees};
pub use swaps::{SwapExecutor, KongSwapExecutor, quote_swap};

use ic_cdk::api::call::RejectionCode;

/// Whether a rejected call may still have moved funds
///
/// A callee that traps after committing inner calls answers with
/// `CanisterError`; `Unknown` gives no guarantee either way.
pub fn outcome_unknown(code: RejectionCode) -> bool {
    matches!(code, RejectionCode::CanisterError | RejectionCode::Unknown)
}

/// Failure reason for a rejected call, raising a CRITICAL log line when
/// funds may have moved anyway
pub(crate) fn rejected_call_reason(operation: &str, code: RejectionCode, msg: &str) -> String {
    if outcome_unknown(code) {
        ic_cdk::println!(
            "🚨 CRITICAL: {} outcome unknown ({:?}: {}); reconcile escrow against the ledger",
            operation,
            code,
            msg
        );
        format!("Inter-canister call outcome unknown: {} - {}", code as u32, msg)
    } else {
        format!("Inter-canister call failed: {} - {}", code as u32, msg)
    }
}
