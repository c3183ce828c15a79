//! # ICRC-2 Approval Module
//!
//! Lets the swap router pull escrowed tokens for a swap.
//!
//! ## Approval Flow
//! 1. Engine approves the router for the swap amount plus the ledger fee
//!    charged on the router's `transfer_from`
//! 2. Approval valid for 15 minutes
//! 3. Router executes the swap using `transfer_from`
//! 4. Unused approvals expire automatically

use candid::{Nat, Principal};
use icrc_ledger_types::icrc1::account::Account;
use icrc_ledger_types::icrc2::approve::{ApproveArgs, ApproveError};
use crate::infrastructure::{Result, EngineError, SwapError, APPROVAL_EXPIRY_NANOS};

/// Approve `spender` to pull `amount` of `asset` from the engine's account
///
/// Returns the approval block index.
pub async fn approve_spender(asset: Principal, spender: Principal, amount: Nat) -> Result<Nat> {
    ic_cdk::println!("📝 Approving {} of {} for {}", amount, asset, spender);

    let now = ic_cdk::api::time();
    let approve_args = ApproveArgs {
        from_subaccount: None,
        spender: Account { owner: spender, subaccount: None },
        amount: amount.clone(),
        expected_allowance: None,
        expires_at: Some(now + APPROVAL_EXPIRY_NANOS),
        fee: None,
        memo: None,
        created_at_time: Some(now),
    };

    let (result,): (std::result::Result<Nat, ApproveError>,) =
        ic_cdk::call(asset, "icrc2_approve", (approve_args,))
            .await
            .map_err(|(code, msg)| {
                ic_cdk::println!("❌ Approval call failed: {:?} - {}", code, msg);
                EngineError::Swap(SwapError::ApprovalFailed {
                    asset,
                    amount: amount.clone(),
                    reason: format!("Inter-canister call failed: {} - {}", code as u32, msg),
                })
            })?;

    match result {
        Ok(block_index) => {
            ic_cdk::println!("✅ Approval successful: {} of {} (block: {})", amount, asset, block_index);
            Ok(block_index)
        }
        Err(err) => {
            ic_cdk::println!("❌ Approval rejected: {:?}", err);
            Err(EngineError::Swap(SwapError::ApprovalFailed {
                asset,
                amount,
                reason: format!("{:?}", err),
            }))
        }
    }
}
