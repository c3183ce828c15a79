//! # Escrow Ledger Module
//!
//! Pull-into-escrow, release-from-escrow and router approvals on ICRC
//! ledgers.
//!
//! ## Flow
//! 1. Caller calls `icrc2_approve` on the sell ledger for the engine
//! 2. Entry pulls `amount` plus a fee reserve via `icrc2_transfer_from`
//! 3. Cancellation releases what is held, less one transfer fee, via
//!    `icrc1_transfer`
//! 4. Execution approves the router, whose pull is the second fee
//!
//! Every ledger fee the engine pays comes out of the escrow it pays for,
//! never out of another trade's escrow. A rejected pull leaves every
//! balance untouched, so entry can fail at this step without any
//! compensation.

use async_trait::async_trait;
use candid::{Nat, Principal};
use icrc_ledger_types::icrc1::account::Account;
use icrc_ledger_types::icrc1::transfer::{TransferArg, TransferError as IcrcTransferError};
use icrc_ledger_types::icrc2::transfer_from::{TransferFromArgs, TransferFromError};
use crate::infrastructure::{Result, EngineError, TransferError, ESCROW_FEE_TRANSFERS};
use super::rejected_call_reason;

/// Funds movement between callers and the engine's custody
#[async_trait(?Send)]
pub trait FundsLedger {
    /// Fee the ledger of `asset` charges per transfer or approval
    async fn transfer_fee(&self, asset: Principal) -> Result<Nat>;

    /// Move `amount` of `asset` from `from` into escrow using its allowance
    ///
    /// The ledger charges its fee to `from` on top of `amount`.
    async fn pull_funds(&self, asset: Principal, from: Principal, amount: Nat) -> Result<Nat>;

    /// Deliver `amount` of `asset` from escrow to `to`; escrow also pays the fee
    async fn release_funds(&self, asset: Principal, to: Principal, amount: Nat) -> Result<Nat>;

    /// Let `spender` pull up to `amount` of `asset` from escrow; escrow pays the fee
    async fn approve_spender(&self, asset: Principal, spender: Principal, amount: Nat) -> Result<Nat>;
}

/// Fee budget escrowed on top of an amount
pub fn fee_reserve(fee: &Nat) -> Nat {
    fee.clone() * Nat::from(ESCROW_FEE_TRANSFERS)
}

/// What is left of `held` after paying `transfers` ledger fees out of it
pub fn net_of_fees(asset: Principal, held: &Nat, fee: &Nat, transfers: u64) -> Result<Nat> {
    let fees = fee.clone() * Nat::from(transfers);
    if *held < fees {
        return Err(EngineError::Transfer(TransferError::InsufficientFunds {
            asset,
            required: fees,
            balance: held.clone(),
        }));
    }
    Ok(Nat(&held.0 - &fees.0))
}

/// ICRC-1/ICRC-2 ledgers, escrow held on the canister's default account
#[derive(Debug, Clone, Copy, Default)]
pub struct IcrcLedger;

#[async_trait(?Send)]
impl FundsLedger for IcrcLedger {
    async fn transfer_fee(&self, asset: Principal) -> Result<Nat> {
        let (fee,): (Nat,) = ic_cdk::call(asset, "icrc1_fee", ())
            .await
            .map_err(|(code, msg)| {
                EngineError::Transfer(TransferError::TransferFailed {
                    asset,
                    amount: Nat::from(0u64),
                    reason: format!("icrc1_fee call failed: {} - {}", code as u32, msg),
                })
            })?;
        Ok(fee)
    }

    async fn pull_funds(&self, asset: Principal, from: Principal, amount: Nat) -> Result<Nat> {
        ic_cdk::println!("📥 Pulling {} of {} from {} into escrow", amount, asset, from);

        let args = TransferFromArgs {
            spender_subaccount: None,
            from: Account { owner: from, subaccount: None },
            to: Account { owner: ic_cdk::id(), subaccount: None },
            amount: amount.clone(),
            fee: None,
            memo: None,
            created_at_time: None,
        };

        let (result,): (std::result::Result<Nat, TransferFromError>,) =
            ic_cdk::call(asset, "icrc2_transfer_from", (args,))
                .await
                .map_err(|(code, msg)| {
                    ic_cdk::println!("❌ transfer_from call failed: {:?} - {}", code, msg);
                    EngineError::Transfer(TransferError::TransferFailed {
                        asset,
                        amount: amount.clone(),
                        reason: rejected_call_reason("escrow pull", code, &msg),
                    })
                })?;

        match result {
            Ok(block) => {
                ic_cdk::println!("✅ Escrowed {} of {} at block {}", amount, asset, block);
                Ok(block)
            }
            Err(TransferFromError::InsufficientAllowance { allowance }) => {
                ic_cdk::println!("⚠️ Insufficient approval: required {}, approved {}", amount, allowance);
                Err(EngineError::Transfer(TransferError::InsufficientAllowance {
                    asset,
                    required: amount,
                    allowance,
                }))
            }
            Err(TransferFromError::InsufficientFunds { balance }) => {
                Err(EngineError::Transfer(TransferError::InsufficientFunds {
                    asset,
                    required: amount,
                    balance,
                }))
            }
            Err(e) => Err(EngineError::Transfer(TransferError::TransferFailed {
                asset,
                amount,
                reason: format!("ICRC-2 error: {:?}", e),
            })),
        }
    }

    async fn release_funds(&self, asset: Principal, to: Principal, amount: Nat) -> Result<Nat> {
        ic_cdk::println!("📤 Releasing {} of {} from escrow to {}", amount, asset, to);

        let args = TransferArg {
            from_subaccount: None,
            to: Account { owner: to, subaccount: None },
            fee: None,
            created_at_time: None,
            memo: None,
            amount: amount.clone(),
        };

        let (result,): (std::result::Result<Nat, IcrcTransferError>,) =
            ic_cdk::call(asset, "icrc1_transfer", (args,))
                .await
                .map_err(|(code, msg)| {
                    ic_cdk::println!("❌ transfer call failed: {:?} - {}", code, msg);
                    EngineError::Transfer(TransferError::TransferFailed {
                        asset,
                        amount: amount.clone(),
                        reason: rejected_call_reason("escrow release", code, &msg),
                    })
                })?;

        match result {
            Ok(block) => {
                ic_cdk::println!("✅ Released {} of {} at block {}", amount, asset, block);
                Ok(block)
            }
            Err(IcrcTransferError::InsufficientFunds { balance }) => {
                ic_cdk::println!("🚨 Escrow short on {}: required {}, held {}", asset, amount, balance);
                Err(EngineError::Transfer(TransferError::InsufficientFunds {
                    asset,
                    required: amount,
                    balance,
                }))
            }
            Err(e) => Err(EngineError::Transfer(TransferError::TransferFailed {
                asset,
                amount,
                reason: format!("ICRC-1 error: {:?}", e),
            })),
        }
    }

    async fn approve_spender(&self, asset: Principal, spender: Principal, amount: Nat) -> Result<Nat> {
        super::approvals::approve_spender(asset, spender, amount).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdc() -> Principal {
        Principal::from_slice(&[20; 10])
    }

    #[test]
    fn test_fee_reserve_covers_two_transfers() {
        assert_eq!(fee_reserve(&Nat::from(10u64)), Nat::from(20u64));
        assert_eq!(fee_reserve(&Nat::from(0u64)), Nat::from(0u64));
    }

    #[test]
    fn test_net_of_fees() {
        assert_eq!(net_of_fees(usdc(), &Nat::from(520u64), &Nat::from(10u64), 1), Ok(Nat::from(510u64)));
        assert_eq!(net_of_fees(usdc(), &Nat::from(520u64), &Nat::from(10u64), 2), Ok(Nat::from(500u64)));
        assert_eq!(
            net_of_fees(usdc(), &Nat::from(15u64), &Nat::from(10u64), 2),
            Err(EngineError::Transfer(TransferError::InsufficientFunds {
                asset: usdc(),
                required: Nat::from(20u64),
                balance: Nat::from(15u64),
            }))
        );
    }
}
