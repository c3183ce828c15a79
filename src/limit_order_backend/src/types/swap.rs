use candid::{CandidType, Deserialize, Nat, Principal};

/// Swap order handed to the swap executor
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct SwapRequest {
    pub pay_asset: Principal,
    pub pay_amount: Nat,
    pub receive_asset: Principal,
    pub expected_receive: Nat,
    pub min_receive: Nat,
    pub tolerance: u32,
    pub recipient: Principal,
}

/// Settled swap as reported by the executor
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct SwapReceipt {
    pub receive_amount: Nat,
    pub recipient: Principal,
}
