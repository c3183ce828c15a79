//! Kongswap backend interface (subset of the candid records we read)

use candid::{CandidType, Deserialize, Nat};

#[derive(CandidType, Deserialize, Debug, Clone)]
pub enum TxId {
    BlockIndex(Nat),
    TransactionHash(String),
}

#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct SwapArgs {
    pub pay_token: String,
    pub pay_amount: Nat,
    pub pay_tx_id: Option<TxId>,
    pub receive_token: String,
    pub receive_amount: Option<Nat>,
    pub receive_address: Option<String>,
    pub max_slippage: Option<f64>,
    pub referred_by: Option<String>,
}

#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct SwapReply {
    pub tx_id: u64,
    pub status: String,
    pub pay_symbol: String,
    pub pay_amount: Nat,
    pub receive_symbol: String,
    pub receive_amount: Nat,
    pub price: f64,
    pub slippage: f64,
}

#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct SwapAmountsReply {
    pub pay_symbol: String,
    pub pay_amount: Nat,
    pub receive_symbol: String,
    pub receive_amount: Nat,
    pub price: f64,
    pub slippage: f64,
}

#[derive(CandidType, Deserialize, Debug, Clone)]
pub enum SwapAmountsResult {
    Ok(SwapAmountsReply),
    Err(String),
}

/// Kong token identifier for an ICRC ledger
pub fn kong_token_id(ledger: &candid::Principal) -> String {
    format!("IC.{}", ledger.to_text())
}
