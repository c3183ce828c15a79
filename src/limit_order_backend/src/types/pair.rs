use candid::{CandidType, Deserialize, Principal};

/// Approved trading pair: `feed` quotes `base` priced in `quote`
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub symbol: String,
    pub feed: Principal,
    pub base: Principal,
    pub quote: Principal,
}

/// Pair entry in the external PairsAndFeeds document
///
/// ```json
/// [{ "symbol": "BTC/USD", "feed": "<feed canister>", "asset1": "<base ledger>", "asset2": "<quote ledger>" }]
/// ```
#[derive(CandidType, Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct PairConfig {
    pub symbol: String,
    pub feed: String,
    pub asset1: String,
    pub asset2: String,
}
