//! System-wide constants

/// Kongswap backend canister ID (mainnet), default swap router
pub const KONGSWAP_BACKEND_ID: &str = "2ipq2-uqaaa-aaaar-qailq-cai";

/// ICP ledger canister ID, default native asset
pub const ICP_LEDGER_ID: &str = "ryjl3-tyaaa-aaaaa-aaaba-cai";

/// Tolerance is expressed in parts per million of the quoted output
/// (10_000 = 1%)
pub const TOLERANCE_DENOMINATOR: u32 = 1_000_000;

/// Ledger fees escrowed on top of every amount: the router approval plus
/// the router's pull, or one refund transfer
pub const ESCROW_FEE_TRANSFERS: u64 = 2;

/// Router approval lifetime (15 minutes)
pub const APPROVAL_EXPIRY_NANOS: u64 = 900_000_000_000;

/// First identifier handed out by the trade store; 0 is never issued
pub const FIRST_TRADE_ID: u64 = 1;

/// Admin log retention
pub const MAX_ADMIN_LOG_ENTRIES: usize = 1000;

/// Shortest keeper interval accepted from the init arguments
pub const MIN_KEEPER_INTERVAL_SECONDS: u64 = 10;
