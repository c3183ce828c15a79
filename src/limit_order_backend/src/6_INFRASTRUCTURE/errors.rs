//! Error taxonomy for the order engine
//!
//! Every distinct failure cause is its own named variant so callers can
//! branch on it. Collaborator failures (ledger, router, feed) are wrapped
//! as-is and never reinterpreted as domain errors.

use candid::{CandidType, Deserialize, Nat, Principal};
use std::fmt;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum EngineError {
    Pair(PairError),
    Trade(TradeError),
    Condition(ConditionError),
    Transfer(TransferError),
    Swap(SwapError),
    Oracle(OracleError),
    Config(ConfigError),
    System(SystemError),
    Calculation(CalculationError),
}

/// Pair/feed configuration mismatches raised at entry
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum PairError {
    TradingPairCurrentlyNotOffered {
        feed: Principal,
    },
    ContractCallProvidedWrongTokenPairOrPriceFeed {
        feed: Principal,
        sell_asset: Principal,
        buy_asset: Principal,
    },
}

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum TradeError {
    TradeCounterDoesNotExist {
        id: u64,
    },
    WalletDoesNotControlThisTrade {
        id: u64,
        caller: Principal,
    },
}

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum ConditionError {
    PriceStillWithinStopLossTakeProfitRange {
        id: u64,
        price: candid::Int,
    },
    LimitPriceHasNotBeenAttained {
        id: u64,
        price: candid::Int,
    },
}

/// Funds-ledger failures (approve-then-pull and refunds)
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum TransferError {
    InsufficientAllowance {
        asset: Principal,
        required: Nat,
        allowance: Nat,
    },
    InsufficientFunds {
        asset: Principal,
        required: Nat,
        balance: Nat,
    },
    TransferFailed {
        asset: Principal,
        amount: Nat,
        reason: String,
    },
}

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum SwapError {
    QuoteFailed {
        pay_asset: Principal,
        receive_asset: Principal,
        reason: String,
    },
    ApprovalFailed {
        asset: Principal,
        amount: Nat,
        reason: String,
    },
    SwapFailed {
        pay_asset: Principal,
        receive_asset: Principal,
        amount: Nat,
        reason: String,
    },
    MinimumNotMet {
        expected: Nat,
        min_receive: Nat,
        available: Nat,
    },
}

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum OracleError {
    FeedUnavailable {
        feed: Principal,
        reason: String,
    },
}

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum ConfigError {
    DuplicateFeed { feed: Principal },
    IdenticalAssets { feed: Principal, asset: Principal },
    InvalidPairsDocument { reason: String },
    InvalidPrincipal { field: String, value: String },
    NotInitialized,
}

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum SystemError {
    TradeOperationInProgress { id: u64 },
    SweepInProgress,
    Paused,
    Unauthorized { caller: Principal },
}

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum CalculationError {
    DivisionByZero { operation: String },
    Overflow { operation: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Pair(e) => write!(f, "{}", e),
            EngineError::Trade(e) => write!(f, "{}", e),
            EngineError::Condition(e) => write!(f, "{}", e),
            EngineError::Transfer(e) => write!(f, "Funds transfer failed: {}", e),
            EngineError::Swap(e) => write!(f, "Swap failed: {}", e),
            EngineError::Oracle(e) => write!(f, "{}", e),
            EngineError::Config(e) => write!(f, "Configuration error: {}", e),
            EngineError::System(e) => write!(f, "{}", e),
            EngineError::Calculation(e) => write!(f, "Calculation error: {}", e),
        }
    }
}

impl fmt::Display for PairError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairError::TradingPairCurrentlyNotOffered { feed } => {
                write!(f, "TradingPairCurrentlyNotOffered: feed {} is not registered", feed)
            }
            PairError::ContractCallProvidedWrongTokenPairOrPriceFeed { feed, sell_asset, buy_asset } => write!(
                f,
                "ContractCallProvidedWrongTokenPairOrPriceFeed: {} -> {} does not match feed {}",
                sell_asset, buy_asset, feed
            ),
        }
    }
}

impl fmt::Display for TradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeError::TradeCounterDoesNotExist { id } => {
                write!(f, "TradeCounterDoesNotExist: trade {} does not exist", id)
            }
            TradeError::WalletDoesNotControlThisTrade { id, caller } => {
                write!(f, "WalletDoesNotControlThisTrade: {} does not own trade {}", caller, id)
            }
        }
    }
}

impl fmt::Display for ConditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionError::PriceStillWithinStopLossTakeProfitRange { id, price } => write!(
                f,
                "PriceStillWithinStopLossTakeProfitRange: trade {} at price {}",
                id, price
            ),
            ConditionError::LimitPriceHasNotBeenAttained { id, price } => {
                write!(f, "LimitPriceHasNotBeenAttained: trade {} at price {}", id, price)
            }
        }
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::InsufficientAllowance { asset, required, allowance } => write!(
                f,
                "insufficient allowance on {}: required {}, approved {}",
                asset, required, allowance
            ),
            TransferError::InsufficientFunds { asset, required, balance } => write!(
                f,
                "insufficient balance on {}: required {}, available {}",
                asset, required, balance
            ),
            TransferError::TransferFailed { asset, amount, reason } => {
                write!(f, "transfer of {} on {} failed: {}", amount, asset, reason)
            }
        }
    }
}

impl fmt::Display for SwapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapError::QuoteFailed { pay_asset, receive_asset, reason } => {
                write!(f, "quote {} -> {} failed: {}", pay_asset, receive_asset, reason)
            }
            SwapError::ApprovalFailed { asset, amount, reason } => {
                write!(f, "approval of {} on {} failed: {}", amount, asset, reason)
            }
            SwapError::SwapFailed { pay_asset, receive_asset, amount, reason } => write!(
                f,
                "swap of {} {} -> {} failed: {}",
                amount, pay_asset, receive_asset, reason
            ),
            SwapError::MinimumNotMet { expected, min_receive, available } => write!(
                f,
                "router offers {} but at least {} required (quoted {})",
                available, min_receive, expected
            ),
        }
    }
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::FeedUnavailable { feed, reason } => {
                write!(f, "Price feed {} unavailable: {}", feed, reason)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateFeed { feed } => write!(f, "feed {} configured twice", feed),
            ConfigError::IdenticalAssets { feed, asset } => {
                write!(f, "feed {} pairs asset {} with itself", feed, asset)
            }
            ConfigError::InvalidPairsDocument { reason } => write!(f, "invalid pairs document: {}", reason),
            ConfigError::InvalidPrincipal { field, value } => {
                write!(f, "invalid principal '{}' for {}", value, field)
            }
            ConfigError::NotInitialized => write!(f, "engine not initialized"),
        }
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::TradeOperationInProgress { id } => {
                write!(f, "Another operation on trade {} is in progress", id)
            }
            SystemError::SweepInProgress => write!(f, "A keeper sweep is already running"),
            SystemError::Paused => write!(f, "System is emergency paused"),
            SystemError::Unauthorized { caller } => {
                write!(f, "Authorization failed: {} is not an admin principal", caller)
            }
        }
    }
}

impl fmt::Display for CalculationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationError::DivisionByZero { operation } => write!(f, "division by zero in {}", operation),
            CalculationError::Overflow { operation } => write!(f, "overflow in {}", operation),
        }
    }
}

impl std::error::Error for EngineError {}
