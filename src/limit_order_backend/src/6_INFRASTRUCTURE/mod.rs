//! Infrastructure - Shared utilities and types
//! Foundation layer for all other modules

pub mod constants;
pub mod errors;
pub mod math;
pub mod config;
pub mod reentrancy;
pub mod stable_storage;
pub mod admin;

// Re-export commonly used items
pub use constants::*;
pub use errors::{EngineError, Result, PairError, TradeError, ConditionError, TransferError, SwapError, OracleError, ConfigError, SystemError, CalculationError};
pub use reentrancy::{TradeLocks, TradeGuard};
pub use admin::{require_admin, check_not_paused, log_admin_action, set_pause, is_paused, get_admin_log, AdminAction};
