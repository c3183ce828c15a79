//! Critical Data - Pair registry and trade records
//! Source of truth for what may be traded and what is held in escrow

pub mod pair_registry;
pub mod trade_store;

pub use pair_registry::PairRegistry;
pub use trade_store::TradeStore;
