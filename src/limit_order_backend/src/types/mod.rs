pub mod trade;
pub mod pair;
pub mod swap;
pub mod kongswap;

pub use trade::{Trade, TradeFields, TradeId, TradeKind, BracketOrderRequest, LimitOrderRequest};
pub use pair::{Pair, PairConfig};
pub use swap::{SwapRequest, SwapReceipt};
