//! Stable storage management for upgrade persistence

use candid::{CandidType, Deserialize};
use crate::infrastructure::admin::AdminAction;
use crate::infrastructure::config::EngineConfig;
use crate::types::{Trade, TradeId};

#[derive(CandidType, Deserialize, Default)]
pub struct StableState {
    pub config: Option<EngineConfig>,
    pub trades: Vec<Trade>,
    pub next_trade_id: TradeId,
    pub paused: bool,
    pub admin_log: Vec<AdminAction>,
}

pub fn save_state(state: StableState) {
    ic_cdk::println!("💾 Saving {} open trades (next id {}) to stable storage",
        state.trades.len(), state.next_trade_id);

    // Trapping rolls the upgrade back; open trades must never be dropped.
    if let Err(e) = ic_cdk::storage::stable_save((state,)) {
        ic_cdk::trap(&format!("Failed to save state to stable memory: {}", e));
    }

    ic_cdk::println!("✅ Successfully saved state to stable memory");
}

pub fn restore_state() -> Option<StableState> {
    match ic_cdk::storage::stable_restore::<(StableState,)>() {
        Ok((state,)) => {
            ic_cdk::println!("✅ Restored {} open trades (next id {}) from stable storage",
                state.trades.len(), state.next_trade_id);
            Some(state)
        }
        Err(e) => {
            ic_cdk::println!("⚠️  No stable state to restore (first deployment or empty): {}", e);
            None
        }
    }
}
