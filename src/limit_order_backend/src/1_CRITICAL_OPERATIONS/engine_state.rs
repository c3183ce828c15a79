//! Canister-wide engine instance
//!
//! The engine is built once in `init` (or `post_upgrade`) from the resolved
//! configuration and shared by every endpoint. It is handed out as an `Rc`
//! so an in-flight call keeps its engine alive across awaits.

use std::cell::RefCell;
use std::rc::Rc;
use crate::infrastructure::{Result, EngineError, ConfigError};
use crate::infrastructure::config::EngineConfig;
use crate::_2_CRITICAL_DATA::{PairRegistry, TradeStore};
use crate::_3_PRICE_FEEDS::FeedCanisterOracle;
use crate::_4_TRADING_EXECUTION::{IcrcLedger, KongSwapExecutor};
use crate::types::{Trade, TradeId};
use super::OrderEngine;

pub type CanisterEngine = OrderEngine<IcrcLedger, FeedCanisterOracle, KongSwapExecutor>;

struct InstalledEngine {
    config: EngineConfig,
    engine: Rc<CanisterEngine>,
}

thread_local! {
    static ENGINE: RefCell<Option<InstalledEngine>> = RefCell::new(None);
}

/// Build and install the engine
pub fn install(config: EngineConfig, store: TradeStore) -> Result<()> {
    let registry = PairRegistry::new(config.pairs.clone())?;

    let engine = OrderEngine::new(
        registry,
        store,
        config.native_asset,
        IcrcLedger,
        FeedCanisterOracle,
        KongSwapExecutor::new(config.swap_router),
    );

    ic_cdk::println!(
        "🚀 Engine installed: {} pairs, router {}, native asset {}",
        config.pairs.len(),
        config.swap_router,
        config.native_asset
    );

    ENGINE.with(|slot| {
        *slot.borrow_mut() = Some(InstalledEngine {
            config,
            engine: Rc::new(engine),
        });
    });
    Ok(())
}

pub fn engine() -> Result<Rc<CanisterEngine>> {
    ENGINE.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|installed| Rc::clone(&installed.engine))
            .ok_or(EngineError::Config(ConfigError::NotInitialized))
    })
}

pub fn config() -> Result<EngineConfig> {
    ENGINE.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|installed| installed.config.clone())
            .ok_or(EngineError::Config(ConfigError::NotInitialized))
    })
}

/// Configuration and open trades for stable storage
pub fn snapshot() -> Option<(EngineConfig, Vec<Trade>, TradeId)> {
    ENGINE.with(|slot| {
        slot.borrow().as_ref().map(|installed| {
            let (trades, next_id) = installed.engine.export_store();
            (installed.config.clone(), trades, next_id)
        })
    })
}
