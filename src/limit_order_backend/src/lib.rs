//! Limit Order Backend - Conditional order execution with numbered zones
//!
//! Architecture:
//! 1_CRITICAL_OPERATIONS - Entry, cancellation, execution, keeper (highest security)
//! 2_CRITICAL_DATA - Pair registry and trade records
//! 3_PRICE_FEEDS - Read-only price feed access
//! 4_TRADING_EXECUTION - Escrow ledgers and DEX interactions
//! 5_INFORMATIONAL - Display
//! 6_INFRASTRUCTURE - Math, errors, constants, config, storage

// Import numbered modules with explicit paths
#[path = "1_CRITICAL_OPERATIONS/mod.rs"]
mod critical_operations_1;
use critical_operations_1 as _1_CRITICAL_OPERATIONS;

#[path = "2_CRITICAL_DATA/mod.rs"]
mod critical_data_2;
use critical_data_2 as _2_CRITICAL_DATA;

#[path = "3_PRICE_FEEDS/mod.rs"]
mod price_feeds_3;
use price_feeds_3 as _3_PRICE_FEEDS;

#[path = "4_TRADING_EXECUTION/mod.rs"]
mod trading_execution_4;
use trading_execution_4 as _4_TRADING_EXECUTION;

#[path = "5_INFORMATIONAL/mod.rs"]
mod informational_5;
use informational_5 as _5_INFORMATIONAL;

#[path = "6_INFRASTRUCTURE/mod.rs"]
mod infrastructure_6;
use infrastructure_6 as infrastructure;

mod types;

use candid::{candid_method, Int, Nat, Principal};
use ic_cdk::{init, pre_upgrade, post_upgrade, query, update};
use infrastructure::Result;
use infrastructure::config::{EngineConfig, InitArgs};
use infrastructure::stable_storage::StableState;
use _1_CRITICAL_OPERATIONS::{engine_state, keeper, EngineStats, ExecutionReport, SweepReport};
use _2_CRITICAL_DATA::TradeStore;
use types::{BracketOrderRequest, LimitOrderRequest, Pair, SwapReceipt, Trade, TradeId};

// ===== ORDER ENTRY =====

/// Open a bracket (take-profit / stop-loss) order
///
/// The caller must first `icrc2_approve` this canister on the sell ledger
/// for at least `amount` plus three ledger fees: two are escrowed as the
/// trade's fee reserve and one is charged on the pull itself.
#[update(name = "enterNewTrade")]
#[candid_method(update, rename = "enterNewTrade")]
async fn enter_new_trade(request: BracketOrderRequest) -> Result<TradeId> {
    infrastructure::check_not_paused()?;
    let caller = ic_cdk::caller();
    engine_state::engine()?
        .enter_new_trade(caller, request, ic_cdk::api::time())
        .await
}

#[update(name = "enterNewLimit")]
#[candid_method(update, rename = "enterNewLimit")]
async fn enter_new_limit(request: LimitOrderRequest) -> Result<TradeId> {
    infrastructure::check_not_paused()?;
    let caller = ic_cdk::caller();
    engine_state::engine()?
        .enter_new_limit(caller, request, ic_cdk::api::time())
        .await
}

// ===== CANCELLATION & EXECUTION =====

/// Refund the escrow of an owned trade (available while paused)
#[update(name = "cancelTrade")]
#[candid_method(update, rename = "cancelTrade")]
async fn cancel_trade(id: TradeId) -> Result<Trade> {
    let caller = ic_cdk::caller();
    engine_state::engine()?.cancel_trade(caller, id).await
}

/// Execute any open trade whose condition holds (permissionless)
#[update(name = "executeTrade")]
#[candid_method(update, rename = "executeTrade")]
async fn execute_trade(id: TradeId) -> Result<ExecutionReport> {
    infrastructure::check_not_paused()?;
    let caller = ic_cdk::caller();
    engine_state::engine()?.execute_trade(caller, id).await
}

/// Convert the native asset into `target_asset`, delivered to the caller
///
/// Needs the same allowance on the native ledger as order entry: `amount`
/// plus three ledger fees.
#[update(name = "swapNativeToToken")]
#[candid_method(update, rename = "swapNativeToToken")]
async fn swap_native_to_token(target_asset: Principal, amount: Nat, tolerance: u32) -> Result<SwapReceipt> {
    infrastructure::check_not_paused()?;
    let caller = ic_cdk::caller();
    engine_state::engine()?
        .swap_native_to_token(caller, target_asset, amount, tolerance)
        .await
}

// ===== READ-ONLY SURFACE =====

#[query(name = "getCurrentTrades")]
#[candid_method(query, rename = "getCurrentTrades")]
fn get_current_trades() -> Result<Vec<TradeId>> {
    Ok(engine_state::engine()?.current_trades(ic_cdk::caller()))
}

#[query]
#[candid_method(query)]
fn get_current_trade_details() -> Result<Vec<Trade>> {
    Ok(engine_state::engine()?.current_trade_details(ic_cdk::caller()))
}

#[query]
#[candid_method(query)]
fn get_trade(id: TradeId) -> Result<Trade> {
    engine_state::engine()?.trade(id)
}

#[query]
#[candid_method(query)]
fn get_registered_pairs() -> Result<Vec<Pair>> {
    Ok(engine_state::engine()?.registry().pairs())
}

#[query]
#[candid_method(query)]
fn get_engine_stats() -> Result<EngineStats> {
    Ok(engine_state::engine()?.stats())
}

/// Raw latest answer of a feed
///
/// Update call: reading the feed is an inter-canister call.
#[update(name = "getChainlinkDataFeedLatestAnswer")]
#[candid_method(update, rename = "getChainlinkDataFeedLatestAnswer")]
async fn get_chainlink_data_feed_latest_answer(feed: Principal) -> Result<Int> {
    engine_state::engine()?.latest_answer(feed).await
}

#[update]
#[candid_method(update)]
async fn get_feed_quote(feed: Principal) -> Result<_5_INFORMATIONAL::display::FeedQuote> {
    let engine = engine_state::engine()?;
    _5_INFORMATIONAL::display::get_feed_quote(engine.as_ref(), feed).await
}

#[update]
#[candid_method(update)]
async fn get_trade_views() -> Result<Vec<_5_INFORMATIONAL::display::TradeView>> {
    let engine = engine_state::engine()?;
    Ok(_5_INFORMATIONAL::display::get_trade_views(engine.as_ref(), ic_cdk::caller()).await)
}

#[query]
#[candid_method(query)]
fn get_keeper_status() -> keeper::KeeperStatus {
    keeper::get_keeper_status()
}

#[query]
#[candid_method(query)]
fn get_canister_id() -> Principal {
    ic_cdk::id()
}

// ===== INITIALIZATION =====

#[init]
fn init(args: InitArgs) {
    ic_cdk::println!("===================================");
    ic_cdk::println!("Limit Order Backend Initialized");
    ic_cdk::println!("Architecture: Numbered Security Zones");
    ic_cdk::println!("===================================");

    let config = match EngineConfig::from_init_args(args) {
        Ok(config) => config,
        Err(e) => ic_cdk::trap(&format!("Invalid init arguments: {}", e)),
    };

    install_engine(config, TradeStore::new());
}

#[pre_upgrade]
fn pre_upgrade() {
    ic_cdk::println!("===================================");
    ic_cdk::println!("Limit Order Backend Pre-Upgrade");
    ic_cdk::println!("===================================");

    let mut state = StableState {
        paused: infrastructure::is_paused(),
        admin_log: infrastructure::get_admin_log(),
        ..StableState::default()
    };

    if let Some((config, trades, next_trade_id)) = engine_state::snapshot() {
        state.config = Some(config);
        state.trades = trades;
        state.next_trade_id = next_trade_id;
    }

    infrastructure::stable_storage::save_state(state);
}

#[post_upgrade]
fn post_upgrade() {
    ic_cdk::println!("===================================");
    ic_cdk::println!("Limit Order Backend Post-Upgrade");
    ic_cdk::println!("===================================");

    let state = match infrastructure::stable_storage::restore_state() {
        Some(state) => state,
        None => ic_cdk::trap("No stable state to restore; refusing to drop open trades"),
    };

    let config = match state.config {
        Some(config) => config,
        None => ic_cdk::trap("Stable state carries no engine configuration"),
    };

    infrastructure::set_pause(state.paused);
    infrastructure::admin::import_admin_log(state.admin_log);

    let restored = state.trades.len();
    install_engine(config, TradeStore::from_parts(state.trades, state.next_trade_id));

    ic_cdk::println!("✅ Backend upgraded successfully ({} open trades restored)", restored);
}

fn install_engine(config: EngineConfig, store: TradeStore) {
    infrastructure::admin::set_admins(config.admins.clone());
    let keeper_interval = config.keeper_interval_seconds;

    if let Err(e) = engine_state::install(config, store) {
        ic_cdk::trap(&format!("Failed to install engine: {}", e));
    }

    if let Some(secs) = keeper_interval {
        keeper::start_keeper_timer(secs);
    }
}

// ===== ADMIN CONTROLS =====

/// Run one keeper sweep now (admin only)
#[update]
#[candid_method(update)]
async fn trigger_keeper_sweep() -> Result<SweepReport> {
    let caller = ic_cdk::caller();
    infrastructure::require_admin(caller)?;
    infrastructure::log_admin_action(caller, "KEEPER_SWEEP_TRIGGERED".to_string(), ic_cdk::api::time());
    keeper::trigger_sweep().await
}

/// Emergency pause - stops entry, execution, native swaps and the keeper
#[update]
#[candid_method(update)]
fn emergency_pause() -> Result<()> {
    let caller = ic_cdk::caller();
    infrastructure::require_admin(caller)?;
    infrastructure::set_pause(true);
    infrastructure::log_admin_action(caller, "EMERGENCY_PAUSE_ACTIVATED".to_string(), ic_cdk::api::time());
    ic_cdk::println!("🚨 EMERGENCY PAUSE ACTIVATED");
    Ok(())
}

/// Resume operations after emergency pause
#[update]
#[candid_method(update)]
fn emergency_unpause() -> Result<()> {
    let caller = ic_cdk::caller();
    infrastructure::require_admin(caller)?;
    infrastructure::set_pause(false);
    infrastructure::log_admin_action(caller, "EMERGENCY_PAUSE_DEACTIVATED".to_string(), ic_cdk::api::time());
    ic_cdk::println!("✅ EMERGENCY PAUSE DEACTIVATED");
    Ok(())
}

#[query]
#[candid_method(query)]
fn is_emergency_paused() -> bool {
    infrastructure::is_paused()
}

/// Get admin action log (admin only)
#[query]
#[candid_method(query)]
fn get_admin_action_log() -> Result<Vec<infrastructure::AdminAction>> {
    infrastructure::require_admin(ic_cdk::caller())?;
    Ok(infrastructure::get_admin_log())
}

#[query]
#[candid_method(query)]
fn get_admins() -> Vec<Principal> {
    infrastructure::admin::get_admins()
}

/// Resolved configuration (admin only)
#[query]
#[candid_method(query)]
fn get_engine_config() -> Result<EngineConfig> {
    infrastructure::require_admin(ic_cdk::caller())?;
    engine_state::config()
}

// ===== CANDID EXPORT =====

ic_cdk::export_candid!();
