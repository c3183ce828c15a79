//! # Keeper Module
//!
//! Optional periodic sweep that tries to execute every open trade, so
//! orders fire without an external caller. Execution stays permissionless;
//! the keeper is just one more caller, using the canister's own principal.
//!
//! ## Strategy
//! - **Interval timer**: enabled by `keeper_interval_seconds` in the init args
//! - **One sweep at a time**: a tick that finds a sweep running is skipped
//! - **Sequential trades**: trades are tried in id order, one swap at a time
//! - **Paused engine**: sweeps are refused while paused
//!
//! Trades whose condition does not hold are counted as waiting; trades
//! already being cancelled or executed by another message are skipped.

use std::cell::RefCell;
use candid::{CandidType, Deserialize, Principal};
use crate::infrastructure::{Result, EngineError, TradeError, SystemError, check_not_paused};
use crate::_3_PRICE_FEEDS::PriceOracle;
use crate::_4_TRADING_EXECUTION::{FundsLedger, SwapExecutor};
use crate::types::TradeId;
use super::OrderEngine;

// === TYPES ===

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct SweepFailure {
    pub id: TradeId,
    pub reason: String,
}

/// Result of one pass over the open trades
#[derive(CandidType, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub examined: u64,
    pub executed: Vec<TradeId>,
    pub waiting: u64,
    pub skipped_in_flight: u64,
    pub failed: Vec<SweepFailure>,
}

#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct KeeperStatus {
    pub timer_active: bool,
    pub interval_seconds: Option<u64>,
    pub sweep_in_progress: bool,
    pub last_sweep: Option<u64>,
    pub next_sweep: Option<u64>,
    pub last_report: Option<SweepReport>,
    pub total_executed: u64,
}

// === STATE ===

/// Not persisted: the timer is re-armed from config in post_upgrade and
/// sweep statistics start over.
#[derive(Default)]
struct KeeperState {
    interval_seconds: Option<u64>,
    last_sweep: Option<u64>,
    last_report: Option<SweepReport>,
    total_executed: u64,
}

thread_local! {
    static KEEPER_STATE: RefCell<KeeperState> = RefCell::new(KeeperState::default());
    static TIMER_ACTIVE: RefCell<bool> = RefCell::new(false);
    static SWEEP_IN_PROGRESS: RefCell<bool> = RefCell::new(false);
}

// === CORE LOGIC ===

impl<L: FundsLedger, O: PriceOracle, S: SwapExecutor> OrderEngine<L, O, S> {
    /// Try to execute every open trade once, in id order
    pub async fn sweep_open_trades(&self, keeper: Principal) -> SweepReport {
        let mut report = SweepReport::default();

        for id in self.open_trade_ids() {
            if self.locks.is_locked(id) {
                report.skipped_in_flight += 1;
                continue;
            }

            report.examined += 1;
            match self.execute_trade(keeper, id).await {
                Ok(execution) => report.executed.push(execution.id),
                Err(EngineError::Condition(_)) => report.waiting += 1,
                // Cancelled while an earlier trade was swapping
                Err(EngineError::Trade(TradeError::TradeCounterDoesNotExist { .. })) => {}
                Err(EngineError::System(SystemError::TradeOperationInProgress { .. })) => {
                    report.skipped_in_flight += 1;
                }
                Err(e) => {
                    ic_cdk::println!("⚠️ Keeper could not execute trade {}: {}", id, e);
                    report.failed.push(SweepFailure { id, reason: e.to_string() });
                }
            }
        }

        report
    }
}

// === PUBLIC API ===

/// Start the keeper timer
///
/// Called during init and post_upgrade when an interval is configured.
pub fn start_keeper_timer(interval_seconds: u64) {
    ic_cdk::println!("🕐 Starting keeper timer (every {}s)", interval_seconds);

    KEEPER_STATE.with(|state| state.borrow_mut().interval_seconds = Some(interval_seconds));
    TIMER_ACTIVE.with(|active| *active.borrow_mut() = true);

    ic_cdk_timers::set_timer_interval(std::time::Duration::from_secs(interval_seconds), || {
        if !try_begin_sweep() {
            ic_cdk::println!("⚠️ Keeper sweep already in progress, skipping this tick");
            return;
        }

        ic_cdk::spawn(async {
            let result = run_sweep().await;
            end_sweep();

            match result {
                Ok(report) => ic_cdk::println!(
                    "✅ Keeper sweep: {} examined, {} executed, {} waiting, {} failed",
                    report.examined,
                    report.executed.len(),
                    report.waiting,
                    report.failed.len()
                ),
                Err(e) => ic_cdk::println!("❌ Keeper sweep skipped: {}", e),
            }
        });
    });

    ic_cdk::println!("✅ Keeper timer active");
}

/// Manual sweep trigger (admin only)
pub async fn trigger_sweep() -> Result<SweepReport> {
    ic_cdk::println!("🔧 Manual keeper sweep triggered");

    if !try_begin_sweep() {
        return Err(EngineError::System(SystemError::SweepInProgress));
    }

    let result = run_sweep().await;
    end_sweep();
    result
}

pub fn get_keeper_status() -> KeeperStatus {
    let timer_active = TIMER_ACTIVE.with(|active| *active.borrow());
    let sweep_in_progress = SWEEP_IN_PROGRESS.with(|flag| *flag.borrow());

    KEEPER_STATE.with(|state| {
        let state = state.borrow();
        KeeperStatus {
            timer_active,
            interval_seconds: state.interval_seconds,
            sweep_in_progress,
            last_sweep: state.last_sweep,
            next_sweep: match (state.last_sweep, state.interval_seconds) {
                (Some(last), Some(secs)) if timer_active => Some(last + secs * 1_000_000_000),
                _ => None,
            },
            last_report: state.last_report.clone(),
            total_executed: state.total_executed,
        }
    })
}

// === HELPERS ===

async fn run_sweep() -> Result<SweepReport> {
    check_not_paused()?;
    let engine = super::engine_state::engine()?;

    let report = engine.sweep_open_trades(ic_cdk::id()).await;

    KEEPER_STATE.with(|state| {
        let mut state = state.borrow_mut();
        state.last_sweep = Some(ic_cdk::api::time());
        state.total_executed += report.executed.len() as u64;
        state.last_report = Some(report.clone());
    });

    Ok(report)
}

fn try_begin_sweep() -> bool {
    SWEEP_IN_PROGRESS.with(|flag| {
        let mut running = flag.borrow_mut();
        if *running {
            false
        } else {
            *running = true;
            true
        }
    })
}

fn end_sweep() {
    SWEEP_IN_PROGRESS.with(|flag| *flag.borrow_mut() = false);
}
