//! Admin Controls Module
//!
//! Provides emergency pause and admin logging for the order engine canister.
//!
//! Admin principals come from the init arguments and are persisted across
//! upgrades. Pause blocks entry, execution and native swaps; cancellation
//! stays open so owners can always recover escrowed funds.

use candid::{CandidType, Deserialize, Principal};
use std::cell::RefCell;
use crate::infrastructure::{EngineError, Result, SystemError, MAX_ADMIN_LOG_ENTRIES};

/// Admin action log entry
#[derive(Clone, Debug, CandidType, Deserialize, serde::Serialize)]
pub struct AdminAction {
    pub timestamp: u64,
    pub admin: Principal,
    pub action: String,
}

thread_local! {
    static ADMINS: RefCell<Vec<Principal>> = RefCell::new(Vec::new());
    static EMERGENCY_PAUSE: RefCell<bool> = RefCell::new(false);
    static ADMIN_LOG: RefCell<Vec<AdminAction>> = RefCell::new(Vec::new());
}

/// Replace the admin set (init / post_upgrade only)
pub fn set_admins(admins: Vec<Principal>) {
    ADMINS.with(|a| *a.borrow_mut() = admins);
}

pub fn get_admins() -> Vec<Principal> {
    ADMINS.with(|a| a.borrow().clone())
}

/// Require caller is an admin principal
pub fn require_admin(caller: Principal) -> Result<()> {
    let is_admin = ADMINS.with(|a| a.borrow().contains(&caller));

    if is_admin {
        Ok(())
    } else {
        Err(EngineError::System(SystemError::Unauthorized { caller }))
    }
}

/// Log an admin action
pub fn log_admin_action(admin: Principal, action: String, timestamp: u64) {
    ADMIN_LOG.with(|log| {
        let mut log = log.borrow_mut();

        log.push(AdminAction {
            timestamp,
            admin,
            action: action.clone(),
        });

        let len = log.len();
        if len > MAX_ADMIN_LOG_ENTRIES {
            log.drain(0..(len - MAX_ADMIN_LOG_ENTRIES));
        }
    });

    ic_cdk::println!("📝 Admin action: {} by {}", action, admin);
}

/// Check if system is paused
pub fn check_not_paused() -> Result<()> {
    if is_paused() {
        Err(EngineError::System(SystemError::Paused))
    } else {
        Ok(())
    }
}

pub fn set_pause(paused: bool) {
    EMERGENCY_PAUSE.with(|p| *p.borrow_mut() = paused);
}

pub fn is_paused() -> bool {
    EMERGENCY_PAUSE.with(|p| *p.borrow())
}

pub fn get_admin_log() -> Vec<AdminAction> {
    ADMIN_LOG.with(|log| log.borrow().clone())
}

/// Restore log after upgrade
pub fn import_admin_log(entries: Vec<AdminAction>) {
    ADMIN_LOG.with(|log| *log.borrow_mut() = entries);
}
