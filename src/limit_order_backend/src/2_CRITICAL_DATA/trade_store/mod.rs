//! # Trade Store
//!
//! Arena-style mapping from trade id to trade record. Identifiers come from
//! a monotonic counter and are never reused; records only leave through
//! `remove`, after the caller has settled or refunded the escrow.
//!
//! "Trades owned by W" is derived from the records on demand, in id
//! (allocation) order.

use std::collections::BTreeMap;
use candid::{Nat, Principal};
use crate::infrastructure::{Result, EngineError, TradeError, FIRST_TRADE_ID};
use crate::types::{Trade, TradeFields, TradeId};

#[derive(Debug, Clone)]
pub struct TradeStore {
    next_id: TradeId,
    trades: BTreeMap<TradeId, Trade>,
}

impl Default for TradeStore {
    fn default() -> Self {
        Self {
            next_id: FIRST_TRADE_ID,
            trades: BTreeMap::new(),
        }
    }
}

impl TradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts
    ///
    /// The counter is raised past every restored id so it never moves
    /// backwards, even if the persisted counter is stale.
    pub fn from_parts(trades: Vec<Trade>, next_id: TradeId) -> Self {
        let trades: BTreeMap<TradeId, Trade> = trades.into_iter().map(|t| (t.id, t)).collect();
        let past_last = trades.keys().next_back().map(|id| id + 1).unwrap_or(FIRST_TRADE_ID);

        Self {
            next_id: next_id.max(past_last).max(FIRST_TRADE_ID),
            trades,
        }
    }

    pub fn export(&self) -> (Vec<Trade>, TradeId) {
        (self.trades.values().cloned().collect(), self.next_id)
    }

    /// Assign the next id and insert the record
    pub fn allocate(&mut self, owner: Principal, fields: TradeFields) -> TradeId {
        let id = self.next_id;
        self.next_id += 1;
        self.trades.insert(id, fields.into_trade(id, owner));
        id
    }

    pub fn get(&self, id: TradeId) -> Result<Trade> {
        self.trades
            .get(&id)
            .cloned()
            .ok_or(EngineError::Trade(TradeError::TradeCounterDoesNotExist { id }))
    }

    /// Delete the record; escrow must already be settled by the caller
    pub fn remove(&mut self, id: TradeId) -> Result<Trade> {
        self.trades
            .remove(&id)
            .ok_or(EngineError::Trade(TradeError::TradeCounterDoesNotExist { id }))
    }

    /// Account for ledger fees already paid out of a trade's escrow
    ///
    /// Fees beyond the reserve come out of the amount. Returns the updated
    /// record.
    pub fn spend_fees(&mut self, id: TradeId, spent: &Nat) -> Result<Trade> {
        let trade = self.trades
            .get_mut(&id)
            .ok_or(EngineError::Trade(TradeError::TradeCounterDoesNotExist { id }))?;

        if trade.fee_reserve >= *spent {
            trade.fee_reserve = Nat(&trade.fee_reserve.0 - &spent.0);
        } else {
            let overflow = Nat(&spent.0 - &trade.fee_reserve.0);
            trade.fee_reserve = Nat::from(0u64);
            trade.amount = if trade.amount > overflow {
                Nat(&trade.amount.0 - &overflow.0)
            } else {
                Nat::from(0u64)
            };
        }
        Ok(trade.clone())
    }

    pub fn assert_owner(&self, id: TradeId, caller: Principal) -> Result<()> {
        let trade = self.trades
            .get(&id)
            .ok_or(EngineError::Trade(TradeError::TradeCounterDoesNotExist { id }))?;

        if trade.owner != caller {
            return Err(EngineError::Trade(TradeError::WalletDoesNotControlThisTrade { id, caller }));
        }
        Ok(())
    }

    pub fn list_by_owner(&self, owner: Principal) -> Vec<Trade> {
        self.trades
            .values()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect()
    }

    pub fn ids_by_owner(&self, owner: Principal) -> Vec<TradeId> {
        self.trades
            .values()
            .filter(|t| t.owner == owner)
            .map(|t| t.id)
            .collect()
    }

    /// All open ids in allocation order
    pub fn open_ids(&self) -> Vec<TradeId> {
        self.trades.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn next_id(&self) -> TradeId {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candid::Int;
    use crate::types::TradeKind;

    fn principal(byte: u8) -> Principal {
        Principal::from_slice(&[byte; 10])
    }

    fn fields(amount: u64) -> TradeFields {
        TradeFields {
            feed: principal(1),
            sell_asset: principal(20),
            buy_asset: principal(10),
            amount: Nat::from(amount),
            fee_reserve: Nat::from(20u64),
            reversed: false,
            kind: TradeKind::Limit { trigger_price: Int::from(100) },
            tolerance: 10_000,
            created_at: 0,
        }
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut store = TradeStore::new();
        let a = store.allocate(principal(100), fields(1));
        let b = store.allocate(principal(100), fields(2));
        assert_eq!(a, FIRST_TRADE_ID);
        assert_eq!(b, a + 1);

        store.remove(b).unwrap();
        let c = store.allocate(principal(100), fields(3));
        assert_eq!(c, b + 1);
    }

    #[test]
    fn test_get_and_remove_unknown_id() {
        let mut store = TradeStore::new();
        assert_eq!(
            store.get(42),
            Err(EngineError::Trade(TradeError::TradeCounterDoesNotExist { id: 42 }))
        );
        assert!(store.remove(42).is_err());
    }

    #[test]
    fn test_assert_owner() {
        let mut store = TradeStore::new();
        let id = store.allocate(principal(100), fields(1));

        assert!(store.assert_owner(id, principal(100)).is_ok());
        assert_eq!(
            store.assert_owner(id, principal(101)),
            Err(EngineError::Trade(TradeError::WalletDoesNotControlThisTrade { id, caller: principal(101) }))
        );
        assert_eq!(
            store.assert_owner(id + 1, principal(100)),
            Err(EngineError::Trade(TradeError::TradeCounterDoesNotExist { id: id + 1 }))
        );
    }

    #[test]
    fn test_list_by_owner_in_insertion_order() {
        let mut store = TradeStore::new();
        let a1 = store.allocate(principal(100), fields(1));
        let _b1 = store.allocate(principal(101), fields(2));
        let a2 = store.allocate(principal(100), fields(3));

        assert_eq!(store.ids_by_owner(principal(100)), vec![a1, a2]);
        let trades = store.list_by_owner(principal(100));
        assert_eq!(trades[1].amount, Nat::from(3u64));
        assert!(store.list_by_owner(principal(102)).is_empty());
    }

    #[test]
    fn test_spend_fees_draws_reserve_before_amount() {
        let mut store = TradeStore::new();
        let id = store.allocate(principal(100), fields(500));

        let trade = store.spend_fees(id, &Nat::from(10u64)).unwrap();
        assert_eq!(trade.fee_reserve, Nat::from(10u64));
        assert_eq!(trade.amount, Nat::from(500u64));

        let trade = store.spend_fees(id, &Nat::from(15u64)).unwrap();
        assert_eq!(trade.fee_reserve, Nat::from(0u64));
        assert_eq!(trade.amount, Nat::from(495u64));
        assert_eq!(store.get(id).unwrap(), trade);

        assert!(store.spend_fees(id + 1, &Nat::from(1u64)).is_err());
    }

    #[test]
    fn test_from_parts_never_moves_counter_backwards() {
        let mut store = TradeStore::new();
        store.allocate(principal(100), fields(1));
        let last = store.allocate(principal(100), fields(2));
        let (trades, _) = store.export();

        // Stale counter from an older snapshot
        let restored = TradeStore::from_parts(trades, 1);
        assert_eq!(restored.next_id(), last + 1);
        assert_eq!(restored.len(), 2);
    }
}
