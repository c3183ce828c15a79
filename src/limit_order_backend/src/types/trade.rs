use candid::{CandidType, Deserialize, Int, Nat, Principal};

pub type TradeId = u64;

/// Exit/entry condition carried by a trade
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum TradeKind {
    Bracket { take_profit: Int, stop_loss: Int },
    Limit { trigger_price: Int },
}

impl TradeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeKind::Bracket { .. } => "bracket",
            TradeKind::Limit { .. } => "limit",
        }
    }
}

/// An open order with escrowed principal
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct Trade {
    pub id: TradeId,
    pub owner: Principal,
    pub feed: Principal,
    pub sell_asset: Principal,
    pub buy_asset: Principal,
    pub amount: Nat,            // escrowed quantity of sell_asset
    pub fee_reserve: Nat,       // ledger fees escrowed on top of amount
    pub reversed: bool,         // sell_asset is the feed's base asset
    pub kind: TradeKind,
    pub tolerance: u32,         // parts per million of the quoted output
    pub created_at: u64,
}

/// Everything but the identifier, as handed to the trade store
#[derive(Debug, Clone, PartialEq)]
pub struct TradeFields {
    pub feed: Principal,
    pub sell_asset: Principal,
    pub buy_asset: Principal,
    pub amount: Nat,
    pub fee_reserve: Nat,
    pub reversed: bool,
    pub kind: TradeKind,
    pub tolerance: u32,
    pub created_at: u64,
}

impl TradeFields {
    pub fn into_trade(self, id: TradeId, owner: Principal) -> Trade {
        Trade {
            id,
            owner,
            feed: self.feed,
            sell_asset: self.sell_asset,
            buy_asset: self.buy_asset,
            amount: self.amount,
            fee_reserve: self.fee_reserve,
            reversed: self.reversed,
            kind: self.kind,
            tolerance: self.tolerance,
            created_at: self.created_at,
        }
    }
}

#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct BracketOrderRequest {
    pub feed: Principal,
    pub sell_asset: Principal,
    pub buy_asset: Principal,
    pub amount: Nat,
    pub tolerance: u32,
    pub take_profit: Int,
    pub stop_loss: Int,
    pub reversed: bool,
}

#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct LimitOrderRequest {
    pub feed: Principal,
    pub sell_asset: Principal,
    pub buy_asset: Principal,
    pub amount: Nat,
    pub tolerance: u32,
    pub trigger_price: Int,
    pub reversed: bool,
}
