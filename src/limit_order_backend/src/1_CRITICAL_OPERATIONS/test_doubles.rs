//! In-memory ledger, oracle and router for engine tests
//!
//! The ledger keeps balances and engine allowances per (asset, account) and
//! charges a per-asset fee (zero unless set) the way ICRC ledgers do: the
//! payer of a transfer or approval pays it on top. The router trades
//! against that same ledger: it pulls the pay amount out of escrow with the
//! engine's approval and mints the output to the recipient.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use async_trait::async_trait;
use candid::{Int, Nat, Principal};
use crate::infrastructure::{Result, EngineError, TransferError, SwapError, OracleError};
use crate::_2_CRITICAL_DATA::{PairRegistry, TradeStore};
use crate::_3_PRICE_FEEDS::PriceOracle;
use crate::_4_TRADING_EXECUTION::{FundsLedger, SwapExecutor};
use crate::types::{Pair, SwapReceipt, SwapRequest};
use super::OrderEngine;

pub fn principal(byte: u8) -> Principal {
    Principal::from_slice(&[byte; 10])
}

pub fn nat(value: u64) -> Nat {
    Nat::from(value)
}

pub fn engine_account() -> Principal {
    principal(200)
}

pub fn router_account() -> Principal {
    principal(201)
}

// === LEDGER ===

#[derive(Default)]
struct LedgerBook {
    balances: HashMap<(Principal, Principal), Nat>,
    allowances: HashMap<(Principal, Principal), Nat>,
    router_allowances: HashMap<Principal, Nat>,
    fees: HashMap<Principal, Nat>,
    fail_releases: bool,
    block_index: u64,
}

impl LedgerBook {
    fn balance(&self, asset: Principal, account: Principal) -> Nat {
        self.balances.get(&(asset, account)).cloned().unwrap_or_else(|| nat(0))
    }

    fn credit(&mut self, asset: Principal, account: Principal, amount: &Nat) {
        let balance = self.balance(asset, account);
        self.balances.insert((asset, account), balance + amount.clone());
    }

    fn debit(&mut self, asset: Principal, account: Principal, amount: &Nat) -> Result<()> {
        let balance = self.balance(asset, account);
        if balance < *amount {
            return Err(EngineError::Transfer(TransferError::InsufficientFunds {
                asset,
                required: amount.clone(),
                balance,
            }));
        }
        self.balances.insert((asset, account), balance - amount.clone());
        Ok(())
    }

    fn fee(&self, asset: Principal) -> Nat {
        self.fees.get(&asset).cloned().unwrap_or_else(|| nat(0))
    }

    fn next_block(&mut self) -> Nat {
        self.block_index += 1;
        nat(self.block_index)
    }
}

#[derive(Clone, Default)]
pub struct MockLedger {
    book: Rc<RefCell<LedgerBook>>,
}

impl MockLedger {
    pub fn mint(&self, asset: Principal, account: Principal, amount: u64) {
        self.book.borrow_mut().credit(asset, account, &nat(amount));
    }

    /// Allowance granted by `owner` to the engine
    pub fn approve(&self, asset: Principal, owner: Principal, amount: u64) {
        self.book.borrow_mut().allowances.insert((asset, owner), nat(amount));
    }

    pub fn allowance(&self, asset: Principal, owner: Principal) -> Nat {
        self.book.borrow().allowances.get(&(asset, owner)).cloned().unwrap_or_else(|| nat(0))
    }

    pub fn balance(&self, asset: Principal, account: Principal) -> Nat {
        self.book.borrow().balance(asset, account)
    }

    pub fn set_fail_releases(&self, fail: bool) {
        self.book.borrow_mut().fail_releases = fail;
    }

    pub fn set_fee(&self, asset: Principal, fee: u64) {
        self.book.borrow_mut().fees.insert(asset, nat(fee));
    }

    /// `amount` reaches `to`; `from` also pays the fee, which is burnt
    fn move_funds(&self, asset: Principal, from: Principal, to: Principal, amount: &Nat) -> Result<()> {
        let mut book = self.book.borrow_mut();
        let fee = book.fee(asset);
        book.debit(asset, from, &(amount.clone() + fee))?;
        book.credit(asset, to, amount);
        Ok(())
    }

    /// Router's `transfer_from` against the engine's approval
    fn router_pull(&self, asset: Principal, amount: &Nat) -> Result<()> {
        let required = amount.clone() + self.book.borrow().fee(asset);
        let allowance = self.book.borrow().router_allowances.get(&asset).cloned().unwrap_or_else(|| nat(0));
        if allowance < required {
            return Err(EngineError::Transfer(TransferError::InsufficientAllowance {
                asset,
                required,
                allowance,
            }));
        }

        self.move_funds(asset, engine_account(), router_account(), amount)?;
        self.book.borrow_mut().router_allowances.insert(asset, allowance - required);
        Ok(())
    }
}

#[async_trait(?Send)]
impl FundsLedger for MockLedger {
    async fn transfer_fee(&self, asset: Principal) -> Result<Nat> {
        Ok(self.book.borrow().fee(asset))
    }

    async fn pull_funds(&self, asset: Principal, from: Principal, amount: Nat) -> Result<Nat> {
        let required = amount.clone() + self.book.borrow().fee(asset);
        let allowance = self.allowance(asset, from);
        if allowance < required {
            return Err(EngineError::Transfer(TransferError::InsufficientAllowance {
                asset,
                required,
                allowance,
            }));
        }

        self.move_funds(asset, from, engine_account(), &amount)?;

        let mut book = self.book.borrow_mut();
        book.allowances.insert((asset, from), allowance - required);
        Ok(book.next_block())
    }

    async fn release_funds(&self, asset: Principal, to: Principal, amount: Nat) -> Result<Nat> {
        if self.book.borrow().fail_releases {
            return Err(EngineError::Transfer(TransferError::TransferFailed {
                asset,
                amount,
                reason: "ledger unavailable".to_string(),
            }));
        }

        self.move_funds(asset, engine_account(), to, &amount)?;
        Ok(self.book.borrow_mut().next_block())
    }

    async fn approve_spender(&self, asset: Principal, spender: Principal, amount: Nat) -> Result<Nat> {
        assert_eq!(spender, router_account());

        let mut book = self.book.borrow_mut();
        let fee = book.fee(asset);
        book.debit(asset, engine_account(), &fee)?;
        book.router_allowances.insert(asset, amount);
        Ok(book.next_block())
    }
}

// === ORACLE ===

#[derive(Clone, Default)]
pub struct MockOracle {
    prices: Rc<RefCell<HashMap<Principal, Int>>>,
}

impl MockOracle {
    pub fn set_price(&self, feed: Principal, price: i64) {
        self.prices.borrow_mut().insert(feed, Int::from(price));
    }

    pub fn clear_price(&self, feed: Principal) {
        self.prices.borrow_mut().remove(&feed);
    }
}

#[async_trait(?Send)]
impl PriceOracle for MockOracle {
    async fn latest_answer(&self, feed: Principal) -> Result<Int> {
        self.prices.borrow().get(&feed).cloned().ok_or(EngineError::Oracle(OracleError::FeedUnavailable {
            feed,
            reason: "no answer published".to_string(),
        }))
    }

    async fn decimals(&self, feed: Principal) -> Result<u8> {
        if self.prices.borrow().contains_key(&feed) {
            Ok(8)
        } else {
            Err(EngineError::Oracle(OracleError::FeedUnavailable {
                feed,
                reason: "no answer published".to_string(),
            }))
        }
    }
}

// === ROUTER ===

struct RouterState {
    rates: HashMap<(Principal, Principal), (u64, u64)>,
    fill_ppm: u64,
    fail_swaps: bool,
    yield_during_swap: bool,
    executed: Vec<SwapRequest>,
}

/// Router quoting fixed rates; delivers `fill_ppm` of the quote
#[derive(Clone)]
pub struct MockRouter {
    ledger: MockLedger,
    state: Rc<RefCell<RouterState>>,
}

impl MockRouter {
    pub fn new(ledger: MockLedger) -> Self {
        Self {
            ledger,
            state: Rc::new(RefCell::new(RouterState {
                rates: HashMap::new(),
                fill_ppm: 1_000_000,
                fail_swaps: false,
                yield_during_swap: false,
                executed: Vec::new(),
            })),
        }
    }

    /// `pay` → `receive` at `numerator / denominator`
    pub fn set_rate(&self, pay: Principal, receive: Principal, numerator: u64, denominator: u64) {
        self.state.borrow_mut().rates.insert((pay, receive), (numerator, denominator));
    }

    pub fn set_fill_ppm(&self, fill_ppm: u64) {
        self.state.borrow_mut().fill_ppm = fill_ppm;
    }

    pub fn set_fail_swaps(&self, fail: bool) {
        self.state.borrow_mut().fail_swaps = fail;
    }

    /// Suspend once inside `swap` so another message can interleave
    pub fn set_yield_during_swap(&self, yield_once: bool) {
        self.state.borrow_mut().yield_during_swap = yield_once;
    }

    pub fn executed(&self) -> Vec<SwapRequest> {
        self.state.borrow().executed.clone()
    }
}

#[async_trait(?Send)]
impl SwapExecutor for MockRouter {
    fn spender(&self) -> Principal {
        router_account()
    }

    async fn quote(&self, pay_asset: Principal, pay_amount: Nat, receive_asset: Principal) -> Result<Nat> {
        let rate = self.state.borrow().rates.get(&(pay_asset, receive_asset)).copied();
        match rate {
            Some((numerator, denominator)) => Ok(pay_amount * nat(numerator) / nat(denominator)),
            None => Err(EngineError::Swap(SwapError::QuoteFailed {
                pay_asset,
                receive_asset,
                reason: "no pool".to_string(),
            })),
        }
    }

    async fn swap(&self, request: SwapRequest) -> Result<SwapReceipt> {
        let yield_once = self.state.borrow().yield_during_swap;
        if yield_once {
            YieldNow(false).await;
        }

        let (fail, fill_ppm) = {
            let state = self.state.borrow();
            (state.fail_swaps, state.fill_ppm)
        };

        if fail {
            return Err(EngineError::Swap(SwapError::SwapFailed {
                pay_asset: request.pay_asset,
                receive_asset: request.receive_asset,
                amount: request.pay_amount.clone(),
                reason: "pool paused".to_string(),
            }));
        }

        let available = request.expected_receive.clone() * nat(fill_ppm) / nat(1_000_000);
        if available < request.min_receive {
            return Err(EngineError::Swap(SwapError::MinimumNotMet {
                expected: request.expected_receive.clone(),
                min_receive: request.min_receive.clone(),
                available,
            }));
        }

        self.ledger.router_pull(request.pay_asset, &request.pay_amount)?;
        self.ledger.mint_nat(request.receive_asset, request.recipient, &available);
        self.state.borrow_mut().executed.push(request.clone());

        Ok(SwapReceipt {
            receive_amount: available,
            recipient: request.recipient,
        })
    }
}

impl MockLedger {
    fn mint_nat(&self, asset: Principal, account: Principal, amount: &Nat) {
        self.book.borrow_mut().credit(asset, account, amount);
    }
}

/// Pending exactly once, then ready
struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

// === HARNESS ===

pub fn btc_feed() -> Principal { principal(1) }
pub fn matic_feed() -> Principal { principal(2) }
pub fn btc() -> Principal { principal(10) }
pub fn usdc() -> Principal { principal(20) }
pub fn matic() -> Principal { principal(30) }
pub fn icp() -> Principal { principal(40) }
pub fn alice() -> Principal { principal(100) }
pub fn bob() -> Principal { principal(101) }

pub type TestEngine = OrderEngine<MockLedger, MockOracle, MockRouter>;

pub struct Harness {
    pub engine: TestEngine,
    pub ledger: MockLedger,
    pub oracle: MockOracle,
    pub router: MockRouter,
}

impl Harness {
    /// BTC/USD and MATIC/USD feeds, both quoted in USDC
    pub fn new() -> Self {
        Self::with_store(TradeStore::new())
    }

    pub fn with_store(store: TradeStore) -> Self {
        let registry = PairRegistry::new(vec![
            Pair { symbol: "BTC/USD".to_string(), feed: btc_feed(), base: btc(), quote: usdc() },
            Pair { symbol: "MATIC/USD".to_string(), feed: matic_feed(), base: matic(), quote: usdc() },
        ])
        .unwrap();

        let ledger = MockLedger::default();
        let oracle = MockOracle::default();
        let router = MockRouter::new(ledger.clone());

        router.set_rate(usdc(), btc(), 1, 30_000);
        router.set_rate(btc(), usdc(), 30_000, 1);
        router.set_rate(usdc(), matic(), 2, 1);
        router.set_rate(matic(), usdc(), 1, 2);
        router.set_rate(icp(), usdc(), 10, 1);

        let engine = OrderEngine::new(
            registry,
            store,
            icp(),
            ledger.clone(),
            oracle.clone(),
            router.clone(),
        );

        Self { engine, ledger, oracle, router }
    }

    /// Mint `amount` to `owner` and approve the engine for all of it
    pub fn fund(&self, asset: Principal, owner: Principal, amount: u64) {
        self.ledger.mint(asset, owner, amount);
        self.ledger.approve(asset, owner, amount);
    }
}
