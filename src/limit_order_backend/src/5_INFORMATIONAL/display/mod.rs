//! Display module - Feed quotes and trade views for UI
//!
//! Feed answers are raw signed fixed-point integers; this module renders
//! them as decimals using the feed's own `decimals`.

use candid::{CandidType, Deserialize, Int, Principal};
use crate::infrastructure::Result;
use crate::infrastructure::math::fixed_point_to_decimal;
use crate::_1_CRITICAL_OPERATIONS::OrderEngine;
use crate::_3_PRICE_FEEDS::PriceOracle;
use crate::_4_TRADING_EXECUTION::{FundsLedger, SwapExecutor};
use crate::types::{Trade, TradeKind};

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct FeedQuote {
    pub feed: Principal,
    pub answer: Int,
    pub decimals: u8,
    pub price: String,
}

/// Trade with its pair label and thresholds rendered against the feed's
/// decimals
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct TradeView {
    pub trade: Trade,
    pub symbol: Option<String>,
    pub triggers: Vec<(String, String)>,
}

/// Latest answer of `feed` alongside its decimal rendering
pub async fn get_feed_quote<L, O, S>(engine: &OrderEngine<L, O, S>, feed: Principal) -> Result<FeedQuote>
where
    L: FundsLedger,
    O: PriceOracle,
    S: SwapExecutor,
{
    let (answer, decimals) = futures::join!(engine.latest_answer(feed), engine.feed_decimals(feed));
    let answer = answer?;
    let decimals = decimals?;

    let price = fixed_point_to_decimal(&answer, decimals)?;

    Ok(FeedQuote {
        feed,
        answer,
        decimals,
        price: price.to_string(),
    })
}

/// Caller's open trades with human-readable thresholds
///
/// Trades on a feed whose decimals cannot be read are shown with raw
/// threshold values.
pub async fn get_trade_views<L, O, S>(engine: &OrderEngine<L, O, S>, owner: Principal) -> Vec<TradeView>
where
    L: FundsLedger,
    O: PriceOracle,
    S: SwapExecutor,
{
    let mut views = Vec::new();

    for trade in engine.current_trade_details(owner) {
        let decimals = engine.feed_decimals(trade.feed).await.ok();

        let thresholds: Vec<(&str, &Int)> = match &trade.kind {
            TradeKind::Bracket { take_profit, stop_loss } => {
                vec![("take_profit", take_profit), ("stop_loss", stop_loss)]
            }
            TradeKind::Limit { trigger_price } => vec![("trigger_price", trigger_price)],
        };

        let triggers = thresholds
            .into_iter()
            .map(|(name, value)| (name.to_string(), render(value, decimals)))
            .collect();

        let symbol = engine.registry().symbol(trade.feed).map(str::to_string);
        views.push(TradeView { trade, symbol, triggers });
    }

    views
}

fn render(value: &Int, decimals: Option<u8>) -> String {
    match decimals.map(|d| fixed_point_to_decimal(value, d)) {
        Some(Ok(price)) => price.to_string(),
        _ => value.0.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use futures::executor::block_on;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use crate::_1_CRITICAL_OPERATIONS::test_doubles::*;
    use crate::types::BracketOrderRequest;

    #[test]
    fn test_feed_quote_renders_decimals() {
        let h = Harness::new();
        h.oracle.set_price(btc_feed(), 6_386_775_261_845);

        let quote = block_on(get_feed_quote(&h.engine, btc_feed())).unwrap();

        assert_eq!(quote.decimals, 8);
        assert_eq!(quote.answer, Int::from(6_386_775_261_845i64));
        assert_eq!(Decimal::from_str(&quote.price).unwrap(), dec!(63867.75261845));
    }

    #[test]
    fn test_feed_quote_unavailable() {
        let h = Harness::new();
        assert!(block_on(get_feed_quote(&h.engine, btc_feed())).is_err());
    }

    #[test]
    fn test_trade_views_render_thresholds() {
        let h = Harness::new();
        h.fund(usdc(), alice(), 100);
        let request = BracketOrderRequest {
            feed: btc_feed(),
            sell_asset: usdc(),
            buy_asset: btc(),
            amount: nat(100),
            tolerance: 10_000,
            take_profit: Int::from(4_000_000_000_000i64),
            stop_loss: Int::from(2_000_000_000_000i64),
            reversed: false,
        };
        block_on(h.engine.enter_new_trade(alice(), request, 0)).unwrap();

        // Decimals unknown: raw values
        let views = block_on(get_trade_views(&h.engine, alice()));
        assert_eq!(views[0].triggers[0], ("take_profit".to_string(), "4000000000000".to_string()));

        h.oracle.set_price(btc_feed(), 3_000_000_000_000);
        let views = block_on(get_trade_views(&h.engine, alice()));
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].symbol.as_deref(), Some("BTC/USD"));
        assert_eq!(Decimal::from_str(&views[0].triggers[0].1).unwrap(), dec!(40000));
        assert_eq!(Decimal::from_str(&views[0].triggers[1].1).unwrap(), dec!(20000));
    }
}
