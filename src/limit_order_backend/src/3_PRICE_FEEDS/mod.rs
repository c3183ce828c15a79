//! # Price Feeds
//!
//! Read-only access to the latest signed fixed-point answer published by a
//! price-feed canister. The engine only ever reads; how prices are produced
//! is the feed's concern.
//!
//! A feed canister exposes:
//! ```text
//! latest_answer : () -> (int) query;
//! decimals      : () -> (nat8) query;
//! ```

use async_trait::async_trait;
use candid::{Int, Principal};
use crate::infrastructure::{Result, EngineError, OracleError};

#[async_trait(?Send)]
pub trait PriceOracle {
    /// Latest answer of `feed`, as published (no rescaling)
    async fn latest_answer(&self, feed: Principal) -> Result<Int>;

    /// Number of decimals in the feed's fixed-point answers
    async fn decimals(&self, feed: Principal) -> Result<u8>;
}

/// Oracle backed by inter-canister calls to feed canisters
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedCanisterOracle;

#[async_trait(?Send)]
impl PriceOracle for FeedCanisterOracle {
    async fn latest_answer(&self, feed: Principal) -> Result<Int> {
        let (answer,): (Int,) = ic_cdk::call(feed, "latest_answer", ())
            .await
            .map_err(|(code, msg)| {
                ic_cdk::println!("❌ Feed {} latest_answer failed: {:?} - {}", feed, code, msg);
                feed_unavailable(feed, format!("Inter-canister call failed: {} - {}", code as u32, msg))
            })?;

        ic_cdk::println!("📊 Feed {} latest answer: {}", feed, answer);
        Ok(answer)
    }

    async fn decimals(&self, feed: Principal) -> Result<u8> {
        let (decimals,): (u8,) = ic_cdk::call(feed, "decimals", ())
            .await
            .map_err(|(code, msg)| {
                feed_unavailable(feed, format!("Inter-canister call failed: {} - {}", code as u32, msg))
            })?;

        Ok(decimals)
    }
}

fn feed_unavailable(feed: Principal, reason: String) -> EngineError {
    EngineError::Oracle(OracleError::FeedUnavailable { feed, reason })
}
