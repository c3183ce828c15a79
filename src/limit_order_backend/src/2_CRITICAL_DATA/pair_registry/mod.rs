//! # Pair Registry
//!
//! Immutable set of approved (feed, base, quote) triples, fixed at install
//! time. Validates that a requested feed/asset combination is offered and
//! reports the orientation of the request relative to the feed.
//!
//! ## Orientation
//! A feed quotes `base` priced in `quote`.
//! - sell `quote`, buy `base` → not reversed
//! - sell `base`, buy `quote` → reversed

use std::collections::BTreeMap;
use candid::Principal;
use crate::infrastructure::{Result, EngineError, PairError, ConfigError};
use crate::types::Pair;

#[derive(Debug, Clone, Default)]
pub struct PairRegistry {
    pairs: BTreeMap<Principal, Pair>,
}

impl PairRegistry {
    /// Build the registry, rejecting configurations that would make
    /// validation ambiguous
    pub fn new(pairs: Vec<Pair>) -> Result<Self> {
        let mut registry = BTreeMap::new();

        for pair in pairs {
            if pair.base == pair.quote {
                return Err(EngineError::Config(ConfigError::IdenticalAssets {
                    feed: pair.feed,
                    asset: pair.base,
                }));
            }
            let feed = pair.feed;
            if registry.insert(feed, pair).is_some() {
                return Err(EngineError::Config(ConfigError::DuplicateFeed { feed }));
            }
        }

        ic_cdk::println!("📋 Pair registry loaded with {} feeds", registry.len());
        Ok(PairRegistry { pairs: registry })
    }

    /// Validate a trade's feed and assets
    ///
    /// Returns `reversed`: whether the sell asset is the feed's base asset.
    pub fn validate(&self, feed: Principal, sell_asset: Principal, buy_asset: Principal) -> Result<bool> {
        let pair = self.pairs.get(&feed).ok_or(EngineError::Pair(
            PairError::TradingPairCurrentlyNotOffered { feed },
        ))?;

        if sell_asset == pair.quote && buy_asset == pair.base {
            Ok(false)
        } else if sell_asset == pair.base && buy_asset == pair.quote {
            Ok(true)
        } else {
            Err(EngineError::Pair(PairError::ContractCallProvidedWrongTokenPairOrPriceFeed {
                feed,
                sell_asset,
                buy_asset,
            }))
        }
    }

    pub fn pairs(&self) -> Vec<Pair> {
        self.pairs.values().cloned().collect()
    }

    pub fn symbol(&self, feed: Principal) -> Option<&str> {
        self.pairs.get(&feed).map(|pair| pair.symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
