//! Install-time configuration
//!
//! The approved pair set is loaded once from the init arguments, either
//! inline or as a PairsAndFeeds JSON document, and is immutable afterwards.

use candid::{CandidType, Deserialize, Principal};
use crate::infrastructure::{Result, EngineError, ConfigError};
use crate::infrastructure::constants::{KONGSWAP_BACKEND_ID, ICP_LEDGER_ID, MIN_KEEPER_INTERVAL_SECONDS};
use crate::types::{Pair, PairConfig};

#[derive(CandidType, Deserialize, Debug, Clone)]
pub enum PairSource {
    Inline(Vec<PairConfig>),
    Json(String),
}

#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct InitArgs {
    pub pairs: PairSource,
    pub swap_router: Option<Principal>,
    pub native_asset: Option<Principal>,
    pub admins: Vec<Principal>,
    pub keeper_interval_seconds: Option<u64>,
}

/// Resolved configuration, persisted across upgrades
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub pairs: Vec<Pair>,
    pub swap_router: Principal,
    pub native_asset: Principal,
    pub admins: Vec<Principal>,
    pub keeper_interval_seconds: Option<u64>,
}

impl EngineConfig {
    pub fn from_init_args(args: InitArgs) -> Result<Self> {
        let pair_configs = match args.pairs {
            PairSource::Inline(pairs) => pairs,
            PairSource::Json(document) => parse_pairs_document(&document)?,
        };

        let pairs = pair_configs
            .iter()
            .map(resolve_pair)
            .collect::<Result<Vec<Pair>>>()?;

        let swap_router = match args.swap_router {
            Some(router) => router,
            None => parse_principal("swap_router", KONGSWAP_BACKEND_ID)?,
        };

        let native_asset = match args.native_asset {
            Some(asset) => asset,
            None => parse_principal("native_asset", ICP_LEDGER_ID)?,
        };

        let keeper_interval_seconds = args.keeper_interval_seconds.map(|secs| {
            if secs < MIN_KEEPER_INTERVAL_SECONDS {
                ic_cdk::println!(
                    "⚠️ Keeper interval {}s below minimum, using {}s",
                    secs,
                    MIN_KEEPER_INTERVAL_SECONDS
                );
                MIN_KEEPER_INTERVAL_SECONDS
            } else {
                secs
            }
        });

        Ok(EngineConfig {
            pairs,
            swap_router,
            native_asset,
            admins: args.admins,
            keeper_interval_seconds,
        })
    }
}

/// Parse a PairsAndFeeds JSON document
pub fn parse_pairs_document(document: &str) -> Result<Vec<PairConfig>> {
    serde_json::from_str::<Vec<PairConfig>>(document).map_err(|e| {
        EngineError::Config(ConfigError::InvalidPairsDocument {
            reason: e.to_string(),
        })
    })
}

fn resolve_pair(config: &PairConfig) -> Result<Pair> {
    Ok(Pair {
        symbol: config.symbol.clone(),
        feed: parse_principal("feed", &config.feed)?,
        base: parse_principal("asset1", &config.asset1)?,
        quote: parse_principal("asset2", &config.asset2)?,
    })
}

fn parse_principal(field: &str, value: &str) -> Result<Principal> {
    Principal::from_text(value).map_err(|_| {
        EngineError::Config(ConfigError::InvalidPrincipal {
            field: field.to_string(),
            value: value.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BTC_USD_FEED: &str = "bkyz2-fmaaa-aaaaa-qaaaq-cai";
    const BTC_LEDGER: &str = "mxzaz-hqaaa-aaaar-qaada-cai";
    const USDC_LEDGER: &str = "xevnm-gaaaa-aaaar-qafnq-cai";

    fn args(pairs: PairSource) -> InitArgs {
        InitArgs {
            pairs,
            swap_router: None,
            native_asset: None,
            admins: vec![],
            keeper_interval_seconds: Some(1),
        }
    }

    #[test]
    fn test_json_pairs_document() {
        let document = format!(
            r#"[{{"symbol": "BTC/USD", "feed": "{}", "asset1": "{}", "asset2": "{}"}}]"#,
            BTC_USD_FEED, BTC_LEDGER, USDC_LEDGER
        );
        let config = EngineConfig::from_init_args(args(PairSource::Json(document))).unwrap();

        assert_eq!(config.pairs.len(), 1);
        assert_eq!(config.pairs[0].symbol, "BTC/USD");
        assert_eq!(config.pairs[0].base, Principal::from_text(BTC_LEDGER).unwrap());
        assert_eq!(config.pairs[0].quote, Principal::from_text(USDC_LEDGER).unwrap());
        assert_eq!(config.swap_router, Principal::from_text(KONGSWAP_BACKEND_ID).unwrap());
        assert_eq!(config.keeper_interval_seconds, Some(MIN_KEEPER_INTERVAL_SECONDS));
    }

    #[test]
    fn test_malformed_document_rejected() {
        let result = EngineConfig::from_init_args(args(PairSource::Json("{not json".to_string())));
        assert!(matches!(result, Err(EngineError::Config(ConfigError::InvalidPairsDocument { .. }))));
    }

    #[test]
    fn test_invalid_principal_rejected() {
        let pairs = vec![PairConfig {
            symbol: "BTC/USD".to_string(),
            feed: "not-a-principal".to_string(),
            asset1: BTC_LEDGER.to_string(),
            asset2: USDC_LEDGER.to_string(),
        }];
        let result = EngineConfig::from_init_args(args(PairSource::Inline(pairs)));
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::InvalidPrincipal { ref field, .. })) if field == "feed"
        ));
    }
}
