//! Trigger conditions
//!
//! Thresholds are fixed-point prices at the feed's decimals, boundaries
//! inclusive. A feed quotes `base` in `quote`; a reversed trade sells
//! `base`, so its thresholds are stated as the price of `quote` in `base`
//! and the feed answer is inverted before comparing:
//! `p = 10^(2 × decimals) / answer`. The comparisons are then the same for
//! both orientations.
//!
//! ```text
//! Bracket   p >= tp  or  p <= sl
//! Limit     p <= trigger
//! ```

use candid::Int;
use crate::infrastructure::{Result, EngineError, ConditionError};
use crate::infrastructure::math::invert_fixed_point;
use crate::types::{TradeId, TradeKind};

/// Price in the units of the trade's thresholds
pub fn oriented_price(answer: &Int, reversed: bool, decimals: u8) -> Result<Int> {
    if reversed {
        invert_fixed_point(answer, decimals)
    } else {
        Ok(answer.clone())
    }
}

/// Whether `kind` is satisfied at the oriented price `price`
pub fn is_triggered(kind: &TradeKind, price: &Int) -> bool {
    match kind {
        TradeKind::Bracket { take_profit, stop_loss } => price >= take_profit || price <= stop_loss,
        TradeKind::Limit { trigger_price } => price <= trigger_price,
    }
}

/// Fail with the kind-specific error unless the condition holds
pub fn check_condition(id: TradeId, kind: &TradeKind, price: &Int) -> Result<()> {
    if is_triggered(kind, price) {
        return Ok(());
    }

    let err = match kind {
        TradeKind::Bracket { .. } => ConditionError::PriceStillWithinStopLossTakeProfitRange {
            id,
            price: price.clone(),
        },
        TradeKind::Limit { .. } => ConditionError::LimitPriceHasNotBeenAttained {
            id,
            price: price.clone(),
        },
    };
    Err(EngineError::Condition(err))
}
