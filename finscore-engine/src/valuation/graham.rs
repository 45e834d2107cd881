//! Graham Number and margin of safety.

use crate::error::ModelOutcome;
use crate::ratios::{RatioKey, RatioSet};

use super::types::GrahamResult;

/// Graham's ceiling on P/E × P/B (15 × 1.5).
pub const GRAHAM_MULTIPLIER: f64 = 22.5;

/// Graham Number: √(22.5 × EPS × BVPS). Both inputs must be positive.
pub fn graham_number(ratios: &RatioSet) -> ModelOutcome<GrahamResult> {
    let (Some(eps), Some(bvps)) = (
        ratios.get(RatioKey::EarningsPerShare),
        ratios.get(RatioKey::BookValuePerShare),
    ) else {
        let missing: Vec<&str> = [
            ("net_income", ratios.get(RatioKey::EarningsPerShare)),
            ("total_equity", ratios.get(RatioKey::BookValuePerShare)),
        ]
        .iter()
        .filter(|(_, v)| v.is_none())
        .map(|(name, _)| *name)
        .collect();
        return ModelOutcome::missing(&missing);
    };

    if eps <= 0.0 {
        return ModelOutcome::degenerate(format!("EPS {:.2} is not positive", eps));
    }
    if bvps <= 0.0 {
        return ModelOutcome::degenerate(format!("book value per share {:.2} is not positive", bvps));
    }

    ModelOutcome::Computed(GrahamResult {
        eps,
        book_value_per_share: bvps,
        graham_number: (GRAHAM_MULTIPLIER * eps * bvps).sqrt(),
    })
}

/// (intrinsic − price) / intrinsic. Negative when the price is above value.
pub fn margin_of_safety(intrinsic_value: f64, price: f64) -> Option<f64> {
    if intrinsic_value <= 0.0 || !intrinsic_value.is_finite() || !price.is_finite() {
        return None;
    }
    Some((intrinsic_value - price) / intrinsic_value)
}
