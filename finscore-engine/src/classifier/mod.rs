//! Company style classification.
//!
//! The growth quality score feeds both the style rules (GARP needs it) and
//! the aggregator's style adjustment, which uses it to dampen high-multiple
//! penalties for growth companies.
//!
//! # Usage
//!
//! ```ignore
//! let classifier = CompanyClassifier::new();
//! let classification = classifier.classify(&snapshot, &ratios, sector, wacc);
//! println!("{} ({})", classification.style, classification.growth_quality_score);
//! ```

pub mod growth_quality;
pub mod rules;
pub mod types;

pub use growth_quality::{growth_quality, interpolate, NEUTRAL_GROWTH_QUALITY};
pub use rules::{match_rule, StyleRule, StyleSignals, STYLE_RULES};
pub use types::{
    CompanyClassification, CompanyStyle, GrowthQuality, GrowthQualityComponent,
    GrowthQualityFactor, GrowthQualityLevel,
};

use crate::ratios::RatioSet;
use crate::sector::Sector;
use crate::snapshot::FinancialSnapshot;

/// Assigns a company style from valuation and growth signals.
#[derive(Debug, Clone, Default)]
pub struct CompanyClassifier;

impl CompanyClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a company. `wacc` is the cost of capital that returns are
    /// measured against.
    pub fn classify(
        &self,
        snapshot: &FinancialSnapshot,
        ratios: &RatioSet,
        sector: Sector,
        wacc: f64,
    ) -> CompanyClassification {
        let quality = growth_quality(ratios, wacc);
        let signals = StyleSignals::collect(snapshot, ratios, sector, quality.score);
        let rule = match_rule(&signals);

        tracing::debug!(
            symbol = %snapshot.symbol,
            style = %rule.style,
            rule = rule.name,
            growth_quality = quality.score,
            "Company classified"
        );

        CompanyClassification {
            style: rule.style,
            growth_quality_score: quality.score,
            growth_quality_level: quality.level,
            growth_quality_components: quality.components,
            matched_rule: rule.name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios::RatioCalculator;

    #[test]
    fn test_classify_value_company() {
        let mut snapshot = FinancialSnapshot::new("VAL");
        snapshot.sector = Some("Industrials".into());
        snapshot.market.price = Some(12.0);
        snapshot.current.shares_outstanding = Some(100.0);
        snapshot.current.net_income = Some(100.0);
        snapshot.current.total_equity = Some(1000.0);
        snapshot.current.revenue = Some(1000.0);
        let ratios = RatioCalculator::new().calculate(&snapshot);

        let classification =
            CompanyClassifier::new().classify(&snapshot, &ratios, Sector::Industrials, 0.09);
        // P/E 12, P/B 1.2
        assert_eq!(classification.style, CompanyStyle::Value);
        assert_eq!(classification.matched_rule, "value_discount_to_sector");
    }

    #[test]
    fn test_empty_snapshot_is_neutral_blend() {
        let snapshot = FinancialSnapshot::new("NONE");
        let ratios = RatioCalculator::new().calculate(&snapshot);
        let classification =
            CompanyClassifier::new().classify(&snapshot, &ratios, Sector::Unknown, 0.10);
        assert_eq!(classification.style, CompanyStyle::Blend);
        assert_eq!(classification.growth_quality_score, NEUTRAL_GROWTH_QUALITY);
    }
}
