//! Score aggregation.
//!
//! Pure reduction from model outputs to a [`ScoreBreakdown`]:
//!
//! 1. Each category evaluates its band rules independently.
//! 2. Every hit is weighted by the sector rules and the company style;
//!    `applied = round(raw × sector weight × style weight × relief)`, where
//!    relief only applies to P/E penalties backed by growth.
//! 3. Category score = `clamp(midpoint + Σ applied, 0, 20)`; a category
//!    without any evaluated rule, or whose rules all carry weight 0, stays
//!    at the midpoint and is flagged as insufficient.
//! 4. Total = `clamp(Σ category scores, 0, 100)`.

use serde::{Deserialize, Serialize};

use crate::classifier::CompanyClassification;
use crate::config::{AdjustmentRules, ScoringConfig};
use crate::error::ModelOutcome;
use crate::ratios::{RatioKey, RatioSet};
use crate::risk::{AltmanResult, AltmanZone, FinancialHealthResult, PiotroskiResult};
use crate::sector::Sector;
use crate::snapshot::FinancialSnapshot;

use super::relief::pe_relief;
use super::rules::{self as bands, RuleHit};
use super::sector_adjust::sector_weighting;
use super::style::{style_bonus, style_weighting};
use super::types::{
    Adjustment, AdjustmentSource, Alert, Category, CategoryScore, Metric, ScoreBreakdown,
};

/// Everything the aggregator reads.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInputs<'a> {
    pub snapshot: &'a FinancialSnapshot,
    pub sector: Sector,
    pub ratios: &'a RatioSet,
    pub altman: &'a ModelOutcome<AltmanResult>,
    pub piotroski: &'a ModelOutcome<PiotroskiResult>,
    pub financial_health: Option<&'a FinancialHealthResult>,
    pub classification: &'a CompanyClassification,
    /// Justified P/E multiple, for P/E penalty relief
    pub justified_pe: Option<f64>,
}

/// Aggregated score with its adjustment log and alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub score: ScoreBreakdown,
    pub adjustments: Vec<Adjustment>,
    pub alerts: Vec<Alert>,
}

/// Reduces model outputs to category scores.
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    config: ScoringConfig,
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreAggregator {
    pub fn new() -> Self {
        Self::with_config(ScoringConfig::default())
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score one company.
    pub fn aggregate(&self, inputs: &ScoringInputs<'_>) -> Scorecard {
        let rules = self.config.rules_for(inputs.sector);
        let midpoint = self.config.neutral_midpoint;

        let mut adjustments = Vec::new();
        let mut alerts = Vec::new();

        let categories = Category::ALL.map(|category| {
            let mut hits: Vec<(RuleHit, AdjustmentSource)> = self
                .rule_hits(category, inputs, &rules)
                .into_iter()
                .map(|hit| (hit, AdjustmentSource::Rule))
                .collect();
            if category == Category::Valuation {
                if let Some(bonus) = style_bonus(inputs.classification, &self.config) {
                    hits.push((bonus, AdjustmentSource::Style));
                }
            }

            if hits.is_empty() {
                tracing::debug!(category = %category, "No rule inputs, category left at midpoint");
                alerts.push(Alert::info(category, None, "insufficient_data"));
                return CategoryScore::new(category, midpoint, 0, true);
            }

            let mut points = 0;
            let mut weighted = false;
            for (hit, source) in hits {
                let adjustment = self.weigh(category, hit, source, inputs, &rules);
                points += adjustment.applied_points;
                weighted |= adjustment.weight != 0.0;
                alerts.push(Alert::from_adjustment(&adjustment));
                adjustments.push(adjustment);
            }

            // Rules the sector ignores are logged but do not count as evidence
            if !weighted {
                tracing::debug!(category = %category, "Every rule ignored, category left at midpoint");
                alerts.push(Alert::info(category, None, "insufficient_data"));
                return CategoryScore::new(category, midpoint, 0, true);
            }
            CategoryScore::new(category, midpoint, points, false)
        });

        let score = ScoreBreakdown::from_categories(categories);
        tracing::debug!(
            symbol = %inputs.snapshot.symbol,
            total = score.total,
            level = %score.level,
            adjustments = adjustments.len(),
            "Score aggregated"
        );

        Scorecard {
            score,
            adjustments,
            alerts,
        }
    }

    fn weigh(
        &self,
        category: Category,
        hit: RuleHit,
        source: AdjustmentSource,
        inputs: &ScoringInputs<'_>,
        rules: &AdjustmentRules,
    ) -> Adjustment {
        let weighting = sector_weighting(rules, inputs.sector, &hit, inputs.ratios)
            .combine(style_weighting(inputs.classification, &self.config, &hit))
            .combine(pe_relief(&hit, inputs.ratios, inputs.justified_pe));
        let applied_points = (f64::from(hit.raw_points) * weighting.weight).round() as i32;

        Adjustment {
            category,
            metric: hit.metric,
            source,
            value: hit.value,
            reason: hit.reason.to_string(),
            raw_points: hit.raw_points,
            weight: weighting.weight,
            applied_points,
            notes: weighting.notes,
        }
    }

    fn rule_hits(
        &self,
        category: Category,
        inputs: &ScoringInputs<'_>,
        rules: &AdjustmentRules,
    ) -> Vec<RuleHit> {
        let hits = match category {
            Category::Solidity => self.solidity(inputs, rules),
            Category::Profitability => profitability(inputs.ratios),
            Category::Valuation => valuation(inputs, rules),
            Category::EarningsQuality => earnings_quality(inputs, rules),
            Category::Growth => growth(inputs.ratios),
        };
        hits.into_iter().flatten().collect()
    }

    // ========================================================================
    // Category rules
    // ========================================================================

    fn solidity(&self, inputs: &ScoringInputs<'_>, rules: &AdjustmentRules) -> Vec<Option<RuleHit>> {
        let ratios = inputs.ratios;

        let health = if rules.use_financial_health {
            inputs
                .financial_health
                .and_then(|h| RuleHit::from_rule(&bands::FINANCIAL_HEALTH, Some(h.score), 1.0))
        } else {
            None
        };

        let altman = inputs.altman.computed().map(|result| {
            let (points, reason) = match result.zone {
                AltmanZone::Safe => (bands::ALTMAN_SAFE_POINTS, "altman_safe"),
                AltmanZone::Grey => (bands::ALTMAN_GREY_POINTS, "altman_grey"),
                AltmanZone::Distress => (bands::ALTMAN_DISTRESS_POINTS, "altman_distress"),
            };
            RuleHit::new(Metric::AltmanZ, result.z_score, points, reason)
        });

        let leverage_threshold = rules
            .debt_equity_threshold
            .unwrap_or(inputs.sector.benchmarks().debt_equity_high);
        let leverage = ratios.get(RatioKey::DebtToEquity).and_then(|de| {
            if de < 0.0 {
                let (points, _) = bands::DEBT_TO_EQUITY.fallback?;
                Some(RuleHit::new(Metric::DebtToEquity, de, points, "negative_equity"))
            } else {
                RuleHit::from_rule(&bands::DEBT_TO_EQUITY, Some(de), leverage_threshold)
            }
        });

        vec![
            health,
            altman,
            RuleHit::from_rule(&bands::CURRENT_RATIO, ratios.get(RatioKey::CurrentRatio), 1.0),
            leverage,
            RuleHit::from_rule(
                &bands::INTEREST_COVERAGE,
                ratios.get(RatioKey::InterestCoverage),
                1.0,
            ),
        ]
    }
}

fn profitability(ratios: &RatioSet) -> Vec<Option<RuleHit>> {
    vec![
        RuleHit::from_rule(&bands::RETURN_ON_EQUITY, ratios.get(RatioKey::ReturnOnEquity), 1.0),
        RuleHit::from_rule(&bands::RETURN_ON_ASSETS, ratios.get(RatioKey::ReturnOnAssets), 1.0),
        RuleHit::from_rule(&bands::OPERATING_MARGIN, ratios.get(RatioKey::OperatingMargin), 1.0),
        RuleHit::from_rule(&bands::NET_MARGIN, ratios.get(RatioKey::NetMargin), 1.0),
    ]
}

fn valuation(inputs: &ScoringInputs<'_>, rules: &AdjustmentRules) -> Vec<Option<RuleHit>> {
    let ratios = inputs.ratios;
    let market = &inputs.snapshot.market;
    let benchmarks = inputs.sector.benchmarks();

    let sector_pe = market.sector_pe.filter(|v| *v > 0.0).unwrap_or(benchmarks.pe);
    let sector_ev_ebitda = market
        .sector_ev_ebitda
        .filter(|v| *v > 0.0)
        .unwrap_or(benchmarks.ev_ebitda);

    let ffo = if rules.use_ffo {
        RuleHit::from_rule(&bands::PRICE_TO_FFO, ratios.get(RatioKey::PriceToFfo), 1.0)
    } else {
        None
    };

    vec![
        RuleHit::from_rule(
            &bands::PRICE_TO_EARNINGS,
            ratios.get(RatioKey::PriceToEarnings),
            sector_pe * rules.pe_tolerance,
        ),
        ffo,
        RuleHit::from_rule(&bands::PRICE_TO_FCF, ratios.get(RatioKey::PriceToFcf), 1.0),
        RuleHit::from_rule(
            &bands::EV_TO_EBITDA,
            ratios.get(RatioKey::EvToEbitda),
            sector_ev_ebitda,
        ),
        RuleHit::from_rule(&bands::PEG, ratios.get(RatioKey::Peg), 1.0),
        RuleHit::from_rule(&bands::FCF_YIELD, ratios.get(RatioKey::FcfYield), 1.0),
    ]
}

fn earnings_quality(inputs: &ScoringInputs<'_>, rules: &AdjustmentRules) -> Vec<Option<RuleHit>> {
    let ratios = inputs.ratios;

    let piotroski = inputs
        .piotroski
        .computed()
        .and_then(|p| RuleHit::from_rule(&bands::PIOTROSKI, Some(f64::from(p.score)), 1.0));

    let operating_cash_flow = inputs.snapshot.current.operating_cash_flow.map(|ocf| {
        if ocf > 0.0 {
            RuleHit::new(
                Metric::OperatingCashFlow,
                ocf,
                bands::POSITIVE_CASH_FLOW_POINTS,
                "positive_operating_cash_flow",
            )
        } else {
            RuleHit::new(
                Metric::OperatingCashFlow,
                ocf,
                bands::NEGATIVE_CASH_FLOW_POINTS,
                "negative_operating_cash_flow",
            )
        }
    });

    let free_cash_flow = ratios.get(RatioKey::FreeCashFlow).map(|fcf| {
        if fcf > 0.0 {
            RuleHit::new(
                Metric::FreeCashFlow,
                fcf,
                bands::POSITIVE_CASH_FLOW_POINTS,
                "positive_free_cash_flow",
            )
        } else {
            RuleHit::new(
                Metric::FreeCashFlow,
                fcf,
                bands::NEGATIVE_CASH_FLOW_POINTS,
                "negative_free_cash_flow",
            )
        }
    });

    let ffo_payout = if rules.use_ffo {
        RuleHit::from_rule(&bands::FFO_PAYOUT, ratios.get(RatioKey::FfoPayout), 1.0)
    } else {
        None
    };

    vec![
        piotroski,
        operating_cash_flow,
        free_cash_flow,
        RuleHit::from_rule(&bands::FCF_CONVERSION, ratios.get(RatioKey::FcfConversion), 1.0),
        ffo_payout,
    ]
}

fn growth(ratios: &RatioSet) -> Vec<Option<RuleHit>> {
    let revenue_growth = ratios.get(RatioKey::RevenueGrowth);
    let growth_company = revenue_growth
        .filter(|g| *g > bands::GROWTH_COMPANY_THRESHOLD)
        .map(|g| {
            RuleHit::new(
                Metric::GrowthCompany,
                g,
                bands::GROWTH_COMPANY_POINTS,
                "high_growth_company",
            )
        });

    vec![
        RuleHit::from_rule(&bands::REVENUE_GROWTH, revenue_growth, 1.0),
        RuleHit::from_rule(&bands::EPS_GROWTH, ratios.get(RatioKey::EpsGrowth), 1.0),
        RuleHit::from_rule(&bands::FCF_GROWTH, ratios.get(RatioKey::FcfGrowth), 1.0),
        growth_company,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{CompanyStyle, GrowthQualityLevel};
    use crate::scoring::types::{Severity, CATEGORY_MAX};

    fn classification(style: CompanyStyle, gq: f64) -> CompanyClassification {
        CompanyClassification {
            style,
            growth_quality_score: gq,
            growth_quality_level: GrowthQualityLevel::from_score(gq),
            growth_quality_components: Vec::new(),
            matched_rule: style.key().to_string(),
        }
    }

    struct Fixture {
        snapshot: FinancialSnapshot,
        ratios: RatioSet,
        altman: ModelOutcome<AltmanResult>,
        piotroski: ModelOutcome<PiotroskiResult>,
        classification: CompanyClassification,
        justified_pe: Option<f64>,
    }

    impl Fixture {
        fn empty() -> Self {
            Self {
                snapshot: FinancialSnapshot::new("TEST"),
                ratios: RatioSet::new(),
                altman: ModelOutcome::missing(&["total_assets"]),
                piotroski: ModelOutcome::missing(&["net_income"]),
                classification: classification(CompanyStyle::Blend, 50.0),
                justified_pe: None,
            }
        }

        fn inputs(&self, sector: Sector) -> ScoringInputs<'_> {
            ScoringInputs {
                snapshot: &self.snapshot,
                sector,
                ratios: &self.ratios,
                altman: &self.altman,
                piotroski: &self.piotroski,
                financial_health: None,
                classification: &self.classification,
                justified_pe: self.justified_pe,
            }
        }
    }

    #[test]
    fn test_empty_inputs_score_midpoint_everywhere() {
        let fixture = Fixture::empty();
        let card = ScoreAggregator::new().aggregate(&fixture.inputs(Sector::Unknown));

        assert_eq!(card.score.total, 50);
        assert!(card.adjustments.is_empty());
        assert_eq!(card.alerts.len(), 5);
        assert!(card
            .alerts
            .iter()
            .all(|a| a.reason == "insufficient_data" && a.severity == Severity::Info));
        assert!(card.score.categories().iter().all(|c| c.insufficient_data));
    }

    #[test]
    fn test_category_reproducible_from_log() {
        let mut fixture = Fixture::empty();
        fixture.ratios.insert(RatioKey::ReturnOnEquity, Some(0.30), &[]);
        fixture.ratios.insert(RatioKey::ReturnOnAssets, Some(0.16), &[]);
        fixture.ratios.insert(RatioKey::OperatingMargin, Some(0.35), &[]);
        fixture.ratios.insert(RatioKey::NetMargin, Some(0.25), &[]);
        let card = ScoreAggregator::new().aggregate(&fixture.inputs(Sector::Unknown));

        // 10 + 6 + 4 + 5 + 3 = 28, clamped
        assert_eq!(card.score.profitability.score, CATEGORY_MAX);
        for category in card.score.categories() {
            let points: i32 = card
                .adjustments
                .iter()
                .filter(|a| a.category == category.category)
                .map(|a| a.applied_points)
                .sum();
            assert_eq!(category.points, points);
            assert_eq!(
                category.score,
                (category.base + points).clamp(0, CATEGORY_MAX)
            );
        }
    }

    #[test]
    fn test_altman_distress_penalty() {
        let mut fixture = Fixture::empty();
        fixture.altman = ModelOutcome::Computed(AltmanResult {
            z_score: 1.2,
            zone: AltmanZone::Distress,
            components: crate::risk::AltmanComponents {
                working_capital_to_assets: 0.0,
                retained_earnings_to_assets: 0.0,
                ebit_to_assets: 0.0,
                market_equity_to_liabilities: 0.0,
                sales_to_assets: 0.0,
            },
        });
        let card = ScoreAggregator::new().aggregate(&fixture.inputs(Sector::Unknown));
        assert_eq!(card.score.solidity.score, 0);
        let alert = card
            .alerts
            .iter()
            .find(|a| a.reason == "altman_distress")
            .unwrap();
        assert_eq!(alert.severity, Severity::Severe);
        assert_eq!(alert.magnitude, -15);
    }

    #[test]
    fn test_negative_equity_is_worst_leverage_band() {
        let mut fixture = Fixture::empty();
        fixture.ratios.insert(RatioKey::DebtToEquity, Some(-2.0), &[]);
        let card = ScoreAggregator::new().aggregate(&fixture.inputs(Sector::Unknown));
        let adjustment = &card.adjustments[0];
        assert_eq!(adjustment.reason, "negative_equity");
        assert_eq!(adjustment.applied_points, -5);
    }

    #[test]
    fn test_financials_ignore_leverage() {
        let mut fixture = Fixture::empty();
        fixture.ratios.insert(RatioKey::DebtToEquity, Some(9.0), &[]);
        let card = ScoreAggregator::new().aggregate(&fixture.inputs(Sector::Financials));
        let adjustment = &card.adjustments[0];
        assert_eq!(adjustment.weight, 0.0);
        assert_eq!(adjustment.applied_points, 0);
        assert_eq!(card.score.solidity.score, 10);
        assert_eq!(card.alerts[0].severity, Severity::Info);
        // The ignored D/E reading is the only solidity input
        assert!(card.score.solidity.insufficient_data);
        assert!(card
            .alerts
            .iter()
            .any(|a| a.category == Category::Solidity && a.reason == "insufficient_data"));
    }

    #[test]
    fn test_weighted_rule_keeps_category_evaluated() {
        let mut fixture = Fixture::empty();
        fixture.ratios.insert(RatioKey::DebtToEquity, Some(9.0), &[]);
        fixture.ratios.insert(RatioKey::InterestCoverage, Some(12.0), &[]);
        let card = ScoreAggregator::new().aggregate(&fixture.inputs(Sector::Financials));

        assert!(!card.score.solidity.insufficient_data);
        assert_eq!(card.score.solidity.score, 13);
        assert!(!card
            .alerts
            .iter()
            .any(|a| a.category == Category::Solidity && a.reason == "insufficient_data"));
    }

    #[test]
    fn test_reit_scores_ffo_instead_of_pe() {
        let mut fixture = Fixture::empty();
        fixture.ratios.insert(RatioKey::PriceToEarnings, Some(60.0), &[]);
        fixture.ratios.insert(RatioKey::PriceToFfo, Some(11.0), &[]);
        fixture.ratios.insert(RatioKey::FfoPayout, Some(0.65), &[]);
        let card = ScoreAggregator::new().aggregate(&fixture.inputs(Sector::RealEstate));

        let pe = card
            .adjustments
            .iter()
            .find(|a| a.metric == Metric::PriceToEarnings)
            .unwrap();
        assert_eq!(pe.applied_points, 0);
        // 10 + 5 from P/FFO
        assert_eq!(card.score.valuation.score, 15);
        // 10 + 3 from FFO payout
        assert_eq!(card.score.earnings_quality.score, 13);
    }

    #[test]
    fn test_growth_style_dampens_pe_penalty() {
        let mut fixture = Fixture::empty();
        fixture.ratios.insert(RatioKey::PriceToEarnings, Some(80.0), &[]);
        fixture.classification = classification(CompanyStyle::Growth, 80.0);
        let card = ScoreAggregator::new().aggregate(&fixture.inputs(Sector::Unknown));

        let pe = &card.adjustments[0];
        assert_eq!(pe.raw_points, -5);
        // round(-5 × 0.6)
        assert_eq!(pe.applied_points, -3);
        assert_eq!(card.score.valuation.score, 7);
    }

    #[test]
    fn test_low_peg_relieves_pe_penalty() {
        let mut fixture = Fixture::empty();
        fixture.ratios.insert(RatioKey::PriceToEarnings, Some(80.0), &[]);
        fixture.ratios.insert(RatioKey::Peg, Some(1.2), &[]);
        let card = ScoreAggregator::new().aggregate(&fixture.inputs(Sector::Unknown));

        let pe = card
            .adjustments
            .iter()
            .find(|a| a.metric == Metric::PriceToEarnings)
            .unwrap();
        assert_eq!(pe.raw_points, -5);
        assert!((pe.weight - 0.3).abs() < 1e-12);
        // round(-5 × 0.3)
        assert_eq!(pe.applied_points, -2);
        assert!(pe.notes.iter().any(|n| n.contains("PEG 1.20")));
    }

    #[test]
    fn test_justified_pe_relieves_pe_penalty() {
        let mut fixture = Fixture::empty();
        fixture.ratios.insert(RatioKey::PriceToEarnings, Some(45.0), &[]);
        fixture.justified_pe = Some(40.0);
        let card = ScoreAggregator::new().aggregate(&fixture.inputs(Sector::Unknown));

        let pe = &card.adjustments[0];
        assert_eq!(pe.raw_points, -5);
        assert_eq!(pe.applied_points, -2);
        assert_eq!(pe.notes.len(), 1);
        assert_eq!(card.score.valuation.score, 8);
    }

    #[test]
    fn test_garp_bonus_logged_as_style() {
        let mut fixture = Fixture::empty();
        fixture.ratios.insert(RatioKey::PriceToEarnings, Some(20.0), &[]);
        fixture.classification = classification(CompanyStyle::Garp, 80.0);
        let card = ScoreAggregator::new().aggregate(&fixture.inputs(Sector::Unknown));

        let bonus = card
            .adjustments
            .iter()
            .find(|a| a.source == AdjustmentSource::Style)
            .unwrap();
        assert_eq!(bonus.metric, Metric::StyleFit);
        assert_eq!(bonus.applied_points, 2);
    }
}
