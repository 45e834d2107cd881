//! Score breakdown, adjustment log and alert types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ratios::RatioKey;

/// Lowest and highest score a single category can take.
pub const CATEGORY_MIN: i32 = 0;
pub const CATEGORY_MAX: i32 = 20;

/// Scoring category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Solidity,
    Profitability,
    Valuation,
    EarningsQuality,
    Growth,
}

impl Category {
    /// All categories in breakdown order.
    pub const ALL: [Category; 5] = [
        Category::Solidity,
        Category::Profitability,
        Category::Valuation,
        Category::EarningsQuality,
        Category::Growth,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Solidity => "solidity",
            Category::Profitability => "profitability",
            Category::Valuation => "valuation",
            Category::EarningsQuality => "earnings_quality",
            Category::Growth => "growth",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Metric a scoring rule reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    // Solidity
    AltmanZ,
    FinancialHealth,
    CurrentRatio,
    DebtToEquity,
    InterestCoverage,
    // Profitability
    ReturnOnEquity,
    ReturnOnAssets,
    OperatingMargin,
    NetMargin,
    // Valuation
    PriceToEarnings,
    PriceToFfo,
    PriceToFcf,
    EvToEbitda,
    Peg,
    FcfYield,
    StyleFit,
    // Earnings quality
    PiotroskiF,
    OperatingCashFlow,
    FreeCashFlow,
    FcfConversion,
    FfoPayout,
    // Growth
    RevenueGrowth,
    EpsGrowth,
    FcfGrowth,
    GrowthCompany,
}

impl Metric {
    /// Metric scored directly from `ratio`, if any.
    pub fn for_ratio(ratio: RatioKey) -> Option<Metric> {
        let metric = match ratio {
            RatioKey::CurrentRatio => Metric::CurrentRatio,
            RatioKey::DebtToEquity => Metric::DebtToEquity,
            RatioKey::InterestCoverage => Metric::InterestCoverage,
            RatioKey::ReturnOnEquity => Metric::ReturnOnEquity,
            RatioKey::ReturnOnAssets => Metric::ReturnOnAssets,
            RatioKey::OperatingMargin => Metric::OperatingMargin,
            RatioKey::NetMargin => Metric::NetMargin,
            RatioKey::PriceToEarnings => Metric::PriceToEarnings,
            RatioKey::PriceToFfo => Metric::PriceToFfo,
            RatioKey::PriceToFcf => Metric::PriceToFcf,
            RatioKey::EvToEbitda => Metric::EvToEbitda,
            RatioKey::Peg => Metric::Peg,
            RatioKey::FcfYield => Metric::FcfYield,
            RatioKey::FreeCashFlow => Metric::FreeCashFlow,
            RatioKey::FcfConversion => Metric::FcfConversion,
            RatioKey::FfoPayout => Metric::FfoPayout,
            RatioKey::RevenueGrowth => Metric::RevenueGrowth,
            RatioKey::EpsGrowth => Metric::EpsGrowth,
            RatioKey::FcfGrowth => Metric::FcfGrowth,
            _ => return None,
        };
        Some(metric)
    }

    /// Category the metric contributes to.
    pub fn category(self) -> Category {
        use Metric::*;
        match self {
            AltmanZ | FinancialHealth | CurrentRatio | DebtToEquity | InterestCoverage => {
                Category::Solidity
            }
            ReturnOnEquity | ReturnOnAssets | OperatingMargin | NetMargin => {
                Category::Profitability
            }
            PriceToEarnings | PriceToFfo | PriceToFcf | EvToEbitda | Peg | FcfYield | StyleFit => {
                Category::Valuation
            }
            PiotroskiF | OperatingCashFlow | FreeCashFlow | FcfConversion | FfoPayout => {
                Category::EarningsQuality
            }
            RevenueGrowth | EpsGrowth | FcfGrowth | GrowthCompany => Category::Growth,
        }
    }

    /// Multiples whose penalties growth styles may dampen.
    pub fn is_multiple(self) -> bool {
        matches!(
            self,
            Metric::PriceToEarnings | Metric::PriceToFcf | Metric::EvToEbitda | Metric::Peg
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => f.write_str(&name),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Data problem rather than a finding
    Info,
    Positive,
    Neutral,
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    /// Severity implied by a signed point contribution.
    pub fn from_points(points: i32) -> Self {
        match points {
            p if p > 0 => Severity::Positive,
            0 => Severity::Neutral,
            -2..=-1 => Severity::Minor,
            -4..=-3 => Severity::Moderate,
            _ => Severity::Severe,
        }
    }
}

/// Where an adjustment weight came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentSource {
    /// A category rule table
    Rule,
    /// A bonus granted by the company style
    Style,
}

/// One entry of the adjustment log.
///
/// `applied_points = round(raw_points × weight)`; a category score is its
/// base plus the sum of its applied points, clamped to 0–20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub category: Category,
    pub metric: Metric,
    pub source: AdjustmentSource,
    /// Input value the rule looked at
    pub value: Option<f64>,
    /// Reason key, also the explanation lookup key
    pub reason: String,
    pub raw_points: i32,
    /// Product of sector and style weights; 0 when the sector ignores the metric
    pub weight: f64,
    pub applied_points: i32,
    /// Human readable notes about reweighting
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Score for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    /// Neutral midpoint the rules start from
    pub base: i32,
    /// Sum of applied points
    pub points: i32,
    /// `clamp(base + points, 0, 20)`
    pub score: i32,
    /// True when no rule of the category had its inputs
    pub insufficient_data: bool,
}

impl CategoryScore {
    pub fn new(category: Category, base: i32, points: i32, insufficient_data: bool) -> Self {
        Self {
            category,
            base,
            points,
            score: (base + points).clamp(CATEGORY_MIN, CATEGORY_MAX),
            insufficient_data,
        }
    }
}

/// Descriptive band of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLevel {
    Excellent,
    Favorable,
    Neutral,
    Caution,
    HighRisk,
}

impl ScoreLevel {
    pub fn from_total(total: i32) -> Self {
        match total {
            t if t >= 80 => ScoreLevel::Excellent,
            t if t >= 65 => ScoreLevel::Favorable,
            t if t >= 50 => ScoreLevel::Neutral,
            t if t >= 35 => ScoreLevel::Caution,
            _ => ScoreLevel::HighRisk,
        }
    }
}

impl fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScoreLevel::Excellent => "Excellent",
            ScoreLevel::Favorable => "Favorable",
            ScoreLevel::Neutral => "Neutral",
            ScoreLevel::Caution => "Caution",
            ScoreLevel::HighRisk => "High Risk",
        };
        f.write_str(label)
    }
}

/// Five category scores and their clamped sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub solidity: CategoryScore,
    pub profitability: CategoryScore,
    pub valuation: CategoryScore,
    pub earnings_quality: CategoryScore,
    pub growth: CategoryScore,
    /// `clamp(sum of category scores, 0, 100)`
    pub total: i32,
    pub level: ScoreLevel,
}

impl ScoreBreakdown {
    /// Assemble a breakdown; categories must be given in [`Category::ALL`] order.
    pub fn from_categories(categories: [CategoryScore; 5]) -> Self {
        let total = categories
            .iter()
            .map(|c| c.score)
            .sum::<i32>()
            .clamp(0, 100);
        let [solidity, profitability, valuation, earnings_quality, growth] = categories;
        Self {
            solidity,
            profitability,
            valuation,
            earnings_quality,
            growth,
            total,
            level: ScoreLevel::from_total(total),
        }
    }

    /// Category scores in breakdown order.
    pub fn categories(&self) -> [&CategoryScore; 5] {
        [
            &self.solidity,
            &self.profitability,
            &self.valuation,
            &self.earnings_quality,
            &self.growth,
        ]
    }

    pub fn get(&self, category: Category) -> &CategoryScore {
        match category {
            Category::Solidity => &self.solidity,
            Category::Profitability => &self.profitability,
            Category::Valuation => &self.valuation,
            Category::EarningsQuality => &self.earnings_quality,
            Category::Growth => &self.growth,
        }
    }
}

/// Explanatory alert emitted by a triggered rule or a data problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<Metric>,
    /// Ratio left without a value, for `ratio_unavailable` alerts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<RatioKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_inputs: Vec<String>,
    /// Reason key ("pe_expensive", "insufficient_data", ...)
    pub reason: String,
    pub severity: Severity,
    /// Applied points; 0 for informational alerts
    pub magnitude: i32,
    /// Key into the explanation catalogue, `category.reason`
    pub explanation_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Alert {
    /// Alert for an evaluated rule.
    pub fn from_adjustment(adjustment: &Adjustment) -> Self {
        let severity = if adjustment.weight == 0.0 {
            Severity::Info
        } else {
            Severity::from_points(adjustment.applied_points)
        };
        Self {
            category: adjustment.category,
            metric: Some(adjustment.metric),
            ratio: None,
            missing_inputs: Vec::new(),
            reason: adjustment.reason.clone(),
            severity,
            magnitude: adjustment.applied_points,
            explanation_key: explanation_key(adjustment.category, &adjustment.reason),
            explanation: None,
        }
    }

    /// Informational alert about a data problem.
    pub fn info(category: Category, metric: Option<Metric>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            category,
            metric,
            ratio: None,
            missing_inputs: Vec::new(),
            explanation_key: explanation_key(category, &reason),
            reason,
            severity: Severity::Info,
            magnitude: 0,
            explanation: None,
        }
    }

    /// Informational alert for a ratio that could not be computed because
    /// `missing_inputs` were absent from the snapshot.
    pub fn ratio_unavailable(ratio: RatioKey, missing_inputs: Vec<String>) -> Self {
        Self {
            ratio: Some(ratio),
            missing_inputs,
            ..Self::info(ratio.category(), Metric::for_ratio(ratio), "ratio_unavailable")
        }
    }
}

/// Build an explanation lookup key.
pub fn explanation_key(category: Category, reason: &str) -> String {
    format!("{}.{}", category.key(), reason)
}
