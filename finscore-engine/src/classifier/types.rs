//! Classification types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Investment style of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStyle {
    /// Very cheap on earnings and below book
    DeepValue,
    /// Cheap against the market or its sector
    Value,
    /// Growth at a reasonable price
    Garp,
    /// Fast, profitable growth
    Growth,
    /// Fast growth without proven profitability
    SpeculativeGrowth,
    /// Mature income payer
    Dividend,
    /// Nothing distinctive
    Blend,
}

impl CompanyStyle {
    pub fn key(self) -> &'static str {
        match self {
            Self::DeepValue => "deep_value",
            Self::Value => "value",
            Self::Garp => "garp",
            Self::Growth => "growth",
            Self::SpeculativeGrowth => "speculative_growth",
            Self::Dividend => "dividend",
            Self::Blend => "blend",
        }
    }

    /// Styles whose multiples are expected to run high.
    pub fn is_growth_oriented(self) -> bool {
        matches!(self, Self::Growth | Self::SpeculativeGrowth)
    }

    pub fn is_value_oriented(self) -> bool {
        matches!(self, Self::Value | Self::DeepValue)
    }
}

impl fmt::Display for CompanyStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Qualitative band of the growth quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthQualityLevel {
    Exceptional,
    HighQuality,
    Moderate,
    LowQuality,
    Poor,
}

impl GrowthQualityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Exceptional
        } else if score >= 65.0 {
            Self::HighQuality
        } else if score >= 50.0 {
            Self::Moderate
        } else if score >= 35.0 {
            Self::LowQuality
        } else {
            Self::Poor
        }
    }
}

/// Component of the growth quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthQualityFactor {
    /// EPS growth against revenue growth
    EarningsConsistency,
    FcfGrowth,
    /// Best of ROE and ROIC above the cost of capital
    ExcessReturn,
    MarginTrend,
}

impl GrowthQualityFactor {
    pub const ALL: [GrowthQualityFactor; 4] = [
        Self::EarningsConsistency,
        Self::FcfGrowth,
        Self::ExcessReturn,
        Self::MarginTrend,
    ];

    /// Fixed weight before renormalisation.
    pub fn weight(self) -> f64 {
        match self {
            Self::EarningsConsistency => 0.30,
            Self::FcfGrowth => 0.25,
            Self::ExcessReturn => 0.25,
            Self::MarginTrend => 0.20,
        }
    }
}

/// One evaluated growth quality component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthQualityComponent {
    pub factor: GrowthQualityFactor,
    /// Input measure fed into the curve
    pub input: f64,
    /// Curve output in [0, 100]
    pub score: f64,
    /// Weight after renormalisation over the available components
    pub weight: f64,
}

/// Growth quality score with its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthQuality {
    /// 0-100, 50 when nothing is known
    pub score: f64,
    pub level: GrowthQualityLevel,
    pub components: Vec<GrowthQualityComponent>,
}

/// Style classification of a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyClassification {
    pub style: CompanyStyle,
    pub growth_quality_score: f64,
    pub growth_quality_level: GrowthQualityLevel,
    pub growth_quality_components: Vec<GrowthQualityComponent>,
    /// Name of the rule that matched
    pub matched_rule: String,
}
