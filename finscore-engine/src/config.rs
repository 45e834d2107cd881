//! Engine configuration.
//!
//! `ScoringConfig` carries every tunable coefficient of the engine. It is
//! validated once when an engine is built; an invalid configuration is
//! rejected before any computation runs.
//!
//! # File layout
//!
//! ```json
//! {
//!   "observability": { "log_level": "info", "log_format": "pretty" },
//!   "scoring": {
//!     "risk_free_rate": 0.045,
//!     "sector_adjustments": {
//!       "technology": { "pe_tolerance": 1.2, "category_weights": { "growth": 1.5 } }
//!     }
//!   }
//! }
//! ```
//!
//! # Environment overrides
//!
//! - `FINSCORE_RISK_FREE_RATE` → scoring.risk_free_rate
//! - `FINSCORE_MARKET_RISK_PREMIUM` → scoring.market_risk_premium
//! - `FINSCORE_LOG_LEVEL` / `FINSCORE_LOG_FORMAT` → observability

use anyhow::Result;
use finscore_common::config::{config_path, env_f64, read_json_or_default};
use finscore_common::validation::{check_positive, check_range, collect_errors};
use finscore_common::{ObservabilityConfig, Validate, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::scoring::types::{Category, Metric};
use crate::sector::Sector;

// ============================================================================
// Defaults
// ============================================================================

fn default_risk_free_rate() -> f64 {
    0.045
}

fn default_market_risk_premium() -> f64 {
    0.055
}

fn default_terminal_growth_cap() -> f64 {
    0.025
}

fn default_altman_safe() -> f64 {
    2.99
}

fn default_altman_distress() -> f64 {
    1.81
}

fn default_piotroski_strong() -> u8 {
    7
}

fn default_piotroski_weak() -> u8 {
    3
}

fn default_dampening() -> f64 {
    0.5
}

fn default_midpoint() -> i32 {
    10
}

fn default_maintenance_capex_ratio() -> f64 {
    0.15
}

fn default_one() -> f64 {
    1.0
}

// ============================================================================
// Scoring configuration
// ============================================================================

/// Tunable coefficients for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Risk-free rate used by CAPM
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Equity market risk premium
    #[serde(default = "default_market_risk_premium")]
    pub market_risk_premium: f64,

    /// Requested perpetual growth rate; lowered when too close to WACC
    #[serde(default = "default_terminal_growth_cap")]
    pub terminal_growth_cap: f64,

    /// Altman Z above this is "safe"
    #[serde(default = "default_altman_safe")]
    pub altman_safe_threshold: f64,

    /// Altman Z below this is "distress"
    #[serde(default = "default_altman_distress")]
    pub altman_distress_threshold: f64,

    /// Piotroski F at or above this is "strong"
    #[serde(default = "default_piotroski_strong")]
    pub piotroski_strong_threshold: u8,

    /// Piotroski F at or below this is "weak"
    #[serde(default = "default_piotroski_weak")]
    pub piotroski_weak_threshold: u8,

    /// Per-sector rule adjustments keyed by sector key ("financials", ...)
    #[serde(default = "AdjustmentRules::defaults")]
    pub sector_adjustments: BTreeMap<String, AdjustmentRules>,

    /// Fraction of the growth-quality score that offsets multiple penalties
    /// for growth styles: `penalty × (1 − gq/100 × dampening)`
    #[serde(default = "default_dampening")]
    pub style_penalty_dampening: f64,

    /// Starting score of every category before rules apply
    #[serde(default = "default_midpoint")]
    pub neutral_midpoint: i32,

    /// Share of capex treated as maintenance when deriving AFFO
    #[serde(default = "default_maintenance_capex_ratio")]
    pub maintenance_capex_ratio: f64,

    /// Discounting and projection settings
    #[serde(default)]
    pub dcf: DcfConfig,

    /// Category weights applied per company style
    #[serde(default)]
    pub style_weights: StyleWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            market_risk_premium: default_market_risk_premium(),
            terminal_growth_cap: default_terminal_growth_cap(),
            altman_safe_threshold: default_altman_safe(),
            altman_distress_threshold: default_altman_distress(),
            piotroski_strong_threshold: default_piotroski_strong(),
            piotroski_weak_threshold: default_piotroski_weak(),
            sector_adjustments: AdjustmentRules::defaults(),
            style_penalty_dampening: default_dampening(),
            neutral_midpoint: default_midpoint(),
            maintenance_capex_ratio: default_maintenance_capex_ratio(),
            dcf: DcfConfig::default(),
            style_weights: StyleWeights::default(),
        }
    }
}

impl ScoringConfig {
    /// Adjustment rules for a sector; neutral rules when none are configured.
    pub fn rules_for(&self, sector: Sector) -> AdjustmentRules {
        self.sector_adjustments
            .get(sector.key())
            .cloned()
            .unwrap_or_default()
    }

    /// Apply `FINSCORE_*` numeric overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(rate) = env_f64("FINSCORE_RISK_FREE_RATE") {
            self.risk_free_rate = rate;
        }
        if let Some(premium) = env_f64("FINSCORE_MARKET_RISK_PREMIUM") {
            self.market_risk_premium = premium;
        }
    }
}

/// Discounting and projection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DcfConfig {
    /// Tax rate when the snapshot carries none
    pub default_tax_rate: f64,
    /// Discount rate used when capital structure is unknown
    pub flat_discount_rate: f64,
    pub wacc_floor: f64,
    pub wacc_ceiling: f64,
    /// Minimum gap kept between WACC and terminal growth
    pub min_terminal_spread: f64,
    /// Stage growth band
    pub growth_floor: f64,
    pub growth_ceiling: f64,
    /// Stage-1 growth when no history is available
    pub default_growth: f64,
    pub high_growth_years: u32,
    pub transition_years: u32,
    /// Compute the WACC × growth sensitivity matrix
    pub sensitivity: bool,
}

impl Default for DcfConfig {
    fn default() -> Self {
        Self {
            default_tax_rate: 0.25,
            flat_discount_rate: 0.10,
            wacc_floor: 0.06,
            wacc_ceiling: 0.20,
            min_terminal_spread: 0.02,
            growth_floor: -0.10,
            growth_ceiling: 0.40,
            default_growth: 0.08,
            high_growth_years: 5,
            transition_years: 5,
            sensitivity: true,
        }
    }
}

/// Category weights applied per company style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleWeights {
    /// Growth-category weight for growth and speculative-growth companies
    pub growth_boost: f64,
    /// Valuation-category weight for value and deep-value companies
    pub value_valuation_boost: f64,
    /// Growth-category weight for value and deep-value companies
    pub value_growth_discount: f64,
    /// Growth-quality score from which GARP companies earn a valuation bonus
    pub garp_quality_bonus_threshold: f64,
}

impl Default for StyleWeights {
    fn default() -> Self {
        Self {
            growth_boost: 1.25,
            value_valuation_boost: 1.25,
            value_growth_discount: 0.8,
            garp_quality_bonus_threshold: 75.0,
        }
    }
}

// ============================================================================
// Sector adjustment rules
// ============================================================================

/// Declarative per-sector reweighting of rule contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentRules {
    /// Metrics whose contribution is nulled
    pub ignore_metrics: Vec<Metric>,
    /// Weight per category
    pub category_weights: BTreeMap<Category, f64>,
    /// Weight per metric, multiplied with the category weight
    pub metric_weights: BTreeMap<Metric, f64>,
    /// Multiplier on the sector P/E benchmark
    #[serde(default = "default_one")]
    pub pe_tolerance: f64,
    /// D/E considered high; overrides the built-in benchmark
    pub debt_equity_threshold: Option<f64>,
    /// Score P/FFO and FFO payout instead of P/E
    pub use_ffo: bool,
    /// Score the financial health model in solidity
    pub use_financial_health: bool,
    /// Null the negative-FCF penalty when revenue grows faster than 15%
    pub tolerate_negative_fcf_when_growing: bool,
}

impl Default for AdjustmentRules {
    fn default() -> Self {
        Self {
            ignore_metrics: Vec::new(),
            category_weights: BTreeMap::new(),
            metric_weights: BTreeMap::new(),
            pe_tolerance: 1.0,
            debt_equity_threshold: None,
            use_ffo: false,
            use_financial_health: false,
            tolerate_negative_fcf_when_growing: false,
        }
    }
}

impl AdjustmentRules {
    /// Sector weight for a metric: 0 when ignored, otherwise category × metric weight.
    pub fn weight(&self, metric: Metric) -> f64 {
        if self.ignore_metrics.contains(&metric) {
            return 0.0;
        }
        let category = self
            .category_weights
            .get(&metric.category())
            .copied()
            .unwrap_or(1.0);
        let specific = self.metric_weights.get(&metric).copied().unwrap_or(1.0);
        category * specific
    }

    /// Built-in sector table.
    pub fn defaults() -> BTreeMap<String, AdjustmentRules> {
        let mut table = BTreeMap::new();

        table.insert(
            Sector::Financials.key().to_string(),
            AdjustmentRules {
                ignore_metrics: vec![Metric::AltmanZ, Metric::CurrentRatio, Metric::DebtToEquity],
                metric_weights: BTreeMap::from([(Metric::PriceToEarnings, 0.5)]),
                use_financial_health: true,
                ..Default::default()
            },
        );

        table.insert(
            Sector::RealEstate.key().to_string(),
            AdjustmentRules {
                ignore_metrics: vec![Metric::PriceToEarnings],
                debt_equity_threshold: Some(1.5),
                use_ffo: true,
                ..Default::default()
            },
        );

        table.insert(
            Sector::Utilities.key().to_string(),
            AdjustmentRules {
                category_weights: BTreeMap::from([(Category::Growth, 0.5)]),
                pe_tolerance: 1.25,
                debt_equity_threshold: Some(2.0),
                ..Default::default()
            },
        );

        table.insert(
            Sector::Technology.key().to_string(),
            AdjustmentRules {
                category_weights: BTreeMap::from([(Category::Growth, 1.5)]),
                pe_tolerance: 1.2,
                tolerate_negative_fcf_when_growing: true,
                ..Default::default()
            },
        );

        table.insert(
            Sector::Healthcare.key().to_string(),
            AdjustmentRules {
                metric_weights: BTreeMap::from([
                    (Metric::OperatingMargin, 1.3),
                    (Metric::NetMargin, 1.3),
                ]),
                pe_tolerance: 1.1,
                ..Default::default()
            },
        );

        table.insert(
            Sector::Energy.key().to_string(),
            AdjustmentRules {
                metric_weights: BTreeMap::from([
                    (Metric::EvToEbitda, 1.5),
                    (Metric::PriceToEarnings, 0.7),
                ]),
                ..Default::default()
            },
        );

        table
    }
}

// ============================================================================
// Validation
// ============================================================================

impl Validate for ScoringConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();
        let mut push = |result: ValidationResult<()>| {
            if let Err(e) = result {
                errors.push(e);
            }
        };

        push(check_range("scoring.risk_free_rate", self.risk_free_rate, 0.0, 0.5));
        push(check_range(
            "scoring.market_risk_premium",
            self.market_risk_premium,
            0.0,
            0.5,
        ));
        push(check_range(
            "scoring.terminal_growth_cap",
            self.terminal_growth_cap,
            -0.05,
            0.5,
        ));
        push(check_positive(
            "scoring.altman_distress_threshold",
            self.altman_distress_threshold,
        ));
        push(check_positive(
            "scoring.altman_safe_threshold",
            self.altman_safe_threshold,
        ));
        if self.altman_distress_threshold >= self.altman_safe_threshold {
            push(Err(ValidationError::Conflict {
                reason: format!(
                    "altman_distress_threshold ({}) must be below altman_safe_threshold ({})",
                    self.altman_distress_threshold, self.altman_safe_threshold
                ),
            }));
        }
        if self.piotroski_strong_threshold > 9 {
            push(Err(ValidationError::InvalidValue {
                field: "scoring.piotroski_strong_threshold".into(),
                reason: format!("must be at most 9, got {}", self.piotroski_strong_threshold),
            }));
        }
        if self.piotroski_weak_threshold >= self.piotroski_strong_threshold {
            push(Err(ValidationError::Conflict {
                reason: format!(
                    "piotroski_weak_threshold ({}) must be below piotroski_strong_threshold ({})",
                    self.piotroski_weak_threshold, self.piotroski_strong_threshold
                ),
            }));
        }
        push(check_range(
            "scoring.style_penalty_dampening",
            self.style_penalty_dampening,
            0.0,
            1.0,
        ));
        if !(0..=20).contains(&self.neutral_midpoint) {
            push(Err(ValidationError::InvalidValue {
                field: "scoring.neutral_midpoint".into(),
                reason: format!("must be between 0 and 20, got {}", self.neutral_midpoint),
            }));
        }
        push(check_range(
            "scoring.maintenance_capex_ratio",
            self.maintenance_capex_ratio,
            0.0,
            1.0,
        ));

        for (key, rules) in &self.sector_adjustments {
            if !Sector::ALL.iter().any(|s| s.key() == key) {
                push(Err(ValidationError::InvalidValue {
                    field: format!("scoring.sector_adjustments.{}", key),
                    reason: "unknown sector key".into(),
                }));
            }
            push(rules.validate_as(key));
        }

        push(self.dcf.validate());
        push(self.style_weights.validate());

        collect_errors(errors)
    }
}

impl AdjustmentRules {
    fn validate_as(&self, key: &str) -> ValidationResult<()> {
        let mut errors = Vec::new();
        let prefix = format!("scoring.sector_adjustments.{}", key);

        if let Err(e) = check_positive(&format!("{}.pe_tolerance", prefix), self.pe_tolerance) {
            errors.push(e);
        }
        if let Some(threshold) = self.debt_equity_threshold {
            if let Err(e) = check_positive(&format!("{}.debt_equity_threshold", prefix), threshold) {
                errors.push(e);
            }
        }
        for (category, weight) in &self.category_weights {
            let field = format!("{}.category_weights.{}", prefix, category);
            if let Err(e) = check_range(&field, *weight, 0.0, 5.0) {
                errors.push(e);
            }
        }
        for (metric, weight) in &self.metric_weights {
            let field = format!("{}.metric_weights.{:?}", prefix, metric);
            if let Err(e) = check_range(&field, *weight, 0.0, 5.0) {
                errors.push(e);
            }
        }

        collect_errors(errors)
    }
}

impl Validate for DcfConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();
        let checks = [
            check_range("scoring.dcf.default_tax_rate", self.default_tax_rate, 0.0, 0.99),
            check_positive("scoring.dcf.flat_discount_rate", self.flat_discount_rate),
            check_positive("scoring.dcf.wacc_floor", self.wacc_floor),
            check_positive("scoring.dcf.wacc_ceiling", self.wacc_ceiling),
            check_positive("scoring.dcf.min_terminal_spread", self.min_terminal_spread),
            check_range("scoring.dcf.growth_floor", self.growth_floor, -1.0, 1.0),
            check_range("scoring.dcf.growth_ceiling", self.growth_ceiling, -1.0, 2.0),
            check_range("scoring.dcf.default_growth", self.default_growth, -1.0, 2.0),
        ];
        errors.extend(checks.into_iter().filter_map(|result| result.err()));

        if self.wacc_floor > self.wacc_ceiling {
            errors.push(ValidationError::Conflict {
                reason: "dcf.wacc_floor must not exceed dcf.wacc_ceiling".into(),
            });
        }
        if self.growth_floor > self.growth_ceiling {
            errors.push(ValidationError::Conflict {
                reason: "dcf.growth_floor must not exceed dcf.growth_ceiling".into(),
            });
        }
        if self.high_growth_years == 0 || self.transition_years == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "scoring.dcf.high_growth_years".into(),
                reason: "both projection stages need at least one year".into(),
            });
        }

        collect_errors(errors)
    }
}

impl Validate for StyleWeights {
    fn validate(&self) -> ValidationResult<()> {
        collect_errors(
            [
                check_range("scoring.style_weights.growth_boost", self.growth_boost, 0.0, 5.0),
                check_range(
                    "scoring.style_weights.value_valuation_boost",
                    self.value_valuation_boost,
                    0.0,
                    5.0,
                ),
                check_range(
                    "scoring.style_weights.value_growth_discount",
                    self.value_growth_discount,
                    0.0,
                    5.0,
                ),
                check_range(
                    "scoring.style_weights.garp_quality_bonus_threshold",
                    self.garp_quality_bonus_threshold,
                    0.0,
                    100.0,
                ),
            ]
            .into_iter()
            .filter_map(|result| result.err())
            .collect(),
        )
    }
}

// ============================================================================
// Application configuration file
// ============================================================================

/// Full configuration file for the `finscore` binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl AppConfig {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from a specific file, falling back to defaults when it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        read_json_or_default(path)
    }

    /// Load, apply environment overrides and validate.
    pub fn load_with_env() -> Result<Self> {
        Self::load_with_env_from(&config_path())
    }

    /// [`load_with_env`](Self::load_with_env) with an explicit file.
    pub fn load_with_env_from(path: &Path) -> Result<Self> {
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides();
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.observability.apply_env_overrides();
        self.scoring.apply_env_overrides();
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> ValidationResult<()> {
        let errors = [self.observability.validate(), self.scoring.validate()]
            .into_iter()
            .filter_map(|result| result.err())
            .collect();
        collect_errors(errors)
    }
}
