//! Category scoring.
//!
//! Five categories (solidity, profitability, valuation, earnings quality,
//! growth) each start at the neutral midpoint and move by the points of their
//! band rules. Sector rules and the company style reweight each contribution;
//! a P/E penalty is further relieved when a low PEG or the justified P/E
//! supports the multiple. Every weighted contribution is kept in the
//! adjustment log and produces an alert.
//!
//! # Usage
//!
//! ```ignore
//! let card = ScoreAggregator::with_config(config).aggregate(&ScoringInputs {
//!     snapshot: &snapshot,
//!     sector,
//!     ratios: &ratios,
//!     altman: &altman,
//!     piotroski: &piotroski,
//!     financial_health: None,
//!     classification: &classification,
//!     justified_pe: None,
//! });
//! println!("{} / 100 ({})", card.score.total, card.score.level);
//! ```

pub mod aggregator;
pub mod explanations;
pub mod relief;
pub mod rules;
pub mod sector_adjust;
pub mod style;
pub mod types;

pub use aggregator::{ScoreAggregator, Scorecard, ScoringInputs};
pub use explanations::{annotate, ExplanationLookup, StaticCatalogue};
pub use relief::pe_relief;
pub use rules::{Band, BandRule, Direction, RuleHit};
pub use sector_adjust::{sector_weighting, Weighting};
pub use style::{dampening_factor, style_bonus, style_weighting};
pub use types::{
    explanation_key, Adjustment, AdjustmentSource, Alert, Category, CategoryScore, Metric,
    ScoreBreakdown, ScoreLevel, Severity, CATEGORY_MAX, CATEGORY_MIN,
};
