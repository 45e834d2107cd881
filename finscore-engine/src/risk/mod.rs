//! Bankruptcy-risk and quality models.
//!
//! - [`AltmanModel`]: Altman Z-Score with safe / grey / distress zones
//! - [`PiotroskiModel`]: nine-point Piotroski F-Score
//! - [`financial_health`]: 0–10 health score used for financial companies
//!
//! # Usage
//!
//! ```ignore
//! use finscore_engine::risk::{AltmanModel, PiotroskiModel};
//!
//! let altman = AltmanModel::with_config(&config).score(&snapshot);
//! let piotroski = PiotroskiModel::with_config(&config).score(&snapshot);
//! ```

mod altman;
mod financial_health;
mod piotroski;

pub use altman::{AltmanComponents, AltmanModel, AltmanResult, AltmanZone};
pub use financial_health::{financial_health, FinancialHealthResult, HealthComponent, HealthTier};
pub use piotroski::{
    CriterionResult, PiotroskiCriterion, PiotroskiGroup, PiotroskiModel, PiotroskiResult,
    PiotroskiTier,
};
