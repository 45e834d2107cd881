//! FinScore Engine
//!
//! Rule-based scoring and valuation of listed companies from a normalized
//! financial snapshot.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        finscore-engine                            │
//! ├───────────────────────────────────────────────────────────────────┤
//! │  ┌───────────────┐  ┌───────────────┐  ┌───────────────┐          │
//! │  │ RatioCalc     │─►│ RiskModels    │  │ Valuation     │          │
//! │  │ (~50 ratios)  │  │ Altman/F/FHS  │  │ WACC/DCF/Gr.  │          │
//! │  └───────────────┘  └───────────────┘  └───────────────┘          │
//! │          │                  │                  │                  │
//! │          ▼                  ▼                  ▼                  │
//! │  ┌───────────────┐  ┌──────────────────────────────────┐          │
//! │  │ Classifier    │─►│ ScoreAggregator (5 × 0-20)       │          │
//! │  └───────────────┘  └──────────────────────────────────┘          │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! ## Absence is explicit
//! - Every snapshot field is optional; a ratio with a missing or zero
//!   denominator is absent, never NaN or infinite
//! - Models return [`ModelOutcome`]: computed, insufficient data, or degenerate
//!
//! ## Scoring
//! - Five categories start at the neutral midpoint and move by band rules
//! - Sector rules and the company style reweight contributions
//! - Every contribution is logged and explained by an alert
//!
//! # Usage
//!
//! ```ignore
//! use finscore_engine::{evaluate, FinancialSnapshot, ScoringConfig};
//!
//! let snapshot: FinancialSnapshot = serde_json::from_str(&json)?;
//! let result = evaluate(&snapshot, &ScoringConfig::default())?;
//! println!("{}: {} / 100", result.symbol, result.score.total);
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod ratios;
pub mod risk;
pub mod safe_math;
pub mod scoring;
pub mod sector;
pub mod snapshot;
pub mod valuation;

pub use classifier::{CompanyClassification, CompanyStyle};
pub use config::{AdjustmentRules, AppConfig, DcfConfig, ScoringConfig, StyleWeights};
pub use engine::{evaluate, EvaluationResult, ScoringEngine};
pub use error::{DataIssue, EngineError, ModelOutcome, Result};
pub use ratios::{RatioCalculator, RatioKey, RatioSet};
pub use scoring::{Alert, ExplanationLookup, ScoreBreakdown, ScoreLevel, Severity};
pub use sector::Sector;
pub use snapshot::{FinancialSnapshot, History, MarketData, PeriodFinancials};
