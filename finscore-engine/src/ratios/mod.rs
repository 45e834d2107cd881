//! Financial ratio derivation.
//!
//! Turns a [`FinancialSnapshot`](crate::snapshot::FinancialSnapshot) into a
//! [`RatioSet`]: roughly fifty profitability, valuation, liquidity, solvency,
//! efficiency, cash-flow, growth and REIT ratios, each with the inputs it
//! was computed from. A zero or missing denominator leaves the ratio absent.
//!
//! # Usage
//!
//! ```ignore
//! use finscore_engine::ratios::{RatioCalculator, RatioKey};
//!
//! let ratios = RatioCalculator::new().calculate(&snapshot);
//! println!("ROE {}", ratios.display(RatioKey::ReturnOnEquity));
//! ```

mod calculator;
mod types;

pub use calculator::RatioCalculator;
pub use types::{RatioEntry, RatioKey, RatioSet};
