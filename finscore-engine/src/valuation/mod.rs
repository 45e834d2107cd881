//! Valuation models.
//!
//! - [`WaccModel`]: discount rate from CAPM and the capital structure
//! - [`DcfModel`]: three-stage discounted cash flow
//! - [`graham_number`]: Graham's defensive ceiling
//! - [`justified_pe`]: P/E supported by growth, required return and ROE
//! - [`sensitivity_matrix`]: DCF fair value over WACC × growth shifts
//!
//! # Usage
//!
//! ```ignore
//! let wacc = WaccModel::new().estimate(&snapshot, &ratios, sector);
//! let dcf = DcfModel::new();
//! let outcome = dcf
//!     .inputs(&snapshot, &ratios, wacc.wacc, style)
//!     .and_then(|inputs| dcf.run(&inputs));
//! ```

pub mod dcf;
pub mod graham;
pub mod justified;
pub mod sensitivity;
pub mod types;
pub mod wacc;

pub use dcf::{DcfInputs, DcfModel, TERMINAL_SHARE_WARNING};
pub use graham::{graham_number, margin_of_safety, GRAHAM_MULTIPLIER};
pub use justified::{justified_pe, JUSTIFIED_PE_CEILING, JUSTIFIED_PE_FLOOR};
pub use sensitivity::{sensitivity_matrix, GROWTH_DELTAS, WACC_DELTAS};
pub use types::{
    DcfResult, GrahamResult, GrowthAssumptions, GrowthSource, InputSource, JustifiedGrowthSource,
    JustifiedPe, MarginsOfSafety,
    ProjectedCashFlow, SensitivityMatrix, SensitivityStatistics, StageProfile, WaccMethod,
    WaccResult,
};
pub use wacc::WaccModel;
