//! Evaluation pipeline.
//!
//! ```text
//! snapshot ─► ratios ─┬─► altman / piotroski / financial health ──────────┐
//!                     ├─► wacc ─► classification ─► dcf ─► sensitivity    ├─► aggregate ─► result
//!                     ├─► graham ─► margins of safety ────────────────────┤
//!                     └─► justified P/E (at the wacc) ────────────────────┘
//! ```
//!
//! Each stage is a pure function of its inputs. Nothing is cached between
//! evaluations, so one engine can score any number of snapshots, from any
//! number of threads.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use finscore_common::Validate;

use crate::classifier::{CompanyClassification, CompanyClassifier};
use crate::config::ScoringConfig;
use crate::error::{DataIssue, ModelOutcome, Result};
use crate::ratios::{RatioCalculator, RatioSet};
use crate::risk::{
    financial_health, AltmanModel, AltmanResult, FinancialHealthResult, PiotroskiModel,
    PiotroskiResult,
};
use crate::scoring::{
    annotate, Adjustment, Alert, Category, ExplanationLookup, Metric, ScoreAggregator,
    ScoreBreakdown, ScoringInputs, StaticCatalogue,
};
use crate::sector::Sector;
use crate::snapshot::FinancialSnapshot;
use crate::valuation::{
    graham_number, justified_pe, margin_of_safety, sensitivity_matrix, DcfModel, DcfResult,
    GrahamResult, JustifiedPe, MarginsOfSafety, SensitivityMatrix, WaccModel, WaccResult,
    TERMINAL_SHARE_WARNING,
};

/// Everything computed for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub symbol: String,
    pub sector: Sector,
    pub ratios: RatioSet,
    pub altman: ModelOutcome<AltmanResult>,
    pub piotroski: ModelOutcome<PiotroskiResult>,
    /// Computed for financial-sector companies only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_health: Option<FinancialHealthResult>,
    pub wacc: WaccResult,
    pub dcf: ModelOutcome<DcfResult>,
    pub graham: ModelOutcome<GrahamResult>,
    /// P/E the fundamentals support, discounted at the WACC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justified_pe: Option<JustifiedPe>,
    pub margins_of_safety: MarginsOfSafety,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<SensitivityMatrix>,
    pub classification: CompanyClassification,
    pub score: ScoreBreakdown,
    pub alerts: Vec<Alert>,
    pub adjustments: Vec<Adjustment>,
    pub issues: Vec<DataIssue>,
}

/// Scores snapshots with one validated configuration.
pub struct ScoringEngine {
    config: ScoringConfig,
    ratios: RatioCalculator,
    altman: AltmanModel,
    piotroski: PiotroskiModel,
    wacc: WaccModel,
    dcf: DcfModel,
    classifier: CompanyClassifier,
    aggregator: ScoreAggregator,
    explanations: Arc<dyn ExplanationLookup>,
}

impl fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScoringEngine {
    /// Build an engine. Fails when the configuration does not validate.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ratios: RatioCalculator::with_config(&config),
            altman: AltmanModel::with_config(&config),
            piotroski: PiotroskiModel::with_config(&config),
            wacc: WaccModel::with_config(&config),
            dcf: DcfModel::with_config(&config),
            classifier: CompanyClassifier::new(),
            aggregator: ScoreAggregator::with_config(config.clone()),
            explanations: Arc::new(StaticCatalogue),
            config,
        })
    }

    /// Replace the explanation catalogue.
    pub fn with_explanations(mut self, explanations: Arc<dyn ExplanationLookup>) -> Self {
        self.explanations = explanations;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Evaluate one snapshot.
    #[tracing::instrument(skip_all, fields(symbol = %snapshot.symbol))]
    pub fn evaluate(&self, snapshot: &FinancialSnapshot) -> EvaluationResult {
        let sector = Sector::resolve(snapshot.sector.as_deref());
        let rules = self.config.rules_for(sector);

        let ratios = self.ratios.calculate(snapshot);
        let altman = self.altman.score(snapshot);
        let piotroski = self.piotroski.score(snapshot);
        let financial_health = (sector == Sector::Financials || rules.use_financial_health)
            .then(|| financial_health(snapshot, &ratios));

        let wacc = self.wacc.estimate(snapshot, &ratios, sector);
        let classification = self
            .classifier
            .classify(snapshot, &ratios, sector, wacc.wacc);

        let dcf_inputs = self
            .dcf
            .inputs(snapshot, &ratios, wacc.wacc, classification.style);
        let dcf = dcf_inputs.clone().and_then(|inputs| self.dcf.run(&inputs));
        let graham = graham_number(&ratios);
        let justified_pe = justified_pe(&ratios, wacc.wacc);

        let price = snapshot.market.price.filter(|p| *p > 0.0);
        let margins_of_safety = MarginsOfSafety {
            dcf: dcf
                .computed()
                .zip(price)
                .and_then(|(result, price)| margin_of_safety(result.fair_value_per_share, price)),
            graham: graham
                .computed()
                .zip(price)
                .and_then(|(result, price)| margin_of_safety(result.graham_number, price)),
        };

        let sensitivity = match (&dcf_inputs, dcf.is_computed()) {
            (ModelOutcome::Computed(inputs), true) if self.config.dcf.sensitivity => {
                Some(sensitivity_matrix(&self.dcf, inputs, price))
            }
            _ => None,
        };

        let card = self.aggregator.aggregate(&ScoringInputs {
            snapshot,
            sector,
            ratios: &ratios,
            altman: &altman,
            piotroski: &piotroski,
            financial_health: financial_health.as_ref(),
            classification: &classification,
            justified_pe: justified_pe.as_ref().map(|j| j.multiple),
        });

        let mut issues: Vec<DataIssue> = [
            altman.issue("altman_z"),
            piotroski.issue("piotroski_f"),
            dcf.issue("dcf"),
            graham.issue("graham_number"),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut alerts = card.alerts;

        if let Some(reason) = snapshot.period_order_issue() {
            tracing::warn!(reason = %reason, "Inconsistent reporting periods");
            issues.push(DataIssue::DegenerateInput {
                model: "snapshot".into(),
                reason,
            });
            alerts.push(Alert::info(Category::Growth, None, "inconsistent_periods"));
        }
        if !altman.is_computed() && !rules.ignore_metrics.contains(&Metric::AltmanZ) {
            alerts.push(Alert::info(
                Category::Solidity,
                Some(Metric::AltmanZ),
                "altman_unavailable",
            ));
        }
        if !piotroski.is_computed() {
            alerts.push(Alert::info(
                Category::EarningsQuality,
                Some(Metric::PiotroskiF),
                "piotroski_unavailable",
            ));
        }
        match dcf.computed() {
            Some(result) => {
                if result.growth.terminal_clamped {
                    alerts.push(Alert::info(Category::Valuation, None, "terminal_growth_clamped"));
                }
                if result.terminal_value_share > TERMINAL_SHARE_WARNING {
                    alerts.push(Alert::info(Category::Valuation, None, "terminal_value_dominant"));
                }
            }
            None => alerts.push(Alert::info(Category::Valuation, None, "dcf_unavailable")),
        }
        for (ratio, missing) in ratios.unavailable() {
            tracing::debug!(ratio = %ratio, missing = ?missing, "Ratio unavailable");
            alerts.push(Alert::ratio_unavailable(ratio, missing));
        }

        annotate(&mut alerts, self.explanations.as_ref());

        tracing::info!(
            total = card.score.total,
            level = %card.score.level,
            style = %classification.style,
            issues = issues.len(),
            "Evaluation complete"
        );

        EvaluationResult {
            symbol: snapshot.symbol.clone(),
            sector,
            ratios,
            altman,
            piotroski,
            financial_health,
            wacc,
            dcf,
            graham,
            justified_pe,
            margins_of_safety,
            sensitivity,
            classification,
            score: card.score,
            alerts,
            adjustments: card.adjustments,
            issues,
        }
    }

    /// Evaluate independent snapshots in parallel. Results keep input order.
    pub fn evaluate_batch(&self, snapshots: &[FinancialSnapshot]) -> Vec<EvaluationResult> {
        snapshots
            .par_iter()
            .map(|snapshot| self.evaluate(snapshot))
            .collect()
    }
}

/// Validate `config` and evaluate one snapshot.
pub fn evaluate(snapshot: &FinancialSnapshot, config: &ScoringConfig) -> Result<EvaluationResult> {
    Ok(ScoringEngine::new(config.clone())?.evaluate(snapshot))
}
