//! Blast radius for falsified (or about-to-be-falsified) assumptions.
//!
//! The load an assumption carries is declared on the assumption itself;
//! nothing here resolves those ids against a store. The impact set reports
//! what the declaration and the critique registry say, and the caller
//! decides what to do with the named hypotheses and tests.

use serde::Serialize;

use crucible_types::{
    Assumption, AssumptionId, AssumptionType, Critique, CritiqueId, CritiqueTarget, HypothesisId,
    TestId,
};

/// Everything a single assumption drags down with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSet {
    pub assumption: AssumptionId,
    /// Hypotheses declared in the assumption's load.
    pub affected_hypotheses: Vec<HypothesisId>,
    /// Tests declared in the assumption's load.
    pub affected_tests: Vec<TestId>,
    /// Critiques that attack this assumption directly.
    pub critiques: Vec<CritiqueId>,
}

impl ImpactSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.affected_hypotheses.is_empty()
            && self.affected_tests.is_empty()
            && self.critiques.is_empty()
    }
}

/// Compute the impact set of an assumption from its declared load plus the
/// critiques targeting it. Pure; recomputable at any time.
#[must_use]
pub fn blast_radius(assumption: &Assumption, critiques: &[Critique]) -> ImpactSet {
    let targeting: Vec<CritiqueId> = critiques
        .iter()
        .filter(|c| match &c.target {
            CritiqueTarget::Assumption(id) => *id == assumption.id,
            _ => false,
        })
        .map(|c| c.id.clone())
        .collect();
    ImpactSet {
        assumption: assumption.id.clone(),
        affected_hypotheses: assumption.load.affected_hypotheses.clone(),
        affected_tests: assumption.load.affected_tests.clone(),
        critiques: targeting,
    }
}

/// Whether the ledger is missing a scale-physics sanity check entirely.
#[must_use]
pub fn missing_scale_physics(assumptions: &[Assumption]) -> bool {
    !assumptions
        .iter()
        .any(|a| a.kind == AssumptionType::ScalePhysics)
}
