//! One-call contribution scoring: rubric composite plus gates.

use serde::Serialize;

use crate::gates::{ContributionRecord, GateReport, check_pass_fail_gates};
use crate::rubric::{Role, RoleCriteria, UniversalCriteria, calculate_role_score};

/// The full per-contribution scorecard. Derived, never stored as
/// authoritative state: recomputing from the same inputs gives the same
/// value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionScore {
    pub role: Role,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub gates: GateReport,
    /// Critic only: scale-check rigor, echoed for the warning layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_rigor: Option<u8>,
    /// Test designer only: potency-check criterion, echoed for the warning
    /// layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potency_check: Option<u8>,
}

/// Score one contribution end to end. Never fails; gate failures and low
/// composites are reported inside the result.
#[must_use]
pub fn score_contribution(
    record: &ContributionRecord,
    universal: UniversalCriteria,
    criteria: RoleCriteria,
) -> ContributionScore {
    let rubric = calculate_role_score(universal, criteria);
    let gates = check_pass_fail_gates(record);

    let scale_rigor = match criteria {
        RoleCriteria::AdversarialCritic(s) => Some(s.scale_rigor.min(3)),
        RoleCriteria::HypothesisGenerator(_) | RoleCriteria::TestDesigner(_) => None,
    };
    let potency_check = match criteria {
        RoleCriteria::TestDesigner(s) => Some(s.potency_check.min(3)),
        RoleCriteria::HypothesisGenerator(_) | RoleCriteria::AdversarialCritic(_) => None,
    };

    let score = ContributionScore {
        role: criteria.role(),
        score: rubric.score,
        max_score: rubric.max_score,
        percentage: rubric.percentage(),
        gates,
        scale_rigor,
        potency_check,
    };
    tracing::debug!(
        role = %score.role,
        score = score.score,
        max = score.max_score,
        passed = score.gates.passed,
        "scored contribution"
    );
    score
}
