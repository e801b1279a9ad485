//! Advisory warnings.
//!
//! Warnings coach; gates fail. A contribution can pass every gate and still
//! collect warnings, and a failed contribution still gets its warnings so
//! the feedback is complete in one pass.

use serde::Serialize;

use crate::contribution::ContributionScore;
use crate::rubric::Role;

/// Composite percentage below this draws a warning.
const LOW_COMPOSITE_THRESHOLD: f64 = 50.0;
/// Test-designer potency criterion below this draws a warning.
const WEAK_POTENCY_THRESHOLD: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreWarning {
    /// Criterion key for criterion-specific coaching, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criterion: Option<&'static str>,
    pub message: String,
    /// Short illustrative quotation for user-facing coaching. Never feeds
    /// back into scoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<&'static str>,
}

/// Coaching quotations keyed by criterion name.
fn example_for(criterion: &str) -> Option<&'static str> {
    match criterion {
        "scale_rigor" => Some(
            "\"At D = 1e-9 m^2/s, diffusion covers ~8 um in 60 s - an order of \
             magnitude short of the observed 100 um.\"",
        ),
        "potency_check" => Some(
            "\"The spike-in control must show a band in every lane; a blank \
             treated lane is then a real negative, not a failed assay.\"",
        ),
        _ => None,
    }
}

/// Threshold-based advisory warnings for one scored contribution.
#[must_use]
pub fn generate_warnings(score: &ContributionScore) -> Vec<ScoreWarning> {
    let mut warnings = Vec::new();

    if score.percentage < LOW_COMPOSITE_THRESHOLD {
        warnings.push(ScoreWarning {
            criterion: None,
            message: format!(
                "composite score {:.0}% is below {LOW_COMPOSITE_THRESHOLD:.0}%",
                score.percentage
            ),
            example: None,
        });
    }

    if score.role == Role::AdversarialCritic && score.scale_rigor == Some(0) {
        warnings.push(ScoreWarning {
            criterion: Some("scale_rigor"),
            message: "critique carries no scale check: even a one-line order-of-magnitude \
                      estimate strengthens the attack"
                .to_owned(),
            example: example_for("scale_rigor"),
        });
    }

    if score.role == Role::TestDesigner
        && score
            .potency_check
            .is_some_and(|potency| potency < WEAK_POTENCY_THRESHOLD)
    {
        warnings.push(ScoreWarning {
            criterion: Some("potency_check"),
            message: "potency check is weak: spell out how a negative result would be \
                      distinguished from assay failure"
                .to_owned(),
            example: example_for("potency_check"),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::generate_warnings;
    use crate::contribution::ContributionScore;
    use crate::gates::GateReport;
    use crate::rubric::Role;

    fn score(role: Role, percentage: f64) -> ContributionScore {
        ContributionScore {
            role,
            score: percentage / 100.0 * 20.0,
            max_score: 20.0,
            percentage,
            gates: GateReport { passed: true, failures: vec![] },
            scale_rigor: None,
            potency_check: None,
        }
    }

    #[test]
    fn no_warnings_for_a_strong_contribution() {
        assert!(generate_warnings(&score(Role::HypothesisGenerator, 85.0)).is_empty());
    }

    #[test]
    fn low_composite_warns_for_any_role() {
        let warnings = generate_warnings(&score(Role::HypothesisGenerator, 40.0));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("40%"));
        assert!(warnings[0].criterion.is_none());
    }

    #[test]
    fn zero_scale_rigor_warns_critics_with_a_quote() {
        let mut critic = score(Role::AdversarialCritic, 80.0);
        critic.scale_rigor = Some(0);
        let warnings = generate_warnings(&critic);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].criterion, Some("scale_rigor"));
        assert!(warnings[0].example.is_some());
    }

    #[test]
    fn weak_potency_warns_designers_only() {
        let mut designer = score(Role::TestDesigner, 80.0);
        designer.potency_check = Some(1);
        let warnings = generate_warnings(&designer);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].criterion, Some("potency_check"));

        designer.potency_check = Some(2);
        assert!(generate_warnings(&designer).is_empty());
    }

    #[test]
    fn warnings_stack() {
        let mut critic = score(Role::AdversarialCritic, 30.0);
        critic.scale_rigor = Some(0);
        assert_eq!(generate_warnings(&critic).len(), 2);
    }
}
