//! Per-contribution rubric scoring.
//!
//! Three contributor roles share three universal criteria and add role
//! specific ones. Every criterion is an integer 0-3 (0-2 for the conditional
//! ones) multiplied by a fixed weight; the composite is the weighted sum.
//! When a conditional criterion does not apply - no paradox to exploit, no
//! kill performed - its weighted maximum leaves the ceiling too, so
//! percentages stay meaningful. Scoring never fails: raw inputs are clamped,
//! never rejected.

use serde::{Deserialize, Serialize};

// Universal weights (all roles).
const W_STRUCTURAL: f64 = 1.0;
const W_CITATION: f64 = 1.0;
const W_RATIONALE: f64 = 0.5;

// Hypothesis generator.
const W_THIRD_ALTERNATIVE: f64 = 2.0;
const W_MECHANISM: f64 = 1.0;
const W_FALSIFIABILITY: f64 = 0.5;
const W_PARADOX: f64 = 0.5;

// Test designer.
const W_DISCRIMINATIVE: f64 = 2.0;
const W_POTENCY: f64 = 1.5;
const W_RESULT_MAPPING: f64 = 1.0;
const W_FEASIBILITY: f64 = 0.5;

// Adversarial critic.
const W_ATTACK: f64 = 2.0;
const W_EVIDENCE: f64 = 1.0;
const W_ALTERNATIVE: f64 = 1.0;
const W_SCALE_RIGOR: f64 = 0.5;
const W_KILL: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    HypothesisGenerator,
    TestDesigner,
    AdversarialCritic,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::HypothesisGenerator => "hypothesis_generator",
            Role::TestDesigner => "test_designer",
            Role::AdversarialCritic => "adversarial_critic",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three criteria every contribution is scored on, each 0-3.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversalCriteria {
    pub structural: u8,
    pub citation: u8,
    pub rationale: u8,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisGeneratorCriteria {
    /// A structurally distinct third explanation, not a blend. 0-3.
    pub third_alternative: u8,
    /// Mechanism plausibility. 0-3.
    pub mechanism: u8,
    /// Falsifiability of the slate. 0-3.
    pub falsifiability: u8,
    /// Paradox exploitation, 0-2. `None` when the session offers no paradox.
    pub paradox_exploitation: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDesignerCriteria {
    /// Discriminative power across the hypothesis slate. 0-3.
    pub discriminative_power: u8,
    /// Potency check quality. 0-3.
    pub potency_check: u8,
    /// Anticipated-result mapping, 0-2.
    pub result_mapping: u8,
    /// Experimental feasibility. 0-3.
    pub feasibility: u8,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdversarialCriticCriteria {
    /// Attack specificity. 0-3.
    pub attack_specificity: u8,
    /// Quality of the evidence-to-confirm statement. 0-3.
    pub evidence_quality: u8,
    /// Constructive alternative specificity. 0-3.
    pub constructive_alternative: u8,
    /// Scale-check rigor. 0-3.
    pub scale_rigor: u8,
    /// Theory-kill justification, 0-3. `None` when no kill was performed.
    pub kill_justification: Option<u8>,
}

/// Role-specific criteria, dispatched exhaustively by role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleCriteria {
    HypothesisGenerator(HypothesisGeneratorCriteria),
    TestDesigner(TestDesignerCriteria),
    AdversarialCritic(AdversarialCriticCriteria),
}

impl RoleCriteria {
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            RoleCriteria::HypothesisGenerator(_) => Role::HypothesisGenerator,
            RoleCriteria::TestDesigner(_) => Role::TestDesigner,
            RoleCriteria::AdversarialCritic(_) => Role::AdversarialCritic,
        }
    }
}

/// Weighted composite and the (conditionally reduced) ceiling it is out of.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricScore {
    pub score: f64,
    pub max_score: f64,
}

impl RubricScore {
    /// Percentage of the applicable ceiling; 0 when the ceiling is 0.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.max_score > 0.0 {
            self.score / self.max_score * 100.0
        } else {
            0.0
        }
    }
}

/// One weighted criterion: clamp the raw value, weight it, and account for
/// its contribution to the ceiling.
fn criterion(score: &mut f64, max: &mut f64, raw: u8, cap: u8, weight: f64) {
    *score += f64::from(raw.min(cap)) * weight;
    *max += f64::from(cap) * weight;
}

fn universal(score: &mut f64, max: &mut f64, u: UniversalCriteria) {
    criterion(score, max, u.structural, 3, W_STRUCTURAL);
    criterion(score, max, u.citation, 3, W_CITATION);
    criterion(score, max, u.rationale, 3, W_RATIONALE);
}

/// Nominal ceiling 19.0; 18.0 when paradox exploitation is inapplicable.
#[must_use]
pub fn calculate_hypothesis_generator_score(
    u: UniversalCriteria,
    s: HypothesisGeneratorCriteria,
) -> RubricScore {
    let (mut score, mut max) = (0.0, 0.0);
    universal(&mut score, &mut max, u);
    criterion(&mut score, &mut max, s.third_alternative, 3, W_THIRD_ALTERNATIVE);
    criterion(&mut score, &mut max, s.mechanism, 3, W_MECHANISM);
    criterion(&mut score, &mut max, s.falsifiability, 3, W_FALSIFIABILITY);
    if let Some(paradox) = s.paradox_exploitation {
        criterion(&mut score, &mut max, paradox, 2, W_PARADOX);
    }
    RubricScore { score, max_score: max }
}

/// Nominal ceiling 21.5.
#[must_use]
pub fn calculate_test_designer_score(
    u: UniversalCriteria,
    s: TestDesignerCriteria,
) -> RubricScore {
    let (mut score, mut max) = (0.0, 0.0);
    universal(&mut score, &mut max, u);
    criterion(&mut score, &mut max, s.discriminative_power, 3, W_DISCRIMINATIVE);
    criterion(&mut score, &mut max, s.potency_check, 3, W_POTENCY);
    criterion(&mut score, &mut max, s.result_mapping, 2, W_RESULT_MAPPING);
    criterion(&mut score, &mut max, s.feasibility, 3, W_FEASIBILITY);
    RubricScore { score, max_score: max }
}

/// Nominal ceiling 25.5 with an applicable kill, 21.0 without.
#[must_use]
pub fn calculate_adversarial_critic_score(
    u: UniversalCriteria,
    s: AdversarialCriticCriteria,
) -> RubricScore {
    let (mut score, mut max) = (0.0, 0.0);
    universal(&mut score, &mut max, u);
    criterion(&mut score, &mut max, s.attack_specificity, 3, W_ATTACK);
    criterion(&mut score, &mut max, s.evidence_quality, 3, W_EVIDENCE);
    criterion(&mut score, &mut max, s.constructive_alternative, 3, W_ALTERNATIVE);
    criterion(&mut score, &mut max, s.scale_rigor, 3, W_SCALE_RIGOR);
    if let Some(kill) = s.kill_justification {
        criterion(&mut score, &mut max, kill, 3, W_KILL);
    }
    RubricScore { score, max_score: max }
}

/// Dispatch to the role's calculator.
#[must_use]
pub fn calculate_role_score(u: UniversalCriteria, criteria: RoleCriteria) -> RubricScore {
    match criteria {
        RoleCriteria::HypothesisGenerator(s) => calculate_hypothesis_generator_score(u, s),
        RoleCriteria::TestDesigner(s) => calculate_test_designer_score(u, s),
        RoleCriteria::AdversarialCritic(s) => calculate_adversarial_critic_score(u, s),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AdversarialCriticCriteria, HypothesisGeneratorCriteria, Role, RoleCriteria,
        TestDesignerCriteria, UniversalCriteria, calculate_adversarial_critic_score,
        calculate_hypothesis_generator_score, calculate_role_score, calculate_test_designer_score,
    };

    fn max_universal() -> UniversalCriteria {
        UniversalCriteria {
            structural: 3,
            citation: 3,
            rationale: 3,
        }
    }

    #[test]
    fn hypothesis_generator_ceiling_is_19() {
        let result = calculate_hypothesis_generator_score(
            max_universal(),
            HypothesisGeneratorCriteria {
                third_alternative: 3,
                mechanism: 3,
                falsifiability: 3,
                paradox_exploitation: Some(2),
            },
        );
        assert_eq!(result.score, 19.0);
        assert_eq!(result.max_score, 19.0);
        assert_eq!(result.percentage(), 100.0);
    }

    #[test]
    fn inapplicable_paradox_reduces_the_ceiling() {
        let result = calculate_hypothesis_generator_score(
            max_universal(),
            HypothesisGeneratorCriteria {
                third_alternative: 3,
                mechanism: 3,
                falsifiability: 3,
                paradox_exploitation: None,
            },
        );
        assert_eq!(result.score, 18.0);
        assert_eq!(result.max_score, 18.0);
    }

    #[test]
    fn test_designer_ceiling_is_21_5() {
        let result = calculate_test_designer_score(
            max_universal(),
            TestDesignerCriteria {
                discriminative_power: 3,
                potency_check: 3,
                result_mapping: 2,
                feasibility: 3,
            },
        );
        assert_eq!(result.score, 21.5);
        assert_eq!(result.max_score, 21.5);
    }

    #[test]
    fn critic_ceiling_depends_on_kill_applicability() {
        let with_kill = calculate_adversarial_critic_score(
            max_universal(),
            AdversarialCriticCriteria {
                attack_specificity: 3,
                evidence_quality: 3,
                constructive_alternative: 3,
                scale_rigor: 3,
                kill_justification: Some(3),
            },
        );
        assert_eq!(with_kill.score, 25.5);
        assert_eq!(with_kill.max_score, 25.5);

        let without_kill = calculate_adversarial_critic_score(
            max_universal(),
            AdversarialCriticCriteria {
                attack_specificity: 3,
                evidence_quality: 3,
                constructive_alternative: 3,
                scale_rigor: 3,
                kill_justification: None,
            },
        );
        assert_eq!(without_kill.score, 21.0);
        assert_eq!(without_kill.max_score, 21.0);
    }

    #[test]
    fn raw_inputs_clamp_instead_of_failing() {
        let result = calculate_hypothesis_generator_score(
            UniversalCriteria {
                structural: 200,
                citation: 3,
                rationale: 3,
            },
            HypothesisGeneratorCriteria {
                third_alternative: 3,
                mechanism: 3,
                falsifiability: 3,
                paradox_exploitation: Some(5),
            },
        );
        assert_eq!(result.score, 19.0);
    }

    #[test]
    fn zero_criteria_score_zero_against_the_full_ceiling() {
        let result = calculate_test_designer_score(
            UniversalCriteria::default(),
            TestDesignerCriteria::default(),
        );
        assert_eq!(result.score, 0.0);
        assert_eq!(result.max_score, 21.5);
        assert_eq!(result.percentage(), 0.0);
    }

    #[test]
    fn role_dispatch_matches_direct_calls() {
        let criteria = RoleCriteria::AdversarialCritic(AdversarialCriticCriteria {
            attack_specificity: 2,
            evidence_quality: 1,
            constructive_alternative: 0,
            scale_rigor: 1,
            kill_justification: None,
        });
        assert_eq!(criteria.role(), Role::AdversarialCritic);
        let via_dispatch = calculate_role_score(max_universal(), criteria);
        let RoleCriteria::AdversarialCritic(s) = criteria else {
            unreachable!()
        };
        let direct = calculate_adversarial_critic_score(max_universal(), s);
        assert_eq!(via_dispatch, direct);
    }
}
