//! Session-level dimension scoring.
//!
//! Seven independent heuristic scorers, each over a fixed list of boolean
//! signals against a session snapshot. Points scale with the fraction of
//! true signals; an empty session scores 0 everywhere and grades F. The one
//! exception is hypothesis kill rate, which penalizes "static" sessions -
//! hypotheses on the board that nothing has ever moved or killed are worse
//! than no hypotheses at all.

use serde::Serialize;

use crucible_types::{
    ActionTaken, AssumptionStatus, AssumptionType, CritiqueStatus, HypothesisOrigin,
    HypothesisStatus, SessionSnapshot, TestStage,
};

/// Flat deduction for a static session (hypotheses exist, zero transitions,
/// zero kills).
const STATIC_SESSION_PENALTY: f64 = 5.0;

const PARADOX_LANGUAGE: &[&str] = &[
    "paradox",
    "puzzle",
    "surprising",
    "unexpected",
    "contradict",
    "inconsistent",
    "anomal",
    "doesn't fit",
    "should not",
    "shouldn't",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    ParadoxGrounding,
    HypothesisKillRate,
    TestDiscriminability,
    AssumptionTracking,
    ThirdAlternativeDiscovery,
    ExperimentalFeasibility,
    AdversarialPressure,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::ParadoxGrounding,
        Dimension::HypothesisKillRate,
        Dimension::TestDiscriminability,
        Dimension::AssumptionTracking,
        Dimension::ThirdAlternativeDiscovery,
        Dimension::ExperimentalFeasibility,
        Dimension::AdversarialPressure,
    ];

    #[must_use]
    pub fn max_points(self) -> f64 {
        match self {
            Dimension::ParadoxGrounding
            | Dimension::HypothesisKillRate
            | Dimension::TestDiscriminability
            | Dimension::AdversarialPressure => 20.0,
            Dimension::AssumptionTracking | Dimension::ThirdAlternativeDiscovery => 15.0,
            Dimension::ExperimentalFeasibility => 10.0,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::ParadoxGrounding => "paradox_grounding",
            Dimension::HypothesisKillRate => "hypothesis_kill_rate",
            Dimension::TestDiscriminability => "test_discriminability",
            Dimension::AssumptionTracking => "assumption_tracking",
            Dimension::ThirdAlternativeDiscovery => "third_alternative_discovery",
            Dimension::ExperimentalFeasibility => "experimental_feasibility",
            Dimension::AdversarialPressure => "adversarial_pressure",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One boolean heuristic inside a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub name: &'static str,
    pub present: bool,
}

impl Signal {
    fn new(name: &'static str, present: bool) -> Self {
        Self { name, present }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    pub dimension: Dimension,
    pub points: f64,
    pub max_points: f64,
    /// Of `max_points`, floored at 0 (penalties report 0%).
    pub percentage: f64,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

/// Letter grade from points out of a ceiling. `0/0` grades F.
#[must_use]
pub fn grade_for(points: f64, max_points: f64) -> Grade {
    if max_points <= 0.0 {
        return Grade::F;
    }
    let percentage = (points / max_points * 100.0).max(0.0);
    if percentage >= 90.0 {
        Grade::A
    } else if percentage >= 80.0 {
        Grade::B
    } else if percentage >= 70.0 {
        Grade::C
    } else if percentage >= 60.0 {
        Grade::D
    } else {
        Grade::F
    }
}

/// Aggregate session scorecard across all seven dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionScore {
    pub total_score: f64,
    pub max_score: f64,
    pub grade: Grade,
    pub dimensions: Vec<DimensionScore>,
}

fn from_signals(dimension: Dimension, signals: Vec<Signal>) -> DimensionScore {
    let max_points = dimension.max_points();
    let total = signals.len();
    let hits = signals.iter().filter(|s| s.present).count();
    let points = if total == 0 {
        0.0
    } else {
        max_points * hits as f64 / total as f64
    };
    DimensionScore {
        dimension,
        points,
        max_points,
        percentage: (points / max_points * 100.0).max(0.0),
        signals,
    }
}

fn has_paradox_language(question: &str) -> bool {
    let lowered = question.to_lowercase();
    PARADOX_LANGUAGE.iter().any(|token| lowered.contains(token))
}

/// Is the session grounded in a genuine puzzle rather than a topic?
#[must_use]
pub fn score_paradox_grounding(session: &SessionSnapshot) -> DimensionScore {
    let conflict_named = session
        .anomalies
        .iter()
        .any(|a| a.conflicts_with.description.trim().chars().count() >= 10);
    let signals = vec![
        Signal::new(
            "research question uses paradox or puzzle language",
            has_paradox_language(&session.research_question),
        ),
        Signal::new("at least one anomaly recorded", !session.anomalies.is_empty()),
        Signal::new("an anomaly names what it conflicts with", conflict_named),
        Signal::new(
            "an anomaly is anchored to a source",
            session.anomalies.iter().any(|a| a.source.is_anchored()),
        ),
        Signal::new(
            "a hypothesis was spawned from an anomaly",
            session
                .hypotheses
                .iter()
                .any(|h| h.origin == HypothesisOrigin::AnomalySpawned),
        ),
    ];
    from_signals(Dimension::ParadoxGrounding, signals)
}

/// Do hypotheses actually die here? Static sessions are penalized: a slate
/// nobody has moved is worse than a small slate.
#[must_use]
pub fn score_hypothesis_kill_rate(session: &SessionSnapshot) -> DimensionScore {
    let kills: Vec<_> = session.hypotheses.iter().filter(|h| h.is_killed()).collect();
    let documented_kill = kills
        .iter()
        .any(|h| h.kill.as_ref().is_some_and(|k| !k.reason.trim().is_empty()));
    let test_triggered_kill = kills
        .iter()
        .any(|h| h.kill.as_ref().is_some_and(|k| k.triggered_by_test.is_some()));
    let any_moved = !session.transitions.is_empty()
        || session
            .hypotheses
            .iter()
            .any(|h| h.status != HypothesisStatus::Proposed);

    let signals = vec![
        Signal::new("at least one hypothesis killed", !kills.is_empty()),
        Signal::new("a kill has a documented reason", documented_kill),
        Signal::new("a kill was triggered by a test", test_triggered_kill),
        Signal::new(
            "the transition log records hypothesis movement",
            !session.transitions.is_empty(),
        ),
    ];

    if !session.hypotheses.is_empty() && kills.is_empty() && !any_moved {
        let max_points = Dimension::HypothesisKillRate.max_points();
        return DimensionScore {
            dimension: Dimension::HypothesisKillRate,
            points: -STATIC_SESSION_PENALTY,
            max_points,
            percentage: 0.0,
            signals,
        };
    }
    from_signals(Dimension::HypothesisKillRate, signals)
}

/// Do the tests tell the hypotheses apart?
#[must_use]
pub fn score_test_discriminability(session: &SessionSnapshot) -> DimensionScore {
    let signals = vec![
        Signal::new("at least one test designed", !session.tests.is_empty()),
        Signal::new(
            "a test discriminates between two or more hypotheses",
            session.tests.iter().any(|t| t.discriminates.len() >= 2),
        ),
        Signal::new(
            "every test names a hypothesis it bears on",
            !session.tests.is_empty()
                && session.tests.iter().all(|t| !t.discriminates.is_empty()),
        ),
        Signal::new(
            "a test carries a potency check",
            session.tests.iter().any(|t| t.has_potency_check),
        ),
    ];
    from_signals(Dimension::TestDiscriminability, signals)
}

/// Is the assumption ledger alive - declared, loaded, and checked?
#[must_use]
pub fn score_assumption_tracking(session: &SessionSnapshot) -> DimensionScore {
    let checked = session.assumptions.iter().any(|a| {
        matches!(
            a.status,
            AssumptionStatus::Verified | AssumptionStatus::Falsified
        )
    });
    let signals = vec![
        Signal::new("at least one assumption recorded", !session.assumptions.is_empty()),
        Signal::new(
            "a scale_physics assumption is present",
            session
                .assumptions
                .iter()
                .any(|a| a.kind == AssumptionType::ScalePhysics),
        ),
        Signal::new(
            "an assumption declares its load",
            session.assumptions.iter().any(|a| !a.load.is_empty()),
        ),
        Signal::new("an assumption has been verified or falsified", checked),
        Signal::new(
            "a falsified assumption is on record",
            session
                .assumptions
                .iter()
                .any(|a| a.status == AssumptionStatus::Falsified),
        ),
    ];
    from_signals(Dimension::AssumptionTracking, signals)
}

/// Did anyone find a structurally distinct third explanation?
#[must_use]
pub fn score_third_alternative_discovery(session: &SessionSnapshot) -> DimensionScore {
    let signals = vec![
        Signal::new(
            "a third-alternative hypothesis is on the slate",
            session
                .hypotheses
                .iter()
                .any(|h| h.origin == HypothesisOrigin::ThirdAlternative),
        ),
        Signal::new(
            "a critique proposes an alternative",
            session
                .critiques
                .iter()
                .any(|c| c.proposed_alternative.is_some()),
        ),
        Signal::new(
            "a proposed alternative is specific",
            session
                .critiques
                .iter()
                .any(|c| c.alternative_specificity() >= 2),
        ),
        Signal::new("the slate holds three or more hypotheses", session.hypotheses.len() >= 3),
    ];
    from_signals(Dimension::ThirdAlternativeDiscovery, signals)
}

/// Could the designed tests actually be run?
#[must_use]
pub fn score_experimental_feasibility(session: &SessionSnapshot) -> DimensionScore {
    let signals = vec![
        Signal::new(
            "a test documents feasibility",
            session.tests.iter().any(|t| {
                t.feasibility_notes
                    .as_deref()
                    .is_some_and(|n| !n.trim().is_empty())
            }),
        ),
        Signal::new(
            "a test has moved past design",
            session
                .tests
                .iter()
                .any(|t| matches!(t.stage, TestStage::Running | TestStage::Complete)),
        ),
        Signal::new(
            "a test has produced an evidence score",
            session.tests.iter().any(|t| t.evidence_score.is_some()),
        ),
    ];
    from_signals(Dimension::ExperimentalFeasibility, signals)
}

/// Is anything under real attack?
#[must_use]
pub fn score_adversarial_pressure(session: &SessionSnapshot) -> DimensionScore {
    let distinct_targets = {
        let mut kinds: Vec<&str> = session.critiques.iter().map(|c| c.target.kind()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        kinds.len()
    };
    let signals = vec![
        Signal::new("at least one critique raised", !session.critiques.is_empty()),
        Signal::new("critiques hit two or more target types", distinct_targets >= 2),
        Signal::new(
            "a critique has been settled",
            session
                .critiques
                .iter()
                .any(|c| c.status != CritiqueStatus::Active),
        ),
        Signal::new(
            "every critique states confirming evidence",
            !session.critiques.is_empty()
                && session
                    .critiques
                    .iter()
                    .all(|c| !c.evidence_to_confirm.trim().is_empty()),
        ),
        Signal::new(
            "a critique led to an action",
            session.critiques.iter().any(|c| {
                c.response
                    .as_ref()
                    .is_some_and(|r| r.action_taken != ActionTaken::None)
            }),
        ),
    ];
    from_signals(Dimension::AdversarialPressure, signals)
}

fn score_dimension(dimension: Dimension, session: &SessionSnapshot) -> DimensionScore {
    match dimension {
        Dimension::ParadoxGrounding => score_paradox_grounding(session),
        Dimension::HypothesisKillRate => score_hypothesis_kill_rate(session),
        Dimension::TestDiscriminability => score_test_discriminability(session),
        Dimension::AssumptionTracking => score_assumption_tracking(session),
        Dimension::ThirdAlternativeDiscovery => score_third_alternative_discovery(session),
        Dimension::ExperimentalFeasibility => score_experimental_feasibility(session),
        Dimension::AdversarialPressure => score_adversarial_pressure(session),
    }
}

/// Score all seven dimensions and grade the session. Total ceiling 120.
#[must_use]
pub fn score_session(session: &SessionSnapshot) -> SessionScore {
    let dimensions: Vec<DimensionScore> = Dimension::ALL
        .iter()
        .map(|d| score_dimension(*d, session))
        .collect();
    let total_score: f64 = dimensions.iter().map(|d| d.points).sum();
    let max_score: f64 = dimensions.iter().map(|d| d.max_points).sum();
    let grade = grade_for(total_score, max_score);
    tracing::debug!(
        session = %session.session_id,
        total = total_score,
        %grade,
        "scored session"
    );
    SessionScore {
        total_score,
        max_score,
        grade,
        dimensions,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Dimension, Grade, grade_for, score_hypothesis_kill_rate, score_paradox_grounding,
        score_session, score_test_discriminability,
    };
    use crucible_types::{
        HypothesisId, HypothesisOrigin, HypothesisRecord, HypothesisStatus, SessionId,
        SessionSnapshot,
    };

    fn empty() -> SessionSnapshot {
        SessionSnapshot::empty(SessionId::parse("RS1").unwrap())
    }

    fn hypothesis(raw: &str, status: HypothesisStatus) -> HypothesisRecord {
        HypothesisRecord {
            id: HypothesisId::parse(raw).unwrap(),
            status,
            origin: HypothesisOrigin::Original,
            kill: None,
        }
    }

    #[test]
    fn dimension_ceilings_total_120() {
        let total: f64 = Dimension::ALL.iter().map(|d| d.max_points()).sum();
        assert_eq!(total, 120.0);
    }

    #[test]
    fn empty_session_scores_zero_everywhere_and_grades_f() {
        let score = score_session(&empty());
        assert_eq!(score.total_score, 0.0);
        assert_eq!(score.max_score, 120.0);
        assert_eq!(score.grade, Grade::F);
        for dimension in &score.dimensions {
            assert_eq!(dimension.points, 0.0, "{} should be 0", dimension.dimension);
        }
    }

    #[test]
    fn static_sessions_are_penalized_below_empty() {
        let mut session = empty();
        session
            .hypotheses
            .push(hypothesis("H-RS1-001", HypothesisStatus::Proposed));
        session
            .hypotheses
            .push(hypothesis("H-RS1-002", HypothesisStatus::Proposed));

        let score = score_hypothesis_kill_rate(&session);
        assert!(score.points < 0.0);
        assert_eq!(score.percentage, 0.0);
    }

    #[test]
    fn movement_lifts_the_static_penalty() {
        let mut session = empty();
        session
            .hypotheses
            .push(hypothesis("H-RS1-001", HypothesisStatus::Weakened));
        let score = score_hypothesis_kill_rate(&session);
        assert!(score.points >= 0.0);
    }

    #[test]
    fn paradox_language_is_case_insensitive() {
        let mut session = empty();
        session.research_question = "A PARADOX in axon transport".to_owned();
        let score = score_paradox_grounding(&session);
        assert!(score.signals[0].present);
    }

    #[test]
    fn vacuous_all_quantifiers_do_not_fire_on_empty_collections() {
        let score = score_test_discriminability(&empty());
        let every_test = score
            .signals
            .iter()
            .find(|s| s.name.starts_with("every test"))
            .unwrap();
        assert!(!every_test.present);
    }

    #[test]
    fn grade_breakpoints() {
        assert_eq!(grade_for(108.0, 120.0), Grade::A);
        assert_eq!(grade_for(96.0, 120.0), Grade::B);
        assert_eq!(grade_for(84.0, 120.0), Grade::C);
        assert_eq!(grade_for(72.0, 120.0), Grade::D);
        assert_eq!(grade_for(71.9, 120.0), Grade::F);
        assert_eq!(grade_for(0.0, 0.0), Grade::F);
        assert_eq!(grade_for(-5.0, 120.0), Grade::F);
    }
}
