//! Dashboard projection over a program with real entity lifecycles behind
//! it: a falsified assumption, a settled critique, and a partially-covered
//! test suite.

use crucible_registry::{Severity, blast_radius, compute_program_dashboard};
use crucible_types::{
    ActionTaken, Assumption, AssumptionId, AssumptionInput, AssumptionLoad, AssumptionType,
    Critique, CritiqueId, CritiqueInput, CritiqueResponse, CritiqueTarget, HypothesisId,
    HypothesisOrigin, HypothesisRecord, HypothesisStatus, ProgramId, ProgramInput,
    ResearchProgram, SessionId, SessionSnapshot, TestId, TestRecord, TestStage,
};

fn fixture() -> (ResearchProgram, Vec<SessionSnapshot>) {
    let session_id = SessionId::parse("RS3").unwrap();
    let program = ResearchProgram::create(
        ProgramId::parse("RP-membrane-001").unwrap(),
        ProgramInput {
            goal: "Explain anomalous membrane conductance".to_owned(),
            sessions: vec![session_id.clone()],
        },
    )
    .unwrap();

    let mut session = SessionSnapshot::empty(session_id.clone());
    session.research_question = "Why does conductance rise as channels close?".to_owned();

    session.hypotheses.push(HypothesisRecord {
        id: HypothesisId::parse("H-RS3-001").unwrap(),
        status: HypothesisStatus::Active,
        origin: HypothesisOrigin::Original,
        kill: None,
    });

    let assumption = Assumption::create(
        AssumptionId::parse("A-RS3-001").unwrap(),
        AssumptionInput {
            session_id: session_id.clone(),
            statement: "Leak current is negligible at the holding potential".to_owned(),
            kind: AssumptionType::Methodological,
            criticality: None,
            load: AssumptionLoad {
                affected_hypotheses: vec![HypothesisId::parse("H-RS3-001").unwrap()],
                affected_tests: vec![TestId::parse("T-RS3-001").unwrap()],
                description: "all conductance is attributed to the channel of interest".to_owned(),
            },
            calculation: None,
        },
    )
    .unwrap()
    .falsify()
    .unwrap();
    session.assumptions.push(assumption);

    let critique = Critique::create(
        CritiqueId::parse("C-RS3-001").unwrap(),
        CritiqueInput {
            session_id,
            target: CritiqueTarget::Assumption(AssumptionId::parse("A-RS3-001").unwrap()),
            attack: "The leak subtraction protocol was never run on these recordings".to_owned(),
            evidence_to_confirm: "P/4 subtraction traces for every cell".to_owned(),
            proposed_alternative: None,
        },
    )
    .unwrap()
    .accept(CritiqueResponse {
        action_taken: ActionTaken::Modified,
        new_test_id: None,
    })
    .unwrap();
    session.critiques.push(critique);

    session.tests.push(TestRecord {
        id: TestId::parse("T-RS3-001").unwrap(),
        stage: TestStage::Running,
        discriminates: vec![HypothesisId::parse("H-RS3-001").unwrap()],
        has_potency_check: false,
        potency_evidence: None,
        feasibility_notes: None,
        evidence_score: None,
    });

    (program, vec![session])
}

#[test]
fn falsified_assumption_with_live_hypotheses_is_critical() {
    let (program, sessions) = fixture();
    let dashboard = compute_program_dashboard(&program, &sessions);
    assert!(dashboard
        .warnings
        .iter()
        .any(|w| w.severity == Severity::Critical && w.message.contains("A-RS3-001")));
}

#[test]
fn blast_radius_matches_the_dashboard_inputs() {
    let (_, sessions) = fixture();
    let session = &sessions[0];
    let impact = blast_radius(&session.assumptions[0], &session.critiques);
    assert_eq!(impact.affected_hypotheses.len(), 1);
    assert_eq!(impact.affected_tests.len(), 1);
    assert_eq!(impact.critiques.len(), 1);
}

#[test]
fn registries_count_by_status() {
    let (program, sessions) = fixture();
    let dashboard = compute_program_dashboard(&program, &sessions);
    assert_eq!(dashboard.assumptions.total, 1);
    assert_eq!(dashboard.assumptions.by_status.get("falsified"), Some(&1));
    assert_eq!(dashboard.critiques.by_status.get("accepted"), Some(&1));
    assert_eq!(dashboard.anomalies.total, 0);
}

#[test]
fn timeline_is_chronological_and_covers_every_lifecycle_event() {
    let (program, sessions) = fixture();
    let dashboard = compute_program_dashboard(&program, &sessions);
    assert!(dashboard.timeline.len() >= 4);
    for pair in dashboard.timeline.windows(2) {
        assert!(pair[0].at <= pair[1].at);
    }
}

#[test]
fn dashboard_serializes_camel_case() {
    let (program, sessions) = fixture();
    let raw = serde_json::to_value(compute_program_dashboard(&program, &sessions)).unwrap();
    assert_eq!(raw["program"], "RP-membrane-001");
    assert!(raw["hypotheses"].get("thirdAlternative").is_some());
    assert!(raw["tests"].get("potencyCoverage").is_some());
    assert_eq!(raw["assumptions"]["byStatus"]["falsified"], 1);
    assert_eq!(raw["warnings"][0]["severity"], "caution");
    assert!(raw["timeline"][0].get("entityId").is_some());
}

#[test]
fn recomputation_is_stable() {
    let (program, sessions) = fixture();
    let first = compute_program_dashboard(&program, &sessions);
    let second = compute_program_dashboard(&program, &sessions);
    assert_eq!(first, second);
}
