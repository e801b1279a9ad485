//! Program dashboards - funnels, health counts, warnings, and a timeline.
//!
//! A dashboard is a pure projection over a program and its session
//! snapshots. It never mutates anything, never fails, and recomputing it
//! from the same inputs gives the same answer, so callers are free to throw
//! it away and rebuild on every render.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crucible_types::{
    AssumptionStatus, CritiqueStatus, HypothesisOrigin, HypothesisStatus, ProgramId,
    QuarantineStatus, ResearchProgram, SessionSnapshot, TestStage,
};

use crate::load::missing_scale_physics;

/// Hypothesis counts by lifecycle state and by origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisFunnel {
    pub total: usize,
    pub proposed: usize,
    pub active: usize,
    pub weakened: usize,
    pub killed: usize,
    pub supported: usize,
    pub original: usize,
    pub third_alternative: usize,
    pub anomaly_spawned: usize,
}

/// Totals and per-status counts for one entity registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryHealth {
    pub total: usize,
    pub by_status: BTreeMap<&'static str, usize>,
}

impl RegistryHealth {
    fn tally(&mut self, status: &'static str) {
        self.total += 1;
        *self.by_status.entry(status).or_insert(0) += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestExecutionSummary {
    pub total: usize,
    pub designed: usize,
    pub running: usize,
    pub complete: usize,
    /// Fraction of tests carrying a potency check, 0.0 when no tests exist.
    pub potency_coverage: f64,
    pub mean_evidence_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Caution,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthWarning {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AssumptionRecorded,
    AssumptionStatusChanged,
    AnomalyRecorded,
    AnomalyStatusChanged,
    CritiqueRaised,
    CritiqueSettled,
    HypothesisTransition,
}

/// One row of the chronological program timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub at: DateTime<Utc>,
    pub kind: EventKind,
    pub entity_id: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDashboard {
    pub program: ProgramId,
    pub sessions: usize,
    pub hypotheses: HypothesisFunnel,
    pub assumptions: RegistryHealth,
    pub anomalies: RegistryHealth,
    pub critiques: RegistryHealth,
    pub tests: TestExecutionSummary,
    pub warnings: Vec<HealthWarning>,
    pub timeline: Vec<TimelineEvent>,
}

fn hypothesis_funnel(sessions: &[SessionSnapshot]) -> HypothesisFunnel {
    let mut funnel = HypothesisFunnel::default();
    for record in sessions.iter().flat_map(|s| &s.hypotheses) {
        funnel.total += 1;
        match record.status {
            HypothesisStatus::Proposed => funnel.proposed += 1,
            HypothesisStatus::Active => funnel.active += 1,
            HypothesisStatus::Weakened => funnel.weakened += 1,
            HypothesisStatus::Killed => funnel.killed += 1,
            HypothesisStatus::Supported => funnel.supported += 1,
        }
        match record.origin {
            HypothesisOrigin::Original => funnel.original += 1,
            HypothesisOrigin::ThirdAlternative => funnel.third_alternative += 1,
            HypothesisOrigin::AnomalySpawned => funnel.anomaly_spawned += 1,
        }
    }
    funnel
}

fn test_summary(sessions: &[SessionSnapshot]) -> TestExecutionSummary {
    let mut summary = TestExecutionSummary::default();
    let mut with_potency = 0usize;
    let mut evidence = Vec::new();
    for test in sessions.iter().flat_map(|s| &s.tests) {
        summary.total += 1;
        match test.stage {
            TestStage::Designed => summary.designed += 1,
            TestStage::Running => summary.running += 1,
            TestStage::Complete => summary.complete += 1,
        }
        if test.has_potency_check {
            with_potency += 1;
        }
        if let Some(score) = test.evidence_score {
            evidence.push(f64::from(score.min(12)));
        }
    }
    if summary.total > 0 {
        summary.potency_coverage = with_potency as f64 / summary.total as f64;
    }
    if !evidence.is_empty() {
        summary.mean_evidence_score =
            Some(evidence.iter().sum::<f64>() / evidence.len() as f64);
    }
    summary
}

fn health_warnings(
    sessions: &[SessionSnapshot],
    funnel: &HypothesisFunnel,
    tests: &TestExecutionSummary,
) -> Vec<HealthWarning> {
    let mut warnings = Vec::new();

    let all_assumptions: Vec<_> = sessions
        .iter()
        .flat_map(|s| s.assumptions.iter().cloned())
        .collect();
    if missing_scale_physics(&all_assumptions) {
        warnings.push(HealthWarning {
            severity: Severity::Caution,
            message: "no scale_physics assumption present".to_owned(),
        });
    }

    // A falsified assumption whose load names a still-active hypothesis is
    // the single loudest signal the dashboard can raise.
    for session in sessions {
        for assumption in &session.assumptions {
            if assumption.status != AssumptionStatus::Falsified {
                continue;
            }
            let live = assumption.load.affected_hypotheses.iter().any(|h| {
                session
                    .hypotheses
                    .iter()
                    .any(|record| record.id == *h && !record.is_killed())
            });
            if live {
                warnings.push(HealthWarning {
                    severity: Severity::Critical,
                    message: format!(
                        "falsified assumption {} still carries live hypotheses",
                        assumption.id
                    ),
                });
            }
        }
    }

    if funnel.total > 0 && funnel.killed == 0 {
        warnings.push(HealthWarning {
            severity: Severity::Caution,
            message: "no hypothesis has ever been killed in this program".to_owned(),
        });
    }

    let missing_potency = sessions
        .iter()
        .flat_map(|s| &s.tests)
        .filter(|t| !t.has_potency_check)
        .count();
    if missing_potency > 0 {
        warnings.push(HealthWarning {
            severity: Severity::Info,
            message: format!("{missing_potency} of {} tests lack a potency check", tests.total),
        });
    }

    warnings
}

fn timeline(sessions: &[SessionSnapshot]) -> Vec<TimelineEvent> {
    let mut events = Vec::new();

    for session in sessions {
        for assumption in &session.assumptions {
            events.push(TimelineEvent {
                at: assumption.created_at,
                kind: EventKind::AssumptionRecorded,
                entity_id: assumption.id.to_string(),
                detail: assumption.statement.clone(),
            });
            if assumption.updated_at > assumption.created_at {
                events.push(TimelineEvent {
                    at: assumption.updated_at,
                    kind: EventKind::AssumptionStatusChanged,
                    entity_id: assumption.id.to_string(),
                    detail: assumption.status.as_str().to_owned(),
                });
            }
        }
        for anomaly in &session.anomalies {
            events.push(TimelineEvent {
                at: anomaly.created_at,
                kind: EventKind::AnomalyRecorded,
                entity_id: anomaly.id.to_string(),
                detail: anomaly.observation.clone(),
            });
            if anomaly.updated_at > anomaly.created_at
                && anomaly.quarantine_status != QuarantineStatus::Active
            {
                events.push(TimelineEvent {
                    at: anomaly.updated_at,
                    kind: EventKind::AnomalyStatusChanged,
                    entity_id: anomaly.id.to_string(),
                    detail: anomaly.quarantine_status.name().to_owned(),
                });
            }
        }
        for critique in &session.critiques {
            events.push(TimelineEvent {
                at: critique.created_at,
                kind: EventKind::CritiqueRaised,
                entity_id: critique.id.to_string(),
                detail: format!("targets {}", critique.target.kind()),
            });
            if critique.status != CritiqueStatus::Active {
                events.push(TimelineEvent {
                    at: critique.updated_at,
                    kind: EventKind::CritiqueSettled,
                    entity_id: critique.id.to_string(),
                    detail: critique.status.to_string(),
                });
            }
        }
        for transition in &session.transitions {
            events.push(TimelineEvent {
                at: transition.at,
                kind: EventKind::HypothesisTransition,
                entity_id: transition.hypothesis.to_string(),
                detail: format!("{:?} -> {:?}", transition.from, transition.to),
            });
        }
    }

    events.sort_by_key(|event| event.at);
    events
}

/// Project a program and its session snapshots into a dashboard. Pure and
/// infallible; an empty program yields empty counts and no warnings beyond
/// the scale-physics one.
#[must_use]
pub fn compute_program_dashboard(
    program: &ResearchProgram,
    sessions: &[SessionSnapshot],
) -> ProgramDashboard {
    let hypotheses = hypothesis_funnel(sessions);
    let tests = test_summary(sessions);

    let mut assumptions = RegistryHealth::default();
    let mut anomalies = RegistryHealth::default();
    let mut critiques = RegistryHealth::default();
    for session in sessions {
        for assumption in &session.assumptions {
            assumptions.tally(assumption.status.as_str());
        }
        for anomaly in &session.anomalies {
            anomalies.tally(anomaly.quarantine_status.name());
        }
        for critique in &session.critiques {
            critiques.tally(critique.status.as_str());
        }
    }

    let warnings = health_warnings(sessions, &hypotheses, &tests);
    let timeline = timeline(sessions);

    tracing::debug!(
        program = %program.id,
        sessions = sessions.len(),
        warnings = warnings.len(),
        "computed program dashboard"
    );

    ProgramDashboard {
        program: program.id.clone(),
        sessions: sessions.len(),
        hypotheses,
        assumptions,
        anomalies,
        critiques,
        tests,
        warnings,
        timeline,
    }
}
