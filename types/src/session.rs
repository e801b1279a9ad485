//! Session snapshots - the read-only view scoring and aggregation consume.
//!
//! Hypotheses and tests are owned elsewhere; these records carry just the
//! fields the dimension scorers and the dashboard need. A snapshot is data,
//! not authority: recomputing any score or summary from the same snapshot
//! must give the same answer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::anomaly::Anomaly;
use crate::assumption::Assumption;
use crate::critique::Critique;
use crate::ids::{HypothesisId, SessionId, TestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HypothesisStatus {
    Proposed,
    Active,
    Weakened,
    Killed,
    Supported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HypothesisOrigin {
    Original,
    ThirdAlternative,
    AnomalySpawned,
}

/// Why and how a hypothesis died.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillRecord {
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_by_test: Option<TestId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisRecord {
    pub id: HypothesisId,
    pub status: HypothesisStatus,
    pub origin: HypothesisOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kill: Option<KillRecord>,
}

impl HypothesisRecord {
    #[must_use]
    pub fn is_killed(&self) -> bool {
        self.status == HypothesisStatus::Killed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStage {
    Designed,
    Running,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    pub id: TestId,
    pub stage: TestStage,
    /// Which hypotheses this test tells apart.
    #[serde(default)]
    pub discriminates: Vec<HypothesisId>,
    #[serde(default)]
    pub has_potency_check: bool,
    /// Evidence that a negative result is distinguishable from assay failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potency_evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feasibility_notes: Option<String>,
    /// 0-12 once the test has produced evidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_score: Option<u8>,
}

/// One entry of the optional hypothesis-transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisTransition {
    pub hypothesis: HypothesisId,
    pub from: HypothesisStatus,
    pub to: HypothesisStatus,
    pub at: DateTime<Utc>,
}

/// Everything the session-level scorers see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    #[serde(default)]
    pub research_question: String,
    #[serde(default)]
    pub hypotheses: Vec<HypothesisRecord>,
    #[serde(default)]
    pub tests: Vec<TestRecord>,
    #[serde(default)]
    pub assumptions: Vec<Assumption>,
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
    #[serde(default)]
    pub critiques: Vec<Critique>,
    #[serde(default)]
    pub transitions: Vec<HypothesisTransition>,
}

impl SessionSnapshot {
    /// An empty session. Scorers degrade to zero on it rather than failing.
    #[must_use]
    pub fn empty(session_id: SessionId) -> Self {
        Self {
            session_id,
            research_question: String::new(),
            hypotheses: Vec::new(),
            tests: Vec::new(),
            assumptions: Vec::new(),
            anomalies: Vec::new(),
            critiques: Vec::new(),
            transitions: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
            && self.tests.is_empty()
            && self.assumptions.is_empty()
            && self.anomalies.is_empty()
            && self.critiques.is_empty()
    }
}
