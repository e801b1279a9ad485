//! Anomalies - surprising observations held in quarantine.
//!
//! Quarantine lifecycle: `active → {resolved, deferred, paradigm_shifting}`,
//! `deferred → active` (reactivate only). Resolving requires the hypothesis
//! that resolved it; `Resolved` carries that id in-variant so a resolution
//! without a resolving hypothesis is unrepresentable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{AnomalyId, AssumptionId, HypothesisId, SessionId, TranscriptAnchor};
use crate::validate::{
    FieldError, Validated, ValidationFailed, require_min_len, require_non_blank, validate_raw,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Experiment,
    Literature,
    Discussion,
    Calculation,
}

/// Where the observation came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalySource {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anchors: Vec<TranscriptAnchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
}

impl AnomalySource {
    /// Whether the observation is traceable to anything at all.
    #[must_use]
    pub fn is_anchored(&self) -> bool {
        self.reference.as_deref().is_some_and(|r| !r.trim().is_empty())
            || !self.anchors.is_empty()
            || self.citation.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// What the observation contradicts. The description is a hard minimum of
/// 10 characters - "doesn't fit" is not a conflict statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictSet {
    #[serde(default)]
    pub hypotheses: Vec<HypothesisId>,
    #[serde(default)]
    pub assumptions: Vec<AssumptionId>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum QuarantineStatus {
    Active,
    Resolved {
        resolved_by: HypothesisId,
        resolved_at: DateTime<Utc>,
    },
    Deferred,
    ParadigmShifting,
}

impl QuarantineStatus {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            QuarantineStatus::Active => "active",
            QuarantineStatus::Resolved { .. } => "resolved",
            QuarantineStatus::Deferred => "deferred",
            QuarantineStatus::ParadigmShifting => "paradigm_shifting",
        }
    }
}

impl std::fmt::Display for QuarantineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub id: AnomalyId,
    pub session_id: SessionId,
    /// The observation itself.
    pub observation: String,
    pub source: AnomalySource,
    pub conflicts_with: ConflictSet,
    pub quarantine_status: QuarantineStatus,
    /// Hypotheses this anomaly motivated. Append-only.
    #[serde(default)]
    pub spawned_hypotheses: Vec<HypothesisId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyInput {
    pub session_id: SessionId,
    pub observation: String,
    pub source: AnomalySource,
    pub conflicts_with: ConflictSet,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnomalyError {
    #[error("anomaly {id} cannot be {requested}: quarantine status is {actual}")]
    IllegalTransition {
        id: String,
        requested: &'static str,
        actual: &'static str,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationFailed),
}

impl Anomaly {
    pub fn create(id: AnomalyId, input: AnomalyInput) -> Result<Self, ValidationFailed> {
        Self::create_at(id, input, Utc::now())
    }

    pub fn create_at(
        id: AnomalyId,
        input: AnomalyInput,
        at: DateTime<Utc>,
    ) -> Result<Self, ValidationFailed> {
        let anomaly = Self {
            id,
            session_id: input.session_id,
            observation: input.observation,
            source: input.source,
            conflicts_with: input.conflicts_with,
            quarantine_status: QuarantineStatus::Active,
            spawned_hypotheses: Vec::new(),
            created_at: at,
            updated_at: at,
        };
        let errors = anomaly.check();
        if errors.is_empty() {
            Ok(anomaly)
        } else {
            Err(ValidationFailed { errors })
        }
    }

    #[must_use]
    pub fn check(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_non_blank(&mut errors, "observation", &self.observation);
        require_min_len(
            &mut errors,
            "conflictsWith.description",
            &self.conflicts_with.description,
            10,
        );
        let canonical_prefix = format!("X-{}-", self.session_id.as_str());
        if !self.id.as_str().starts_with(&canonical_prefix) {
            errors.push(FieldError::new(
                "id",
                format!("session token does not match sessionId {}", self.session_id),
            ));
        }
        errors
    }

    /// Advisory only: whether spawning a hypothesis from this anomaly makes
    /// sense right now. Never gates [`Anomaly::record_spawned_hypothesis`].
    #[must_use]
    pub fn can_spawn_hypothesis(&self) -> bool {
        matches!(
            self.quarantine_status,
            QuarantineStatus::Active | QuarantineStatus::ParadigmShifting
        )
    }

    /// Append a spawned hypothesis id. Idempotent for duplicates.
    #[must_use]
    pub fn record_spawned_hypothesis(mut self, hypothesis: HypothesisId) -> Self {
        if self.spawned_hypotheses.contains(&hypothesis) {
            return self;
        }
        self.spawned_hypotheses.push(hypothesis);
        self.updated_at = Utc::now();
        self
    }

    /// `active → resolved`; the resolving hypothesis id is mandatory.
    pub fn resolve(self, resolved_by: HypothesisId) -> Result<Self, AnomalyError> {
        let resolved_at = Utc::now();
        self.transition("resolved", QuarantineStatus::Resolved { resolved_by, resolved_at })
    }

    /// `active → deferred`.
    pub fn defer(self) -> Result<Self, AnomalyError> {
        self.transition("deferred", QuarantineStatus::Deferred)
    }

    /// `active → paradigm_shifting`: the anomaly is judged too big for the
    /// current framework rather than merely unexplained.
    pub fn mark_paradigm_shifting(self) -> Result<Self, AnomalyError> {
        self.transition("paradigm_shifting", QuarantineStatus::ParadigmShifting)
    }

    /// `deferred → active`. Only deferred anomalies can be reactivated.
    pub fn reactivate(mut self) -> Result<Self, AnomalyError> {
        if self.quarantine_status != QuarantineStatus::Deferred {
            return Err(AnomalyError::IllegalTransition {
                id: self.id.to_string(),
                requested: "reactivated",
                actual: self.quarantine_status.name(),
            });
        }
        self.quarantine_status = QuarantineStatus::Active;
        self.updated_at = Utc::now();
        self.revalidate()
    }

    fn transition(
        mut self,
        requested: &'static str,
        next: QuarantineStatus,
    ) -> Result<Self, AnomalyError> {
        if self.quarantine_status != QuarantineStatus::Active {
            return Err(AnomalyError::IllegalTransition {
                id: self.id.to_string(),
                requested,
                actual: self.quarantine_status.name(),
            });
        }
        self.quarantine_status = next;
        self.updated_at = Utc::now();
        self.revalidate()
    }

    fn revalidate(self) -> Result<Self, AnomalyError> {
        let errors = self.check();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ValidationFailed { errors }.into())
        }
    }
}

/// Non-throwing validation of a raw persisted document.
#[must_use]
pub fn validate_anomaly(raw: &serde_json::Value) -> Validated<Anomaly> {
    validate_raw(raw, Anomaly::check)
}
