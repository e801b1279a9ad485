//! Assumptions - load-bearing beliefs a hypothesis set depends on.
//!
//! Lifecycle: `unchecked → {challenged, verified, falsified}` and
//! `challenged → {verified, falsified}`. Falsified and verified are terminal
//! in this layer; re-litigating a falsified assumption is a caller decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{AssumptionId, HypothesisId, SessionId, TestId};
use crate::validate::{
    FieldError, Validated, ValidationFailed, require_non_blank, validate_raw,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssumptionType {
    Background,
    Methodological,
    Boundary,
    ScalePhysics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Foundational,
    #[default]
    Important,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssumptionStatus {
    Unchecked,
    Challenged,
    Verified,
    Falsified,
}

impl AssumptionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AssumptionStatus::Unchecked => "unchecked",
            AssumptionStatus::Challenged => "challenged",
            AssumptionStatus::Verified => "verified",
            AssumptionStatus::Falsified => "falsified",
        }
    }
}

impl std::fmt::Display for AssumptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared blast radius: which hypotheses and tests lean on this belief.
///
/// Empty arrays are valid - the load may simply not be known yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionLoad {
    #[serde(default)]
    pub affected_hypotheses: Vec<HypothesisId>,
    #[serde(default)]
    pub affected_tests: Vec<TestId>,
    #[serde(default)]
    pub description: String,
}

impl AssumptionLoad {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.affected_hypotheses.is_empty() && self.affected_tests.is_empty()
    }
}

/// Dimensional/order-of-magnitude plausibility check attached to a
/// `scale_physics` assumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleCalculation {
    pub quantities: String,
    pub result: String,
    pub units: String,
    #[serde(default)]
    pub implication: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_it_rules_out: Option<String>,
}

impl ScaleCalculation {
    /// Rigor 0-3 by populated fields. Whitespace-only counts as blank;
    /// `what_it_rules_out` is never required.
    #[must_use]
    pub fn rigor(&self) -> u8 {
        let quantified =
            !self.quantities.trim().is_empty() && !self.result.trim().is_empty();
        let units = !self.units.trim().is_empty();
        let implication = !self.implication.trim().is_empty();
        match (quantified, units, implication) {
            (false, _, _) => 0,
            (true, false, _) => 1,
            (true, true, false) => 2,
            (true, true, true) => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumption {
    pub id: AssumptionId,
    pub session_id: SessionId,
    /// The belief itself, stated so it could in principle be falsified.
    pub statement: String,
    #[serde(rename = "type")]
    pub kind: AssumptionType,
    #[serde(default)]
    pub criticality: Criticality,
    pub status: AssumptionStatus,
    #[serde(default)]
    pub load: AssumptionLoad,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<ScaleCalculation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for [`Assumption::create`]; the id comes from
/// [`crate::ids::generate_assumption_id`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionInput {
    pub session_id: SessionId,
    pub statement: String,
    #[serde(rename = "type")]
    pub kind: AssumptionType,
    #[serde(default)]
    pub criticality: Option<Criticality>,
    #[serde(default)]
    pub load: AssumptionLoad,
    #[serde(default)]
    pub calculation: Option<ScaleCalculation>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssumptionError {
    #[error("assumption {id} cannot be {requested}: status is {actual}")]
    IllegalTransition {
        id: String,
        requested: &'static str,
        actual: AssumptionStatus,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationFailed),
}

impl Assumption {
    /// Fail-fast constructor; stamps both timestamps with the current time.
    pub fn create(id: AssumptionId, input: AssumptionInput) -> Result<Self, ValidationFailed> {
        Self::create_at(id, input, Utc::now())
    }

    /// Like [`Assumption::create`] with an explicit timestamp, for storage
    /// replay and deterministic callers.
    pub fn create_at(
        id: AssumptionId,
        input: AssumptionInput,
        at: DateTime<Utc>,
    ) -> Result<Self, ValidationFailed> {
        let assumption = Self {
            id,
            session_id: input.session_id,
            statement: input.statement,
            kind: input.kind,
            criticality: input.criticality.unwrap_or_default(),
            status: AssumptionStatus::Unchecked,
            load: input.load,
            calculation: input.calculation,
            created_at: at,
            updated_at: at,
        };
        let errors = assumption.check();
        if errors.is_empty() {
            Ok(assumption)
        } else {
            Err(ValidationFailed { errors })
        }
    }

    /// Structural constraints, as field errors.
    #[must_use]
    pub fn check(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_non_blank(&mut errors, "statement", &self.statement);
        let canonical_prefix = format!("A-{}-", self.session_id.as_str());
        if !self.id.is_legacy() && !self.id.as_str().starts_with(&canonical_prefix) {
            errors.push(FieldError::new(
                "id",
                format!("session token does not match sessionId {}", self.session_id),
            ));
        }
        errors
    }

    /// Scale rigor 0-3; 0 when no calculation is recorded. Meaningful for
    /// `scale_physics` assumptions, but defined for all.
    #[must_use]
    pub fn scale_rigor(&self) -> u8 {
        self.calculation.as_ref().map_or(0, ScaleCalculation::rigor)
    }

    pub fn challenge(self) -> Result<Self, AssumptionError> {
        self.transition("challenged", &[AssumptionStatus::Unchecked], AssumptionStatus::Challenged)
    }

    pub fn verify(self) -> Result<Self, AssumptionError> {
        self.transition(
            "verified",
            &[AssumptionStatus::Unchecked, AssumptionStatus::Challenged],
            AssumptionStatus::Verified,
        )
    }

    /// Falsification is terminal here. The affected hypotheses and tests are
    /// reported by the registry's blast-radius query, never mutated.
    pub fn falsify(self) -> Result<Self, AssumptionError> {
        self.transition(
            "falsified",
            &[AssumptionStatus::Unchecked, AssumptionStatus::Challenged],
            AssumptionStatus::Falsified,
        )
    }

    fn transition(
        mut self,
        requested: &'static str,
        allowed: &[AssumptionStatus],
        next: AssumptionStatus,
    ) -> Result<Self, AssumptionError> {
        if !allowed.contains(&self.status) {
            return Err(AssumptionError::IllegalTransition {
                id: self.id.to_string(),
                requested,
                actual: self.status,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
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
pub fn validate_assumption(raw: &serde_json::Value) -> Validated<Assumption> {
    validate_raw(raw, Assumption::check)
}
