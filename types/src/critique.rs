//! Critiques - structured attacks on hypotheses, tests, assumptions, or the
//! framing/methodology itself.
//!
//! Lifecycle: `active → {addressed, dismissed, accepted}`, each reversible
//! through an explicit `reopen`. Every transition out of a non-active state
//! (other than reopen) is illegal and reports the actual status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{AssumptionId, CritiqueId, HypothesisId, SessionId, TestId};
use crate::validate::{
    FieldError, Validated, ValidationFailed, require_min_len, validate_raw,
};

/// What the critique attacks.
///
/// The tagged representation makes the target rule structural: a hypothesis,
/// test, or assumption target carries its id (validated against that type's
/// pattern on parse); framing and methodology critiques carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "targetType", content = "targetId", rename_all = "snake_case")]
pub enum CritiqueTarget {
    Hypothesis(HypothesisId),
    Test(TestId),
    Assumption(AssumptionId),
    Framing,
    Methodology,
}

impl CritiqueTarget {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            CritiqueTarget::Hypothesis(_) => "hypothesis",
            CritiqueTarget::Test(_) => "test",
            CritiqueTarget::Assumption(_) => "assumption",
            CritiqueTarget::Framing => "framing",
            CritiqueTarget::Methodology => "methodology",
        }
    }

    #[must_use]
    pub fn target_id(&self) -> Option<&str> {
        match self {
            CritiqueTarget::Hypothesis(id) => Some(id.as_str()),
            CritiqueTarget::Test(id) => Some(id.as_str()),
            CritiqueTarget::Assumption(id) => Some(id.as_str()),
            CritiqueTarget::Framing | CritiqueTarget::Methodology => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CritiqueStatus {
    Active,
    Addressed,
    Dismissed,
    Accepted,
}

impl CritiqueStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CritiqueStatus::Active => "active",
            CritiqueStatus::Addressed => "addressed",
            CritiqueStatus::Dismissed => "dismissed",
            CritiqueStatus::Accepted => "accepted",
        }
    }
}

impl std::fmt::Display for CritiqueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTaken {
    #[default]
    None,
    Modified,
    Killed,
    NewTest,
}

/// What was done about the critique when it left the active state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CritiqueResponse {
    #[serde(default)]
    pub action_taken: ActionTaken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_test_id: Option<TestId>,
}

/// A constructive counter-proposal attached to the attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedAlternative {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<String>,
    pub testable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub predictions: Vec<String>,
}

impl ProposedAlternative {
    /// Specificity 1-3 (0 is "no alternative at all", scored at the critique
    /// level): 1 = vague description only, 2 = testable but missing mechanism
    /// or predictions, 3 = description, mechanism, testability, predictions.
    #[must_use]
    pub fn specificity(&self) -> u8 {
        let mechanism = self.mechanism.as_deref().is_some_and(|m| !m.trim().is_empty());
        let predictions = self.predictions.iter().any(|p| !p.trim().is_empty());
        if self.testable && mechanism && predictions {
            3
        } else if self.testable {
            2
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Critique {
    pub id: CritiqueId,
    pub session_id: SessionId,
    #[serde(flatten)]
    pub target: CritiqueTarget,
    /// The attack itself. Hard minimum 20 characters.
    pub attack: String,
    /// What evidence would confirm the critique. Hard minimum 10 characters.
    pub evidence_to_confirm: String,
    pub status: CritiqueStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_alternative: Option<ProposedAlternative>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<CritiqueResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CritiqueInput {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub target: CritiqueTarget,
    pub attack: String,
    pub evidence_to_confirm: String,
    #[serde(default)]
    pub proposed_alternative: Option<ProposedAlternative>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CritiqueError {
    #[error("critique {id} cannot be {requested}: status is {actual}")]
    IllegalTransition {
        id: String,
        requested: &'static str,
        actual: CritiqueStatus,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationFailed),
}

impl Critique {
    pub fn create(id: CritiqueId, input: CritiqueInput) -> Result<Self, ValidationFailed> {
        Self::create_at(id, input, Utc::now())
    }

    pub fn create_at(
        id: CritiqueId,
        input: CritiqueInput,
        at: DateTime<Utc>,
    ) -> Result<Self, ValidationFailed> {
        let critique = Self {
            id,
            session_id: input.session_id,
            target: input.target,
            attack: input.attack,
            evidence_to_confirm: input.evidence_to_confirm,
            status: CritiqueStatus::Active,
            proposed_alternative: input.proposed_alternative,
            response: None,
            created_at: at,
            updated_at: at,
        };
        let errors = critique.check();
        if errors.is_empty() {
            Ok(critique)
        } else {
            Err(ValidationFailed { errors })
        }
    }

    #[must_use]
    pub fn check(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_min_len(&mut errors, "attack", &self.attack, 20);
        require_min_len(&mut errors, "evidenceToConfirm", &self.evidence_to_confirm, 10);
        if let Some(alternative) = &self.proposed_alternative {
            require_min_len(
                &mut errors,
                "proposedAlternative.description",
                &alternative.description,
                10,
            );
        }
        let canonical_prefix = format!("C-{}-", self.session_id.as_str());
        if !self.id.as_str().starts_with(&canonical_prefix) {
            errors.push(FieldError::new(
                "id",
                format!("session token does not match sessionId {}", self.session_id),
            ));
        }
        errors
    }

    /// Alternative specificity 0-3; 0 when no alternative was proposed.
    #[must_use]
    pub fn alternative_specificity(&self) -> u8 {
        self.proposed_alternative
            .as_ref()
            .map_or(0, ProposedAlternative::specificity)
    }

    /// `active → addressed`: the critique was engaged and something changed.
    pub fn address(self, response: CritiqueResponse) -> Result<Self, CritiqueError> {
        self.close("addressed", CritiqueStatus::Addressed, response)
    }

    /// `active → accepted`: the critique stands; the target takes the hit.
    pub fn accept(self, response: CritiqueResponse) -> Result<Self, CritiqueError> {
        self.close("accepted", CritiqueStatus::Accepted, response)
    }

    /// `active → dismissed`: the critique was considered and rejected.
    pub fn dismiss(self, response: CritiqueResponse) -> Result<Self, CritiqueError> {
        self.close("dismissed", CritiqueStatus::Dismissed, response)
    }

    /// Any settled state back to `active`. Reopening an already-active
    /// critique is a no-op that returns the input unchanged.
    pub fn reopen(mut self) -> Result<Self, CritiqueError> {
        if self.status == CritiqueStatus::Active {
            return Ok(self);
        }
        self.status = CritiqueStatus::Active;
        self.response = None;
        self.updated_at = Utc::now();
        self.revalidate()
    }

    fn close(
        mut self,
        requested: &'static str,
        next: CritiqueStatus,
        response: CritiqueResponse,
    ) -> Result<Self, CritiqueError> {
        if self.status != CritiqueStatus::Active {
            return Err(CritiqueError::IllegalTransition {
                id: self.id.to_string(),
                requested,
                actual: self.status,
            });
        }
        self.status = next;
        self.response = Some(response);
        self.updated_at = Utc::now();
        self.revalidate()
    }

    fn revalidate(self) -> Result<Self, CritiqueError> {
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
pub fn validate_critique(raw: &serde_json::Value) -> Validated<Critique> {
    validate_raw(raw, Critique::check)
}

#[cfg(test)]
mod tests {
    use super::{
        ActionTaken, Critique, CritiqueError, CritiqueInput, CritiqueResponse, CritiqueStatus,
        CritiqueTarget, ProposedAlternative, validate_critique,
    };
    use crate::ids::{CritiqueId, HypothesisId, SessionId, TestId};

    fn fixture(target: CritiqueTarget) -> Critique {
        let session = SessionId::parse("RS1").unwrap();
        let id = CritiqueId::parse("C-RS1-001").unwrap();
        Critique::create(
            id,
            CritiqueInput {
                session_id: session,
                target,
                attack: "The control lane shares a reagent batch with the treated lane".to_owned(),
                evidence_to_confirm: "rerun with split batches".to_owned(),
                proposed_alternative: None,
            },
        )
        .unwrap()
    }

    fn hypothesis_target() -> CritiqueTarget {
        CritiqueTarget::Hypothesis(HypothesisId::parse("H-RS1-001").unwrap())
    }

    fn response(action: ActionTaken) -> CritiqueResponse {
        CritiqueResponse {
            action_taken: action,
            new_test_id: None,
        }
    }

    #[test]
    fn create_enforces_hard_minimums() {
        let session = SessionId::parse("RS1").unwrap();
        let id = CritiqueId::parse("C-RS1-001").unwrap();
        let err = Critique::create(
            id,
            CritiqueInput {
                session_id: session,
                target: CritiqueTarget::Framing,
                attack: "too short".to_owned(),
                evidence_to_confirm: "short".to_owned(),
                proposed_alternative: None,
            },
        )
        .unwrap_err();
        let paths: Vec<&str> = err.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"attack"));
        assert!(paths.contains(&"evidenceToConfirm"));
    }

    #[test]
    fn targeted_critiques_carry_a_typed_id() {
        let critique = fixture(hypothesis_target());
        let raw = serde_json::to_value(&critique).unwrap();
        assert_eq!(raw["targetType"], "hypothesis");
        assert_eq!(raw["targetId"], "H-RS1-001");
        let back = validate_critique(&raw).into_result().unwrap();
        assert_eq!(back, critique);
    }

    #[test]
    fn framing_critiques_reject_a_target_id() {
        let critique = fixture(CritiqueTarget::Framing);
        let mut raw = serde_json::to_value(&critique).unwrap();
        assert!(raw.get("targetId").is_none());

        raw["targetId"] = serde_json::json!("H-RS1-001");
        assert!(!validate_critique(&raw).is_valid());
    }

    #[test]
    fn target_id_must_match_the_target_type_pattern() {
        let critique = fixture(hypothesis_target());
        let mut raw = serde_json::to_value(&critique).unwrap();
        raw["targetId"] = serde_json::json!("T-RS1-001");
        assert!(!validate_critique(&raw).is_valid());
    }

    #[test]
    fn close_paths_record_a_response() {
        let addressed = fixture(hypothesis_target())
            .address(CritiqueResponse {
                action_taken: ActionTaken::NewTest,
                new_test_id: Some(TestId::parse("T-RS1-002").unwrap()),
            })
            .unwrap();
        assert_eq!(addressed.status, CritiqueStatus::Addressed);
        assert_eq!(
            addressed.response.as_ref().unwrap().action_taken,
            ActionTaken::NewTest
        );
    }

    #[test]
    fn settled_critiques_refuse_further_settlement() {
        let dismissed = fixture(hypothesis_target())
            .dismiss(response(ActionTaken::None))
            .unwrap();
        let err = dismissed.dismiss(response(ActionTaken::None)).unwrap_err();
        let CritiqueError::IllegalTransition { actual, requested, .. } = err else {
            panic!("expected illegal transition");
        };
        assert_eq!(actual, CritiqueStatus::Dismissed);
        assert_eq!(requested, "dismissed");
    }

    #[test]
    fn reopen_is_idempotent_on_active() {
        let active = fixture(hypothesis_target());
        let reopened = active.clone().reopen().unwrap();
        assert_eq!(reopened, active);
    }

    #[test]
    fn reopen_clears_the_response() {
        let accepted = fixture(hypothesis_target())
            .accept(response(ActionTaken::Killed))
            .unwrap();
        let reopened = accepted.reopen().unwrap();
        assert_eq!(reopened.status, CritiqueStatus::Active);
        assert!(reopened.response.is_none());
    }

    #[test]
    fn specificity_ladder() {
        let mut critique = fixture(hypothesis_target());
        assert_eq!(critique.alternative_specificity(), 0);

        critique.proposed_alternative = Some(ProposedAlternative {
            description: "shared reagent artifact".to_owned(),
            mechanism: None,
            testable: false,
            predictions: vec![],
        });
        assert_eq!(critique.alternative_specificity(), 1);

        critique.proposed_alternative = Some(ProposedAlternative {
            description: "shared reagent artifact".to_owned(),
            mechanism: None,
            testable: true,
            predictions: vec![],
        });
        assert_eq!(critique.alternative_specificity(), 2);

        critique.proposed_alternative = Some(ProposedAlternative {
            description: "shared reagent artifact".to_owned(),
            mechanism: Some("contaminant binds the probe".to_owned()),
            testable: true,
            predictions: vec!["fresh batch removes the signal".to_owned()],
        });
        assert_eq!(critique.alternative_specificity(), 3);
    }
}
