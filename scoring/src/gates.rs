//! Pass/fail gates.
//!
//! Gates are independent of the weighted score: any failure fails the
//! contribution outright, and zero failures passes it even at a low
//! composite percentage. The checker reports failures as data and never
//! fails itself.

use serde::{Deserialize, Serialize};

use crate::rubric::Role;

/// Facts about a contribution the gates and warnings consume. Derived from
/// entities and the submitted payload by the caller; the gate checker reads
/// booleans and lists, not entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionRecord {
    pub role: Role,
    /// Whether the submitted payload parsed as valid structured content.
    pub valid_json: bool,
    /// Required fields absent from the payload.
    #[serde(default)]
    pub missing_fields: Vec<String>,
    /// A citation anchor that does not exist in the corpus, if one was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabricated_citation: Option<String>,
    /// Test designer: whether any potency check is present.
    #[serde(default)]
    pub has_potency_check: bool,
    /// Critic: whether the contribution kills a hypothesis.
    #[serde(default)]
    pub kill_performed: bool,
    /// Critic: the evidence supporting the kill, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kill_evidence: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    InvalidJson,
    MissingRequiredFields,
    FabricatedCitation,
    MissingPotencyCheck,
    UnsupportedKill,
}

impl Gate {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Gate::InvalidJson => "invalid_json",
            Gate::MissingRequiredFields => "missing_required_fields",
            Gate::FabricatedCitation => "fabricated_citation",
            Gate::MissingPotencyCheck => "missing_potency_check",
            Gate::UnsupportedKill => "unsupported_kill",
        }
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateFailure {
    pub gate: Gate,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateReport {
    pub passed: bool,
    pub failures: Vec<GateFailure>,
}

/// Run every applicable gate. Never errors; failures come back as data.
#[must_use]
pub fn check_pass_fail_gates(record: &ContributionRecord) -> GateReport {
    let mut failures = Vec::new();

    if !record.valid_json {
        failures.push(GateFailure {
            gate: Gate::InvalidJson,
            reason: "contribution payload is not valid structured content".to_owned(),
        });
    }

    if !record.missing_fields.is_empty() {
        failures.push(GateFailure {
            gate: Gate::MissingRequiredFields,
            reason: format!("missing required fields: {}", record.missing_fields.join(", ")),
        });
    }

    if let Some(anchor) = &record.fabricated_citation {
        failures.push(GateFailure {
            gate: Gate::FabricatedCitation,
            reason: format!("citation anchor {anchor} does not exist in the corpus"),
        });
    }

    if record.role == Role::TestDesigner && !record.has_potency_check {
        failures.push(GateFailure {
            gate: Gate::MissingPotencyCheck,
            reason: "test design has no potency check: a negative result would be \
                     indistinguishable from assay failure"
                .to_owned(),
        });
    }

    if record.role == Role::AdversarialCritic && record.kill_performed {
        let supported = record
            .kill_evidence
            .as_deref()
            .is_some_and(|evidence| !evidence.trim().is_empty());
        if !supported {
            failures.push(GateFailure {
                gate: Gate::UnsupportedKill,
                reason: "kill action has no supporting evidence".to_owned(),
            });
        }
    }

    if !failures.is_empty() {
        tracing::debug!(
            role = %record.role,
            failed_gates = failures.len(),
            "contribution failed pass/fail gates"
        );
    }

    GateReport {
        passed: failures.is_empty(),
        failures,
    }
}
