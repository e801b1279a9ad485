//! Research programs - ordered groups of sessions under one research goal.
//!
//! Lifecycle: `active ⇄ paused`, and either into `completed` or `abandoned`
//! (both terminal). Abandoning requires a reason of at least 10 characters,
//! carried inside the status so it cannot be lost.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{ProgramId, SessionId};
use crate::validate::{
    FieldError, Validated, ValidationFailed, require_min_len, require_non_blank, validate_raw,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProgramStatus {
    Active,
    Paused,
    Completed,
    Abandoned { reason: String },
}

impl ProgramStatus {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ProgramStatus::Active => "active",
            ProgramStatus::Paused => "paused",
            ProgramStatus::Completed => "completed",
            ProgramStatus::Abandoned { .. } => "abandoned",
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgramStatus::Completed | ProgramStatus::Abandoned { .. }
        )
    }
}

impl std::fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchProgram {
    pub id: ProgramId,
    /// The research goal this program pursues.
    pub goal: String,
    pub status: ProgramStatus,
    /// Ordered, duplicate-free session membership.
    #[serde(default)]
    pub sessions: Vec<SessionId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramInput {
    pub goal: String,
    #[serde(default)]
    pub sessions: Vec<SessionId>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgramError {
    #[error("research program {id} cannot be {requested}: status is {actual}")]
    IllegalTransition {
        id: String,
        requested: &'static str,
        actual: &'static str,
    },
    #[error("research program {id} already contains session {session}")]
    DuplicateSession { id: String, session: String },
    #[error("research program {id} does not contain session {session}")]
    SessionNotFound { id: String, session: String },
    #[error("abandon reason must be at least 10 characters")]
    ReasonTooShort,
    #[error(transparent)]
    Invalid(#[from] ValidationFailed),
}

impl ResearchProgram {
    pub fn create(id: ProgramId, input: ProgramInput) -> Result<Self, ValidationFailed> {
        Self::create_at(id, input, Utc::now())
    }

    pub fn create_at(
        id: ProgramId,
        input: ProgramInput,
        at: DateTime<Utc>,
    ) -> Result<Self, ValidationFailed> {
        let program = Self {
            id,
            goal: input.goal,
            status: ProgramStatus::Active,
            sessions: input.sessions,
            created_at: at,
            updated_at: at,
        };
        let errors = program.check();
        if errors.is_empty() {
            Ok(program)
        } else {
            Err(ValidationFailed { errors })
        }
    }

    #[must_use]
    pub fn check(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_non_blank(&mut errors, "goal", &self.goal);
        let mut seen = HashSet::new();
        for session in &self.sessions {
            if !seen.insert(session.as_str()) {
                errors.push(FieldError::new(
                    "sessions",
                    format!("duplicate session {session}"),
                ));
            }
        }
        if let ProgramStatus::Abandoned { reason } = &self.status {
            require_min_len(&mut errors, "status.reason", reason, 10);
        }
        errors
    }

    pub fn pause(self) -> Result<Self, ProgramError> {
        self.transition("paused", &["active"], ProgramStatus::Paused)
    }

    pub fn resume(self) -> Result<Self, ProgramError> {
        self.transition("resumed", &["paused"], ProgramStatus::Active)
    }

    pub fn complete(self) -> Result<Self, ProgramError> {
        self.transition("completed", &["active", "paused"], ProgramStatus::Completed)
    }

    /// Terminal; the reason is mandatory and at least 10 characters.
    pub fn abandon(self, reason: impl Into<String>) -> Result<Self, ProgramError> {
        let reason = reason.into();
        if reason.trim().chars().count() < 10 {
            return Err(ProgramError::ReasonTooShort);
        }
        self.transition(
            "abandoned",
            &["active", "paused"],
            ProgramStatus::Abandoned { reason },
        )
    }

    /// Append a session. Rejects duplicates.
    pub fn add_session(mut self, session: SessionId) -> Result<Self, ProgramError> {
        if self.sessions.contains(&session) {
            return Err(ProgramError::DuplicateSession {
                id: self.id.to_string(),
                session: session.to_string(),
            });
        }
        self.sessions.push(session);
        self.updated_at = Utc::now();
        self.revalidate()
    }

    /// Remove a session. Rejects ids not in the membership.
    pub fn remove_session(mut self, session: &SessionId) -> Result<Self, ProgramError> {
        let Some(position) = self.sessions.iter().position(|s| s == session) else {
            return Err(ProgramError::SessionNotFound {
                id: self.id.to_string(),
                session: session.to_string(),
            });
        };
        self.sessions.remove(position);
        self.updated_at = Utc::now();
        self.revalidate()
    }

    fn transition(
        mut self,
        requested: &'static str,
        allowed: &[&'static str],
        next: ProgramStatus,
    ) -> Result<Self, ProgramError> {
        if !allowed.contains(&self.status.name()) {
            return Err(ProgramError::IllegalTransition {
                id: self.id.to_string(),
                requested,
                actual: self.status.name(),
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        self.revalidate()
    }

    fn revalidate(self) -> Result<Self, ProgramError> {
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
pub fn validate_program(raw: &serde_json::Value) -> Validated<ResearchProgram> {
    validate_raw(raw, ResearchProgram::check)
}
