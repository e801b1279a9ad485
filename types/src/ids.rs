//! Typed entity identifiers and sequence generation.
//!
//! Every identifier is a pattern-validated string newtype. The patterns are
//! the authoritative wire formats: `PREFIX-{session}-{3-digit sequence}` for
//! session-scoped entities, plus legacy bare forms (`A7`, `T12`) that older
//! sessions still carry. Legacy ids validate but never participate in
//! sequence generation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compiled identifier patterns, built once on first use.
struct IdPatterns {
    assumption: Regex,
    assumption_legacy: Regex,
    hypothesis: Regex,
    test: Regex,
    test_legacy: Regex,
    anomaly: Regex,
    critique: Regex,
    program: Regex,
    program_slug: Regex,
    session: Regex,
    anchor: Regex,
}

static PATTERNS: LazyLock<IdPatterns> = LazyLock::new(|| IdPatterns {
    assumption: Regex::new(r"^A-[A-Za-z0-9][\w-]*-\d{3}$").expect("valid assumption id regex"),
    assumption_legacy: Regex::new(r"^A\d+$").expect("valid legacy assumption id regex"),
    hypothesis: Regex::new(r"^H-[A-Za-z0-9][\w-]*-\d{3}$").expect("valid hypothesis id regex"),
    test: Regex::new(r"^T-[A-Za-z0-9][\w-]*-\d{3}$").expect("valid test id regex"),
    test_legacy: Regex::new(r"^T\d+$").expect("valid legacy test id regex"),
    anomaly: Regex::new(r"^X-[A-Za-z0-9][\w-]*-\d{3}$").expect("valid anomaly id regex"),
    critique: Regex::new(r"^C-[A-Za-z0-9][\w-]*-\d{3}$").expect("valid critique id regex"),
    program: Regex::new(r"^RP-[A-Za-z0-9][\w-]*-\d{3}$").expect("valid program id regex"),
    program_slug: Regex::new(r"^[A-Za-z0-9][\w-]*$").expect("valid program slug regex"),
    session: Regex::new(r"^RS[A-Za-z0-9-][\w-]*$").expect("valid session id regex"),
    anchor: Regex::new(r"^§\d+(-\d+)?$").expect("valid transcript anchor regex"),
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("{kind} id {raw:?} does not match {pattern}")]
    Malformed {
        kind: &'static str,
        raw: String,
        pattern: &'static str,
    },
    #[error("{kind} sequence for {scope} is exhausted: next id would exceed 999")]
    SequenceOverflow { kind: &'static str, scope: String },
}

fn valid_assumption(raw: &str) -> bool {
    PATTERNS.assumption.is_match(raw) || PATTERNS.assumption_legacy.is_match(raw)
}

fn valid_hypothesis(raw: &str) -> bool {
    PATTERNS.hypothesis.is_match(raw)
}

fn valid_test(raw: &str) -> bool {
    PATTERNS.test.is_match(raw) || PATTERNS.test_legacy.is_match(raw)
}

fn valid_anomaly(raw: &str) -> bool {
    PATTERNS.anomaly.is_match(raw)
}

fn valid_critique(raw: &str) -> bool {
    PATTERNS.critique.is_match(raw)
}

fn valid_program(raw: &str) -> bool {
    PATTERNS.program.is_match(raw)
}

fn valid_session(raw: &str) -> bool {
    PATTERNS.session.is_match(raw)
}

fn valid_anchor(raw: &str) -> bool {
    PATTERNS.anchor.is_match(raw)
}

/// Declares a pattern-validated string identifier.
///
/// Serializes as a plain string; deserialization re-validates, so a malformed
/// id in a persisted document fails at parse time rather than leaking into
/// the domain layer.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $valid:path, $pattern:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn parse(raw: impl Into<String>) -> Result<Self, IdError> {
                let raw = raw.into();
                if $valid(&raw) {
                    Ok(Self(raw))
                } else {
                    Err(IdError::Malformed {
                        kind: $kind,
                        raw,
                        pattern: $pattern,
                    })
                }
            }

            /// Pure format predicate, usable without constructing an id.
            #[must_use]
            pub fn is_valid(raw: &str) -> bool {
                $valid(raw)
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_id!(
    /// `A-{session}-{seq}`, or the legacy bare form `A{n}`.
    AssumptionId,
    "assumption",
    valid_assumption,
    "^A-[A-Za-z0-9][\\w-]*-\\d{3}$ or ^A\\d+$"
);

entity_id!(
    /// `H-{session}-{seq}`. Hypotheses are referenced here, owned elsewhere.
    HypothesisId,
    "hypothesis",
    valid_hypothesis,
    "^H-[A-Za-z0-9][\\w-]*-\\d{3}$"
);

entity_id!(
    /// `T-{session}-{seq}`, or the legacy bare form `T{n}`. Referenced only.
    TestId,
    "test",
    valid_test,
    "^T-[A-Za-z0-9][\\w-]*-\\d{3}$ or ^T\\d+$"
);

entity_id!(
    /// `X-{session}-{seq}`.
    AnomalyId,
    "anomaly",
    valid_anomaly,
    "^X-[A-Za-z0-9][\\w-]*-\\d{3}$"
);

entity_id!(
    /// `C-{session}-{seq}`.
    CritiqueId,
    "critique",
    valid_critique,
    "^C-[A-Za-z0-9][\\w-]*-\\d{3}$"
);

entity_id!(
    /// `RP-{slug}-{seq}`.
    ProgramId,
    "research program",
    valid_program,
    "^RP-[A-Za-z0-9][\\w-]*-\\d{3}$"
);

entity_id!(
    /// Session identifiers start with `RS`. Sessions are owned by the caller.
    SessionId,
    "session",
    valid_session,
    "^RS[A-Za-z0-9-][\\w-]*$"
);

entity_id!(
    /// Transcript anchor, e.g. `§41` or `§41-44`.
    TranscriptAnchor,
    "transcript anchor",
    valid_anchor,
    "^§\\d+(-\\d+)?$"
);

impl AssumptionId {
    /// Whether this id uses the legacy bare form (`A7`).
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        PATTERNS.assumption_legacy.is_match(&self.0)
    }
}

impl TestId {
    /// Whether this id uses the legacy bare form (`T12`).
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        PATTERNS.test_legacy.is_match(&self.0)
    }
}

/// Next sequence number within `{prefix}-{scope}-`.
///
/// The maximum sequence found wins: gaps are tolerated and never refilled.
/// Ids from other scopes and legacy bare ids do not participate.
fn next_sequence<I, S>(
    kind: &'static str,
    prefix: &str,
    scope: &str,
    existing: I,
) -> Result<u16, IdError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let scope_prefix = format!("{prefix}-{scope}-");
    let mut max = 0u16;
    for id in existing {
        let Some(rest) = id.as_ref().strip_prefix(scope_prefix.as_str()) else {
            continue;
        };
        if rest.len() != 3 || !rest.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(seq) = rest.parse::<u16>() {
            max = max.max(seq);
        }
    }
    if max >= 999 {
        return Err(IdError::SequenceOverflow {
            kind,
            scope: scope.to_owned(),
        });
    }
    Ok(max + 1)
}

pub fn generate_assumption_id<I, S>(session: &SessionId, existing: I) -> Result<AssumptionId, IdError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let seq = next_sequence("assumption", "A", session.as_str(), existing)?;
    Ok(AssumptionId(format!("A-{}-{seq:03}", session.as_str())))
}

pub fn generate_anomaly_id<I, S>(session: &SessionId, existing: I) -> Result<AnomalyId, IdError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let seq = next_sequence("anomaly", "X", session.as_str(), existing)?;
    Ok(AnomalyId(format!("X-{}-{seq:03}", session.as_str())))
}

pub fn generate_critique_id<I, S>(session: &SessionId, existing: I) -> Result<CritiqueId, IdError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let seq = next_sequence("critique", "C", session.as_str(), existing)?;
    Ok(CritiqueId(format!("C-{}-{seq:03}", session.as_str())))
}

/// Research programs are scoped by a caller-chosen slug rather than a session.
pub fn generate_program_id<I, S>(slug: &str, existing: I) -> Result<ProgramId, IdError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if !PATTERNS.program_slug.is_match(slug) {
        return Err(IdError::Malformed {
            kind: "research program slug",
            raw: slug.to_owned(),
            pattern: "^[A-Za-z0-9][\\w-]*$",
        });
    }
    let seq = next_sequence("research program", "RP", slug, existing)?;
    Ok(ProgramId(format!("RP-{slug}-{seq:03}")))
}
