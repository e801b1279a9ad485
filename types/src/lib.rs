//! Core domain types for Crucible.
//!
//! This crate contains pure domain types with no IO and no async: typed
//! identifiers, the four owned entities (assumptions, anomalies, critiques,
//! research programs) with their lifecycle state machines, structural
//! validators, and the session snapshot consumed by the scoring and registry
//! crates.
//!
//! Entities are immutable value records. Every "mutation" is a transition
//! function that consumes the entity, checks the state-machine guard, stamps
//! `updatedAt`, re-validates, and returns a new value. Nothing here locks,
//! blocks, or resolves concurrent edits; serializing writes per entity is the
//! caller's job.

pub mod anomaly;
pub mod assumption;
pub mod critique;
pub mod ids;
pub mod program;
pub mod session;
mod validate;

pub use anomaly::{
    Anomaly, AnomalyError, AnomalyInput, AnomalySource, ConflictSet, QuarantineStatus, SourceKind,
    validate_anomaly,
};
pub use assumption::{
    Assumption, AssumptionError, AssumptionInput, AssumptionLoad, AssumptionStatus,
    AssumptionType, Criticality, ScaleCalculation, validate_assumption,
};
pub use critique::{
    ActionTaken, Critique, CritiqueError, CritiqueInput, CritiqueResponse, CritiqueStatus,
    CritiqueTarget, ProposedAlternative, validate_critique,
};
pub use ids::{
    AnomalyId, AssumptionId, CritiqueId, HypothesisId, IdError, ProgramId, SessionId, TestId,
    TranscriptAnchor, generate_anomaly_id, generate_assumption_id, generate_critique_id,
    generate_program_id,
};
pub use program::{
    ProgramError, ProgramInput, ProgramStatus, ResearchProgram, validate_program,
};
pub use session::{
    HypothesisOrigin, HypothesisRecord, HypothesisStatus, HypothesisTransition, KillRecord,
    SessionSnapshot, TestRecord, TestStage,
};
pub use validate::{FieldError, Validated, ValidationFailed};
