//! Deterministic scoring for Crucible contributions and sessions.
//!
//! Two layers. The contribution layer scores one role's structured output
//! against a weighted rubric with hard pass/fail gates and advisory
//! warnings. The session layer scores a whole session snapshot across seven
//! heuristic dimensions and assigns a letter grade.
//!
//! Everything here is a pure function over already-parsed data: same input,
//! same score, no clock, no IO. Malformed or missing fields degrade to zero
//! points (or a failed gate), never to a panic or an error return.

pub mod contribution;
pub mod dimensions;
pub mod gates;
pub mod rubric;
pub mod warnings;

pub use contribution::{ContributionScore, score_contribution};
pub use dimensions::{
    Dimension, DimensionScore, Grade, SessionScore, Signal, grade_for, score_session,
};
pub use gates::{ContributionRecord, Gate, GateFailure, GateReport, check_pass_fail_gates};
pub use rubric::{
    AdversarialCriticCriteria, HypothesisGeneratorCriteria, Role, RoleCriteria, RubricScore,
    TestDesignerCriteria, UniversalCriteria, calculate_adversarial_critic_score,
    calculate_hypothesis_generator_score, calculate_role_score, calculate_test_designer_score,
};
pub use warnings::{ScoreWarning, generate_warnings};
