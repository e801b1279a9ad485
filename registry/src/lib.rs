//! Read-only projections over Crucible entity collections.
//!
//! Nothing in this crate owns state or writes anything back. Callers hand
//! in a program and its session snapshots; they get back derived views -
//! blast radius for a falsified assumption, health counts per registry, and
//! the full program dashboard with warnings and a timeline.

pub mod dashboard;
pub mod load;

pub use dashboard::{
    EventKind, HealthWarning, HypothesisFunnel, ProgramDashboard, RegistryHealth, Severity,
    TestExecutionSummary, TimelineEvent, compute_program_dashboard,
};
pub use load::{ImpactSet, blast_radius, missing_scale_physics};
