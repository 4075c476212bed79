//! LLM-backed analyzers.
//!
//! The coordinator consults the grammar, structure and content roles and
//! synthesizes one JSON assessment; the pillar analyzer produces the
//! extended four-pillar report.

pub mod coordinator;
pub mod pillars;
pub mod prompts;
pub mod roles;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::{Coordinator, CoordinatorConfig};
pub use pillars::PillarAnalyzer;
pub use roles::{AnalyzerRole, RoleKind, RoleNotes};
