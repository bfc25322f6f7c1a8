//! Fire suppression
//!
//! Suppression only ever lowers the intensity of a live effect. Applying any
//! amount to a Burning entity moves it to Extinguishing; once intensity reaches
//! the entity's minimum the fire is put out. [`SuppressionAgent`] models a
//! handheld extinguisher that re-applies suppression every tick while sprayed.

pub mod agent;

pub use agent::{SuppressionAgent, SuppressionAgentConfig};

/// Result of one suppression application
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuppressionOutcome {
    /// Nothing to suppress: the entity is not burning or the effect is gone
    Ignored,
    /// Intensity lowered and still above the minimum
    Reduced {
        /// Intensity after the application
        intensity: f32,
    },
    /// Intensity reached the minimum and the entity is now Extinguished
    Extinguished,
}

impl SuppressionOutcome {
    /// Whether the application changed anything
    pub fn is_applied(&self) -> bool {
        !matches!(self, SuppressionOutcome::Ignored)
    }
}
