//! Error types for the skill runtime.
//!
//! The request/completion protocol itself never fails with an error: an
//! unusable skill answers `false` from `can_use_skill`, failed work shows up
//! as `SkillState::Failed`, and abandoned requests are dropped silently.
//! `SkillError` covers the infrastructure around that protocol: state-machine
//! misuse, persisted records, configuration and runtime construction.

use thiserror::Error;

use crate::skills::state::{SkillEvent, SkillState};

/// Errors produced by the skill runtime.
#[derive(Debug, Error)]
pub enum SkillError {
    /// The transition table has no entry for this state/event pair.
    #[error("Invalid transition: {event} is not allowed while {from}")]
    InvalidTransition {
        /// State the skill was in.
        from: SkillState,
        /// Event that was fired.
        event: SkillEvent,
    },

    /// A persisted record could not be parsed or produced.
    #[error("Record error: {0}")]
    Record(#[from] serde_json::Error),

    /// A persisted record parsed but has the wrong shape.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A configuration value was rejected.
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML configuration parsing failed.
    #[error("YAML error: {0}")]
    ConfigYaml(#[from] serde_yaml::Error),

    /// File or runtime I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias.
pub type SkillResult<T> = Result<T, SkillError>;
