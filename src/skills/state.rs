//! Skill lifecycle state and its transition table.
//!
//! The lifecycle is an explicit finite-state machine: a table maps
//! `(state, event)` to the next state, and anything not in the table is
//! rejected. The standard table covers the lifecycle every capability
//! shares:
//!
//! ```text
//! Inactive --start--> Active --complete--> Completed --start--> Active
//!                       |  ^                         --idle---> Inactive
//!                  block|  |resume
//!                       v  |
//!                     Blocked --fail--> Failed --start/idle--> ...
//! ```
//!
//! `abort` is accepted from every state and always lands on `Inactive`.
//! Concrete capabilities may extend or restrict the table when they build
//! their [`SkillCore`](super::base::SkillCore).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SkillError, SkillResult};

// ---------------------------------------------------------------------------
// SkillState
// ---------------------------------------------------------------------------

/// Lifecycle state of a skill instance. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillState {
    /// No outstanding work (initial state).
    #[default]
    Inactive,
    /// The active request's work is in flight.
    Active,
    /// The active request is paused on something external. Still outstanding.
    Blocked,
    /// The active request finished successfully.
    Completed,
    /// The active request failed.
    Failed,
}

impl SkillState {
    /// Whether the active request's work is still outstanding.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, Self::Active | Self::Blocked)
    }

    /// Whether this is a per-request outcome.
    pub fn is_outcome(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Lowercase name, as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Blocked => "blocked",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SkillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SkillEvent
// ---------------------------------------------------------------------------

/// Events that drive the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillEvent {
    /// Work for the front request begins.
    Start,
    /// The active request pauses on an external resource.
    Block,
    /// A blocked request continues.
    Resume,
    /// The active request finished successfully.
    Complete,
    /// The active request failed.
    Fail,
    /// The queue ran dry after an outcome.
    Idle,
    /// Outstanding work was abandoned.
    Abort,
}

impl SkillEvent {
    /// Lowercase name, as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Block => "block",
            Self::Resume => "resume",
            Self::Complete => "complete",
            Self::Fail => "fail",
            Self::Idle => "idle",
            Self::Abort => "abort",
        }
    }
}

impl fmt::Display for SkillEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TransitionTable
// ---------------------------------------------------------------------------

/// State × event → next state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    rows: HashMap<(SkillState, SkillEvent), SkillState>,
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TransitionTable {
    /// A table with no transitions other than the implicit `abort`.
    pub fn empty() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }

    /// The lifecycle shared by every capability.
    pub fn standard() -> Self {
        use SkillEvent::*;
        use SkillState::*;

        Self::empty()
            .with(Inactive, Start, Active)
            .with(Active, Block, Blocked)
            .with(Blocked, Resume, Active)
            .with(Active, Complete, Completed)
            .with(Active, Fail, Failed)
            .with(Blocked, Fail, Failed)
            .with(Completed, Start, Active)
            .with(Failed, Start, Active)
            .with(Completed, Idle, Inactive)
            .with(Failed, Idle, Inactive)
    }

    /// Add (or replace) a transition.
    pub fn with(mut self, from: SkillState, event: SkillEvent, to: SkillState) -> Self {
        self.rows.insert((from, event), to);
        self
    }

    /// Remove a transition.
    pub fn without(mut self, from: SkillState, event: SkillEvent) -> Self {
        self.rows.remove(&(from, event));
        self
    }

    /// Look up the next state. `abort` is always accepted.
    pub fn next(&self, from: SkillState, event: SkillEvent) -> Option<SkillState> {
        if event == SkillEvent::Abort {
            return Some(SkillState::Inactive);
        }
        self.rows.get(&(from, event)).copied()
    }

    /// Whether `event` is accepted in `from`.
    pub fn allows(&self, from: SkillState, event: SkillEvent) -> bool {
        self.next(from, event).is_some()
    }

    /// Number of explicit rows (the implicit `abort` is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no explicit rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// StateMachine
// ---------------------------------------------------------------------------

/// Current state plus the table that governs it.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: SkillState,
    table: TransitionTable,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(TransitionTable::standard())
    }
}

impl StateMachine {
    /// A machine in `Inactive` governed by `table`.
    pub fn new(table: TransitionTable) -> Self {
        Self {
            state: SkillState::Inactive,
            table,
        }
    }

    /// Current state.
    pub fn state(&self) -> SkillState {
        self.state
    }

    /// The governing table.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Apply `event`, returning the new state.
    pub fn fire(&mut self, event: SkillEvent) -> SkillResult<SkillState> {
        let next = self
            .table
            .next(self.state, event)
            .ok_or(SkillError::InvalidTransition {
                from: self.state,
                event,
            })?;
        self.state = next;
        Ok(next)
    }

    /// A fresh machine with the same table, back in `Inactive`.
    pub fn reset_copy(&self) -> Self {
        Self::new(self.table.clone())
    }
}
