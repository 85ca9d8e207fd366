//! A capability backed by a plain function.
//!
//! `FunctionSkill` runs a caller-supplied closure on the worker pool for each
//! request, one request at a time, in submission order. It is the simplest
//! complete implementation of the [`Skill`] contract and the reference for
//! how a capability drives its [`SkillCore`].
//!
//! Work runs to completion once started, so a `FunctionSkill` never enters
//! `Blocked`: its lifecycle table has no `Active + block` row.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use super::base::{Completion, RequestOutcome, SkillCore};
use super::request::{ParamsMap, RequestId, SkillDelegate};
use super::skill::Skill;
use super::state::{SkillEvent, SkillState, TransitionTable};
use crate::pool::WorkerPool;

/// Result of one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkOutcome {
    /// The work succeeded.
    Completed,
    /// The work failed, with a reason.
    Failed(String),
}

impl<E: fmt::Display> From<Result<(), E>> for WorkOutcome {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Completed,
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Work function run for each request.
pub type WorkFn = Arc<dyn Fn(&ParamsMap) -> WorkOutcome + Send + Sync>;

/// Availability predicate consulted by `can_use_skill`.
pub type AvailabilityFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// A skill whose work is a function of the request parameters.
pub struct FunctionSkill {
    core: SkillCore,
    work: WorkFn,
    availability: Option<AvailabilityFn>,
    last_error: Mutex<Option<String>>,
}

impl fmt::Debug for FunctionSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSkill")
            .field("core", &self.core)
            .field("has_availability", &self.availability.is_some())
            .field("last_error", &*self.last_error.lock())
            .finish()
    }
}

impl FunctionSkill {
    /// Create a skill named `name` that runs `work` on `pool`.
    pub fn new<F>(name: impl Into<String>, pool: Arc<dyn WorkerPool>, work: F) -> Self
    where
        F: Fn(&ParamsMap) -> WorkOutcome + Send + Sync + 'static,
    {
        Self {
            core: SkillCore::new(pool)
                .with_name(name)
                .with_transitions(Self::unblockable(TransitionTable::standard())),
            work: Arc::new(work),
            availability: None,
            last_error: Mutex::new(None),
        }
    }

    /// Only usable while `available` returns `true` (and the skill is
    /// enabled).
    pub fn with_availability<F>(mut self, available: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.availability = Some(Arc::new(available));
        self
    }

    /// Govern the lifecycle with `table` instead of the standard one. Any
    /// `Active + block` row is dropped.
    pub fn with_transitions(mut self, table: TransitionTable) -> Self {
        self.core = self.core.with_transitions(Self::unblockable(table));
        self
    }

    fn unblockable(table: TransitionTable) -> TransitionTable {
        table.without(SkillState::Active, SkillEvent::Block)
    }

    /// Reason of the most recent failed request.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn start(self: &Arc<Self>, id: RequestId) {
        let skill = Arc::clone(self);
        self.core.pool().submit(Box::new(move || skill.run(id)));
    }

    fn run(self: Arc<Self>, id: RequestId) {
        let params = match self.core.active_request() {
            Some(request) if request.id() == id => request.params().clone(),
            _ => {
                log::debug!("skill {}: request {} abandoned before it ran", self.id(), id);
                return;
            }
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.work)(&params)))
            .unwrap_or_else(|payload| WorkOutcome::Failed(panic_message(&*payload)));

        let result = match outcome {
            WorkOutcome::Completed => RequestOutcome::Completed,
            WorkOutcome::Failed(reason) => {
                log::warn!(
                    "skill {} ({}): request {} failed: {}",
                    self.id(),
                    self.skill_name(),
                    id,
                    reason
                );
                *self.last_error.lock() = Some(reason);
                RequestOutcome::Failed
            }
        };

        match self.core.complete_request(&*self, id, result) {
            Ok(Completion::Next(next)) => self.start(next),
            Ok(_) => {}
            Err(e) => log::warn!("skill {} ({}): {}", self.id(), self.skill_name(), e),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}

impl Skill for FunctionSkill {
    fn core(&self) -> &SkillCore {
        &self.core
    }

    fn skill_type(&self) -> &'static str {
        "FunctionSkill"
    }

    fn can_use_skill(&self) -> bool {
        self.is_enabled() && self.availability.as_ref().map_or(true, |available| available())
    }

    fn use_skill(self: Arc<Self>, callback: SkillDelegate, params: ParamsMap) {
        if let Some(id) = self.core.admit(callback, params) {
            self.start(id);
        }
    }

    fn abort_skill(&self) -> bool {
        self.core.abort_all()
    }

    fn clone_skill(&self) -> Arc<dyn Skill> {
        Arc::new(Self {
            core: self.core.clone_fresh(),
            work: Arc::clone(&self.work),
            availability: self.availability.clone(),
            last_error: Mutex::new(None),
        })
    }
}
