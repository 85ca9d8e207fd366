//! The `Skill` trait every capability implements.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::base::SkillCore;
use super::persistence;
use super::request::{ParamsMap, SkillDelegate};
use super::state::SkillState;
use crate::error::SkillResult;
use crate::pool::WorkerPool;

/// A named, enable/disable-able unit of agent behavior with asynchronous
/// invocation.
///
/// Callers check [`can_use_skill`](Self::can_use_skill) and then submit work
/// with [`use_skill`](Self::use_skill), which never blocks. Each accepted
/// request's callback fires exactly once, in submission order, unless the
/// request is abandoned by [`abort_skill`](Self::abort_skill) or teardown, in
/// which case it never fires.
///
/// Skills are shared as `Arc<dyn Skill>`. An instance serves one owning
/// context; use [`clone_skill`](Self::clone_skill) to give another context
/// its own queue and state.
pub trait Skill: Send + Sync + fmt::Debug {
    /// The embedded identity, attributes, lifecycle and queue.
    fn core(&self) -> &SkillCore;

    /// Name of the concrete capability type, written into persisted records.
    fn skill_type(&self) -> &'static str;

    /// Whether invoking the skill is currently meaningful. No side effects.
    fn can_use_skill(&self) -> bool;

    /// Submit a request. Must not block: the request is queued and, only if
    /// it is the first outstanding one, its work is started on the worker
    /// pool.
    fn use_skill(self: Arc<Self>, callback: SkillDelegate, params: ParamsMap);

    /// Stop outstanding work. Abandoned requests' callbacks are never
    /// invoked. Returns `true` if the abort had any effect.
    fn abort_skill(&self) -> bool;

    /// An independent copy: same name and enabled flag, new identity,
    /// `Inactive`, no requests.
    fn clone_skill(&self) -> Arc<dyn Skill>;

    /// Add capability-specific fields to a persisted record.
    fn write_extra(&self, _record: &mut Map<String, Value>) {}

    /// Read capability-specific fields from a persisted record.
    fn read_extra(&self, _record: &Map<String, Value>) -> SkillResult<()> {
        Ok(())
    }

    fn id(&self) -> Uuid {
        self.core().id()
    }

    fn is_enabled(&self) -> bool {
        self.core().is_enabled()
    }

    fn set_enabled(&self, enabled: bool) {
        self.core().set_enabled(enabled)
    }

    fn skill_name(&self) -> String {
        self.core().name()
    }

    fn set_skill_name(&self, name: &str) {
        self.core().set_name(name)
    }

    fn state(&self) -> SkillState {
        self.core().state()
    }

    fn worker_pool(&self) -> Arc<dyn WorkerPool> {
        Arc::clone(self.core().pool())
    }

    /// Persisted form: `enabled`, `skillName`, `type`, plus whatever
    /// [`write_extra`](Self::write_extra) adds.
    fn to_json(&self) -> Value {
        persistence::serialize_skill(self)
    }

    /// Restore `enabled` and `skillName` (and extras) from a persisted
    /// record. The skill ends up `Inactive` with no requests.
    fn load_json(&self, value: &Value) -> SkillResult<()> {
        persistence::deserialize_skill(self, value)
    }
}
