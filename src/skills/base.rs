//! State shared by every skill: identity, attributes, lifecycle and queue.
//!
//! Concrete capabilities embed a [`SkillCore`] and drive it from their
//! [`Skill`] implementation. The core serializes access to its queue and
//! state machine, so a capability can be shared as `Arc<dyn Skill>` between
//! the thread that submits requests and the pool thread that completes them.
//!
//! Lock order is queue, then state machine. Neither lock is held while a
//! completion callback runs, so callbacks may call back into the skill.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use super::queue::RequestQueue;
use super::request::{ParamsMap, PendingRequest, RequestId, SkillDelegate};
use super::skill::Skill;
use super::state::{SkillEvent, SkillState, StateMachine, TransitionTable};
use crate::error::SkillResult;
use crate::pool::WorkerPool;

/// How the active request's work ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Work succeeded.
    Completed,
    /// Work failed. The callback still fires; the state shows the failure.
    Failed,
}

impl RequestOutcome {
    fn event(self) -> SkillEvent {
        match self {
            Self::Completed => SkillEvent::Complete,
            Self::Failed => SkillEvent::Fail,
        }
    }
}

/// What the implementation should do after reporting a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The request was no longer active (it was aborted). Nothing happened.
    Stale,
    /// The callback fired and the queue is empty; the skill is `Inactive`.
    Idle,
    /// The callback fired and this request is now active; start its work.
    Next(RequestId),
    /// The callback fired, but the queue was reset while it ran. Whoever
    /// admitted the current front request is responsible for it.
    Detached,
}

#[derive(Debug, Clone)]
struct Attributes {
    enabled: bool,
    name: String,
}

/// Identity, attributes, lifecycle and request queue of one skill instance.
pub struct SkillCore {
    id: Uuid,
    attributes: RwLock<Attributes>,
    machine: Mutex<StateMachine>,
    queue: Mutex<RequestQueue>,
    pool: Arc<dyn WorkerPool>,
}

impl fmt::Debug for SkillCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attributes = self.attributes.read().clone();
        f.debug_struct("SkillCore")
            .field("id", &self.id)
            .field("name", &attributes.name)
            .field("enabled", &attributes.enabled)
            .field("state", &self.state())
            .field("pending", &self.pending_count())
            .field("pool", &self.pool.name())
            .finish()
    }
}

impl SkillCore {
    /// A fresh, enabled, unnamed core running work on `pool`.
    pub fn new(pool: Arc<dyn WorkerPool>) -> Self {
        Self {
            id: Uuid::new_v4(),
            attributes: RwLock::new(Attributes {
                enabled: true,
                name: String::new(),
            }),
            machine: Mutex::new(StateMachine::default()),
            queue: Mutex::new(RequestQueue::new()),
            pool,
        }
    }

    /// Set the skill name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.attributes.write().name = name.into();
        self
    }

    /// Set the enabled flag.
    pub fn with_enabled(self, enabled: bool) -> Self {
        self.attributes.write().enabled = enabled;
        self
    }

    /// Replace the standard lifecycle table.
    pub fn with_transitions(self, table: TransitionTable) -> Self {
        *self.machine.lock() = StateMachine::new(table);
        self
    }

    /// A new core with the same name, enabled flag, transition table and
    /// pool, but a new id, `Inactive` state and an empty queue.
    pub fn clone_fresh(&self) -> Self {
        let attributes = self.attributes.read().clone();
        Self {
            id: Uuid::new_v4(),
            attributes: RwLock::new(attributes),
            machine: Mutex::new(self.machine.lock().reset_copy()),
            queue: Mutex::new(RequestQueue::new()),
            pool: Arc::clone(&self.pool),
        }
    }

    // -- Attributes ---------------------------------------------------------

    /// Process-unique identity.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_enabled(&self) -> bool {
        self.attributes.read().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.attributes.write().enabled = enabled;
    }

    pub fn name(&self) -> String {
        self.attributes.read().name.clone()
    }

    pub fn set_name(&self, name: &str) {
        self.attributes.write().name = name.to_string();
    }

    /// The injected worker pool.
    pub fn pool(&self) -> &Arc<dyn WorkerPool> {
        &self.pool
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Current lifecycle state.
    pub fn state(&self) -> SkillState {
        self.machine.lock().state()
    }

    /// Copy of the governing transition table.
    pub fn transitions(&self) -> TransitionTable {
        self.machine.lock().table().clone()
    }

    /// Drive the lifecycle directly. Used by capabilities for events the
    /// queue helpers do not cover, such as `Block` and `Resume`.
    pub fn fire(&self, event: SkillEvent) -> SkillResult<SkillState> {
        let mut machine = self.machine.lock();
        let from = machine.state();
        let to = machine.fire(event)?;
        log::debug!("skill {} ({}): {} --{}--> {}", self.id, self.name(), from, event, to);
        Ok(to)
    }

    // -- Queue --------------------------------------------------------------

    /// Append a request without touching the lifecycle. Returns `true` iff
    /// the queue was empty before.
    pub fn push_request(&self, callback: SkillDelegate, params: ParamsMap) -> bool {
        self.queue.lock().push_request(callback, params)
    }

    /// Whether an active request exists.
    pub fn have_requests(&self) -> bool {
        self.queue.lock().have_requests()
    }

    /// Snapshot of the active request.
    pub fn active_request(&self) -> Option<PendingRequest> {
        self.queue.lock().active_request().cloned()
    }

    /// Id of the active request.
    pub fn active_request_id(&self) -> Option<RequestId> {
        self.queue.lock().active_request().map(PendingRequest::id)
    }

    /// Outstanding requests, the active one included.
    pub fn pending_count(&self) -> usize {
        self.queue.lock().len()
    }

    /// Pop the active request: invoke its callback with `origin`, drop it,
    /// and report whether more requests remain. Does not touch the lifecycle.
    ///
    /// The entry stays at the front while its callback runs, so a request
    /// submitted from inside the callback queues behind it.
    pub fn pop_request(&self, origin: &dyn Skill) -> bool {
        let front = self.queue.lock().front_callback();
        match front {
            Some((id, callback)) => {
                callback.invoke(origin);
                let mut queue = self.queue.lock();
                queue.retire(id).unwrap_or_else(|| queue.have_requests())
            }
            None => false,
        }
    }

    /// Drop every request without invoking callbacks. Does not touch the
    /// lifecycle. Returns how many were discarded.
    pub fn pop_all_requests(&self) -> usize {
        let discarded = self.queue.lock().pop_all_requests();
        if discarded > 0 {
            log::debug!("skill {} ({}): discarded {} request(s)", self.id, self.name(), discarded);
        }
        discarded
    }

    // -- Protocol helpers ---------------------------------------------------

    /// Admit a request. If it is the first outstanding one the lifecycle moves
    /// to `Active` and its id is returned: the caller must start its work.
    /// Otherwise it waits its turn and `None` is returned.
    ///
    /// If the transition table rejects `start`, the request is withdrawn
    /// without its callback and `None` is returned.
    pub fn admit(&self, callback: SkillDelegate, params: ParamsMap) -> Option<RequestId> {
        let mut queue = self.queue.lock();
        let (id, first) = queue.enqueue(callback, params);
        log::debug!(
            "skill {} ({}): admitted request {} (pending={})",
            self.id,
            self.name(),
            id,
            queue.len()
        );
        if !first {
            return None;
        }
        if let Err(e) = self.fire(SkillEvent::Start) {
            log::warn!(
                "skill {} ({}): request {} withdrawn: {}",
                self.id,
                self.name(),
                id,
                e
            );
            queue.retire(id);
            return None;
        }
        Some(id)
    }

    /// Report that the work for request `id` ended with `outcome`.
    ///
    /// The lifecycle moves to `Completed`/`Failed`, the request's callback
    /// fires with the lifecycle in that state, and then the skill either
    /// starts the next request (`Active`, [`Completion::Next`]) or goes
    /// `Inactive` ([`Completion::Idle`]). Completions for requests that are
    /// no longer active are ignored.
    pub fn complete_request(
        &self,
        origin: &dyn Skill,
        id: RequestId,
        outcome: RequestOutcome,
    ) -> SkillResult<Completion> {
        let callback = {
            let queue = self.queue.lock();
            match queue.front_callback() {
                Some((front, callback)) if front == id => {
                    self.fire(outcome.event())?;
                    callback
                }
                _ => {
                    log::debug!(
                        "skill {} ({}): ignoring stale completion of request {}",
                        self.id,
                        self.name(),
                        id
                    );
                    return Ok(Completion::Stale);
                }
            }
        };

        callback.invoke(origin);

        let mut queue = self.queue.lock();
        let has_more = match queue.retire(id) {
            Some(has_more) if self.state().is_outcome() => has_more,
            _ => {
                // Aborted while the callback ran; the queue now belongs to
                // whoever admitted its front request.
                log::debug!(
                    "skill {} ({}): request {} detached from the queue during its callback",
                    self.id,
                    self.name(),
                    id
                );
                return Ok(Completion::Detached);
            }
        };
        if has_more {
            self.fire(SkillEvent::Start)?;
            Ok(queue
                .active_request()
                .map(|request| Completion::Next(request.id()))
                .unwrap_or(Completion::Detached))
        } else {
            self.fire(SkillEvent::Idle)?;
            Ok(Completion::Idle)
        }
    }

    /// Abandon all outstanding work: drop every request without invoking
    /// callbacks and force the lifecycle back to `Inactive`.
    ///
    /// Returns `true` if there was anything to abandon.
    pub fn abort_all(&self) -> bool {
        let mut queue = self.queue.lock();
        let discarded = queue.pop_all_requests();
        let was = self.state();
        if was != SkillState::Inactive {
            if let Err(e) = self.fire(SkillEvent::Abort) {
                log::warn!("skill {} ({}): {}", self.id, self.name(), e);
            }
        }
        let had_effect = discarded > 0 || was != SkillState::Inactive;
        if had_effect {
            log::debug!(
                "skill {} ({}): aborted in {} state, discarded {} request(s)",
                self.id,
                self.name(),
                was,
                discarded
            );
        }
        had_effect
    }
}

impl Drop for SkillCore {
    fn drop(&mut self) {
        let name = self.attributes.get_mut().name.clone();
        let discarded = self.queue.get_mut().pop_all_requests();
        if discarded > 0 {
            log::warn!(
                "skill {} ({}) dropped with {} outstanding request(s); callbacks discarded",
                self.id,
                name,
                discarded
            );
        }
    }
}
