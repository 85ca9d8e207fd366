//! # Skills
//!
//! A skill is a named, enable/disable-able capability of an agent that is
//! invoked asynchronously. Every skill owns a FIFO of pending requests and a
//! small lifecycle state machine; the protocol that ties them together is
//! the same for every capability:
//!
//! 1. The caller checks `can_use_skill()` and submits `use_skill(callback, params)`.
//! 2. The request is queued. Only if it is the first outstanding request does
//!    its work start on the worker pool; otherwise it waits its turn.
//! 3. When the work ends the lifecycle records `Completed` or `Failed`, the
//!    front request is popped and its callback invoked, and the next request
//!    is started or the skill goes back to `Inactive`.
//! 4. `abort_skill()` drops every outstanding request without invoking any
//!    callback.

pub mod base;
pub mod function_skill;
pub mod persistence;
pub mod queue;
pub mod request;
pub mod skill;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use base::{Completion, RequestOutcome, SkillCore};
pub use function_skill::{FunctionSkill, WorkOutcome};
pub use persistence::SkillRecord;
pub use queue::RequestQueue;
pub use request::{ParamsMap, PendingRequest, RequestId, SkillCallback, SkillDelegate};
pub use skill::Skill;
pub use state::{SkillEvent, SkillState, StateMachine, TransitionTable};
