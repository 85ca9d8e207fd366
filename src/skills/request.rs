//! Pending requests and their completion callbacks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::skill::Skill;

/// Opaque key/value parameters passed with a request.
pub type ParamsMap = HashMap<String, Value>;

/// Completion function, invoked with the skill that serviced the request.
pub type SkillCallback = Arc<dyn Fn(&dyn Skill) + Send + Sync>;

type Liveness = Arc<dyn Fn() -> bool + Send + Sync>;

// ---------------------------------------------------------------------------
// SkillDelegate
// ---------------------------------------------------------------------------

/// A validity-checkable completion handle.
///
/// A delegate is either empty, a plain function, or a method bound weakly to
/// some target. Empty delegates and bound delegates whose target has been
/// dropped are invalid; invoking an invalid delegate does nothing.
#[derive(Clone, Default)]
pub struct SkillDelegate {
    callback: Option<SkillCallback>,
    liveness: Option<Liveness>,
}

impl fmt::Debug for SkillDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkillDelegate")
            .field("bound", &self.liveness.is_some())
            .field("valid", &self.is_valid())
            .finish()
    }
}

impl SkillDelegate {
    /// Wrap a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn Skill) + Send + Sync + 'static,
    {
        Self {
            callback: Some(Arc::new(f)),
            liveness: None,
        }
    }

    /// A delegate that nobody listens on.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Bind `method` to `target` without keeping the target alive.
    ///
    /// Once every strong reference to `target` is gone the delegate reports
    /// itself invalid and is skipped on completion.
    pub fn bind<T>(target: &Arc<T>, method: fn(&T, &dyn Skill)) -> Self
    where
        T: Send + Sync + 'static,
    {
        let weak = Arc::downgrade(target);
        let probe = weak.clone();
        Self {
            callback: Some(Arc::new(move |skill: &dyn Skill| {
                if let Some(target) = weak.upgrade() {
                    method(&target, skill);
                }
            })),
            liveness: Some(Arc::new(move || probe.strong_count() > 0)),
        }
    }

    /// Whether invoking this delegate would reach a listener.
    pub fn is_valid(&self) -> bool {
        match (&self.callback, &self.liveness) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(_), Some(alive)) => alive(),
        }
    }

    /// Invoke the delegate if it is valid. Returns whether it was invoked.
    pub fn invoke(&self, origin: &dyn Skill) -> bool {
        if !self.is_valid() {
            return false;
        }
        match &self.callback {
            Some(callback) => {
                callback(origin);
                true
            }
            None => false,
        }
    }

    /// Disconnect the delegate.
    pub fn reset(&mut self) {
        self.callback = None;
        self.liveness = None;
    }
}

// ---------------------------------------------------------------------------
// RequestId
// ---------------------------------------------------------------------------

/// Position of a request in its queue's submission sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PendingRequest
// ---------------------------------------------------------------------------

/// One caller's submitted invocation.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    id: RequestId,
    callback: SkillDelegate,
    params: ParamsMap,
    submitted_at: DateTime<Utc>,
}

impl PendingRequest {
    pub(crate) fn new(id: RequestId, callback: SkillDelegate, params: ParamsMap) -> Self {
        Self {
            id,
            callback,
            params,
            submitted_at: Utc::now(),
        }
    }

    /// Sequence id within the owning queue.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The completion handle.
    pub fn callback(&self) -> &SkillDelegate {
        &self.callback
    }

    /// Parameters as submitted.
    pub fn params(&self) -> &ParamsMap {
        &self.params
    }

    /// Look up a single parameter.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// When the request entered the queue.
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}
