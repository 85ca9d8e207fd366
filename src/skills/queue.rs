//! Per-skill FIFO of pending requests.
//!
//! `RequestQueue` is a plain value with no internal synchronization; every
//! mutating operation takes `&mut self`. [`SkillCore`](super::base::SkillCore)
//! is what confines a queue to one skill instance and serializes access to it.

use std::collections::VecDeque;

use super::request::{ParamsMap, PendingRequest, RequestId, SkillDelegate};
use super::skill::Skill;

/// Ordered requests for one skill instance. The front entry is the active
/// request.
#[derive(Debug, Default)]
pub struct RequestQueue {
    requests: VecDeque<PendingRequest>,
    next_id: u64,
}

impl RequestQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request. Returns `true` iff the queue was empty before, i.e.
    /// the new request is now the active one.
    pub fn push_request(&mut self, callback: SkillDelegate, params: ParamsMap) -> bool {
        self.enqueue(callback, params).1
    }

    /// Like [`push_request`](Self::push_request), also returning the id given
    /// to the new entry.
    pub fn enqueue(&mut self, callback: SkillDelegate, params: ParamsMap) -> (RequestId, bool) {
        let first = self.requests.is_empty();
        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.requests.push_back(PendingRequest::new(id, callback, params));
        (id, first)
    }

    /// Whether an active request exists.
    pub fn have_requests(&self) -> bool {
        !self.requests.is_empty()
    }

    /// The front entry, if any.
    pub fn active_request(&self) -> Option<&PendingRequest> {
        self.requests.front()
    }

    /// Number of outstanding requests, the active one included.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Outstanding requests in service order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingRequest> {
        self.requests.iter()
    }

    /// Complete the active request: invoke its callback with `origin` (if the
    /// callback is valid), drop it, and report whether more requests remain.
    ///
    /// On an empty queue this does nothing and returns `false`.
    pub fn pop_request(&mut self, origin: &dyn Skill) -> bool {
        if let Some(request) = self.requests.front() {
            request.callback().invoke(origin);
            self.requests.pop_front();
        }
        self.have_requests()
    }

    /// Drop every request without invoking any callback. Returns how many
    /// were discarded.
    pub fn pop_all_requests(&mut self) -> usize {
        let discarded = self.requests.len();
        self.requests.clear();
        discarded
    }

    /// Id and callback of the active request, leaving it in place.
    pub(crate) fn front_callback(&self) -> Option<(RequestId, SkillDelegate)> {
        self.requests
            .front()
            .map(|request| (request.id(), request.callback().clone()))
    }

    /// Remove the front entry if it is still `id`, returning whether more
    /// requests remain. `None` means `id` was no longer at the front and
    /// nothing was removed.
    pub(crate) fn retire(&mut self, id: RequestId) -> Option<bool> {
        if self.requests.front().map(PendingRequest::id) != Some(id) {
            return None;
        }
        self.requests.pop_front();
        Some(self.have_requests())
    }
}
