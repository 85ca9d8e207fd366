//! Tokio-backed worker pool.

use std::fmt;

use futures::future::BoxFuture;
use tokio::runtime::{Builder, Handle, Runtime};

use super::{Job, WorkerPool};
use crate::config::RuntimeConfig;
use crate::error::SkillResult;

/// Runs jobs with `spawn_blocking` on a tokio runtime.
///
/// The runtime is either owned by the pool (built from a [`RuntimeConfig`])
/// or borrowed through a [`Handle`]. An owned runtime is shut down in the
/// background when the pool is dropped; jobs still queued at that point
/// never run.
pub struct TokioWorkerPool {
    name: String,
    handle: Handle,
    runtime: Option<Runtime>,
}

impl fmt::Debug for TokioWorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioWorkerPool")
            .field("name", &self.name)
            .field("owns_runtime", &self.runtime.is_some())
            .finish()
    }
}

impl TokioWorkerPool {
    /// Build a pool with its own multi-thread runtime.
    pub fn from_config(config: &RuntimeConfig) -> SkillResult<Self> {
        config.validate()?;
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .max_blocking_threads(config.max_blocking_threads)
            .thread_name(config.thread_name.clone())
            .enable_all()
            .build()?;

        log::debug!(
            "TokioWorkerPool '{}' started: worker_threads={}, max_blocking_threads={}",
            config.thread_name,
            config.worker_threads,
            config.max_blocking_threads
        );

        Ok(Self {
            name: config.thread_name.clone(),
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
        })
    }

    /// Use a runtime owned by someone else.
    pub fn from_handle(name: impl Into<String>, handle: Handle) -> Self {
        Self {
            name: name.into(),
            handle,
            runtime: None,
        }
    }

    /// Use the runtime the caller is running on, if any.
    pub fn current(name: impl Into<String>) -> Option<Self> {
        Handle::try_current()
            .ok()
            .map(|handle| Self::from_handle(name, handle))
    }

    /// The runtime handle jobs are scheduled on.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Schedule async work on the same runtime.
    pub fn spawn_future(&self, future: BoxFuture<'static, ()>) {
        self.handle.spawn(future);
    }
}

impl WorkerPool for TokioWorkerPool {
    fn submit(&self, job: Job) {
        self.handle.spawn_blocking(job);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for TokioWorkerPool {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            log::debug!("TokioWorkerPool '{}' shutting down", self.name);
            runtime.shutdown_background();
        }
    }
}
