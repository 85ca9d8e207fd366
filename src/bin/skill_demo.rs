//! skill-runtime demo binary.
//!
//! Submits three overlapping requests to a function-backed skill and logs the
//! order in which their callbacks arrive.
//!
//! # Environment Variables
//!
//! - `SKILL_WORKER_THREADS`: async worker threads (default: available parallelism)
//! - `SKILL_MAX_BLOCKING_THREADS`: threads running skill jobs (default: 64)
//! - `SKILL_THREAD_NAME`: worker thread name prefix (default: "skill-worker")
//! - `RUST_LOG`: Tracing filter (default: "info,skill_runtime=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin skill-demo
//! ```

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde_json::{json, Value};

use skill_runtime::config::RuntimeConfig;
use skill_runtime::pool::{TokioWorkerPool, WorkerPool};
use skill_runtime::skills::{FunctionSkill, ParamsMap, Skill, SkillDelegate, WorkOutcome};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,skill_runtime=debug".into()),
        )
        .init();

    let config = RuntimeConfig::from_env().context("invalid runtime configuration")?;
    let pool: Arc<dyn WorkerPool> =
        Arc::new(TokioWorkerPool::from_config(&config).context("failed to start worker pool")?);

    let skill = Arc::new(FunctionSkill::new("say", Arc::clone(&pool), |params| {
        match params.get("message").and_then(Value::as_str) {
            Some(message) => {
                tracing::info!("saying: {}", message);
                std::thread::sleep(Duration::from_millis(50));
                WorkOutcome::Completed
            }
            None => WorkOutcome::Failed("missing 'message' parameter".to_string()),
        }
    }));

    if !skill.can_use_skill() {
        anyhow::bail!("skill '{}' is not usable", skill.skill_name());
    }

    let (tx, rx) = mpsc::channel();
    let messages = [Some("hello"), None, Some("goodbye")];
    for (index, message) in messages.iter().enumerate() {
        let mut params = ParamsMap::new();
        if let Some(message) = message {
            params.insert("message".to_string(), json!(message));
        }
        let tx = tx.clone();
        Arc::clone(&skill).use_skill(
            SkillDelegate::new(move |done| {
                let _ = tx.send((index, done.state()));
            }),
            params,
        );
    }
    tracing::info!(
        "submitted {} requests to '{}' ({})",
        messages.len(),
        skill.skill_name(),
        skill.id()
    );

    for _ in 0..messages.len() {
        let (index, state) = rx
            .recv_timeout(Duration::from_secs(10))
            .context("timed out waiting for a completion")?;
        tracing::info!("request {} finished: {}", index, state);
    }

    if let Some(reason) = skill.last_error() {
        tracing::info!("last failure: {}", reason);
    }
    tracing::info!("persisted form: {}", skill.to_json());
    Ok(())
}
