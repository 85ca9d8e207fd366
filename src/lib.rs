//! # skill-runtime
//!
//! Capability units ("skills") for autonomous agents.
//!
//! A skill accepts overlapping invocation requests without ever blocking the
//! caller, services them strictly in submission order on an injected worker
//! pool, and reports each completion through the request's callback exactly
//! once. Abandoned requests are dropped without a callback.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use skill_runtime::config::RuntimeConfig;
//! use skill_runtime::pool::{TokioWorkerPool, WorkerPool};
//! use skill_runtime::skills::{FunctionSkill, ParamsMap, Skill, SkillDelegate, WorkOutcome};
//!
//! let pool: Arc<dyn WorkerPool> =
//!     Arc::new(TokioWorkerPool::from_config(&RuntimeConfig::default()).unwrap());
//! let skill = Arc::new(FunctionSkill::new("greet", pool, |_| WorkOutcome::Completed));
//!
//! if skill.can_use_skill() {
//!     Arc::clone(&skill).use_skill(
//!         SkillDelegate::new(|done| println!("{} finished: {}", done.skill_name(), done.state())),
//!         ParamsMap::new(),
//!     );
//! }
//! ```

pub mod config;
pub mod error;
pub mod pool;
pub mod skills;

pub use config::RuntimeConfig;
pub use error::{SkillError, SkillResult};
pub use pool::{Job, ManualWorkerPool, TokioWorkerPool, WorkerPool};
pub use skills::{
    Completion, FunctionSkill, ParamsMap, PendingRequest, RequestId, RequestOutcome, RequestQueue,
    Skill, SkillCore, SkillDelegate, SkillEvent, SkillRecord, SkillState, TransitionTable,
    WorkOutcome,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
