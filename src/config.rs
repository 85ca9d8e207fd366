//! Runtime configuration for worker pools.
//!
//! Values come from defaults, a YAML document, or the environment:
//!
//! - `SKILL_WORKER_THREADS`: async worker threads (default: available parallelism)
//! - `SKILL_MAX_BLOCKING_THREADS`: upper bound on threads running skill jobs (default: 64)
//! - `SKILL_THREAD_NAME`: thread name prefix, also the pool's log name (default: `skill-worker`)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SkillError, SkillResult};

/// Environment variable for [`RuntimeConfig::worker_threads`].
pub const ENV_WORKER_THREADS: &str = "SKILL_WORKER_THREADS";
/// Environment variable for [`RuntimeConfig::max_blocking_threads`].
pub const ENV_MAX_BLOCKING_THREADS: &str = "SKILL_MAX_BLOCKING_THREADS";
/// Environment variable for [`RuntimeConfig::thread_name`].
pub const ENV_THREAD_NAME: &str = "SKILL_THREAD_NAME";

/// Settings for an owned [`TokioWorkerPool`](crate::pool::TokioWorkerPool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Async worker threads.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    /// Maximum threads running blocking skill jobs.
    #[serde(default = "default_max_blocking_threads")]
    pub max_blocking_threads: usize,
    /// Thread name prefix.
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_max_blocking_threads() -> usize {
    64
}

fn default_thread_name() -> String {
    "skill-worker".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            max_blocking_threads: default_max_blocking_threads(),
            thread_name: default_thread_name(),
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by whatever the environment sets.
    pub fn from_env() -> SkillResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup<F>(lookup: F) -> SkillResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_WORKER_THREADS) {
            config.worker_threads = parse_count(ENV_WORKER_THREADS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_BLOCKING_THREADS) {
            config.max_blocking_threads = parse_count(ENV_MAX_BLOCKING_THREADS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_THREAD_NAME) {
            config.thread_name = raw;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> SkillResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> SkillResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Reject settings a runtime cannot be built from.
    pub fn validate(&self) -> SkillResult<()> {
        if self.worker_threads == 0 {
            return Err(SkillError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_blocking_threads == 0 {
            return Err(SkillError::Config(
                "max_blocking_threads must be at least 1".to_string(),
            ));
        }
        if self.thread_name.trim().is_empty() {
            return Err(SkillError::Config("thread_name must not be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_count(key: &str, raw: &str) -> SkillResult<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| SkillError::Config(format!("{}='{}': {}", key, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert!(config.worker_threads >= 1);
        assert_eq!(config.max_blocking_threads, 64);
        assert_eq!(config.thread_name, "skill-worker");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookup_overrides() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            (ENV_WORKER_THREADS, "3"),
            (ENV_MAX_BLOCKING_THREADS, " 8 "),
            (ENV_THREAD_NAME, "speech"),
        ]))
        .unwrap();
        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.max_blocking_threads, 8);
        assert_eq!(config.thread_name, "speech");
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = RuntimeConfig::from_lookup(lookup(&[(ENV_WORKER_THREADS, "many")])).unwrap_err();
        assert!(matches!(err, SkillError::Config(_)));
        assert!(err.to_string().contains(ENV_WORKER_THREADS));

        let err = RuntimeConfig::from_lookup(lookup(&[(ENV_WORKER_THREADS, "0")])).unwrap_err();
        assert!(matches!(err, SkillError::Config(_)));
    }

    #[test]
    fn test_yaml_partial_document() {
        let config = RuntimeConfig::from_yaml_str("worker_threads: 2\n").unwrap();
        assert_eq!(config.worker_threads, 2);
        assert_eq!(config.thread_name, "skill-worker");
    }

    #[test]
    fn test_yaml_rejects_empty_name() {
        let err = RuntimeConfig::from_yaml_str("thread_name: \"  \"\n").unwrap_err();
        assert!(matches!(err, SkillError::Config(_)));
    }

    #[test]
    fn test_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "worker_threads: 1\nmax_blocking_threads: 4\nthread_name: motion").unwrap();

        let config = RuntimeConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(
            config,
            RuntimeConfig {
                worker_threads: 1,
                max_blocking_threads: 4,
                thread_name: "motion".to_string(),
            }
        );
    }

    #[test]
    fn test_yaml_file_missing() {
        let err = RuntimeConfig::from_yaml_file("/nonexistent/skill-runtime.yaml").unwrap_err();
        assert!(matches!(err, SkillError::Io(_)));
    }
}
