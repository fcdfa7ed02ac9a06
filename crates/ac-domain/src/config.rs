//! Layered configuration for the agent runtime core.
//!
//! No environment variable is required by the core itself; datasource auth
//! env vars are consumed by `ac-datasource`'s API client, outside this type.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub event_log: EventLogConfig,
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub datasource: DatasourceConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogConfig {
    #[serde(default = "d_max_events")]
    pub max_events: usize,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            max_events: d_max_events(),
        }
    }
}

fn d_max_events() -> usize {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default = "d_true")]
    pub replan_on_error: bool,
    #[serde(default = "d_history_cap")]
    pub history_cap: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            replan_on_error: true,
            history_cap: d_history_cap(),
        }
    }
}

fn d_history_cap() -> usize {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "d_max_injections")]
    pub max_injections: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            max_injections: d_max_injections(),
        }
    }
}

fn d_max_injections() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasourceConfig {
    #[serde(default = "d_find_relevant_limit")]
    pub find_relevant_limit: usize,
    #[serde(default = "d_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "d_max_retries")]
    pub max_retries: u32,
}

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            find_relevant_limit: d_find_relevant_limit(),
            cache_ttl_secs: d_cache_ttl_secs(),
            max_retries: d_max_retries(),
        }
    }
}

fn d_find_relevant_limit() -> usize {
    3
}

fn d_cache_ttl_secs() -> u64 {
    60
}

fn d_max_retries() -> u32 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default = "d_recitation_frequency")]
    pub recitation_update_frequency: usize,
    #[serde(default = "d_error_ring_cap")]
    pub error_ring_cap: usize,
    #[serde(default = "d_summary_threshold")]
    pub summary_threshold: usize,
    #[serde(default = "d_true")]
    pub vary_serialization: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            recitation_update_frequency: d_recitation_frequency(),
            error_ring_cap: d_error_ring_cap(),
            summary_threshold: d_summary_threshold(),
            vary_serialization: true,
        }
    }
}

fn d_recitation_frequency() -> usize {
    3
}

fn d_error_ring_cap() -> usize {
    10
}

fn d_summary_threshold() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "d_max_steps")]
    pub max_steps: usize,
    #[serde(default = "d_max_observe")]
    pub max_observe: usize,
    #[serde(default = "d_special_tool_names")]
    pub special_tool_names: Vec<String>,
    #[serde(default = "d_llm_retry_cap")]
    pub llm_retry_cap: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: d_max_steps(),
            max_observe: d_max_observe(),
            special_tool_names: d_special_tool_names(),
            llm_retry_cap: d_llm_retry_cap(),
        }
    }
}

fn d_max_steps() -> usize {
    20
}

fn d_max_observe() -> usize {
    10_000
}

fn d_special_tool_names() -> Vec<String> {
    vec!["terminate".to_string()]
}

fn d_llm_retry_cap() -> u32 {
    6
}

fn d_true() -> bool {
    true
}

impl Config {
    /// Load from a TOML file, falling back to defaults if the file is absent.
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, path, "failed to parse config, using defaults");
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    /// Strict load for `config validate`: an absent file resolves to
    /// defaults, but a present, malformed file is reported rather than
    /// silently swallowed the way `load_or_default` swallows it.
    pub fn validate_file(path: &str) -> std::result::Result<Config, String> {
        match std::fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).map_err(|e| format!("parsing {path}: {e}")),
            Err(_) => Ok(Config::default()),
        }
    }
}
