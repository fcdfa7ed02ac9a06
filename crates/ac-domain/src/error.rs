/// Shared error type used across all agent-core crates.
///
/// Variants map onto the error taxonomy: `InvalidState`, `PlanningFailure`,
/// `ToolNotFound`, `ToolFailure`, `ToolTimeout`, `LlmTransient`, `LlmFatal`.
/// `BudgetExhausted` is deliberately absent — step-budget exhaustion is a
/// normal `Finished` outcome, not an error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid agent state: {0}")]
    InvalidState(String),

    #[error("planning failed: {0}")]
    PlanningFailure(String),

    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("tool failed: {tool}: {message}")]
    ToolFailure { tool: String, message: String },

    #[error("tool timed out: {0}")]
    ToolTimeout(String),

    #[error("illegal plan step transition: {0}")]
    IllegalTransition(String),

    #[error("LLM transient error: {0}")]
    LlmTransient(String),

    #[error("LLM fatal error: {0}")]
    LlmFatal(String),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
