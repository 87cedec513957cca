use thiserror::Error;

/// Failures that end a user turn
///
/// Tool failures are not listed here: they are turned into tool-result text
/// (see `tools::ToolExecutionError`) so the model can react to them.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider error: {0:#}")]
    Provider(anyhow::Error),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Turn limit exceeded: model still requested tools after {0} tool rounds")]
    TurnLimitExceeded(usize),
}

pub type Result<T> = std::result::Result<T, AgentError>;
