pub mod config;
pub mod state;

pub use config::{GraphConfig, LLMConfig, CANDIDATES, DEFAULT_MAX_TOKENS, DEFAULT_MAX_TOOL_ROUNDS, TEMPERATURE};
pub use state::Thread;
