pub mod types;
pub mod client;
pub mod prompt;
pub mod parser;
pub mod fallback;
pub mod orchestrator;

pub use types::*;
pub use client::*;
pub use prompt::*;
pub use parser::*;
pub use fallback::*;
pub use orchestrator::*;

use std::time::Duration;

use thiserror::Error;

/// Failures talking to the hosted chat-completion model. All variants are
/// handled the same way by the scorer: the fallback heuristic runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("Language model endpoint unreachable at {0}")]
    Connection(String),

    #[error("Language model request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Language model returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Language model returned no completion")]
    EmptyCompletion,
}
