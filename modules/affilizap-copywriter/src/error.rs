use ai_client::AiError;
use thiserror::Error;

/// Why a generation attempt produced degraded results.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The credential is missing; the attempt never reached the network.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// The reply was not the JSON array the schema asked for.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<AiError> for GenerationError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::Config(msg) => GenerationError::Config(msg),
            AiError::Parse(msg) => GenerationError::Parse(msg),
            other => GenerationError::Transport(other.to_string()),
        }
    }
}

/// Input rejected before any attempt starts. Messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Por favor, cole um link ou uma imagem do produto.")]
    Empty,

    #[error("Por favor, processe no máximo {max} links por vez.")]
    TooManyLinks { count: usize, max: usize },
}
