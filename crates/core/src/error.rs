/// Errors surfaced to the immediate caller of a toolkit function.
///
/// Field-level validation failures are not errors in this sense; they are
/// collected into [`Evaluation::errors`](crate::data_handler::Evaluation).
#[derive(Debug, thiserror::Error)]
pub enum ToolkitError {
    /// The caller violated a function contract (missing rules, strict-mode
    /// failure, malformed merge input).
    #[error("[lingshu-toolkit#{function}]: {message}")]
    InvalidArgument {
        function: &'static str,
        message: String,
    },
}

impl ToolkitError {
    pub fn invalid_argument(function: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            function,
            message: message.into(),
        }
    }

    /// The bare message without the `[lingshu-toolkit#fn]` prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument { message, .. } => message,
        }
    }
}
