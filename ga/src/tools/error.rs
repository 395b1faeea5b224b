//! Tool error type

use thiserror::Error;

/// Errors a tool invocation can raise
///
/// The executor never matches on the variant: every tool error is
/// stringified into the step outcome. The variants exist for the tools
/// themselves and for tests.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool does not support the requested action
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A required parameter or upstream result is missing
    #[error("{0}")]
    MissingInput(String),

    /// Any other failure inside the tool
    #[error("{0}")]
    Failed(String),
}
