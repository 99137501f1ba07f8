//! Unified error type for all pipeline stages.
//!
//! Every stage reports failure the same way: validation problems are
//! caught before anything is launched, a missing binary is distinct from
//! a binary that ran and failed, and I/O problems carry the underlying
//! error text.

/// Result type for tool invocations
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur while driving an external tool
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// The binary is not on the execution path. Kept separate from
    /// [`ToolError::ExternalTool`] so callers can tell "install the tool"
    /// apart from "the tool rejected this input".
    #[error("{0} not found")]
    ToolNotFound(String),

    /// The tool ran and exited non-zero; the message is its stderr.
    #[error("External tool error: {0}")]
    ExternalTool(String),
}

impl ToolError {
    /// True when the failure is the binary being absent rather than a
    /// failed run.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ToolError::ToolNotFound(_))
    }
}
