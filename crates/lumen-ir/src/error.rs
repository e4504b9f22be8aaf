//! Error types for the IR crate.
//!
//! Circuit mutations never fail; these errors only arise when parsing
//! identifiers coming from outside the process (config files, CLI flags).

use thiserror::Error;

/// Errors that can occur when resolving IR identifiers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Framework identifier is not recognised.
    #[error("Unknown framework '{0}': expected 'strawberryfields' or 'perceval'")]
    UnknownFramework(String),

    /// Operation kind name is not recognised.
    #[error("Unknown operation kind '{0}'")]
    UnknownKind(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
