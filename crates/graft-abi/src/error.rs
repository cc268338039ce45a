//! Error types for ABI calls

/// Result type for ABI calls
pub type AbiResult<T> = Result<T, AbiError>;

/// Errors reported by a host runtime across the ABI boundary
#[derive(Debug, Clone, thiserror::Error)]
pub enum AbiError {
    /// A value had the wrong tag for the requested operation
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected value kind
        expected: String,
        /// Actual value kind
        got: String,
    },

    /// A handle did not refer to anything the runtime knows about
    #[error("unknown handle: {0:#x}")]
    UnknownHandle(u64),

    /// The runtime refused a type or method definition
    #[error("runtime rejected definition of `{name}`: {reason}")]
    RejectedDefinition {
        /// Name of the type or method being defined
        name: String,
        /// Runtime-supplied reason
        reason: String,
    },
}
