//! Registration error types
//!
//! All registration errors are configuration errors discovered at process
//! startup, never transient runtime conditions; nothing here is retried.
//! Each variant carries the failing path and method so an initialization
//! failure can be diagnosed without a debugger.

use graft_abi::TypeKind;

/// Errors that can occur while registering the object model
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegisterError {
    /// A path segment already exists with a different kind
    #[error("name conflict at `{path}`: requested {requested:?}, but it already names a {found:?}")]
    NameConflict {
        /// Full path of the conflicting segment
        path: String,
        /// Kind the caller asked for
        requested: TypeKind,
        /// Kind already registered
        found: TypeKind,
    },

    /// Attachment attempted under a namespace that does not exist yet
    #[error("cannot attach at `{path}`: parent namespace `{missing}` does not exist")]
    UnresolvedParent {
        /// Full path being attached
        path: String,
        /// First missing prefix
        missing: String,
    },

    /// A monkey-patch target could not be resolved in the runtime
    #[error("monkey-patch target `{name}` not found in runtime")]
    UnresolvedTarget {
        /// Symbolic name or value description of the target
        name: String,
    },

    /// The runtime rejected a method registration
    #[error("binding `{method}` on `{path}` failed: {reason}")]
    Binding {
        /// Path of the owning namespace node
        path: String,
        /// Method name being bound
        method: String,
        /// Runtime-supplied reason
        reason: String,
    },

    /// A namespace path string could not be parsed
    #[error("invalid namespace path `{path}`: {reason}")]
    InvalidPath {
        /// The offending path string
        path: String,
        /// What was wrong with it
        reason: String,
    },

    /// The runtime itself rejected a registration primitive
    #[error("runtime error: {0}")]
    Runtime(#[from] graft_abi::AbiError),
}
