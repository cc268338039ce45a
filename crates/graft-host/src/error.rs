//! Dispatch errors reported by the host runtime

/// Errors raised by host-side dynamic dispatch (`send`)
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    /// No method of that name anywhere on the receiver's lookup chain
    #[error("undefined method `{method}` for {type_name}")]
    NoMethod {
        /// Name of the receiver's type
        type_name: String,
        /// Method name that failed to resolve
        method: String,
    },

    /// Argument count did not match the method's declared arity
    #[error("wrong number of arguments calling `{method}` (given {given}, expected {expected})")]
    ArityMismatch {
        /// Method name
        method: String,
        /// Declared argument count
        expected: u8,
        /// Arguments actually supplied
        given: usize,
    },

    /// The receiver was not an object instance or a type object
    #[error("receiver {0} cannot receive messages")]
    InvalidReceiver(String),

    /// The native entry point reported an error
    #[error("native method `{method}` failed: {reason}")]
    NativeFailure {
        /// Method name
        method: String,
        /// Error message from the entry point
        reason: String,
    },

    /// An ABI-level failure while resolving the receiver
    #[error(transparent)]
    Abi(#[from] graft_abi::AbiError),
}
