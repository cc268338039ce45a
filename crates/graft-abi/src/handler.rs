//! Native callable representation

use crate::abi::RuntimeAbi;
use crate::value::RtValue;
use std::sync::Arc;

/// Result of invoking a native method entry point
pub enum NativeCallResult {
    /// Call completed and produced a value
    Value(RtValue),
    /// Call failed; the runtime surfaces the message as a script-level error
    Error(String),
}

impl NativeCallResult {
    /// Successful result carrying null
    #[inline]
    pub fn null() -> Self {
        Self::Value(RtValue::null())
    }

    /// Successful result carrying an i32
    #[inline]
    pub fn i32(val: i32) -> Self {
        Self::Value(RtValue::i32(val))
    }

    /// Successful result carrying an f64
    #[inline]
    pub fn f64(val: f64) -> Self {
        Self::Value(RtValue::f64(val))
    }

    /// Successful result carrying a bool
    #[inline]
    pub fn bool(val: bool) -> Self {
        Self::Value(RtValue::bool(val))
    }

    /// Successful result carrying a freshly allocated runtime string.
    ///
    /// Allocates through the runtime on every call: repeated calls return
    /// values that compare equal by content, with no identity guarantee.
    #[inline]
    pub fn string(abi: &dyn RuntimeAbi, s: &str) -> Self {
        Self::Value(abi.create_string(s))
    }
}

/// Native method entry point.
///
/// Receives the runtime ABI (for allocating return values and reading
/// arguments), the receiver, and the marshaled argument list. For instance
/// methods the receiver is the instance; for singleton methods it is the
/// type object itself.
///
/// The entry point is responsible for validating argument count beyond what
/// the declared [`Arity`](crate::Arity) already enforces, and for converting
/// between runtime values and native types.
pub type NativeFn =
    Arc<dyn Fn(&dyn RuntimeAbi, RtValue, &[RtValue]) -> NativeCallResult + Send + Sync>;
