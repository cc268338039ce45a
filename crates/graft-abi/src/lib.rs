//! Graft ABI - the narrow boundary between native registration code and an
//! embedded dynamic runtime.
//!
//! This crate defines the minimal surface the registration engine needs from
//! a host runtime: an opaque tagged value ([`RtValue`]), opaque type handles
//! ([`TypeHandle`]), the registration primitives ([`RuntimeAbi`]), and the
//! native callable representation ([`NativeFn`]). Host runtimes implement
//! [`RuntimeAbi`]; the engine and native extension authors program against it
//! without depending on runtime internals.
//!
//! # Example
//!
//! ```rust,ignore
//! use graft_abi::{NativeCallResult, NativeFn, RuntimeAbi, TypeKind};
//! use std::sync::Arc;
//!
//! fn greeting() -> NativeFn {
//!     Arc::new(|abi, _receiver, _args| {
//!         NativeCallResult::Value(abi.create_string("success"))
//!     })
//! }
//! ```

#![warn(missing_docs)]

mod abi;
mod error;
mod handler;
mod types;
mod value;

pub use abi::RuntimeAbi;
pub use error::{AbiError, AbiResult};
pub use handler::{NativeCallResult, NativeFn};
pub use types::{Arity, CallConvention, ReceiverKind, TypeHandle, TypeKind};
pub use value::RtValue;
