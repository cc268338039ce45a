//! Graft reference host runtime
//!
//! An in-memory embedded runtime implementing [`graft_abi::RuntimeAbi`]:
//! a global constant table, a type table with superclass chains, per-type
//! instance and singleton method tables, instance spawning, and dynamic
//! `send` dispatch.
//!
//! This crate exists so the registration engine has a live object model to
//! register into. It is deliberately not a scripting language: there is no
//! parser, no evaluator, no GC. Types and instances live for the lifetime of
//! the runtime, which matches the ownership contract of the ABI (the runtime
//! owns all object memory; the engine owns only registration metadata).

#![warn(missing_docs)]

mod error;
mod object;
mod runtime;

pub use error::HostError;
pub use runtime::HostRuntime;
