//! Graft definition & registration engine
//!
//! Graft lets compiled code construct, at process startup, the object model of
//! an embedded dynamic runtime: classes, modules, nested namespaces, instance
//! methods, singleton methods, and retroactive extension (monkey-patching) of
//! types the runtime already owns.
//!
//! The engine talks to the runtime only through the narrow
//! [`RuntimeAbi`](graft_abi::RuntimeAbi) trait; it owns registration metadata
//! (paths, nodes, method descriptors) and never runtime object memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use graft_engine::{MethodDescriptor, RegistrationDriver, Registrar};
//! use graft_abi::{NativeCallResult, TypeKind};
//! use std::sync::Arc;
//!
//! let driver = RegistrationDriver::new()
//!     .step("Geometry", |reg| {
//!         let mut scope = reg.define("Geometry", TypeKind::Module)?;
//!         let mut point = scope.nested("Point", TypeKind::Class)?;
//!         point.instance_method("magnitude", Arc::new(|abi, _recv, _args| {
//!             NativeCallResult::f64(0.0)
//!         }))?;
//!         Ok(())
//!     });
//!
//! let mut registrar = Registrar::new(abi);
//! driver.run(&mut registrar)?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod binding;
mod builder;
mod descriptor;
mod driver;
mod error;
pub mod logger;
mod node;
mod path;
mod patch;
mod registrar;
mod registry;

pub use builder::DefineScope;
pub use descriptor::MethodDescriptor;
pub use driver::RegistrationDriver;
pub use error::RegisterError;
pub use node::{NamespaceNode, NodeId};
pub use path::NamespacePath;
pub use patch::PatchTarget;
pub use registrar::Registrar;
pub use registry::NamespaceRegistry;

use graft_abi::RuntimeAbi;
use std::sync::Arc;

/// Initialization entry point: build a registrar over `abi` and run `driver`
/// against it.
///
/// This is the single call a host process makes when its loadable artifact is
/// initialized. The driver runs exactly once; the first failing step aborts
/// the remaining sequence, since a partially registered object model must not
/// be exposed to scripts.
pub fn initialize(
    abi: Arc<dyn RuntimeAbi>,
    driver: RegistrationDriver,
) -> Result<Registrar, RegisterError> {
    let mut registrar = Registrar::new(abi);
    driver.run(&mut registrar)?;
    Ok(registrar)
}
