//! Registrar - the engine facade
//!
//! Owns the namespace registry and the ABI handle, and exposes the operations
//! a registration sequence is written in terms of: define, attach, reopen,
//! and patch.

use crate::builder::DefineScope;
use crate::descriptor::MethodDescriptor;
use crate::error::RegisterError;
use crate::node::{NamespaceNode, NodeId};
use crate::path::NamespacePath;
use crate::patch::{self, PatchTarget};
use crate::registry::NamespaceRegistry;
use graft_abi::{RuntimeAbi, TypeHandle, TypeKind};
use std::sync::Arc;

/// Facade over one embedded runtime's registration state.
///
/// All registration is single-threaded and synchronous; the registrar is the
/// sole writer into the runtime's type tables during initialization, by
/// design contract.
pub struct Registrar {
    abi: Arc<dyn RuntimeAbi>,
    registry: NamespaceRegistry,
}

impl Registrar {
    /// Create a registrar over a runtime ABI handle
    pub fn new(abi: Arc<dyn RuntimeAbi>) -> Self {
        Registrar {
            abi,
            registry: NamespaceRegistry::new(),
        }
    }

    /// The ABI handle this registrar registers into
    pub fn abi(&self) -> &dyn RuntimeAbi {
        self.abi.as_ref()
    }

    /// The engine-side namespace registry (read only)
    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    /// Borrow the node for an already-resolved path, if any
    pub fn lookup(&self, path: &str) -> Option<&NamespaceNode> {
        let parsed = NamespacePath::parse(path).ok()?;
        let id = self.registry.resolve(&parsed)?;
        Some(self.registry.node(id))
    }

    /// Resolve or create `path` (creating missing intermediate modules) and
    /// open a definition scope on its leaf.
    pub fn define(
        &mut self,
        path: &str,
        kind: TypeKind,
    ) -> Result<DefineScope<'_>, RegisterError> {
        let parsed = NamespacePath::parse(path)?;
        let node = self
            .registry
            .resolve_or_create(self.abi.as_ref(), &parsed, kind)?;
        Ok(self.scope(node))
    }

    /// Attach at `path`, requiring every parent namespace to exist already.
    ///
    /// Fails with [`RegisterError::UnresolvedParent`] when a prefix is
    /// missing; this is the ordering contract of the registration driver.
    pub fn attach(
        &mut self,
        path: &str,
        kind: TypeKind,
    ) -> Result<DefineScope<'_>, RegisterError> {
        let parsed = NamespacePath::parse(path)?;
        let node = self
            .registry
            .resolve_attached(self.abi.as_ref(), &parsed, kind)?;
        Ok(self.scope(node))
    }

    /// Reopen a type directly by its runtime handle and open a definition
    /// scope on it. Shares node identity with path and patch resolution.
    pub fn reopen(&mut self, handle: TypeHandle) -> Result<DefineScope<'_>, RegisterError> {
        let node = self.registry.adopt_handle(self.abi.as_ref(), handle)?;
        Ok(self.scope(node))
    }

    /// Reopen an existing runtime type and bind one method onto it.
    ///
    /// Patch-by-value and patch-by-name of the same underlying type mutate
    /// the same node; the extension is visible on all existing and future
    /// instances of that type.
    pub fn patch(
        &mut self,
        target: &PatchTarget,
        descriptor: MethodDescriptor,
    ) -> Result<(), RegisterError> {
        patch::patch(self.abi.as_ref(), &mut self.registry, target, descriptor)
    }

    fn scope(&mut self, node: NodeId) -> DefineScope<'_> {
        DefineScope::new(self.abi.clone(), &mut self.registry, node)
    }
}
