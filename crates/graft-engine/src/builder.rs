//! Definition builder
//!
//! A [`DefineScope`] is a fluent builder over one namespace node: it declares
//! instance methods, singleton methods, and nested children. Each definition
//! call performs exactly one method-binding invocation against the runtime;
//! building is append-only with respect to sibling members.

use crate::binding;
use crate::descriptor::MethodDescriptor;
use crate::error::RegisterError;
use crate::node::NodeId;
use crate::registry::NamespaceRegistry;
use graft_abi::{NativeFn, RuntimeAbi, TypeHandle, TypeKind};
use std::sync::Arc;

/// Builder scoped to one namespace node.
///
/// Obtained from [`Registrar::define`](crate::Registrar::define) and friends,
/// or from [`nested`](DefineScope::nested) on an outer scope.
pub struct DefineScope<'a> {
    abi: Arc<dyn RuntimeAbi>,
    registry: &'a mut NamespaceRegistry,
    node: NodeId,
}

impl<'a> DefineScope<'a> {
    pub(crate) fn new(
        abi: Arc<dyn RuntimeAbi>,
        registry: &'a mut NamespaceRegistry,
        node: NodeId,
    ) -> Self {
        DefineScope { abi, registry, node }
    }

    /// Identity of the node this scope builds
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Runtime handle of the node this scope builds
    pub fn handle(&self) -> Option<TypeHandle> {
        self.registry.node(self.node).handle()
    }

    /// Define an instance method with the default convention (variadic,
    /// slice-marshaled). Same-name redefinition overwrites the previous
    /// binding; other methods on the node are untouched.
    pub fn instance_method(&mut self, name: &str, entry: NativeFn) -> Result<(), RegisterError> {
        self.define(MethodDescriptor::instance(name, entry))
    }

    /// Define a singleton method: callable on the type object itself, with
    /// the type as receiver. Works on modules as well as classes.
    pub fn singleton_method(&mut self, name: &str, entry: NativeFn) -> Result<(), RegisterError> {
        self.define(MethodDescriptor::singleton(name, entry))
    }

    /// Define a method from a full descriptor (explicit arity/convention)
    pub fn define(&mut self, descriptor: MethodDescriptor) -> Result<(), RegisterError> {
        binding::bind(self.abi.as_ref(), self.registry, self.node, descriptor)
    }

    /// Resolve or create a child of this node and return a builder scoped to
    /// it. The parent inherently exists, so this never fails with
    /// `UnresolvedParent`; a kind mismatch on an existing child still fails
    /// with `NameConflict`.
    pub fn nested(
        &mut self,
        name: &str,
        kind: TypeKind,
    ) -> Result<DefineScope<'_>, RegisterError> {
        let child = self
            .registry
            .resolve_child(self.abi.as_ref(), self.node, name, kind)?;
        Ok(DefineScope::new(self.abi.clone(), self.registry, child))
    }
}

impl std::fmt::Debug for DefineScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefineScope")
            .field("node", &self.node)
            .field("path", &self.registry.node(self.node).path())
            .finish_non_exhaustive()
    }
}
