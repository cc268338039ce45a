//! Namespace nodes
//!
//! A [`NamespaceNode`] is the engine-side record mirroring one module or
//! class inside the embedded runtime. Nodes are created lazily the first time
//! a path segment naming them is registered and never destroyed by the
//! engine; final object lifetime belongs to the runtime.

use crate::descriptor::MethodDescriptor;
use graft_abi::{ReceiverKind, TypeHandle, TypeKind};
use rustc_hash::FxHashMap;

/// Identity of a node within the registry arena.
///
/// Node identity is the correctness currency of the engine: resolving the
/// same path twice, or patching the same runtime type by value and by name,
/// must yield the same `NodeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Engine-side record of a module or class in the runtime
pub struct NamespaceNode {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    /// Full textual path, kept for diagnostics
    pub(crate) path: String,
    pub(crate) kind: TypeKind,
    /// Runtime handle; owned by the runtime, not by this engine
    pub(crate) handle: Option<TypeHandle>,
    /// Parent node, lookup only - no ownership
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: FxHashMap<String, NodeId>,
    pub(crate) instance_methods: FxHashMap<String, MethodDescriptor>,
    pub(crate) singleton_methods: FxHashMap<String, MethodDescriptor>,
}

impl NamespaceNode {
    pub(crate) fn new(
        id: NodeId,
        name: impl Into<String>,
        path: impl Into<String>,
        kind: TypeKind,
        handle: TypeHandle,
        parent: Option<NodeId>,
    ) -> Self {
        NamespaceNode {
            id,
            name: name.into(),
            path: path.into(),
            kind,
            handle: Some(handle),
            parent,
            children: FxHashMap::default(),
            instance_methods: FxHashMap::default(),
            singleton_methods: FxHashMap::default(),
        }
    }

    /// Node identity
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Leaf name of the node
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full `A::B::C` path of the node
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Module or class
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The runtime handle, once materialized
    pub fn handle(&self) -> Option<TypeHandle> {
        self.handle
    }

    /// Parent node id, if any
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct child by name
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    /// Registered descriptor for `name` on the given receiver kind
    pub fn method(&self, name: &str, receiver: ReceiverKind) -> Option<&MethodDescriptor> {
        self.method_table(receiver).get(name)
    }

    /// Number of methods registered for the given receiver kind
    pub fn method_count(&self, receiver: ReceiverKind) -> usize {
        self.method_table(receiver).len()
    }

    fn method_table(&self, receiver: ReceiverKind) -> &FxHashMap<String, MethodDescriptor> {
        match receiver {
            ReceiverKind::Instance => &self.instance_methods,
            ReceiverKind::Singleton => &self.singleton_methods,
        }
    }

    /// Record a bound descriptor. Same-name registration overwrites the
    /// previous binding; differently named methods accumulate.
    pub(crate) fn record_method(&mut self, descriptor: MethodDescriptor) {
        let table = match descriptor.receiver {
            ReceiverKind::Instance => &mut self.instance_methods,
            ReceiverKind::Singleton => &mut self.singleton_methods,
        };
        table.insert(descriptor.name.clone(), descriptor);
    }
}

impl std::fmt::Debug for NamespaceNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceNode")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("handle", &self.handle)
            .field("children", &self.children.len())
            .field("instance_methods", &self.instance_methods.len())
            .field("singleton_methods", &self.singleton_methods.len())
            .finish()
    }
}
