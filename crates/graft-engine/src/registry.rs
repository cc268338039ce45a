//! Namespace registry
//!
//! Resolves and creates nested namespace paths against the runtime, memoizing
//! every node it has seen. The registry is the single source of node identity:
//! re-walking an already resolved path returns the identical node, and a
//! runtime type adopted by handle (monkey-patch by value) and by name
//! (monkey-patch by name) unify on the same node.

use crate::error::RegisterError;
use crate::node::{NamespaceNode, NodeId};
use crate::path::NamespacePath;
use graft_abi::{RuntimeAbi, TypeHandle, TypeKind};
use rustc_hash::FxHashMap;

/// Arena of namespace nodes plus the lookup indexes over it
pub struct NamespaceRegistry {
    nodes: Vec<NamespaceNode>,
    /// Top-level constants by name
    roots: FxHashMap<String, NodeId>,
    /// Runtime handle to node identity; what unifies by-value and by-name
    /// resolution of the same underlying type
    by_handle: FxHashMap<TypeHandle, NodeId>,
}

impl NamespaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        NamespaceRegistry {
            nodes: Vec::new(),
            roots: FxHashMap::default(),
            by_handle: FxHashMap::default(),
        }
    }

    /// Borrow a node by id
    pub fn node(&self, id: NodeId) -> &NamespaceNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NamespaceNode {
        &mut self.nodes[id.0]
    }

    /// Number of nodes the registry has materialized
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no node has been materialized yet
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pure lookup of an already-resolved path; never touches the runtime
    pub fn resolve(&self, path: &NamespacePath) -> Option<NodeId> {
        let mut current: Option<NodeId> = None;
        for segment in path.segments() {
            let next = match current {
                Some(id) => self.nodes[id.0].child(segment),
                None => self.roots.get(segment).copied(),
            };
            current = Some(next?);
        }
        current
    }

    /// Resolve `path`, creating whatever is missing.
    ///
    /// Walks segment by segment from the runtime's root. Missing intermediate
    /// segments are created as Modules; the leaf is created with `leaf_kind`.
    /// Idempotent: re-walking an already resolved path returns the identical
    /// node. Fails with [`RegisterError::NameConflict`] if the leaf exists
    /// with a different kind.
    pub fn resolve_or_create(
        &mut self,
        abi: &dyn RuntimeAbi,
        path: &NamespacePath,
        leaf_kind: TypeKind,
    ) -> Result<NodeId, RegisterError> {
        let last = path.len() - 1;
        let mut current: Option<NodeId> = None;
        for (index, segment) in path.segments().iter().enumerate() {
            let requested = (index == last).then_some(leaf_kind);
            current = Some(self.get_or_create_child(abi, current, segment, requested)?);
        }
        current.ok_or_else(|| RegisterError::InvalidPath {
            path: path.to_string(),
            reason: "path is empty".to_string(),
        })
    }

    /// Resolve `path` strictly: every proper prefix must already exist.
    ///
    /// This is the driver-facing attachment entry point. Registering
    /// `Mod::X` before `Mod` was declared fails with
    /// [`RegisterError::UnresolvedParent`] rather than silently conjuring
    /// `Mod` - callers must order invocations so parents come first. The leaf
    /// itself is created (or reopened) with `leaf_kind`.
    pub fn resolve_attached(
        &mut self,
        abi: &dyn RuntimeAbi,
        path: &NamespacePath,
        leaf_kind: TypeKind,
    ) -> Result<NodeId, RegisterError> {
        let last = path.len() - 1;
        let mut current: Option<NodeId> = None;
        for (index, segment) in path.segments().iter().enumerate() {
            if index == last {
                return self.get_or_create_child(abi, current, segment, Some(leaf_kind));
            }
            let next = match current {
                Some(id) => self.nodes[id.0].child(segment),
                // A root prefix may be a runtime builtin we have not adopted yet
                None => match self.roots.get(segment).copied() {
                    Some(id) => Some(id),
                    None => self.try_adopt_global(abi, segment)?,
                },
            };
            current = Some(next.ok_or_else(|| RegisterError::UnresolvedParent {
                path: path.to_string(),
                missing: path.prefix(index),
            })?);
        }
        // Unreachable for parsed paths; the loop always returns at the leaf
        Err(RegisterError::InvalidPath {
            path: path.to_string(),
            reason: "path is empty".to_string(),
        })
    }

    /// Resolve or create one child directly under an existing node.
    ///
    /// Used by nested definition builders, where the parent is known to be
    /// materialized already.
    pub fn resolve_child(
        &mut self,
        abi: &dyn RuntimeAbi,
        parent: NodeId,
        name: &str,
        kind: TypeKind,
    ) -> Result<NodeId, RegisterError> {
        self.get_or_create_child(abi, Some(parent), name, Some(kind))
    }

    /// Adopt a runtime type by handle, resolving to the memoized node if this
    /// handle has been seen before (in any resolution mode).
    ///
    /// For a handle first seen here, the node's `path` is the runtime's type
    /// name only: the ABI exposes no lexical-parent query, so a type nested
    /// at `A::B::C` adopted by handle is recorded as `C` until a path-based
    /// resolution reaches the same handle first.
    pub fn adopt_handle(
        &mut self,
        abi: &dyn RuntimeAbi,
        handle: TypeHandle,
    ) -> Result<NodeId, RegisterError> {
        if let Some(&id) = self.by_handle.get(&handle) {
            return Ok(id);
        }
        let kind = abi.kind_of(handle)?;
        let name = abi.type_name(handle)?;
        let id = self.insert_node(&name, &name, kind, handle, None);
        // If the runtime resolves this name globally to the same handle,
        // index it as a root so later by-name lookups land on this node.
        if abi.lookup_global(&name) == Some(handle) {
            self.roots.insert(name, id);
        }
        Ok(id)
    }

    /// Adopt a runtime type by global name.
    ///
    /// Performs the same lookup the registry does for a zero-depth path.
    /// Fails with [`RegisterError::UnresolvedTarget`] if the runtime has no
    /// such global.
    pub fn adopt_global(
        &mut self,
        abi: &dyn RuntimeAbi,
        name: &str,
    ) -> Result<NodeId, RegisterError> {
        if let Some(&id) = self.roots.get(name) {
            return Ok(id);
        }
        let handle = abi
            .lookup_global(name)
            .ok_or_else(|| RegisterError::UnresolvedTarget {
                name: name.to_string(),
            })?;
        self.adopt_handle(abi, handle)
    }

    /// Adopt a global if the runtime has it; `None` if the name is unknown
    fn try_adopt_global(
        &mut self,
        abi: &dyn RuntimeAbi,
        name: &str,
    ) -> Result<Option<NodeId>, RegisterError> {
        match abi.lookup_global(name) {
            Some(handle) => Ok(Some(self.adopt_handle(abi, handle)?)),
            None => Ok(None),
        }
    }

    /// Look up or create one child under `parent` (or at the global scope).
    ///
    /// `requested` is `Some` only at a path leaf: intermediate segments accept
    /// whatever kind already exists and default to Module when created fresh.
    fn get_or_create_child(
        &mut self,
        abi: &dyn RuntimeAbi,
        parent: Option<NodeId>,
        name: &str,
        requested: Option<TypeKind>,
    ) -> Result<NodeId, RegisterError> {
        let existing = match parent {
            Some(id) => self.nodes[id.0].child(name),
            None => self.roots.get(name).copied(),
        };
        if let Some(id) = existing {
            if let Some(kind) = requested {
                let node = &self.nodes[id.0];
                if node.kind() != kind {
                    return Err(RegisterError::NameConflict {
                        path: node.path().to_string(),
                        requested: kind,
                        found: node.kind(),
                    });
                }
            }
            return Ok(id);
        }

        // The runtime may already own this constant (builtins) at the
        // global scope; adopt it instead of redefining.
        if parent.is_none() {
            if let Some(handle) = abi.lookup_global(name) {
                let found = abi.kind_of(handle)?;
                if let Some(kind) = requested {
                    if found != kind {
                        return Err(RegisterError::NameConflict {
                            path: name.to_string(),
                            requested: kind,
                            found,
                        });
                    }
                }
                let id = self.insert_node(name, name, found, handle, None);
                self.roots.insert(name.to_string(), id);
                return Ok(id);
            }
        }

        let kind = requested.unwrap_or(TypeKind::Module);
        let (parent_handle, path) = match parent {
            Some(id) => {
                let node = &self.nodes[id.0];
                let handle = node.handle().ok_or_else(|| RegisterError::UnresolvedParent {
                    path: format!("{}::{}", node.path(), name),
                    missing: node.path().to_string(),
                })?;
                (Some(handle), format!("{}::{}", node.path(), name))
            }
            None => (None, name.to_string()),
        };
        let handle = abi.define_type(parent_handle, name, kind)?;

        // The runtime may hand back a handle we already track under another
        // resolution route; keep node identity unified.
        if let Some(&id) = self.by_handle.get(&handle) {
            match parent {
                Some(pid) => {
                    self.nodes[pid.0].children.insert(name.to_string(), id);
                }
                None => {
                    self.roots.insert(name.to_string(), id);
                }
            }
            return Ok(id);
        }

        let id = self.insert_node(name, &path, kind, handle, parent);
        match parent {
            Some(pid) => {
                self.nodes[pid.0].children.insert(name.to_string(), id);
            }
            None => {
                self.roots.insert(name.to_string(), id);
            }
        }
        Ok(id)
    }

    fn insert_node(
        &mut self,
        name: &str,
        path: &str,
        kind: TypeKind,
        handle: TypeHandle,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(NamespaceNode::new(id, name, path, kind, handle, parent));
        self.by_handle.insert(handle, id);
        id
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_host::HostRuntime;

    fn parse(s: &str) -> NamespacePath {
        NamespacePath::parse(s).unwrap()
    }

    #[test]
    fn test_resolve_or_create_is_idempotent() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        let path = parse("Geometry::Shapes::Point");
        let first = registry
            .resolve_or_create(&host, &path, TypeKind::Class)
            .unwrap();
        let second = registry
            .resolve_or_create(&host, &path, TypeKind::Class)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_intermediate_segments_default_to_module() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        let leaf = registry
            .resolve_or_create(&host, &parse("Geometry::Point"), TypeKind::Class)
            .unwrap();
        let parent = registry.node(leaf).parent().unwrap();
        assert_eq!(registry.node(parent).kind(), TypeKind::Module);
        assert_eq!(registry.node(leaf).kind(), TypeKind::Class);
    }

    #[test]
    fn test_leaf_kind_conflict() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        registry
            .resolve_or_create(&host, &parse("Geometry"), TypeKind::Module)
            .unwrap();
        let err = registry
            .resolve_or_create(&host, &parse("Geometry"), TypeKind::Class)
            .unwrap_err();
        assert!(matches!(err, RegisterError::NameConflict { .. }));
    }

    #[test]
    fn test_intermediate_class_segments_are_accepted() {
        // Mod1::Class1::Mod2::Class2 - walking through Class1 as an
        // intermediate must not conflict with its Class kind.
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        registry
            .resolve_or_create(&host, &parse("Mod1::Class1"), TypeKind::Class)
            .unwrap();
        let deep = registry
            .resolve_or_create(&host, &parse("Mod1::Class1::Mod2::Class2"), TypeKind::Class)
            .unwrap();
        assert_eq!(registry.node(deep).path(), "Mod1::Class1::Mod2::Class2");
    }

    #[test]
    fn test_resolve_attached_requires_existing_parent() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        let err = registry
            .resolve_attached(&host, &parse("Mod::X"), TypeKind::Class)
            .unwrap_err();
        match err {
            RegisterError::UnresolvedParent { missing, .. } => assert_eq!(missing, "Mod"),
            other => panic!("expected UnresolvedParent, got {other:?}"),
        }
        // Nothing was created along the way
        assert!(registry.resolve(&parse("Mod")).is_none());
    }

    #[test]
    fn test_resolve_attached_creates_leaf_under_existing_parent() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        registry
            .resolve_or_create(&host, &parse("Mod"), TypeKind::Module)
            .unwrap();
        let leaf = registry
            .resolve_attached(&host, &parse("Mod::X"), TypeKind::Class)
            .unwrap();
        assert_eq!(registry.node(leaf).path(), "Mod::X");
    }

    #[test]
    fn test_adopt_by_handle_and_by_name_unify() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        let by_handle = registry.adopt_handle(&host, host.object_class()).unwrap();
        let by_name = registry.adopt_global(&host, "Object").unwrap();
        assert_eq!(by_handle, by_name);
    }

    #[test]
    fn test_adopt_handle_records_runtime_type_name_as_path() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        let id = registry.adopt_handle(&host, host.object_class()).unwrap();
        assert_eq!(registry.node(id).path(), "Object");
        // Path-resolved first wins: the nested node keeps its full path when
        // the same handle is later adopted.
        let nested = registry
            .resolve_or_create(&host, &parse("Outer::Inner"), TypeKind::Class)
            .unwrap();
        let handle = registry.node(nested).handle().unwrap();
        let adopted = registry.adopt_handle(&host, handle).unwrap();
        assert_eq!(adopted, nested);
        assert_eq!(registry.node(adopted).path(), "Outer::Inner");
    }

    #[test]
    fn test_adopt_global_unknown_name() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        let err = registry.adopt_global(&host, "NoSuchType").unwrap_err();
        assert!(matches!(err, RegisterError::UnresolvedTarget { .. }));
    }

    #[test]
    fn test_builtin_global_is_adopted_not_redefined() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        let node = registry
            .resolve_or_create(&host, &parse("Object"), TypeKind::Class)
            .unwrap();
        assert_eq!(registry.node(node).handle(), Some(host.object_class()));
    }
}
