//! Host-side object model: type entries, method tables, instances

use graft_abi::{Arity, CallConvention, NativeFn, ReceiverKind, TypeKind};
use rustc_hash::FxHashMap;

/// A native method as installed in a dispatch table
#[derive(Clone)]
pub(crate) struct BoundMethod {
    pub arity: Arity,
    #[allow(dead_code)] // recorded for diagnostics; dispatch marshals a slice either way
    pub convention: CallConvention,
    pub entry: NativeFn,
}

/// A type (class or module) known to the host runtime
pub(crate) struct TypeEntry {
    pub name: String,
    pub kind: TypeKind,
    /// Superclass index for method lookup (classes only)
    pub superclass: Option<usize>,
    /// Included modules, most recent first; searched before the superclass
    pub includes: Vec<usize>,
    /// Types lexically nested under this one, by name
    pub children: FxHashMap<String, usize>,
    pub instance_methods: FxHashMap<String, BoundMethod>,
    pub singleton_methods: FxHashMap<String, BoundMethod>,
}

impl TypeEntry {
    pub fn new(name: impl Into<String>, kind: TypeKind, superclass: Option<usize>) -> Self {
        TypeEntry {
            name: name.into(),
            kind,
            superclass,
            includes: Vec::new(),
            children: FxHashMap::default(),
            instance_methods: FxHashMap::default(),
            singleton_methods: FxHashMap::default(),
        }
    }

    /// Dispatch table for the given receiver kind
    pub fn table(&self, receiver: ReceiverKind) -> &FxHashMap<String, BoundMethod> {
        match receiver {
            ReceiverKind::Instance => &self.instance_methods,
            ReceiverKind::Singleton => &self.singleton_methods,
        }
    }

    /// Mutable dispatch table for the given receiver kind
    pub fn table_mut(&mut self, receiver: ReceiverKind) -> &mut FxHashMap<String, BoundMethod> {
        match receiver {
            ReceiverKind::Instance => &mut self.instance_methods,
            ReceiverKind::Singleton => &mut self.singleton_methods,
        }
    }
}

/// An object instance; fields are out of scope, only identity and type matter
pub(crate) struct Instance {
    pub type_id: usize,
}
