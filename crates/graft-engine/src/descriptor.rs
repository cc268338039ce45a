//! Method descriptors
//!
//! A [`MethodDescriptor`] is the engine-owned record of one native method
//! binding: name, receiver kind, arity, calling convention, and entry point.
//! Within one namespace node, instance and singleton names occupy independent
//! namespaces; a class may carry both an instance and a singleton method of
//! the same name.

use graft_abi::{Arity, CallConvention, NativeFn, ReceiverKind};

/// Binding of a name to a native callable
#[derive(Clone)]
pub struct MethodDescriptor {
    /// Method name, unique within its owning node and receiver kind
    pub name: String,
    /// Instance or singleton dispatch
    pub receiver: ReceiverKind,
    /// Declared argument count
    pub arity: Arity,
    /// How the runtime hands arguments to the entry point
    pub convention: CallConvention,
    /// The native entry point
    pub entry: NativeFn,
}

impl MethodDescriptor {
    /// Descriptor for an instance method with the default convention
    /// (variadic, slice-marshaled arguments)
    pub fn instance(name: impl Into<String>, entry: NativeFn) -> Self {
        MethodDescriptor {
            name: name.into(),
            receiver: ReceiverKind::Instance,
            arity: Arity::Variadic,
            convention: CallConvention::ArgSlice,
            entry,
        }
    }

    /// Descriptor for a singleton method with the default convention
    pub fn singleton(name: impl Into<String>, entry: NativeFn) -> Self {
        MethodDescriptor {
            name: name.into(),
            receiver: ReceiverKind::Singleton,
            arity: Arity::Variadic,
            convention: CallConvention::ArgSlice,
            entry,
        }
    }

    /// Override the declared arity
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Override the calling convention
    pub fn with_convention(mut self, convention: CallConvention) -> Self {
        self.convention = convention;
        self
    }
}

impl std::fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("receiver", &self.receiver)
            .field("arity", &self.arity)
            .field("convention", &self.convention)
            .finish_non_exhaustive()
    }
}
