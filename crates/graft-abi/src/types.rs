//! Registration tags: type handles, kinds, receiver and calling conventions

/// Opaque handle to a type (class or module) owned by the embedded runtime.
///
/// Handles are issued by the runtime from [`RuntimeAbi::define_type`] and
/// friends, and are only meaningful to the runtime that issued them. The
/// engine stores them but never interprets the payload.
///
/// [`RuntimeAbi::define_type`]: crate::RuntimeAbi::define_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandle(u64);

impl TypeHandle {
    /// Construct a handle from its raw representation (runtime side only)
    pub fn from_raw(raw: u64) -> Self {
        TypeHandle(raw)
    }

    /// Raw representation of the handle
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Kind of a namespace-level type in the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// A pure namespace / mixin container; cannot be instantiated
    Module,
    /// An instantiable class
    Class,
}

/// Which receiver a method is dispatched on.
///
/// An instance method attached to the wrong table silently changes semantics
/// (callable on the type instead of its instances, or vice versa), so the
/// receiver kind travels with every method registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    /// Called on instances of the type; the receiver is the instance
    Instance,
    /// Called on the type itself; the receiver is the class/module object
    Singleton,
}

/// Declared argument count of a native method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments (receiver excluded)
    Exact(u8),
    /// Any number of arguments; the entry point inspects the slice
    Variadic,
}

/// How the runtime hands arguments to the native entry point.
///
/// Runtime-specific; a parameter of method binding rather than a fixed
/// contract of the ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallConvention {
    /// Arguments are marshaled into a contiguous slice
    ArgSlice,
    /// Arguments arrive as a counted argv array (variadic only on most hosts)
    CountedArgv,
}
