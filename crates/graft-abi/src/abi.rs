//! RuntimeAbi trait - the registration primitives a host runtime provides

use crate::error::AbiResult;
use crate::handler::NativeFn;
use crate::types::{Arity, CallConvention, ReceiverKind, TypeHandle, TypeKind};
use crate::value::RtValue;

/// The narrow set of primitives the registration engine consumes from an
/// embedded runtime.
///
/// A host runtime implements this trait; the engine never calls into any
/// higher-level runtime facility (evaluation, GC control, bytecode). All
/// registration happens single-threaded during runtime initialization, but
/// implementations take `&self` so a shared handle can be held by both the
/// engine and the host process.
pub trait RuntimeAbi: Send + Sync {
    // ========================================================================
    // Type definition & lookup
    // ========================================================================

    /// Define (or reopen) a type named `name` under `parent`, or at the global
    /// scope when `parent` is `None`.
    ///
    /// Reopening semantics: if a type of the same name already exists at that
    /// scope with the same kind, its existing handle is returned and nothing
    /// is destroyed. A kind mismatch is rejected.
    fn define_type(
        &self,
        parent: Option<TypeHandle>,
        name: &str,
        kind: TypeKind,
    ) -> AbiResult<TypeHandle>;

    /// Attach a native method to a type's instance or singleton dispatch table.
    ///
    /// Rejects arity/calling-convention combinations the runtime does not
    /// support. Re-defining an existing name replaces the previous entry;
    /// other names on the same table are untouched.
    fn define_method(
        &self,
        target: TypeHandle,
        name: &str,
        receiver: ReceiverKind,
        arity: Arity,
        convention: CallConvention,
        entry: NativeFn,
    ) -> AbiResult<()>;

    /// Look up a top-level constant by name
    fn lookup_global(&self, name: &str) -> Option<TypeHandle>;

    /// Dynamic type of a value (object instances and type objects)
    fn type_of(&self, value: RtValue) -> AbiResult<TypeHandle>;

    /// Kind (class vs module) of a type handle
    fn kind_of(&self, handle: TypeHandle) -> AbiResult<TypeKind>;

    /// Name of a type handle, as the runtime knows it
    fn type_name(&self, handle: TypeHandle) -> AbiResult<String>;

    // ========================================================================
    // Value marshaling
    // ========================================================================

    /// Allocate a runtime string from native UTF-8.
    ///
    /// Every call allocates: the returned values compare equal by content
    /// but carry no identity guarantee.
    fn create_string(&self, s: &str) -> RtValue;

    /// Read string content out of a runtime string value
    fn read_string(&self, value: RtValue) -> AbiResult<String>;
}
