//! Monkey-patch extender
//!
//! Reopens a type the runtime already owns and attaches new behavior to it,
//! preserving its identity. The target is located either by holding a value
//! of the type (querying its dynamic type at registration time) or by a
//! symbolic name lookup against the runtime's globals. Both routes resolve to
//! the same namespace node for the same underlying type, so patch-by-value
//! and patch-by-name mutate one type, never two shadow copies.

use crate::binding;
use crate::descriptor::MethodDescriptor;
use crate::error::RegisterError;
use crate::node::NodeId;
use crate::registry::NamespaceRegistry;
use graft_abi::{RtValue, RuntimeAbi};

/// A preexisting runtime type to extend
#[derive(Debug, Clone)]
pub enum PatchTarget {
    /// A value whose dynamic type is the patch target
    ByValue(RtValue),
    /// A top-level constant naming the patch target
    ByName(String),
}

impl PatchTarget {
    /// Target the dynamic type of `value`
    pub fn by_value(value: RtValue) -> Self {
        PatchTarget::ByValue(value)
    }

    /// Target the type globally named `name`
    pub fn by_name(name: impl Into<String>) -> Self {
        PatchTarget::ByName(name.into())
    }
}

/// Resolve `target` to its namespace node.
///
/// Fails with [`RegisterError::UnresolvedTarget`] if a symbolic name is
/// unknown to the runtime, or if a by-value target does not carry a type the
/// runtime can identify. Fatal either way: patches run once at
/// initialization and are never retried.
pub fn resolve_target(
    abi: &dyn RuntimeAbi,
    registry: &mut NamespaceRegistry,
    target: &PatchTarget,
) -> Result<NodeId, RegisterError> {
    match target {
        PatchTarget::ByValue(value) => {
            let handle = abi
                .type_of(*value)
                .map_err(|_| RegisterError::UnresolvedTarget {
                    name: format!("{value:?}"),
                })?;
            registry.adopt_handle(abi, handle)
        }
        PatchTarget::ByName(name) => registry.adopt_global(abi, name),
    }
}

/// Reopen `target` and bind `descriptor` onto it.
///
/// After resolution this delegates to the method binding layer exactly as a
/// definition builder does, sharing all of its guarantees, including
/// overwrite-on-same-name semantics.
pub fn patch(
    abi: &dyn RuntimeAbi,
    registry: &mut NamespaceRegistry,
    target: &PatchTarget,
    descriptor: MethodDescriptor,
) -> Result<(), RegisterError> {
    let node = resolve_target(abi, registry, target)?;
    binding::bind(abi, registry, node, descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_abi::NativeCallResult;
    use graft_host::HostRuntime;
    use std::sync::Arc;

    fn noop() -> graft_abi::NativeFn {
        Arc::new(|_abi, _recv, _args| NativeCallResult::null())
    }

    #[test]
    fn test_by_value_and_by_name_resolve_to_same_node() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        let instance = host.spawn(host.object_class()).unwrap();

        let by_value =
            resolve_target(&host, &mut registry, &PatchTarget::by_value(instance)).unwrap();
        let by_name =
            resolve_target(&host, &mut registry, &PatchTarget::by_name("Object")).unwrap();
        assert_eq!(by_value, by_name);
    }

    #[test]
    fn test_unknown_name_is_unresolved_target() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        let err = patch(
            &host,
            &mut registry,
            &PatchTarget::by_name("Ghost"),
            MethodDescriptor::instance("haunt", noop()),
        )
        .unwrap_err();
        assert!(matches!(err, RegisterError::UnresolvedTarget { .. }));
    }

    #[test]
    fn test_typeless_value_is_unresolved_target() {
        let host = HostRuntime::new();
        let mut registry = NamespaceRegistry::new();
        let err = resolve_target(
            &host,
            &mut registry,
            &PatchTarget::by_value(RtValue::i32(7)),
        )
        .unwrap_err();
        assert!(matches!(err, RegisterError::UnresolvedTarget { .. }));
    }
}
