//! Method binding layer
//!
//! The marshaling boundary between the engine's metadata and the runtime's
//! dispatch tables. Every definition call funnels through [`bind`], whether it
//! came from a definition builder or from the monkey-patch extender, so all
//! of them share the same guarantees: receiver kind routes to the correct
//! table, same-name rebinding overwrites, different names accumulate.

use crate::descriptor::MethodDescriptor;
use crate::error::RegisterError;
use crate::logger;
use crate::node::NodeId;
use crate::registry::NamespaceRegistry;
use graft_abi::RuntimeAbi;

/// Bind `descriptor` into the runtime dispatch table of `node`.
///
/// Fails with [`RegisterError::Binding`] if the node's runtime handle is not
/// yet materialized or the runtime rejects the arity/calling-convention
/// combination. On success the descriptor is recorded on the node, replacing
/// any previous descriptor of the same name and receiver kind.
pub fn bind(
    abi: &dyn RuntimeAbi,
    registry: &mut NamespaceRegistry,
    node_id: NodeId,
    descriptor: MethodDescriptor,
) -> Result<(), RegisterError> {
    let node = registry.node(node_id);
    let path = node.path().to_string();
    let handle = node.handle().ok_or_else(|| RegisterError::Binding {
        path: path.clone(),
        method: descriptor.name.clone(),
        reason: "runtime handle not yet materialized".to_string(),
    })?;

    abi.define_method(
        handle,
        &descriptor.name,
        descriptor.receiver,
        descriptor.arity,
        descriptor.convention,
        descriptor.entry.clone(),
    )
    .map_err(|err| RegisterError::Binding {
        path: path.clone(),
        method: descriptor.name.clone(),
        reason: err.to_string(),
    })?;

    logger::debug(&format!(
        "bound {:?} method `{}` on `{}`",
        descriptor.receiver, descriptor.name, path
    ));
    registry.node_mut(node_id).record_method(descriptor);
    Ok(())
}
