//! HostRuntime - RuntimeAbi implementation and dynamic dispatch

use crate::error::HostError;
use crate::object::{BoundMethod, Instance, TypeEntry};
use graft_abi::{
    AbiError, AbiResult, Arity, CallConvention, NativeCallResult, NativeFn, ReceiverKind, RtValue,
    RuntimeAbi, TypeHandle, TypeKind,
};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Index of the preseeded root class `Object`
const OBJECT_TYPE: usize = 0;

/// In-memory embedded runtime.
///
/// Holds the global constant table, the type table, the string heap, and all
/// spawned instances. Registration is single-threaded by contract, but every
/// ABI method takes `&self`, so the state lives behind a mutex and native
/// entry points are always invoked with the lock released (an entry point may
/// re-enter the ABI, e.g. to allocate its return string).
pub struct HostRuntime {
    state: Mutex<HostState>,
}

struct HostState {
    types: Vec<TypeEntry>,
    globals: FxHashMap<String, usize>,
    strings: Vec<String>,
    instances: Vec<Instance>,
}

impl HostState {
    fn type_entry(&self, handle: TypeHandle) -> AbiResult<&TypeEntry> {
        self.types
            .get(handle.raw() as usize)
            .ok_or(AbiError::UnknownHandle(handle.raw()))
    }

    fn type_entry_mut(&mut self, handle: TypeHandle) -> AbiResult<&mut TypeEntry> {
        self.types
            .get_mut(handle.raw() as usize)
            .ok_or(AbiError::UnknownHandle(handle.raw()))
    }

    /// Walk the lookup chain starting at `type_id`, returning the first table
    /// hit for `name` on the requested receiver kind. Each type is searched
    /// before its included modules, which are searched before its superclass.
    fn resolve_method(
        &self,
        type_id: usize,
        name: &str,
        receiver: ReceiverKind,
    ) -> Option<BoundMethod> {
        let mut current = Some(type_id);
        while let Some(id) = current {
            let entry = &self.types[id];
            if let Some(method) = entry.table(receiver).get(name) {
                return Some(method.clone());
            }
            for &module in &entry.includes {
                if let Some(method) = self.types[module].table(receiver).get(name) {
                    return Some(method.clone());
                }
            }
            current = entry.superclass;
        }
        None
    }
}

impl HostRuntime {
    /// Create a runtime with the root class `Object` preseeded at the global
    /// scope, mirroring what a real embedded runtime brings up before any
    /// native registration runs.
    pub fn new() -> Self {
        let mut globals = FxHashMap::default();
        globals.insert("Object".to_string(), OBJECT_TYPE);
        HostRuntime {
            state: Mutex::new(HostState {
                types: vec![TypeEntry::new("Object", TypeKind::Class, None)],
                globals,
                strings: Vec::new(),
                instances: Vec::new(),
            }),
        }
    }

    /// Handle of the preseeded root class `Object`
    pub fn object_class(&self) -> TypeHandle {
        TypeHandle::from_raw(OBJECT_TYPE as u64)
    }

    /// Spawn a new instance of a class.
    ///
    /// Fails for module handles; modules cannot be instantiated.
    pub fn spawn(&self, class: TypeHandle) -> AbiResult<RtValue> {
        let mut state = self.state.lock();
        let entry = state.type_entry(class)?;
        if entry.kind != TypeKind::Class {
            return Err(AbiError::TypeMismatch {
                expected: "class".to_string(),
                got: format!("module {}", entry.name),
            });
        }
        let id = state.instances.len() as u64;
        state.instances.push(Instance {
            type_id: class.raw() as usize,
        });
        Ok(RtValue::object_handle(id))
    }

    /// The type object itself as a value, for singleton-method receivers
    pub fn type_value(&self, handle: TypeHandle) -> RtValue {
        RtValue::type_object(handle)
    }

    /// Define a new global class with an explicit superclass.
    ///
    /// Host-side subclassing: method lookup walks from the subclass through
    /// `superclass`, so instance methods registered on the parent are
    /// callable on subclass instances without re-registration.
    pub fn subclass(&self, name: &str, superclass: TypeHandle) -> AbiResult<TypeHandle> {
        let mut state = self.state.lock();
        state.type_entry(superclass)?;
        if state.globals.contains_key(name) {
            return Err(AbiError::RejectedDefinition {
                name: name.to_string(),
                reason: "global constant already defined".to_string(),
            });
        }
        let id = state.types.len();
        state.types.push(TypeEntry::new(
            name,
            TypeKind::Class,
            Some(superclass.raw() as usize),
        ));
        state.globals.insert(name.to_string(), id);
        Ok(TypeHandle::from_raw(id as u64))
    }

    /// Mix a module into a class's instance-method lookup chain.
    ///
    /// Instance methods bound on the module become callable on instances of
    /// the class, searched after the class's own table and before its
    /// superclass. The most recently included module wins on a name tie.
    pub fn include(&self, class: TypeHandle, module: TypeHandle) -> AbiResult<()> {
        let mut state = self.state.lock();
        if state.type_entry(class)?.kind != TypeKind::Class {
            return Err(AbiError::TypeMismatch {
                expected: "class".to_string(),
                got: format!("module {}", state.type_entry(class)?.name),
            });
        }
        if state.type_entry(module)?.kind != TypeKind::Module {
            return Err(AbiError::TypeMismatch {
                expected: "module".to_string(),
                got: format!("class {}", state.type_entry(module)?.name),
            });
        }
        let module_id = module.raw() as usize;
        let includes = &mut state.type_entry_mut(class)?.includes;
        if !includes.contains(&module_id) {
            includes.insert(0, module_id);
        }
        Ok(())
    }

    /// Dynamically dispatch `name` on `receiver`.
    ///
    /// Object receivers resolve through their class's instance tables walking
    /// the superclass chain; type-object receivers resolve through singleton
    /// tables the same way. The native entry point runs with the runtime lock
    /// released.
    pub fn send(&self, receiver: RtValue, name: &str, args: &[RtValue]) -> Result<RtValue, HostError> {
        let (method, type_name) = {
            let state = self.state.lock();
            let (type_id, receiver_kind) = if let Some(obj) = receiver.as_object_handle() {
                let instance = state
                    .instances
                    .get(obj as usize)
                    .ok_or(AbiError::UnknownHandle(obj))?;
                (instance.type_id, ReceiverKind::Instance)
            } else if let Some(handle) = receiver.as_type_object() {
                state.type_entry(handle)?;
                (handle.raw() as usize, ReceiverKind::Singleton)
            } else {
                return Err(HostError::InvalidReceiver(format!("{receiver:?}")));
            };
            let type_name = state.types[type_id].name.clone();
            (
                state.resolve_method(type_id, name, receiver_kind),
                type_name,
            )
        };

        let method = method.ok_or_else(|| HostError::NoMethod {
            type_name,
            method: name.to_string(),
        })?;

        if let Arity::Exact(expected) = method.arity {
            if args.len() != expected as usize {
                return Err(HostError::ArityMismatch {
                    method: name.to_string(),
                    expected,
                    given: args.len(),
                });
            }
        }

        match (method.entry)(self, receiver, args) {
            NativeCallResult::Value(value) => Ok(value),
            NativeCallResult::Error(reason) => Err(HostError::NativeFailure {
                method: name.to_string(),
                reason,
            }),
        }
    }
}

impl Default for HostRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeAbi for HostRuntime {
    fn define_type(
        &self,
        parent: Option<TypeHandle>,
        name: &str,
        kind: TypeKind,
    ) -> AbiResult<TypeHandle> {
        let mut state = self.state.lock();

        // Reopen if the constant already names a type at this scope
        let existing = match parent {
            Some(parent) => state.type_entry(parent)?.children.get(name).copied(),
            None => state.globals.get(name).copied(),
        };
        if let Some(id) = existing {
            let entry = &state.types[id];
            if entry.kind != kind {
                return Err(AbiError::RejectedDefinition {
                    name: name.to_string(),
                    reason: format!("already defined as a {:?}", entry.kind),
                });
            }
            return Ok(TypeHandle::from_raw(id as u64));
        }

        // New classes default their superclass to Object, like most dynamic
        // runtimes; modules have no superclass.
        let superclass = match kind {
            TypeKind::Class => Some(OBJECT_TYPE),
            TypeKind::Module => None,
        };
        let id = state.types.len();
        state.types.push(TypeEntry::new(name, kind, superclass));
        match parent {
            Some(parent) => {
                state
                    .type_entry_mut(parent)?
                    .children
                    .insert(name.to_string(), id);
            }
            None => {
                state.globals.insert(name.to_string(), id);
            }
        }
        Ok(TypeHandle::from_raw(id as u64))
    }

    fn define_method(
        &self,
        target: TypeHandle,
        name: &str,
        receiver: ReceiverKind,
        arity: Arity,
        convention: CallConvention,
        entry: NativeFn,
    ) -> AbiResult<()> {
        // This host marshals a contiguous slice; a counted argv only makes
        // sense for variadic entry points.
        if convention == CallConvention::CountedArgv {
            if let Arity::Exact(_) = arity {
                return Err(AbiError::RejectedDefinition {
                    name: name.to_string(),
                    reason: "counted-argv convention requires variadic arity".to_string(),
                });
            }
        }

        let mut state = self.state.lock();
        let table = state.type_entry_mut(target)?.table_mut(receiver);
        table.insert(
            name.to_string(),
            BoundMethod {
                arity,
                convention,
                entry,
            },
        );
        Ok(())
    }

    fn lookup_global(&self, name: &str) -> Option<TypeHandle> {
        self.state
            .lock()
            .globals
            .get(name)
            .map(|&id| TypeHandle::from_raw(id as u64))
    }

    fn type_of(&self, value: RtValue) -> AbiResult<TypeHandle> {
        let state = self.state.lock();
        if let Some(obj) = value.as_object_handle() {
            let instance = state
                .instances
                .get(obj as usize)
                .ok_or(AbiError::UnknownHandle(obj))?;
            return Ok(TypeHandle::from_raw(instance.type_id as u64));
        }
        // A type object designates itself; this host has no metaclasses.
        if let Some(handle) = value.as_type_object() {
            state.type_entry(handle)?;
            return Ok(handle);
        }
        Err(AbiError::TypeMismatch {
            expected: "object or type".to_string(),
            got: format!("{value:?}"),
        })
    }

    fn kind_of(&self, handle: TypeHandle) -> AbiResult<TypeKind> {
        Ok(self.state.lock().type_entry(handle)?.kind)
    }

    fn type_name(&self, handle: TypeHandle) -> AbiResult<String> {
        Ok(self.state.lock().type_entry(handle)?.name.clone())
    }

    fn create_string(&self, s: &str) -> RtValue {
        let mut state = self.state.lock();
        let id = state.strings.len() as u64;
        state.strings.push(s.to_string());
        RtValue::string_handle(id)
    }

    fn read_string(&self, value: RtValue) -> AbiResult<String> {
        let handle = value.as_string_handle().ok_or(AbiError::TypeMismatch {
            expected: "string".to_string(),
            got: format!("{value:?}"),
        })?;
        self.state
            .lock()
            .strings
            .get(handle as usize)
            .cloned()
            .ok_or(AbiError::UnknownHandle(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn returns_success() -> NativeFn {
        Arc::new(|abi, _receiver, _args| NativeCallResult::string(abi, "success"))
    }

    #[test]
    fn test_define_type_then_reopen_returns_same_handle() {
        let host = HostRuntime::new();
        let first = host.define_type(None, "Widget", TypeKind::Class).unwrap();
        let again = host.define_type(None, "Widget", TypeKind::Class).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_define_type_kind_mismatch_rejected() {
        let host = HostRuntime::new();
        host.define_type(None, "Widget", TypeKind::Module).unwrap();
        let err = host.define_type(None, "Widget", TypeKind::Class).unwrap_err();
        assert!(matches!(err, AbiError::RejectedDefinition { .. }));
    }

    #[test]
    fn test_counted_argv_requires_variadic() {
        let host = HostRuntime::new();
        let class = host.define_type(None, "Widget", TypeKind::Class).unwrap();
        let err = host
            .define_method(
                class,
                "fixed",
                ReceiverKind::Instance,
                Arity::Exact(2),
                CallConvention::CountedArgv,
                returns_success(),
            )
            .unwrap_err();
        assert!(matches!(err, AbiError::RejectedDefinition { .. }));
    }

    #[test]
    fn test_send_instance_method() {
        let host = HostRuntime::new();
        let class = host.define_type(None, "Widget", TypeKind::Class).unwrap();
        host.define_method(
            class,
            "status",
            ReceiverKind::Instance,
            Arity::Exact(0),
            CallConvention::ArgSlice,
            returns_success(),
        )
        .unwrap();

        let instance = host.spawn(class).unwrap();
        let result = host.send(instance, "status", &[]).unwrap();
        assert_eq!(host.read_string(result).unwrap(), "success");
    }

    #[test]
    fn test_send_enforces_exact_arity() {
        let host = HostRuntime::new();
        let class = host.define_type(None, "Widget", TypeKind::Class).unwrap();
        host.define_method(
            class,
            "status",
            ReceiverKind::Instance,
            Arity::Exact(0),
            CallConvention::ArgSlice,
            returns_success(),
        )
        .unwrap();

        let instance = host.spawn(class).unwrap();
        let err = host
            .send(instance, "status", &[RtValue::i32(1)])
            .unwrap_err();
        assert!(matches!(err, HostError::ArityMismatch { .. }));
    }

    #[test]
    fn test_singleton_and_instance_tables_are_independent() {
        let host = HostRuntime::new();
        let class = host.define_type(None, "Widget", TypeKind::Class).unwrap();
        host.define_method(
            class,
            "status",
            ReceiverKind::Instance,
            Arity::Variadic,
            CallConvention::ArgSlice,
            Arc::new(|abi, _r, _a| NativeCallResult::string(abi, "instance")),
        )
        .unwrap();
        host.define_method(
            class,
            "status",
            ReceiverKind::Singleton,
            Arity::Variadic,
            CallConvention::ArgSlice,
            Arc::new(|abi, _r, _a| NativeCallResult::string(abi, "singleton")),
        )
        .unwrap();

        let instance = host.spawn(class).unwrap();
        let from_instance = host.send(instance, "status", &[]).unwrap();
        let from_type = host.send(host.type_value(class), "status", &[]).unwrap();
        assert_eq!(host.read_string(from_instance).unwrap(), "instance");
        assert_eq!(host.read_string(from_type).unwrap(), "singleton");
    }

    #[test]
    fn test_subclass_walks_superclass_chain() {
        let host = HostRuntime::new();
        let parent = host.define_type(None, "Widget", TypeKind::Class).unwrap();
        host.define_method(
            parent,
            "status",
            ReceiverKind::Instance,
            Arity::Variadic,
            CallConvention::ArgSlice,
            returns_success(),
        )
        .unwrap();

        let child = host.subclass("Gadget", parent).unwrap();
        let instance = host.spawn(child).unwrap();
        let result = host.send(instance, "status", &[]).unwrap();
        assert_eq!(host.read_string(result).unwrap(), "success");
    }

    #[test]
    fn test_included_module_delivers_instance_methods() {
        let host = HostRuntime::new();
        let module = host.define_type(None, "Helpers", TypeKind::Module).unwrap();
        host.define_method(
            module,
            "status",
            ReceiverKind::Instance,
            Arity::Variadic,
            CallConvention::ArgSlice,
            returns_success(),
        )
        .unwrap();

        let class = host.define_type(None, "Widget", TypeKind::Class).unwrap();
        host.include(class, module).unwrap();
        let instance = host.spawn(class).unwrap();
        let result = host.send(instance, "status", &[]).unwrap();
        assert_eq!(host.read_string(result).unwrap(), "success");
    }

    #[test]
    fn test_own_method_shadows_included_module() {
        let host = HostRuntime::new();
        let module = host.define_type(None, "Helpers", TypeKind::Module).unwrap();
        host.define_method(
            module,
            "status",
            ReceiverKind::Instance,
            Arity::Variadic,
            CallConvention::ArgSlice,
            Arc::new(|abi, _r, _a| NativeCallResult::string(abi, "module")),
        )
        .unwrap();

        let class = host.define_type(None, "Widget", TypeKind::Class).unwrap();
        host.include(class, module).unwrap();
        host.define_method(
            class,
            "status",
            ReceiverKind::Instance,
            Arity::Variadic,
            CallConvention::ArgSlice,
            Arc::new(|abi, _r, _a| NativeCallResult::string(abi, "own")),
        )
        .unwrap();

        let instance = host.spawn(class).unwrap();
        let result = host.send(instance, "status", &[]).unwrap();
        assert_eq!(host.read_string(result).unwrap(), "own");
    }

    #[test]
    fn test_include_rejects_swapped_operands() {
        let host = HostRuntime::new();
        let module = host.define_type(None, "Helpers", TypeKind::Module).unwrap();
        let class = host.define_type(None, "Widget", TypeKind::Class).unwrap();
        assert!(host.include(module, class).is_err());
        assert!(host.include(class, class).is_err());
    }

    #[test]
    fn test_modules_cannot_be_instantiated() {
        let host = HostRuntime::new();
        let module = host.define_type(None, "Helpers", TypeKind::Module).unwrap();
        assert!(host.spawn(module).is_err());
    }

    #[test]
    fn test_strings_compare_by_value_not_identity() {
        let host = HostRuntime::new();
        let a = host.create_string("success");
        let b = host.create_string("success");
        // Distinct handles, equal content
        assert_ne!(a.as_string_handle(), b.as_string_handle());
        assert_eq!(
            host.read_string(a).unwrap(),
            host.read_string(b).unwrap()
        );
    }

    #[test]
    fn test_no_method_error_names_type_and_method() {
        let host = HostRuntime::new();
        let class = host.define_type(None, "Widget", TypeKind::Class).unwrap();
        let instance = host.spawn(class).unwrap();
        let err = host.send(instance, "missing", &[]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing") && msg.contains("Widget"));
    }
}
