//! Tagged runtime value handle

use crate::types::TypeHandle;

/// Runtime value handle passed across the ABI boundary.
///
/// This is a lightweight, opaque value. Primitives (null, bool, i32, f64) are
/// stored inline; strings, objects, and type references carry a handle to
/// runtime-owned storage. The engine never owns the memory behind a handle -
/// the runtime does, for the lifetime of the process.
///
/// # Thread Safety
///
/// `RtValue` is `Send + Sync`; it is a plain tag + payload with no interior
/// pointers the engine dereferences.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RtValue {
    tag: u8,
    data: u64,
}

// Value type tags
const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_I32: u8 = 2;
const TAG_F64: u8 = 3;
const TAG_STR: u8 = 4; // Handle to a runtime-owned string
const TAG_OBJ: u8 = 5; // Handle to a runtime-owned object instance
const TAG_TYPE: u8 = 6; // A type object (class or module) itself

impl RtValue {
    /// Create a null value
    pub fn null() -> Self {
        RtValue { tag: TAG_NULL, data: 0 }
    }

    /// Create a boolean value
    pub fn bool(b: bool) -> Self {
        RtValue { tag: TAG_BOOL, data: b as u64 }
    }

    /// Create a 32-bit integer value
    pub fn i32(i: i32) -> Self {
        RtValue { tag: TAG_I32, data: i as u32 as u64 }
    }

    /// Create a 64-bit float value
    pub fn f64(f: f64) -> Self {
        RtValue { tag: TAG_F64, data: f.to_bits() }
    }

    /// Create a string value from a runtime string handle
    pub fn string_handle(handle: u64) -> Self {
        RtValue { tag: TAG_STR, data: handle }
    }

    /// Create an object value from a runtime object handle
    pub fn object_handle(handle: u64) -> Self {
        RtValue { tag: TAG_OBJ, data: handle }
    }

    /// Create a value referring to a type object itself.
    ///
    /// Singleton method calls receive this as their receiver: the class or
    /// module, not an instance of it.
    pub fn type_object(handle: TypeHandle) -> Self {
        RtValue { tag: TAG_TYPE, data: handle.raw() }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        self.tag == TAG_NULL
    }

    /// Get as boolean if this is a bool
    pub fn as_bool(&self) -> Option<bool> {
        (self.tag == TAG_BOOL).then(|| self.data != 0)
    }

    /// Get as i32 if this is an i32
    pub fn as_i32(&self) -> Option<i32> {
        (self.tag == TAG_I32).then(|| self.data as i32)
    }

    /// Get as f64 if this is an f64
    pub fn as_f64(&self) -> Option<f64> {
        (self.tag == TAG_F64).then(|| f64::from_bits(self.data))
    }

    /// Get the string handle if this is a string value
    pub fn as_string_handle(&self) -> Option<u64> {
        (self.tag == TAG_STR).then_some(self.data)
    }

    /// Get the object handle if this is an object value
    pub fn as_object_handle(&self) -> Option<u64> {
        (self.tag == TAG_OBJ).then_some(self.data)
    }

    /// Get the type handle if this value is a type object
    pub fn as_type_object(&self) -> Option<TypeHandle> {
        (self.tag == TAG_TYPE).then(|| TypeHandle::from_raw(self.data))
    }
}

impl Default for RtValue {
    fn default() -> Self {
        Self::null()
    }
}

impl std::fmt::Debug for RtValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tag {
            TAG_NULL => write!(f, "RtValue::Null"),
            TAG_BOOL => write!(f, "RtValue::Bool({})", self.data != 0),
            TAG_I32 => write!(f, "RtValue::I32({})", self.data as i32),
            TAG_F64 => write!(f, "RtValue::F64({})", f64::from_bits(self.data)),
            TAG_STR => write!(f, "RtValue::Str(#{})", self.data),
            TAG_OBJ => write!(f, "RtValue::Obj(#{})", self.data),
            TAG_TYPE => write!(f, "RtValue::Type(#{})", self.data),
            _ => write!(f, "RtValue::Unknown(tag={}, data={})", self.tag, self.data),
        }
    }
}
