//! Element types a `DynBuffer` can carry, the subset
//! the image entities accept, and the rules for casting
//! between them.

use itertools::Itertools;
use ndarray::{ArrayD, ArrayViewD};

use crate::data::image::DynBuffer;

/// The element type of a numeric buffer. Names print as
/// `uint8`, `float32`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

/// Element types an image or stack may hold once
/// `auto_cast` is requested.
pub const ALLOWED_ELEMENT_TYPES : [ElementType; 3] = [
    ElementType::U8,
    ElementType::F32,
    ElementType::F64,
];

/// Element types that `auto_cast` converts to `F32`
/// before validation.
pub const AUTO_CAST_ELEMENT_TYPES : [ElementType; 2] = [
    ElementType::U16,
    ElementType::I16,
];

impl ElementType {
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::U8 => "uint8",
            ElementType::I8 => "int8",
            ElementType::U16 => "uint16",
            ElementType::I16 => "int16",
            ElementType::U32 => "uint32",
            ElementType::I32 => "int32",
            ElementType::U64 => "uint64",
            ElementType::I64 => "int64",
            ElementType::F32 => "float32",
            ElementType::F64 => "float64",
        }
    }

    pub fn is_allowed(&self) -> bool {
        ALLOWED_ELEMENT_TYPES.contains(self)
    }

    /// Whether `auto_cast` replaces this type with `F32`.
    pub fn is_auto_cast(&self) -> bool {
        AUTO_CAST_ELEMENT_TYPES.contains(self)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            ElementType::I8 | ElementType::I16 | ElementType::I32
            | ElementType::I64 | ElementType::F32 | ElementType::F64
        )
    }

    pub fn bits(&self) -> u32 {
        match self {
            ElementType::U8 | ElementType::I8 => 8,
            ElementType::U16 | ElementType::I16 => 16,
            ElementType::U32 | ElementType::I32 | ElementType::F32 => 32,
            ElementType::U64 | ElementType::I64 | ElementType::F64 => 64,
        }
    }

    /// The smallest type both `self` and `other` can be cast
    /// to without losing range. Mixed-sign integers go to a
    /// signed type twice as wide as the unsigned one, and
    /// mixing `U64` with any signed type goes to `F64`.
    ///
    /// ## Example
    ///
    /// ```
    /// use imstack::ElementType;
    ///
    /// assert_eq!(ElementType::U8.promote(ElementType::F32), ElementType::F32);
    /// assert_eq!(ElementType::U8.promote(ElementType::I8), ElementType::I16);
    /// assert_eq!(ElementType::I32.promote(ElementType::F32), ElementType::F64);
    /// ```
    pub fn promote(self, other : ElementType) -> ElementType {
        if self == other {
            return self;
        }
        match (self.is_float(), other.is_float()) {
            (true, true) => ElementType::F64,
            (true, false) => float_with_int(self, other),
            (false, true) => float_with_int(other, self),
            (false, false) => {
                let bits = match (self.is_signed(), other.is_signed()) {
                    (false, false) => return ElementType::unsigned(self.bits().max(other.bits())),
                    (true, true) => self.bits().max(other.bits()),
                    (true, false) => self.bits().max(2 * other.bits()),
                    (false, true) => other.bits().max(2 * self.bits()),
                };
                if bits > 64 {
                    ElementType::F64
                } else {
                    ElementType::signed(bits)
                }
            }
        }
    }

    fn signed(bits : u32) -> ElementType {
        match bits {
            8 => ElementType::I8,
            16 => ElementType::I16,
            32 => ElementType::I32,
            _ => ElementType::I64,
        }
    }

    fn unsigned(bits : u32) -> ElementType {
        match bits {
            8 => ElementType::U8,
            16 => ElementType::U16,
            32 => ElementType::U32,
            _ => ElementType::U64,
        }
    }
}

/// `F32` holds integers up to 16 bits exactly, anything
/// wider needs `F64`.
fn float_with_int(float : ElementType, int : ElementType) -> ElementType {
    if float == ElementType::F32 && int.bits() <= 16 {
        ElementType::F32
    } else {
        ElementType::F64
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Formats a list of element types as `(uint8, float32, float64)`.
pub (crate) fn format_element_types(types : &[ElementType]) -> String {
    format!("({})", types.iter().join(", "))
}

/// A primitive numeric type that can live inside a `DynBuffer`.
///
/// Implemented for every `ElementType` variant's Rust type,
/// and lets typed `ndarray` arrays move in and out of the
/// type-erased buffer.
pub trait Element : bytemuck::Pod + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    const ELEMENT_TYPE : ElementType;

    fn wrap(array : ArrayD<Self>) -> DynBuffer;

    fn view(buffer : &DynBuffer) -> Option<ArrayViewD<'_, Self>>;

    /// Returns the buffer back unchanged if the element
    /// type does not match.
    fn extract(buffer : DynBuffer) -> Result<ArrayD<Self>, DynBuffer>;
}

macro_rules! impl_element {
    ($($ty : ty => $variant : ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const ELEMENT_TYPE : ElementType = ElementType::$variant;

                fn wrap(array : ArrayD<Self>) -> DynBuffer {
                    DynBuffer::$variant(array)
                }

                fn view(buffer : &DynBuffer) -> Option<ArrayViewD<'_, Self>> {
                    match buffer {
                        DynBuffer::$variant(array) => Some(array.view()),
                        _ => None,
                    }
                }

                fn extract(buffer : DynBuffer) -> Result<ArrayD<Self>, DynBuffer> {
                    match buffer {
                        DynBuffer::$variant(array) => Ok(array),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_element!(
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_and_auto_cast_sets() {
        assert!(ElementType::U8.is_allowed());
        assert!(ElementType::F32.is_allowed());
        assert!(ElementType::F64.is_allowed());
        assert!(!ElementType::U16.is_allowed());
        assert!(!ElementType::I32.is_allowed());

        assert!(ElementType::U16.is_auto_cast());
        assert!(ElementType::I16.is_auto_cast());
        assert!(!ElementType::U8.is_auto_cast());
        assert!(!ElementType::U32.is_auto_cast());
    }

    #[test]
    fn dtype_names() {
        assert_eq!(ElementType::U16.to_string(), "uint16");
        assert_eq!(ElementType::F64.to_string(), "float64");
        assert_eq!(
            format_element_types(&ALLOWED_ELEMENT_TYPES),
            "(uint8, float32, float64)"
        );
    }

    #[test]
    fn promotion_table() {
        use ElementType::*;
        assert_eq!(U8.promote(U8), U8);
        assert_eq!(U8.promote(U16), U16);
        assert_eq!(U8.promote(I8), I16);
        assert_eq!(I16.promote(U32), I64);
        assert_eq!(U64.promote(I8), F64);
        assert_eq!(U8.promote(F32), F32);
        assert_eq!(F32.promote(I16), F32);
        assert_eq!(F32.promote(U32), F64);
        assert_eq!(F32.promote(F64), F64);
        assert_eq!(F64.promote(U8), F64);
        // Symmetric
        assert_eq!(F32.promote(U8), U8.promote(F32));
        assert_eq!(I8.promote(U8), U8.promote(I8));
    }

    #[test]
    fn element_types_match_rust_types() {
        assert_eq!(<u8 as Element>::ELEMENT_TYPE, ElementType::U8);
        assert_eq!(<i16 as Element>::ELEMENT_TYPE, ElementType::I16);
        assert_eq!(<f64 as Element>::ELEMENT_TYPE, ElementType::F64);
    }
}
