//! Macros for dispatching over the variants of a `DynBuffer`
//! so the per-type boilerplate lives in one place.

use itertools::Itertools;

/// Formats a shape as a tuple, e.g. `(10, 256, 256)`.
pub (crate) fn format_shape(shape : &[usize]) -> String {
    format!("({})", shape.iter().join(", "))
}

/// ```rust, ignore
/// for_each_buffer!(buffer, array => expr)
/// ```
///
/// Matches on every variant of a `DynBuffer` (by value
/// or by reference, whichever `buffer` is) and evaluates
/// `expr` with the inner `ndarray` array bound to `array`.
/// Every arm must produce the same type.
macro_rules! for_each_buffer {
    ($buffer : expr, $array : ident => $body : expr) => {
        match $buffer {
            $crate::data::image::DynBuffer::U8($array) => $body,
            $crate::data::image::DynBuffer::I8($array) => $body,
            $crate::data::image::DynBuffer::U16($array) => $body,
            $crate::data::image::DynBuffer::I16($array) => $body,
            $crate::data::image::DynBuffer::U32($array) => $body,
            $crate::data::image::DynBuffer::I32($array) => $body,
            $crate::data::image::DynBuffer::U64($array) => $body,
            $crate::data::image::DynBuffer::I64($array) => $body,
            $crate::data::image::DynBuffer::F32($array) => $body,
            $crate::data::image::DynBuffer::F64($array) => $body,
        }
    };
}

/// ```rust, ignore
/// map_buffer!(buffer, array => expr)
/// ```
///
/// Like `for_each_buffer!` but rewraps the result of `expr`
/// in the same variant it came from, so `expr` must produce
/// an `ArrayD` of the same element type.
macro_rules! map_buffer {
    ($buffer : expr, $array : ident => $body : expr) => {
        match $buffer {
            $crate::data::image::DynBuffer::U8($array) => $crate::data::image::DynBuffer::U8($body),
            $crate::data::image::DynBuffer::I8($array) => $crate::data::image::DynBuffer::I8($body),
            $crate::data::image::DynBuffer::U16($array) => $crate::data::image::DynBuffer::U16($body),
            $crate::data::image::DynBuffer::I16($array) => $crate::data::image::DynBuffer::I16($body),
            $crate::data::image::DynBuffer::U32($array) => $crate::data::image::DynBuffer::U32($body),
            $crate::data::image::DynBuffer::I32($array) => $crate::data::image::DynBuffer::I32($body),
            $crate::data::image::DynBuffer::U64($array) => $crate::data::image::DynBuffer::U64($body),
            $crate::data::image::DynBuffer::I64($array) => $crate::data::image::DynBuffer::I64($body),
            $crate::data::image::DynBuffer::F32($array) => $crate::data::image::DynBuffer::F32($body),
            $crate::data::image::DynBuffer::F64($array) => $crate::data::image::DynBuffer::F64($body),
        }
    };
}

/// ```rust, ignore
/// cast_array!(array, target)
/// ```
///
/// Casts a borrowed `ndarray` array of any primitive numeric
/// type to the element type `target` with `as` semantics
/// (floats saturate when narrowed to integers) and wraps
/// it in the matching `DynBuffer` variant.
macro_rules! cast_array {
    ($array : expr, $target : expr) => {{
        use $crate::data::image::{DynBuffer, ElementType};
        match $target {
            ElementType::U8 => DynBuffer::U8($array.mapv(|v| v as u8)),
            ElementType::I8 => DynBuffer::I8($array.mapv(|v| v as i8)),
            ElementType::U16 => DynBuffer::U16($array.mapv(|v| v as u16)),
            ElementType::I16 => DynBuffer::I16($array.mapv(|v| v as i16)),
            ElementType::U32 => DynBuffer::U32($array.mapv(|v| v as u32)),
            ElementType::I32 => DynBuffer::I32($array.mapv(|v| v as i32)),
            ElementType::U64 => DynBuffer::U64($array.mapv(|v| v as u64)),
            ElementType::I64 => DynBuffer::I64($array.mapv(|v| v as i64)),
            ElementType::F32 => DynBuffer::F32($array.mapv(|v| v as f32)),
            ElementType::F64 => DynBuffer::F64($array.mapv(|v| v as f64)),
        }
    }};
}

pub (crate) use for_each_buffer;
pub (crate) use map_buffer;
pub (crate) use cast_array;
