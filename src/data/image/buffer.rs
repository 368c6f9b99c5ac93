//! `DynBuffer` is the owned, type-erased numeric array that
//! every image entity stores. It wraps an `ndarray::ArrayD`
//! of one of the supported element types and exposes only
//! what the entities need: rank and dtype introspection,
//! casting, slicing along the leading axis, and growing
//! along the leading axis.

use ndarray::{Array, ArrayD, ArrayViewD, Axis, Dimension, ErrorKind, IxDyn, ShapeError};

use crate::{
    data::image::{
        dtype::{Element, ElementType},
        utils::{cast_array, for_each_buffer, map_buffer},
    },
    ImstackError,
    Result,
};

/// An owned n-dimensional numeric array tagged with its
/// element type.
///
/// Any typed `ndarray::Array<T, D>` of a supported element
/// type converts into a `DynBuffer` with `.into()`.
///
/// ## Example
///
/// ```
/// use ndarray::Array2;
/// use imstack::{DynBuffer, ElementType};
///
/// let buffer : DynBuffer = Array2::<u16>::zeros((4, 8)).into();
/// assert_eq!(buffer.ndim(), 2);
/// assert_eq!(buffer.shape(), &[4, 8]);
/// assert_eq!(buffer.element_type(), ElementType::U16);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DynBuffer {
    U8(ArrayD<u8>),
    I8(ArrayD<i8>),
    U16(ArrayD<u16>),
    I16(ArrayD<i16>),
    U32(ArrayD<u32>),
    I32(ArrayD<i32>),
    U64(ArrayD<u64>),
    I64(ArrayD<i64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

fn element_type_of<T : Element>(_array : &ArrayD<T>) -> ElementType {
    T::ELEMENT_TYPE
}

impl DynBuffer {
    /// A zero-filled buffer of the given shape and element type.
    pub fn zeros(shape : &[usize], element_type : ElementType) -> DynBuffer {
        let shape = IxDyn(shape);
        match element_type {
            ElementType::U8 => DynBuffer::U8(ArrayD::zeros(shape)),
            ElementType::I8 => DynBuffer::I8(ArrayD::zeros(shape)),
            ElementType::U16 => DynBuffer::U16(ArrayD::zeros(shape)),
            ElementType::I16 => DynBuffer::I16(ArrayD::zeros(shape)),
            ElementType::U32 => DynBuffer::U32(ArrayD::zeros(shape)),
            ElementType::I32 => DynBuffer::I32(ArrayD::zeros(shape)),
            ElementType::U64 => DynBuffer::U64(ArrayD::zeros(shape)),
            ElementType::I64 => DynBuffer::I64(ArrayD::zeros(shape)),
            ElementType::F32 => DynBuffer::F32(ArrayD::zeros(shape)),
            ElementType::F64 => DynBuffer::F64(ArrayD::zeros(shape)),
        }
    }

    /// Decodes a native-endian byte slice into a buffer of
    /// `shape`. The byte count must be exactly
    /// `product(shape) * size_of(element_type)`.
    ///
    /// ## Example
    ///
    /// ```
    /// use imstack::{DynBuffer, ElementType};
    ///
    /// let bytes : Vec<u8> = [1.0f32, 2.0, 3.0, 4.0]
    ///     .iter()
    ///     .flat_map(|v| v.to_ne_bytes())
    ///     .collect();
    /// let buffer = DynBuffer::from_raw_bytes(&bytes, &[2, 2], ElementType::F32).unwrap();
    /// assert_eq!(buffer.view::<f32>().unwrap()[[1, 0]], 3.0);
    /// ```
    pub fn from_raw_bytes(
        bytes : &[u8],
        shape : &[usize],
        element_type : ElementType
    ) -> Result<DynBuffer> {
        match element_type {
            ElementType::U8 => decode::<u8>(bytes, shape),
            ElementType::I8 => decode::<i8>(bytes, shape),
            ElementType::U16 => decode::<u16>(bytes, shape),
            ElementType::I16 => decode::<i16>(bytes, shape),
            ElementType::U32 => decode::<u32>(bytes, shape),
            ElementType::I32 => decode::<i32>(bytes, shape),
            ElementType::U64 => decode::<u64>(bytes, shape),
            ElementType::I64 => decode::<i64>(bytes, shape),
            ElementType::F32 => decode::<f32>(bytes, shape),
            ElementType::F64 => decode::<f64>(bytes, shape),
        }
    }

    /// Native-endian bytes of the buffer in logical (row-major) order.
    pub fn to_raw_bytes(&self) -> Vec<u8> {
        for_each_buffer!(self, array => match array.as_slice() {
            Some(slice) => bytemuck::cast_slice::<_, u8>(slice).to_vec(),
            None => {
                let owned : Vec<_> = array.iter().copied().collect();
                bytemuck::cast_slice::<_, u8>(&owned).to_vec()
            }
        })
    }

    pub fn element_type(&self) -> ElementType {
        for_each_buffer!(self, array => element_type_of(array))
    }

    pub fn ndim(&self) -> usize {
        for_each_buffer!(self, array => array.ndim())
    }

    pub fn shape(&self) -> &[usize] {
        for_each_buffer!(self, array => array.shape())
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        for_each_buffer!(self, array => array.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A typed view, or `None` if `T` is not this buffer's
    /// element type.
    pub fn view<T : Element>(&self) -> Option<ArrayViewD<'_, T>> {
        T::view(self)
    }

    /// The typed array, or the buffer back unchanged if `T` is
    /// not its element type.
    pub fn into_array<T : Element>(self) -> std::result::Result<ArrayD<T>, DynBuffer> {
        T::extract(self)
    }

    /// A new buffer with every element cast to `target`.
    /// Clones if the type already matches.
    pub fn cast(&self, target : ElementType) -> DynBuffer {
        if self.element_type() == target {
            return self.clone();
        }
        for_each_buffer!(self, array => cast_array!(array, target))
    }

    /// Like `cast`, but reuses the allocation when no
    /// conversion is needed.
    pub fn into_cast(self, target : ElementType) -> DynBuffer {
        if self.element_type() == target {
            return self;
        }
        self.cast(target)
    }

    /// Owned copy of the slice at `index` along axis 0,
    /// one rank lower than `self`.
    ///
    /// Panics if `index` is out of bounds or the buffer is 0-D.
    pub (crate) fn index_leading_axis(&self, index : usize) -> DynBuffer {
        map_buffer!(self, array => array.index_axis(Axis(0), index).to_owned())
    }

    /// Adds a new axis of length 1 in front, e.g. `(H, W)` to `(1, H, W)`.
    pub (crate) fn insert_leading_axis(self) -> DynBuffer {
        map_buffer!(self, array => array.insert_axis(Axis(0)))
    }

    /// Appends `slice` (one rank lower than `self`) as the new
    /// last entry along axis 0. Uses `ndarray`'s amortized
    /// growth, so repeated pushes do not copy the whole array
    /// every time. Both buffers must share an element type.
    ///
    /// On error `self` is left unchanged.
    pub (crate) fn push_leading_axis(&mut self, slice : &DynBuffer) -> Result<()> {
        let expected = self.element_type();

        macro_rules! push_same_type {
            ($target : expr, $slice : expr, $expected : expr; $($variant : ident),*) => {
                match ($target, $slice) {
                    $(
                        (DynBuffer::$variant(array), DynBuffer::$variant(new)) => {
                            array.push(Axis(0), new.view())?;
                        },
                    )*
                    _ => return Err(ImstackError::TypeMismatch {
                        expected : $expected.name(),
                    }),
                }
            };
        }

        push_same_type!(self, slice, expected; U8, I8, U16, I16, U32, I32, U64, I64, F32, F64);
        Ok(())
    }
}

fn decode<T : Element>(bytes : &[u8], shape : &[usize]) -> Result<DynBuffer> {
    let expected = shape.iter()
        .try_fold(std::mem::size_of::<T>(), |acc, &dim| acc.checked_mul(dim))
        .ok_or(ShapeError::from_kind(ErrorKind::Overflow))?;
    if bytes.len() != expected {
        return Err(ImstackError::InvalidBufferLength {
            expected,
            found : bytes.len(),
        });
    }
    // Copies, so `bytes` needs no particular alignment
    let data : Vec<T> = bytemuck::pod_collect_to_vec(bytes);
    Ok(T::wrap(ArrayD::from_shape_vec(IxDyn(shape), data)?))
}

impl<T : Element, D : Dimension> From<Array<T, D>> for DynBuffer {
    fn from(array : Array<T, D>) -> Self {
        T::wrap(array.into_dyn())
    }
}
