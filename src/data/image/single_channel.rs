//! A single 2-D frame of single-channel data.

use std::any::Any;

use log::trace;
use ndarray::{ArrayView2, Ix2};

use crate::{
    data::image::{
        utils::format_shape,
        validate::{prepare_buffer, validate_buffer},
        DataType,
        Dimensions,
        DynBuffer,
        Element,
        ElementType,
    },
    ImstackError,
    Result,
};

/// A validated 2-D single-channel image.
///
/// The buffer is always rank 2. Unless the image was built
/// with `auto_cast` off, its element type is one of
/// `ALLOWED_ELEMENT_TYPES` (`uint16` and `int16` input is
/// cast to `float32` first).
///
/// ## Example
///
/// ```
/// use ndarray::Array2;
/// use imstack::{ElementType, SingleChannelImage};
///
/// let image = SingleChannelImage::new(Array2::<u16>::zeros((256, 128))).unwrap();
/// assert_eq!(image.element_type(), ElementType::F32);
/// assert_eq!(image.shape(), (256, 128));
/// assert_eq!(image.to_string(), "SingleChannelImage: (256, 128)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SingleChannelImage {
    data : DynBuffer,
}

impl SingleChannelImage {
    /// Builds an image with `auto_cast` on.
    pub fn new(data : impl Into<DynBuffer>) -> Result<Self> {
        Self::with_auto_cast(data, true)
    }

    /// Builds an image from any 2-D buffer.
    ///
    /// ## Arguments
    ///
    /// * `data` - The buffer to own, e.g. an `ndarray::Array2`
    /// * `auto_cast` - Cast `uint16`/`int16` to `float32` and
    /// reject element types outside `ALLOWED_ELEMENT_TYPES`.
    /// When `false` only the rank is checked.
    ///
    /// ## Errors
    ///
    /// * `InvalidRank` - `data` is not 2-D
    /// * `UnsupportedDType` - disallowed element type with `auto_cast`
    pub fn with_auto_cast(data : impl Into<DynBuffer>, auto_cast : bool) -> Result<Self> {
        let data = prepare_buffer(Self::NAME, data.into(), 2, auto_cast)?;
        trace!("Constructed {} {}", Self::NAME, format_shape(data.shape()));
        Ok(SingleChannelImage { data })
    }

    /// Decodes native-endian `bytes` into a `(ydim, xdim)` frame
    /// of `element_type`, then builds the image with `auto_cast` on.
    pub fn from_raw_bytes(
        bytes : &[u8],
        shape : (usize, usize),
        element_type : ElementType
    ) -> Result<Self> {
        Self::new(DynBuffer::from_raw_bytes(bytes, &[shape.0, shape.1], element_type)?)
    }

    /// For buffers already known to be 2-D (e.g. a slice of a stack).
    /// Skips normalization so the stack's element type is kept.
    pub (crate) fn from_frame(data : DynBuffer) -> Self {
        debug_assert_eq!(data.ndim(), 2);
        SingleChannelImage { data }
    }

    pub fn data(&self) -> &DynBuffer {
        &self.data
    }

    pub fn into_data(self) -> DynBuffer {
        self.data
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// `(ydim, xdim)`
    pub fn shape(&self) -> (usize, usize) {
        self.dimensions().to_tuple()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::from_shape(self.data.shape()).unwrap_or(Dimensions::new(0, 0))
    }

    /// Typed 2-D view, `None` if `T` is not the element type.
    pub fn view<T : Element>(&self) -> Option<ArrayView2<'_, T>> {
        self.data.view::<T>()?.into_dimensionality::<Ix2>().ok()
    }
}

impl DataType for SingleChannelImage {
    type Repr = DynBuffer;

    const NAME : &'static str = "SingleChannelImage";

    /// Fails with `TypeMismatch` for anything but a `DynBuffer`
    /// and with `InvalidRank` unless it is 2-D.
    fn validate(data : &dyn Any) -> Result<()> {
        let buffer = data.downcast_ref::<DynBuffer>()
            .ok_or(ImstackError::TypeMismatch { expected : "a numeric DynBuffer" })?;
        validate_buffer(Self::NAME, buffer, 2, false)
    }

    fn data(&self) -> &DynBuffer {
        &self.data
    }

    fn into_data(self) -> DynBuffer {
        self.data
    }
}

impl TryFrom<DynBuffer> for SingleChannelImage {
    type Error = ImstackError;

    fn try_from(data : DynBuffer) -> Result<Self> {
        SingleChannelImage::new(data)
    }
}

impl std::fmt::Display for SingleChannelImage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", Self::NAME, format_shape(self.data.shape()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1, Array2, Array3};

    #[test]
    fn stores_allowed_buffers_unchanged() {
        let data = array![[0u8, 1, 2], [3, 4, 5]];
        let image = SingleChannelImage::new(data.clone()).unwrap();
        assert_eq!(image.element_type(), ElementType::U8);
        assert_eq!(image.view::<u8>().unwrap(), data);
        assert_eq!(image.data(), &DynBuffer::from(data));

        let data = Array2::<f64>::from_elem((4, 5), 0.25);
        let image = SingleChannelImage::new(data.clone()).unwrap();
        assert_eq!(image.into_data().into_array::<f64>().unwrap(), data.into_dyn());
    }

    #[test]
    fn wrong_rank() {
        for auto_cast in [true, false] {
            assert!(matches!(
                SingleChannelImage::with_auto_cast(Array3::<f32>::zeros((2, 2, 2)), auto_cast),
                Err(ImstackError::InvalidRank { expected : 2, found : 3, .. })
            ));
            assert!(matches!(
                SingleChannelImage::with_auto_cast(Array1::<f32>::zeros(4), auto_cast),
                Err(ImstackError::InvalidRank { expected : 2, found : 1, .. })
            ));
        }
    }

    #[test]
    fn sixteen_bit_becomes_float32() {
        let image = SingleChannelImage::new(array![[1i16, -1], [2, 3]]).unwrap();
        assert_eq!(image.element_type(), ElementType::F32);
        assert_eq!(image.view::<f32>().unwrap(), array![[1.0f32, -1.0], [2.0, 3.0]]);

        let image = SingleChannelImage::with_auto_cast(array![[1u16, 2]], false).unwrap();
        assert_eq!(image.element_type(), ElementType::U16);
    }

    #[test]
    fn disallowed_types() {
        let err = SingleChannelImage::new(Array2::<i32>::zeros((2, 2))).unwrap_err();
        assert!(matches!(err, ImstackError::UnsupportedDType { found : ElementType::I32, .. }));

        let image = SingleChannelImage::with_auto_cast(Array2::<i32>::zeros((2, 2)), false).unwrap();
        assert_eq!(image.element_type(), ElementType::I32);
    }

    #[test]
    fn validate_checks_type_and_rank() {
        let buffer : DynBuffer = Array2::<u8>::zeros((3, 3)).into();
        assert!(SingleChannelImage::validate(&buffer).is_ok());

        // Rank only, no dtype check
        let buffer : DynBuffer = Array2::<i64>::zeros((3, 3)).into();
        assert!(SingleChannelImage::validate(&buffer).is_ok());

        let buffer : DynBuffer = Array3::<u8>::zeros((1, 3, 3)).into();
        assert!(matches!(
            SingleChannelImage::validate(&buffer),
            Err(ImstackError::InvalidRank { .. })
        ));

        let not_a_buffer = vec![vec![0u8; 3]; 3];
        assert!(matches!(
            SingleChannelImage::validate(&not_a_buffer),
            Err(ImstackError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn describe() {
        let image = SingleChannelImage::new(Array2::<f32>::zeros((256, 256))).unwrap();
        assert_eq!(image.to_string(), "SingleChannelImage: (256, 256)");
        assert_eq!(image.dimensions(), Dimensions::new(256, 256));
    }

    #[test]
    fn raw_bytes() {
        let bytes : Vec<u8> = [1u16, 2, 3, 4, 5, 6]
            .iter()
            .flat_map(|v| v.to_ne_bytes())
            .collect();
        let image = SingleChannelImage::from_raw_bytes(&bytes, (2, 3), ElementType::U16).unwrap();
        assert_eq!(image.element_type(), ElementType::F32);
        assert_eq!(image.view::<f32>().unwrap()[[1, 2]], 6.0);

        assert!(matches!(
            SingleChannelImage::from_raw_bytes(&bytes, (3, 3), ElementType::U16),
            Err(ImstackError::InvalidBufferLength { .. })
        ));
    }

    #[test]
    fn try_from_buffer() {
        let buffer : DynBuffer = Array2::<u8>::zeros((2, 2)).into();
        assert!(SingleChannelImage::try_from(buffer).is_ok());
        let buffer : DynBuffer = Array3::<u8>::zeros((2, 2, 2)).into();
        assert!(SingleChannelImage::try_from(buffer).is_err());
    }
}
