//! An ordered stack of equally-sized single-channel frames,
//! stored as one `(count, ydim, xdim)` buffer. Frames are
//! only materialized as `SingleChannelImage`s when asked for.

use std::any::Any;
use std::iter::FusedIterator;

use log::{debug, trace};
use ndarray::{ArrayView3, Ix3};

use crate::{
    data::image::{
        utils::format_shape,
        validate::{prepare_buffer, validate_buffer},
        DataCollection,
        DataType,
        Dimensions,
        DynBuffer,
        Element,
        ElementType,
        SingleChannelImage,
    },
    ImstackError,
    Result,
};

/// A validated 3-D stack of single-channel frames. Axis 0
/// orders the frames, axes 1 and 2 are `(ydim, xdim)`.
///
/// Stacks start either from an existing 3-D buffer or
/// empty, and grow one frame at a time with `append`.
/// There is no removal.
///
/// ## Example
///
/// ```
/// use ndarray::Array2;
/// use imstack::{SingleChannelImage, SingleChannelImageStack};
///
/// let mut stack = SingleChannelImageStack::empty();
/// for k in 0..3 {
///     let frame = Array2::<f32>::from_elem((4, 4), k as f32);
///     stack.append(SingleChannelImage::new(frame).unwrap()).unwrap();
/// }
/// assert_eq!(stack.len(), 3);
/// assert_eq!(stack.to_string(), "SingleChannelImageStack: (3, 4, 4)");
///
/// let means : Vec<f32> = stack.iter()
///     .map(|image| image.view::<f32>().unwrap().mean().unwrap())
///     .collect();
/// assert_eq!(means, vec![0.0, 1.0, 2.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SingleChannelImageStack {
    data : DynBuffer,
}

impl SingleChannelImageStack {
    /// Builds a stack with `auto_cast` on.
    pub fn new(data : impl Into<DynBuffer>) -> Result<Self> {
        Self::with_auto_cast(data, true)
    }

    /// Builds a stack from any 3-D buffer shaped `(count, ydim, xdim)`.
    ///
    /// ## Arguments
    ///
    /// * `data` - The buffer to own, e.g. an `ndarray::Array3`
    /// * `auto_cast` - Cast `uint16`/`int16` to `float32` and
    /// reject element types outside `ALLOWED_ELEMENT_TYPES`.
    /// When `false` only the rank is checked.
    ///
    /// ## Errors
    ///
    /// * `InvalidRank` - `data` is not 3-D
    /// * `UnsupportedDType` - disallowed element type with `auto_cast`
    pub fn with_auto_cast(data : impl Into<DynBuffer>, auto_cast : bool) -> Result<Self> {
        let data = prepare_buffer(Self::NAME, data.into(), 3, auto_cast)?;
        debug!("Constructed {} {}", Self::NAME, format_shape(data.shape()));
        Ok(SingleChannelImageStack { data })
    }

    /// A stack holding the `(0, 0, 0)` buffer from
    /// `initialize_empty`. The first `append` sets the frame
    /// shape and element type.
    pub fn empty() -> Self {
        SingleChannelImageStack {
            data : <Self as DataCollection>::initialize_empty(),
        }
    }

    /// Appends every image in order, stopping at the first error.
    pub fn from_images<I>(images : I) -> Result<Self>
    where I : IntoIterator<Item = SingleChannelImage> {
        let mut stack = Self::empty();
        for image in images {
            stack.append(image)?;
        }
        Ok(stack)
    }

    /// Iterates over the frames in order, copying each into
    /// its own `SingleChannelImage`.
    ///
    /// Frames are not re-normalized: they keep the stack's
    /// element type. A `uint16` stack built with `auto_cast`
    /// off yields `uint16` frames, not `float32` ones, and a
    /// stack of any element type iterates without error.
    pub fn iter(&self) -> ImageStackIter<'_> {
        ImageStackIter {
            data : &self.data,
            index : 0,
            len : self.len(),
        }
    }

    /// A copy of frame `index`, or `None` if out of bounds.
    pub fn get(&self, index : usize) -> Option<SingleChannelImage> {
        if index >= self.len() {
            return None;
        }
        Some(SingleChannelImage::from_frame(self.data.index_leading_axis(index)))
    }

    /// Adds `item` as the last frame.
    ///
    /// If the stack holds no elements yet, it takes on the
    /// image's shape and element type. Otherwise the image
    /// must match the stack's `(ydim, xdim)`. If the element
    /// types differ, the result uses `ElementType::promote`
    /// of the two.
    ///
    /// ## Errors
    ///
    /// * `ShapeMismatch` - frame dimensions differ from the stack's
    ///
    /// The stack is unchanged when an error is returned.
    pub fn append(&mut self, item : SingleChannelImage) -> Result<()> {
        let new_image = item.into_data();
        validate_buffer(SingleChannelImage::NAME, &new_image, 2, false)?;

        if self.data.is_empty() {
            trace!(
                "Initializing empty stack with a {} frame of {}",
                format_shape(new_image.shape()),
                new_image.element_type()
            );
            self.data = new_image.insert_leading_axis();
            return Ok(());
        }

        let required = frame_dimensions(&self.data)?;
        let requested = frame_dimensions(&new_image)?;
        required.require(&requested)?;

        let stack_type = self.data.element_type();
        let promoted = stack_type.promote(new_image.element_type());
        let new_image = new_image.into_cast(promoted);

        if promoted == stack_type {
            self.data.push_leading_axis(&new_image)?;
        } else {
            debug!("Promoting {} from {} to {}", Self::NAME, stack_type, promoted);
            let mut grown = self.data.cast(promoted);
            grown.push_leading_axis(&new_image)?;
            self.data = grown;
        }
        trace!("Appended frame {} to {}", self.len() - 1, Self::NAME);
        Ok(())
    }

    /// Number of frames (the length of axis 0).
    pub fn len(&self) -> usize {
        self.data.shape().first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frame dimensions, or `None` while the stack holds no elements.
    pub fn dimensions(&self) -> Option<Dimensions> {
        if self.data.is_empty() {
            return None;
        }
        Dimensions::from_shape(self.data.shape())
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    pub fn data(&self) -> &DynBuffer {
        &self.data
    }

    pub fn into_data(self) -> DynBuffer {
        self.data
    }

    /// Typed 3-D view, `None` if `T` is not the element type.
    pub fn view<T : Element>(&self) -> Option<ArrayView3<'_, T>> {
        self.data.view::<T>()?.into_dimensionality::<Ix3>().ok()
    }
}

fn frame_dimensions(buffer : &DynBuffer) -> Result<Dimensions> {
    Dimensions::from_shape(buffer.shape()).ok_or(ImstackError::InvalidRank {
        entity : SingleChannelImageStack::NAME,
        expected : 3,
        found : buffer.ndim(),
    })
}

impl DataType for SingleChannelImageStack {
    type Repr = DynBuffer;

    const NAME : &'static str = "SingleChannelImageStack";

    /// Fails with `TypeMismatch` for anything but a `DynBuffer`
    /// and with `InvalidRank` unless it is 3-D.
    fn validate(data : &dyn Any) -> Result<()> {
        let buffer = data.downcast_ref::<DynBuffer>()
            .ok_or(ImstackError::TypeMismatch { expected : "a numeric DynBuffer" })?;
        validate_buffer(Self::NAME, buffer, 3, false)
    }

    fn data(&self) -> &DynBuffer {
        &self.data
    }

    fn into_data(self) -> DynBuffer {
        self.data
    }
}

impl DataCollection for SingleChannelImageStack {
    type Element = SingleChannelImage;

    type Iter<'a> = ImageStackIter<'a>;

    fn iter(&self) -> ImageStackIter<'_> {
        SingleChannelImageStack::iter(self)
    }

    fn append(&mut self, item : SingleChannelImage) -> Result<()> {
        SingleChannelImageStack::append(self, item)
    }

    /// `(0, 0, 0)` of `float64`
    fn initialize_empty() -> DynBuffer {
        DynBuffer::zeros(&[0, 0, 0], ElementType::F64)
    }

    fn len(&self) -> usize {
        SingleChannelImageStack::len(self)
    }
}

impl TryFrom<DynBuffer> for SingleChannelImageStack {
    type Error = ImstackError;

    fn try_from(data : DynBuffer) -> Result<Self> {
        SingleChannelImageStack::new(data)
    }
}

impl Default for SingleChannelImageStack {
    fn default() -> Self {
        SingleChannelImageStack::empty()
    }
}

impl std::fmt::Display for SingleChannelImageStack {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", Self::NAME, format_shape(self.data.shape()))
    }
}

impl<'a> IntoIterator for &'a SingleChannelImageStack {
    type Item = SingleChannelImage;
    type IntoIter = ImageStackIter<'a>;

    fn into_iter(self) -> ImageStackIter<'a> {
        self.iter()
    }
}

/// Iterator over the frames of a `SingleChannelImageStack`.
/// Each frame is copied out of the stack when yielded.
#[derive(Debug, Clone)]
pub struct ImageStackIter<'a> {
    data : &'a DynBuffer,
    index : usize,
    len : usize,
}

impl<'a> Iterator for ImageStackIter<'a> {
    type Item = SingleChannelImage;

    fn next(&mut self) -> Option<SingleChannelImage> {
        if self.index >= self.len {
            return None;
        }
        let frame = self.data.index_leading_axis(self.index);
        self.index += 1;
        Some(SingleChannelImage::from_frame(frame))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ImageStackIter<'_> {}

impl FusedIterator for ImageStackIter<'_> {}
