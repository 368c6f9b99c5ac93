//! # imstack
//!
//! Typed containers for single-channel (grayscale) image
//! data and for ordered stacks of such images, meant to be
//! passed between the nodes of a data-processing pipeline.
//!
//! The crate only models storage, validation, and collection
//! semantics. It does no image processing and no I/O.
//!
//! - `SingleChannelImage` owns one 2-D `DynBuffer`.
//! - `SingleChannelImageStack` owns one 3-D `DynBuffer`
//! shaped `(count, ydim, xdim)` and behaves as an ordered
//! collection of `SingleChannelImage`s.
//!
//! Both normalize `uint16`/`int16` input to `float32` and
//! reject element types outside `uint8`, `float32`, `float64`
//! unless constructed with `auto_cast` off.
//!
//! ## Example
//!
//! ```
//! use ndarray::{Array2, Array3};
//! use imstack::{ElementType, SingleChannelImage, SingleChannelImageStack};
//!
//! let mut stack = SingleChannelImageStack::new(Array3::<f32>::zeros((10, 256, 256))).unwrap();
//! assert_eq!(stack.len(), 10);
//!
//! let image = SingleChannelImage::new(Array2::<u16>::ones((256, 256))).unwrap();
//! assert_eq!(image.element_type(), ElementType::F32);
//!
//! stack.append(image.clone()).unwrap();
//! assert_eq!(stack.len(), 11);
//! assert_eq!(stack.iter().last(), Some(image));
//! ```

mod data;
mod error;

pub use data::image::{
    validate::{normalize, validate_buffer, PARALLEL_CAST_THRESHOLD},
    DataCollection,
    DataType,
    Dimensions,
    DimensionsError,
    DynBuffer,
    Element,
    ElementType,
    ImageStackIter,
    SingleChannelImage,
    SingleChannelImageStack,
    ALLOWED_ELEMENT_TYPES,
    AUTO_CAST_ELEMENT_TYPES,
};
pub use data::generators::{ImageRandomGenerator, ImageStackRandomGenerator};
pub use error::{ImstackError, Result};
