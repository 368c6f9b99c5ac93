//! `Image`
//!
//! Typed containers for single-channel image data: one
//! frame (`SingleChannelImage`) or an ordered stack of
//! equally-sized frames (`SingleChannelImageStack`), both
//! stored as a single validated `DynBuffer`.

mod buffer;
mod dimensions;
pub (crate) mod dtype;
mod single_channel;
mod stack;
mod utils;
pub mod validate;

use std::any::Any;

pub use buffer::DynBuffer;
pub use dimensions::{Dimensions, DimensionsError};
pub use dtype::{Element, ElementType, ALLOWED_ELEMENT_TYPES, AUTO_CAST_ELEMENT_TYPES};
pub use single_channel::SingleChannelImage;
pub use stack::{ImageStackIter, SingleChannelImageStack};

use crate::{ImstackError, Result};

/// `DataType` is the contract every data entity
/// satisfies so a pipeline can pass it around without
/// knowing its concrete type.
pub trait DataType : Sized {
    /// The representation the entity owns.
    type Repr;

    /// Name used in error messages and `Display`.
    const NAME : &'static str;

    /// Checks whether `data` could back this entity. Fails
    /// with `TypeMismatch` if `data` is not a `Self::Repr`.
    fn validate(data : &dyn Any) -> Result<()>;

    /// Borrow the owned representation.
    fn data(&self) -> &Self::Repr;

    fn into_data(self) -> Self::Repr;
}

/// An ordered, homogeneous collection of `DataType`
/// elements that is itself a `DataType`.
pub trait DataCollection : DataType {
    type Element : DataType + Clone + 'static;

    /// Lazy iterator over the elements in order. Each call
    /// starts again from the first element.
    type Iter<'a> : Iterator<Item = Self::Element> where Self : 'a;

    fn iter(&self) -> Self::Iter<'_>;

    fn append(&mut self, item : Self::Element) -> Result<()>;

    /// `append` for callers that only hold a type-erased value.
    /// Fails with `TypeMismatch` unless `item` is a `Self::Element`.
    fn append_dyn(&mut self, item : &dyn Any) -> Result<()> {
        match item.downcast_ref::<Self::Element>() {
            Some(element) => self.append(element.clone()),
            None => Err(ImstackError::TypeMismatch {
                expected : <Self::Element as DataType>::NAME,
            }),
        }
    }

    /// The representation of a collection with no elements.
    fn initialize_empty() -> Self::Repr;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
