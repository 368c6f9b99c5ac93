//! Code in this submodule deals strictly with attention to
//! image dimensions and the types of things that can go wrong
//! with `Dimensions`.
//!

use thiserror::Error;

/// `Dimensions` is a simple struct that holds the spatial
/// dimensions of a frame.
///
/// `xdim` is the width of the frame
/// `ydim` is the height of the frame
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Dimensions {
    pub xdim : usize,
    pub ydim : usize
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionsError {
    #[error("Mismatched dimensions. Requested: {requested}, Required: {required}")]
    MismatchedDimensions{required : Dimensions, requested: Dimensions},
}

impl Dimensions {
    pub fn new(xdim : usize, ydim : usize) -> Dimensions {
        Dimensions {
            xdim,
            ydim,
        }
    }

    /// Reads the two trailing axes of a shape as `(ydim, xdim)`.
    /// Returns `None` for shapes of rank < 2.
    ///
    /// ## Example
    ///
    /// ```
    /// use imstack::Dimensions;
    ///
    /// let dims = Dimensions::from_shape(&[10, 256, 128]).unwrap();
    /// assert_eq!(dims.to_tuple(), (256, 128));
    /// ```
    pub fn from_shape(shape : &[usize]) -> Option<Dimensions> {
        match shape {
            [.., ydim, xdim] => Some(Dimensions::new(*xdim, *ydim)),
            _ => None,
        }
    }

    /// Returns the dimensions as a tuple (y, x)
    pub fn to_tuple(&self) -> (usize, usize) {
        (self.ydim, self.xdim)
    }

    /// Errors unless `requested` matches `self` exactly.
    pub fn require(&self, requested : &Dimensions) -> Result<(), DimensionsError> {
        if self == requested {
            return Ok(());
        }
        Err(DimensionsError::MismatchedDimensions {
            required : *self,
            requested : *requested,
        })
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.ydim, self.xdim)
    }
}
