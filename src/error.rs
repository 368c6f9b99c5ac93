use thiserror::Error;

use crate::data::image::{
    DimensionsError,
    ElementType,
    dtype::{format_element_types, ALLOWED_ELEMENT_TYPES},
};

/// Errors raised while constructing, validating, or
/// growing an image entity. All of them are raised
/// before any state is modified.
#[derive(Debug, Error)]
pub enum ImstackError {
    /// The buffer's rank does not match what the entity requires.
    #[error("{entity} expects {expected}-D data, got ndim={found}")]
    InvalidRank {
        entity : &'static str,
        expected : usize,
        found : usize,
    },

    /// Only raised when `auto_cast` was requested.
    #[error(
        "{}: unsupported dtype {}; allowed {}",
        .entity, .found, format_element_types(&ALLOWED_ELEMENT_TYPES)
    )]
    UnsupportedDType {
        entity : &'static str,
        found : ElementType,
    },

    /// A value of the wrong kind was passed where a buffer
    /// or a specific entity was expected.
    #[error("Expected {expected}, got a value of another type")]
    TypeMismatch {
        expected : &'static str,
    },

    /// An appended image does not match the stack's frame shape.
    #[error("Image dimensions do not match existing stack: {0}")]
    ShapeMismatch(#[from] DimensionsError),

    #[error("Buffer holds {found} bytes but the requested shape needs {expected}")]
    InvalidBufferLength {
        expected : usize,
        found : usize,
    },

    #[error("ShapeError: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, ImstackError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::image::Dimensions;

    #[test]
    fn messages() {
        let err = ImstackError::InvalidRank {
            entity : "SingleChannelImage",
            expected : 2,
            found : 3,
        };
        assert_eq!(err.to_string(), "SingleChannelImage expects 2-D data, got ndim=3");

        let err = ImstackError::UnsupportedDType {
            entity : "SingleChannelImage",
            found : ElementType::I32,
        };
        assert_eq!(
            err.to_string(),
            "SingleChannelImage: unsupported dtype int32; allowed (uint8, float32, float64)"
        );

        let err : ImstackError = DimensionsError::MismatchedDimensions {
            required : Dimensions::new(4, 4),
            requested : Dimensions::new(3, 4),
        }.into();
        assert!(matches!(err, ImstackError::ShapeMismatch(_)));
        assert_eq!(
            err.to_string(),
            "Image dimensions do not match existing stack: \
            Mismatched dimensions. Requested: (4, 3), Required: (4, 4)"
        );
    }
}
