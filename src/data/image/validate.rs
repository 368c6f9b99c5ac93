//! Input normalization and validation shared by every
//! image entity. Normalization always runs first, so a
//! `uint16` buffer passed with `auto_cast` is validated
//! as `float32`.

use log::debug;
use ndarray::ArrayD;
use rayon::prelude::*;

use crate::{
    data::image::{DynBuffer, Element},
    ImstackError,
    Result,
};

/// Buffers with at least this many elements (and a contiguous
/// layout) are cast across the `rayon` thread pool.
pub const PARALLEL_CAST_THRESHOLD : usize = 1 << 16;

/// Casts `uint16` and `int16` buffers to `float32` when
/// `auto_cast` is set. Anything else passes through unchanged.
pub fn normalize(buffer : DynBuffer, auto_cast : bool) -> DynBuffer {
    if !auto_cast || !buffer.element_type().is_auto_cast() {
        return buffer;
    }
    debug!(
        "Casting {} buffer of shape {:?} to float32",
        buffer.element_type(),
        buffer.shape()
    );
    match buffer {
        DynBuffer::U16(array) => DynBuffer::F32(cast_to_f32(array)),
        DynBuffer::I16(array) => DynBuffer::F32(cast_to_f32(array)),
        other => other,
    }
}

/// Lossless widening cast, split across threads for large
/// contiguous arrays.
pub (crate) fn cast_to_f32<T>(array : ArrayD<T>) -> ArrayD<f32>
where T : Element + Into<f32> {
    if array.len() >= PARALLEL_CAST_THRESHOLD {
        if let Some(slice) = array.as_slice() {
            let data : Vec<f32> = slice.par_iter().map(|&v| v.into()).collect();
            if let Ok(cast) = ArrayD::from_shape_vec(array.raw_dim(), data) {
                return cast;
            }
        }
    }
    array.mapv(|v| v.into())
}

/// Fails with `InvalidRank` if `buffer` does not have
/// `expected_rank` axes. If `auto_cast` is set, also fails with
/// `UnsupportedDType` for element types outside
/// `ALLOWED_ELEMENT_TYPES`. Without `auto_cast` the element type
/// is the caller's responsibility.
pub fn validate_buffer(
    entity : &'static str,
    buffer : &DynBuffer,
    expected_rank : usize,
    auto_cast : bool,
) -> Result<()> {
    if buffer.ndim() != expected_rank {
        return Err(ImstackError::InvalidRank {
            entity,
            expected : expected_rank,
            found : buffer.ndim(),
        });
    }
    if auto_cast && !buffer.element_type().is_allowed() {
        return Err(ImstackError::UnsupportedDType {
            entity,
            found : buffer.element_type(),
        });
    }
    Ok(())
}

/// Normalizes then validates, returning the buffer the entity
/// should store.
pub (crate) fn prepare_buffer(
    entity : &'static str,
    buffer : DynBuffer,
    expected_rank : usize,
    auto_cast : bool,
) -> Result<DynBuffer> {
    let buffer = normalize(buffer, auto_cast);
    validate_buffer(entity, &buffer, expected_rank, auto_cast)?;
    if !auto_cast {
        debug!(
            "{} constructed without auto_cast; element type {} is unchecked",
            entity,
            buffer.element_type()
        );
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementType;
    use ndarray::{Array2, Array3, ArrayD, IxDyn};

    #[test]
    fn auto_cast_only_touches_16_bit() {
        let buffer : DynBuffer = Array2::<u16>::from_elem((2, 2), 40000).into();
        let cast = normalize(buffer.clone(), true);
        assert_eq!(cast.element_type(), ElementType::F32);
        assert_eq!(cast.view::<f32>().unwrap()[[0, 0]], 40000.0);

        assert_eq!(normalize(buffer.clone(), false), buffer);

        let buffer : DynBuffer = Array2::<i16>::from_elem((2, 2), -3).into();
        assert_eq!(normalize(buffer, true).view::<f32>().unwrap()[[1, 1]], -3.0);

        for buffer in [
            DynBuffer::zeros(&[2, 2], ElementType::U8),
            DynBuffer::zeros(&[2, 2], ElementType::I32),
            DynBuffer::zeros(&[2, 2], ElementType::F64),
        ] {
            assert_eq!(normalize(buffer.clone(), true), buffer);
        }
    }

    #[test]
    fn parallel_cast_matches_sequential() {
        let n = PARALLEL_CAST_THRESHOLD + 17;
        let array = ArrayD::from_shape_fn(IxDyn(&[n]), |idx| (idx[0] % 65536) as u16);
        let sequential = array.mapv(f32::from);
        assert_eq!(cast_to_f32(array), sequential);

        // Non-contiguous layouts fall back to `mapv`
        let array = Array3::<i16>::from_shape_fn((4, 128, 160), |(k, y, x)| {
            (k as i16 - 2) * (y as i16) + x as i16
        }).reversed_axes().into_dyn();
        let sequential = array.mapv(f32::from);
        assert_eq!(cast_to_f32(array), sequential);
    }

    #[test]
    fn rank_checked_regardless_of_auto_cast() {
        let buffer = DynBuffer::zeros(&[2, 2, 2], ElementType::F32);
        for auto_cast in [true, false] {
            assert!(matches!(
                validate_buffer("SingleChannelImage", &buffer, 2, auto_cast),
                Err(ImstackError::InvalidRank { expected : 2, found : 3, .. })
            ));
        }
    }

    #[test]
    fn dtype_checked_only_with_auto_cast() {
        let buffer = DynBuffer::zeros(&[2, 2], ElementType::U32);
        assert!(matches!(
            validate_buffer("SingleChannelImage", &buffer, 2, true),
            Err(ImstackError::UnsupportedDType { found : ElementType::U32, .. })
        ));
        assert!(validate_buffer("SingleChannelImage", &buffer, 2, false).is_ok());
    }

    #[test]
    fn prepare_normalizes_before_validating() {
        let buffer = DynBuffer::zeros(&[3, 4], ElementType::U16);
        let prepared = prepare_buffer("SingleChannelImage", buffer, 2, true).unwrap();
        assert_eq!(prepared.element_type(), ElementType::F32);

        let buffer = DynBuffer::zeros(&[3, 4], ElementType::U16);
        let prepared = prepare_buffer("SingleChannelImage", buffer, 2, false).unwrap();
        assert_eq!(prepared.element_type(), ElementType::U16);
    }
}
