//! Random data generators for filling pipelines and tests
//! with images of a given shape.

use ndarray::{Array2, Array3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    data::image::{SingleChannelImage, SingleChannelImageStack},
    Result,
};

/// Produces `float32` images with samples drawn uniformly
/// from `[0, 1)`.
///
/// ## Example
///
/// ```
/// use imstack::ImageRandomGenerator;
///
/// let mut generator = ImageRandomGenerator::seeded(7);
/// let image = generator.get_data((256, 256)).unwrap();
/// assert_eq!(image.shape(), (256, 256));
/// ```
pub struct ImageRandomGenerator<R : Rng = StdRng> {
    rng : R,
}

impl ImageRandomGenerator<StdRng> {
    /// Seeded from system entropy.
    pub fn new() -> Self {
        ImageRandomGenerator::from_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence for a given `seed`.
    pub fn seeded(seed : u64) -> Self {
        ImageRandomGenerator::from_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for ImageRandomGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R : Rng> ImageRandomGenerator<R> {
    pub fn from_rng(rng : R) -> Self {
        ImageRandomGenerator { rng }
    }

    /// A new random image of `(ydim, xdim)`.
    pub fn get_data(&mut self, shape : (usize, usize)) -> Result<SingleChannelImage> {
        let rng = &mut self.rng;
        SingleChannelImage::new(Array2::from_shape_simple_fn(shape, || rng.gen::<f32>()))
    }
}

/// Produces `float32` image stacks with samples drawn
/// uniformly from `[0, 1)`.
///
/// ## Example
///
/// ```
/// use imstack::ImageStackRandomGenerator;
///
/// let mut generator = ImageStackRandomGenerator::seeded(7);
/// let stack = generator.get_data((10, 64, 64)).unwrap();
/// assert_eq!(stack.len(), 10);
/// ```
pub struct ImageStackRandomGenerator<R : Rng = StdRng> {
    rng : R,
}

impl ImageStackRandomGenerator<StdRng> {
    /// Seeded from system entropy.
    pub fn new() -> Self {
        ImageStackRandomGenerator::from_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence for a given `seed`.
    pub fn seeded(seed : u64) -> Self {
        ImageStackRandomGenerator::from_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for ImageStackRandomGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R : Rng> ImageStackRandomGenerator<R> {
    pub fn from_rng(rng : R) -> Self {
        ImageStackRandomGenerator { rng }
    }

    /// A new random stack of `(count, ydim, xdim)`.
    pub fn get_data(&mut self, shape : (usize, usize, usize)) -> Result<SingleChannelImageStack> {
        let rng = &mut self.rng;
        SingleChannelImageStack::new(Array3::from_shape_simple_fn(shape, || rng.gen::<f32>()))
    }
}
