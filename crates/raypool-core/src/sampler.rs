use crate::color::Color;
use crate::error::SampleError;

/// Computes the color of one pixel of `scene`.
///
/// Called concurrently from every render worker with the same scene, so
/// implementations must not rely on interior mutation of shared state.
pub trait PixelSampler<S: ?Sized>: Sync {
    fn sample(&self, scene: &S, x: u32, y: u32, samples: u32) -> Result<Color, SampleError>;
}

impl<S, F> PixelSampler<S> for F
where
    S: ?Sized,
    F: Fn(&S, u32, u32, u32) -> Result<Color, SampleError> + Sync,
{
    fn sample(&self, scene: &S, x: u32, y: u32, samples: u32) -> Result<Color, SampleError> {
        self(scene, x, y, samples)
    }
}
