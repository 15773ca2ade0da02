use crate::scene::Scene;
use crate::tracer::trace;
use raypool_core::{Color, PixelSampler, SampleError};

const BACKGROUND_SIZE: f32 = 4.0;
const BACKGROUND_DISTANCE: f32 = 15.0;
const PLANE_DISTANCE: f32 = 5.0;

/// Rectangular grid of pixels placed `distance` in front of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPlane {
    res_x: u32,
    res_y: u32,
    size_x: f32,
    size_y: f32,
    distance: f32,
}

impl ViewPlane {
    pub fn new(res_x: u32, res_y: u32, size_x: f32, size_y: f32, distance: f32) -> Self {
        Self {
            res_x,
            res_y,
            size_x,
            size_y,
            distance,
        }
    }

    /// Frames a 4x4 backdrop 15 units away onto a plane 5 units away.
    pub fn standard(res_x: u32, res_y: u32) -> Self {
        let size = BACKGROUND_SIZE * PLANE_DISTANCE / BACKGROUND_DISTANCE;
        Self::new(res_x, res_y, size, size, PLANE_DISTANCE)
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.res_x, self.res_y)
    }

    /// Plane coordinates of the point `(dx, dy)` inside pixel `(x, y)`,
    /// where `(0.5, 0.5)` is the pixel center.
    fn plane_point(&self, x: u32, y: u32, dx: f32, dy: f32) -> (f32, f32) {
        let px = (x as f32 + dx) / self.res_x as f32 * self.size_x - self.size_x * 0.5;
        let py = self.size_y * 0.5 - (y as f32 + dy) / self.res_y as f32 * self.size_y;
        (px, py)
    }

    fn radiance(&self, scene: &Scene, x: u32, y: u32, dx: f32, dy: f32) -> Color {
        let (px, py) = self.plane_point(x, y, dx, dy);
        trace(scene, &scene.camera().ray(px, py, self.distance))
    }
}

impl PixelSampler<Scene> for ViewPlane {
    fn sample(&self, scene: &Scene, x: u32, y: u32, samples: u32) -> Result<Color, SampleError> {
        if x >= self.res_x || y >= self.res_y {
            return Err(SampleError::new(format!(
                "pixel ({x}, {y}) is outside the {}x{} view plane",
                self.res_x, self.res_y
            )));
        }

        let color = if samples <= 1 {
            self.radiance(scene, x, y, 0.5, 0.5)
        } else {
            let mut sum = Color::BLACK;
            for sample in 0..samples {
                let mut rng = Rng::new(hash_seed(x, y, sample));
                sum += self.radiance(scene, x, y, rng.next_f32(), rng.next_f32());
            }
            sum / samples as f32
        };

        if !color.is_finite() {
            return Err(SampleError::new(format!(
                "non-finite radiance at pixel ({x}, {y})"
            )));
        }
        Ok(color)
    }
}

fn hash_seed(x: u32, y: u32, sample: u32) -> u64 {
    let mut v = ((x as u64) << 40) ^ ((y as u64) << 16) ^ sample as u64;
    v = v.wrapping_add(0x9e3779b97f4a7c15);
    v = (v ^ (v >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    v = (v ^ (v >> 27)).wrapping_mul(0x94d049bb133111eb);
    v ^ (v >> 31)
}

/// Per-pixel LCG; seeded from pixel coordinates so jitter does not depend on
/// which worker owns the pixel.
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0xdeadbeefcafebabe } else { seed };
        Self { state }
    }

    fn next_f32(&mut self) -> f32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        // 24 bits keep the value strictly below 1.0.
        ((self.state >> 40) as u32) as f32 / (1u32 << 24) as f32
    }
}
