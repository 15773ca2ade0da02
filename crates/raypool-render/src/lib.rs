//! Reference Whitted-style sampler for sphere scenes and image output.

pub mod math;
pub mod camera;
pub mod material;
pub mod geometry;
pub mod scene;
pub mod tracer;
pub mod view_plane;
pub mod image_out;

pub use image_out::{save_image, to_rgb_image};
pub use scene::{Scene, SceneError};
pub use view_plane::ViewPlane;
