use crate::camera::Camera;
use crate::geometry::{Hit, Sphere};
use crate::material::Material;
use crate::math::{Ray, Vec3};
use raypool_core::Color;
use raypool_model::{SceneFile, SCENE_VERSION};
use thiserror::Error;
use tracing::debug;

/// Deepest bounce chain a scene may request. Each bounce is a stack frame on
/// the render worker thread.
pub const MAX_RECURSION_LIMIT: u32 = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("unsupported scene version {found}, expected {}", SCENE_VERSION)]
    Version { found: u32 },

    #[error("sphere {index}: radius must be positive and finite, got {radius}")]
    Radius { index: usize, radius: f32 },

    #[error("sphere {index}: {message}")]
    Material { index: usize, message: String },

    #[error("camera eye and look_at must be distinct finite points")]
    Camera,

    #[error("recursion_limit {limit} exceeds the maximum of {}", MAX_RECURSION_LIMIT)]
    RecursionLimit { limit: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
}

/// Validated, read-only scene shared by every render worker.
#[derive(Debug, Clone)]
pub struct Scene {
    spheres: Vec<Sphere>,
    materials: Vec<Material>,
    lights: Vec<PointLight>,
    background: Color,
    ambient: Color,
    recursion_limit: u32,
    camera: Camera,
}

impl Scene {
    pub fn from_file(file: &SceneFile) -> Result<Self, SceneError> {
        if file.version != SCENE_VERSION {
            return Err(SceneError::Version {
                found: file.version,
            });
        }
        if file.recursion_limit > MAX_RECURSION_LIMIT {
            return Err(SceneError::RecursionLimit {
                limit: file.recursion_limit,
            });
        }

        let mut spheres = Vec::with_capacity(file.spheres.len());
        let mut materials = Vec::with_capacity(file.spheres.len());
        for (index, desc) in file.spheres.iter().enumerate() {
            if !(desc.radius.is_finite() && desc.radius > 0.0) {
                return Err(SceneError::Radius {
                    index,
                    radius: desc.radius,
                });
            }
            let material = Material::from(&desc.material);
            check_material(&material).map_err(|message| SceneError::Material {
                index,
                message: message.to_string(),
            })?;

            materials.push(material);
            spheres.push(Sphere {
                center: Vec3::from_array(desc.center),
                radius: desc.radius,
                material: index,
            });
        }

        let lights = file
            .lights
            .iter()
            .map(|light| PointLight {
                position: Vec3::from_array(light.position),
                color: Color::from_array(light.color),
            })
            .collect::<Vec<_>>();

        let camera = Camera::look_at(
            Vec3::from_array(file.camera.eye),
            Vec3::from_array(file.camera.look_at),
        )
        .ok_or(SceneError::Camera)?;

        debug!(
            spheres = spheres.len(),
            lights = lights.len(),
            recursion_limit = file.recursion_limit,
            "scene loaded"
        );

        Ok(Self {
            spheres,
            materials,
            lights,
            background: Color::from_array(file.background),
            ambient: Color::from_array(file.ambient),
            recursion_limit: file.recursion_limit,
            camera,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn ambient(&self) -> Color {
        self.ambient
    }

    pub fn recursion_limit(&self) -> u32 {
        self.recursion_limit
    }

    pub fn closest_hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        let mut closest = None;
        let mut closest_t = t_max;
        for sphere in &self.spheres {
            if let Some(hit) = sphere.hit(ray, t_min, closest_t) {
                closest_t = hit.t;
                closest = Some(hit);
            }
        }
        closest
    }

    /// True when anything lies on the ray closer than `distance`.
    pub fn occluded(&self, ray: &Ray, t_min: f32, distance: f32) -> bool {
        self.spheres
            .iter()
            .any(|sphere| sphere.hit(ray, t_min, distance).is_some())
    }
}

fn check_material(material: &Material) -> Result<(), &'static str> {
    if !(material.diffuse.is_finite() && material.specular.is_finite()) {
        return Err("material colors must be finite");
    }
    if !(material.shininess.is_finite() && material.shininess >= 0.0) {
        return Err("shininess must be a non-negative number");
    }
    if !(0.0..=1.0).contains(&material.transparency) {
        return Err("transparency must lie in [0, 1]");
    }
    if !(material.refraction_index.is_finite() && material.refraction_index > 0.0) {
        return Err("refraction_index must be positive");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use raypool_model::{MaterialDesc, SphereDesc};

    fn builtin() -> Scene {
        Scene::from_file(&SceneFile::builtin()).unwrap()
    }

    #[test]
    fn builtin_scene_is_valid() {
        let scene = builtin();
        assert_eq!(scene.lights().len(), 3);
        assert_eq!(scene.recursion_limit(), 20);
    }

    #[test]
    fn rejects_unknown_version() {
        let mut file = SceneFile::builtin();
        file.version = 7;
        assert_eq!(
            Scene::from_file(&file).unwrap_err(),
            SceneError::Version { found: 7 }
        );
    }

    #[test]
    fn rejects_non_positive_radius() {
        let mut file = SceneFile::builtin();
        file.spheres[2].radius = 0.0;
        assert!(matches!(
            Scene::from_file(&file),
            Err(SceneError::Radius { index: 2, .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_transparency() {
        let mut file = SceneFile::builtin();
        file.spheres.push(SphereDesc {
            center: [0.0, 0.0, 0.0],
            radius: 1.0,
            material: MaterialDesc::new([1.0; 3], [0.0; 3], 1.0).transparent(1.5, 1.0),
        });
        let err = Scene::from_file(&file).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sphere 7: transparency must lie in [0, 1]"
        );
    }

    #[test]
    fn rejects_degenerate_camera() {
        let mut file = SceneFile::builtin();
        file.camera.look_at = file.camera.eye;
        assert_eq!(Scene::from_file(&file).unwrap_err(), SceneError::Camera);
    }

    #[test]
    fn rejects_recursion_limit_above_the_maximum() {
        let mut file = SceneFile::builtin();
        file.recursion_limit = MAX_RECURSION_LIMIT;
        assert!(Scene::from_file(&file).is_ok());

        file.recursion_limit = MAX_RECURSION_LIMIT + 1;
        assert_eq!(
            Scene::from_file(&file).unwrap_err(),
            SceneError::RecursionLimit {
                limit: MAX_RECURSION_LIMIT + 1
            }
        );
    }

    #[test]
    fn closest_hit_picks_the_nearest_sphere() {
        let scene = builtin();
        let ray = Ray::new(Vec3::new(0.0, 2.0, -20.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = scene.closest_hit(&ray, 0.001, f32::INFINITY).unwrap();
        // The mirror sphere centered at (0, 2, 8).
        assert!((hit.t - 27.0).abs() < 1e-3);
        assert!(scene.material(hit.material).is_reflective());
    }
}
