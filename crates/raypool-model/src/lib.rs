//! Scene description shared by the CLI and the reference sampler.

use serde::{Deserialize, Serialize};

pub const SCENE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneFile {
    pub version: u32,
    #[serde(default)]
    pub background: [f32; 3],
    #[serde(default)]
    pub ambient: [f32; 3],
    #[serde(default = "default_recursion_limit")]
    pub recursion_limit: u32,
    pub camera: CameraDesc,
    #[serde(default)]
    pub spheres: Vec<SphereDesc>,
    #[serde(default)]
    pub lights: Vec<LightDesc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraDesc {
    pub eye: [f32; 3],
    pub look_at: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SphereDesc {
    pub center: [f32; 3],
    pub radius: f32,
    pub material: MaterialDesc,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialDesc {
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    #[serde(default)]
    pub transparency: f32,
    #[serde(default = "default_refraction_index")]
    pub refraction_index: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LightDesc {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

fn default_recursion_limit() -> u32 {
    20
}

fn default_refraction_index() -> f32 {
    1.0
}

impl MaterialDesc {
    pub fn new(diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            diffuse,
            specular,
            shininess,
            transparency: 0.0,
            refraction_index: default_refraction_index(),
        }
    }

    /// Diffuse `color` scaled by `kd`, gray specular `ks`.
    pub fn tinted(color: [f32; 3], kd: f32, ks: f32) -> Self {
        Self::new(color.map(|c| c * kd), [ks; 3], 1.0)
    }

    pub fn transparent(mut self, transparency: f32, refraction_index: f32) -> Self {
        self.transparency = transparency;
        self.refraction_index = refraction_index;
        self
    }
}

impl SceneFile {
    /// Seven spheres lit by three point lights, seen from `(0, 0, -20)`.
    pub fn builtin() -> Self {
        let red = [1.0, 0.2, 0.2];
        let blue = [0.2, 0.2, 1.0];
        let green = [0.2, 1.0, 0.2];
        let white = [0.8, 0.8, 0.8];
        let yellow = [1.0, 1.0, 0.2];

        let metallic_red = MaterialDesc::new(red, white, 50.0);
        let mirror_black = MaterialDesc::new([0.0; 3], [0.9; 3], 1000.0);
        let matte_white = MaterialDesc::new([0.7; 3], [0.3; 3], 1.0);
        let metallic_yellow = MaterialDesc::new(yellow, white, 250.0);
        let transparent_green = MaterialDesc::tinted(green, 0.8, 0.2).transparent(1.0, 1.03);
        let transparent_blue = MaterialDesc::tinted(blue, 0.4, 0.6).transparent(0.9, 0.7);

        let sphere = |center: [f32; 3], radius: f32, material: &MaterialDesc| SphereDesc {
            center,
            radius,
            material: material.clone(),
        };

        Self {
            version: SCENE_VERSION,
            background: [0.05, 0.05, 0.08],
            ambient: [0.1, 0.1, 0.1],
            recursion_limit: 20,
            camera: CameraDesc {
                eye: [0.0, 0.0, -20.0],
                look_at: [0.0, 0.0, 0.0],
            },
            spheres: vec![
                sphere([0.0, -2.0, 7.0], 1.0, &transparent_blue),
                sphere([-3.0, 2.0, 11.0], 2.0, &metallic_red),
                sphere([0.0, 2.0, 8.0], 1.0, &mirror_black),
                sphere([1.5, -0.5, 7.0], 1.0, &transparent_green),
                sphere([-2.0, -1.0, 6.0], 0.7, &metallic_yellow),
                sphere([2.2, 0.5, 9.0], 1.2, &matte_white),
                sphere([4.0, -1.0, 10.0], 0.7, &metallic_red),
            ],
            lights: vec![
                LightDesc {
                    position: [-15.0, 0.0, -15.0],
                    color: white,
                },
                LightDesc {
                    position: [1.0, 1.0, 0.0],
                    color: blue,
                },
                LightDesc {
                    position: [0.0, -10.0, 6.0],
                    color: red,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scene_round_trip_is_stable() {
        let scene = SceneFile::builtin();

        let json = serde_json::to_string_pretty(&scene).unwrap();
        let decoded: SceneFile = serde_json::from_str(&json).unwrap();
        let json2 = serde_json::to_string_pretty(&decoded).unwrap();

        assert_eq!(scene, decoded);
        assert_eq!(json, json2);
    }

    #[test]
    fn optional_fields_take_defaults() {
        let json = r#"{
            "version": 1,
            "camera": { "eye": [0, 0, -5], "look_at": [0, 0, 0] },
            "spheres": [
                { "center": [0, 0, 0], "radius": 1,
                  "material": { "diffuse": [1, 0, 0], "specular": [0, 0, 0], "shininess": 8 } }
            ]
        }"#;

        let scene: SceneFile = serde_json::from_str(json).unwrap();
        assert_eq!(scene.background, [0.0; 3]);
        assert_eq!(scene.recursion_limit, 20);
        assert!(scene.lights.is_empty());
        assert_eq!(scene.spheres[0].material.transparency, 0.0);
        assert_eq!(scene.spheres[0].material.refraction_index, 1.0);
    }

    #[test]
    fn builtin_scene_has_transparent_spheres() {
        let scene = SceneFile::builtin();
        assert_eq!(scene.spheres.len(), 7);
        assert_eq!(scene.lights.len(), 3);
        let transparent = scene
            .spheres
            .iter()
            .filter(|sphere| sphere.material.transparency > 0.0)
            .count();
        assert_eq!(transparent, 2);
    }
}
