use crate::material::Material;
use crate::math::{Ray, Vec3};
use crate::scene::Scene;
use raypool_core::Color;

const EPSILON: f32 = 1e-3;
/// Secondary rays whose contribution would fall below this are not traced.
const MIN_WEIGHT: f32 = 1e-3;

/// Radiance arriving along `ray`.
pub fn trace(scene: &Scene, ray: &Ray) -> Color {
    trace_depth(scene, ray, 0, 1.0)
}

fn trace_depth(scene: &Scene, ray: &Ray, depth: u32, weight: f32) -> Color {
    let Some(hit) = scene.closest_hit(ray, EPSILON, f32::INFINITY) else {
        return scene.background();
    };

    let material = scene.material(hit.material);
    let inside = ray.direction.dot(hit.normal) > 0.0;
    let normal = if inside { -hit.normal } else { hit.normal };

    let mut color = shade_local(scene, material, hit.point, normal, ray.direction);
    if depth >= scene.recursion_limit() {
        return color;
    }

    let mirror = || {
        let reflected = Ray::new(hit.point + normal * EPSILON, ray.direction.reflect(normal));
        trace_depth(scene, &reflected, depth + 1, weight * material.specular.max_channel())
    };

    if material.is_reflective() && weight * material.specular.max_channel() > MIN_WEIGHT {
        color += material.specular * mirror();
    }

    if material.is_transparent() && weight * material.transparency > MIN_WEIGHT {
        let eta = if inside {
            material.refraction_index
        } else {
            1.0 / material.refraction_index
        };
        let through = match ray.direction.refract(normal, eta) {
            Some(direction) => {
                let refracted = Ray::new(hit.point - normal * EPSILON, direction);
                trace_depth(scene, &refracted, depth + 1, weight * material.transparency)
            }
            None => mirror(),
        };
        color = color * (1.0 - material.transparency) + through * material.transparency;
    }

    color
}

/// Ambient term plus Lambert and Phong contributions of every unshadowed light.
fn shade_local(scene: &Scene, material: &Material, point: Vec3, normal: Vec3, view: Vec3) -> Color {
    let mut color = scene.ambient() * material.diffuse;
    let origin = point + normal * EPSILON;

    for light in scene.lights() {
        let to_light = light.position - point;
        let distance = to_light.length();
        if distance == 0.0 {
            continue;
        }
        let l = to_light / distance;
        let n_dot_l = normal.dot(l);
        if n_dot_l <= 0.0 || scene.occluded(&Ray::new(origin, l), EPSILON, distance) {
            continue;
        }

        color += light.color * material.diffuse * n_dot_l;

        let r_dot_v = (-l).reflect(normal).dot(-view);
        if r_dot_v > 0.0 {
            color += light.color * material.specular * r_dot_v.powf(material.shininess);
        }
    }

    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use raypool_model::{CameraDesc, LightDesc, MaterialDesc, SceneFile, SphereDesc};

    fn single_sphere(material: MaterialDesc, lights: Vec<LightDesc>) -> Scene {
        sphere_with_limit(material, lights, 1.0, 4)
    }

    fn sphere_with_limit(
        material: MaterialDesc,
        lights: Vec<LightDesc>,
        radius: f32,
        recursion_limit: u32,
    ) -> Scene {
        Scene::from_file(&SceneFile {
            version: 1,
            background: [0.1, 0.2, 0.3],
            ambient: [0.5, 0.5, 0.5],
            recursion_limit,
            camera: CameraDesc {
                eye: [0.0, 0.0, -10.0],
                look_at: [0.0, 0.0, 0.0],
            },
            spheres: vec![SphereDesc {
                center: [0.0, 0.0, 0.0],
                radius,
                material,
            }],
            lights,
        })
        .unwrap()
    }

    fn mirror() -> MaterialDesc {
        MaterialDesc::new([0.2; 3], [0.5; 3], 1.0)
    }

    #[test]
    fn miss_returns_background() {
        let scene = single_sphere(MaterialDesc::new([1.0; 3], [0.0; 3], 1.0), vec![]);
        let ray = Ray::new(Vec3::new(0.0, 5.0, -10.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(trace(&scene, &ray), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn unlit_matte_surface_shows_only_ambient() {
        let scene = single_sphere(MaterialDesc::new([0.8, 0.4, 0.2], [0.0; 3], 1.0), vec![]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0));
        let color = trace(&scene, &ray);
        assert!((color.r - 0.4).abs() < 1e-6);
        assert!((color.g - 0.2).abs() < 1e-6);
        assert!((color.b - 0.1).abs() < 1e-6);
    }

    #[test]
    fn light_in_front_brightens_the_surface() {
        let light = LightDesc {
            position: [0.0, 0.0, -10.0],
            color: [1.0; 3],
        };
        let lit = single_sphere(MaterialDesc::new([0.5; 3], [0.0; 3], 1.0), vec![light]);
        let behind = single_sphere(
            MaterialDesc::new([0.5; 3], [0.0; 3], 1.0),
            vec![LightDesc {
                position: [0.0, 0.0, 10.0],
                color: [1.0; 3],
            }],
        );
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(trace(&lit, &ray).r > trace(&behind, &ray).r);
    }

    #[test]
    fn clear_glass_shows_the_background_behind_it() {
        let glass = MaterialDesc::new([0.0; 3], [0.0; 3], 1.0).transparent(1.0, 1.0);
        let scene = single_sphere(glass, vec![]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0));
        let color = trace(&scene, &ray);
        assert!((color.r - 0.1).abs() < 1e-5);
        assert!((color.b - 0.3).abs() < 1e-5);
    }

    #[test]
    fn zero_recursion_limit_keeps_only_local_shading() {
        let scene = sphere_with_limit(mirror(), vec![], 1.0, 0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0));
        let color = trace(&scene, &ray);
        // ambient 0.5 * diffuse 0.2
        assert!((color.r - 0.1).abs() < 1e-6);
        assert!((color.g - 0.1).abs() < 1e-6);
        assert!((color.b - 0.1).abs() < 1e-6);
    }

    #[test]
    fn one_bounce_adds_a_single_reflection() {
        let scene = sphere_with_limit(mirror(), vec![], 1.0, 1);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0));
        let color = trace(&scene, &ray);
        // The reflected ray heads back toward the camera and misses.
        assert!((color.r - (0.1 + 0.5 * 0.1)).abs() < 1e-6);
        assert!((color.g - (0.1 + 0.5 * 0.2)).abs() < 1e-6);
        assert!((color.b - (0.1 + 0.5 * 0.3)).abs() < 1e-6);
    }

    #[test]
    fn bounces_inside_a_mirror_stop_at_the_limit() {
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, 1.0));
        for (limit, expected) in [(0, 0.1), (1, 0.15), (2, 0.175), (3, 0.1875)] {
            let scene = sphere_with_limit(mirror(), vec![], 5.0, limit);
            let color = trace(&scene, &ray);
            assert!(
                (color.r - expected).abs() < 1e-5,
                "limit {limit}: got {color:?}"
            );
        }
    }
}
