use crate::math::{Ray, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub t: f32,
    pub point: Vec3,
    /// Outward surface normal.
    pub normal: Vec3,
    pub material: usize,
}

#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: usize,
}

impl Sphere {
    pub fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let half_b = oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();

        let mut root = (-half_b - sqrt_d) / a;
        if root < t_min || root > t_max {
            root = (-half_b + sqrt_d) / a;
            if root < t_min || root > t_max {
                return None;
            }
        }

        let point = ray.at(root);
        Some(Hit {
            t: root,
            point,
            normal: (point - self.center) / self.radius,
            material: self.material,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere {
            center: Vec3::new(0.0, 0.0, 5.0),
            radius: 1.0,
            material: 0,
        }
    }

    #[test]
    fn ray_hits_near_side_first() {
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, 1.0));
        let hit = unit_sphere().hit(&ray, 0.001, f32::INFINITY).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn ray_from_inside_hits_far_side() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = unit_sphere().hit(&ray, 0.001, f32::INFINITY).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ray_can_miss() {
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));
        assert!(unit_sphere().hit(&ray, 0.001, f32::INFINITY).is_none());
    }
}
