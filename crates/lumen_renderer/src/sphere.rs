//! Sphere primitive for ray tracing.

use crate::hittable::HitRecord;
use lumen_math::{Interval, Point3, Ray};
use serde::{Deserialize, Serialize};

/// A sphere primitive referencing a material by palette index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f64,
    pub material: usize,
}

impl Sphere {
    /// Create a new sphere. `radius` is expected to be > 0; see
    /// [`World::add_sphere`](crate::World::add_sphere) for validation.
    pub fn new(center: Point3, radius: f64, material: usize) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Parametric distance of the nearest intersection inside `ray_t`.
    ///
    /// Solves `|origin + t*dir - center|^2 = radius^2` in half-b form. The
    /// near root is preferred; the far root is used when the near one falls
    /// outside the range (e.g. the ray starts inside the sphere).
    #[inline]
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f64> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let half_b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }
        Some(root)
    }

    /// Full hit record for a ray known to hit this sphere at `t`.
    #[inline]
    pub fn hit_record(&self, ray: &Ray, t: f64) -> HitRecord {
        let outward_normal = (ray.at(t) - self.center) / self.radius;
        HitRecord::new(ray, t, outward_normal, self.material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Vec3;

    fn hit(sphere: &Sphere, ray: &Ray) -> Option<HitRecord> {
        sphere
            .intersect(ray, Interval::new(0.001, f64::INFINITY))
            .map(|t| sphere.hit_record(ray, t))
    }

    fn unit_sphere_ahead() -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, 0)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = unit_sphere_ahead();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = hit(&sphere, &ray).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-12);
        assert!(rec.front_face);
        assert!(rec.normal.dot(rec.p - sphere.center) > 0.0);
        assert!((rec.normal.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_hit_oblique_analytic() {
        // Offset ray: x = 0.3 gives t0 = 1 - sqrt(0.25 - 0.09) = 0.6
        let sphere = unit_sphere_ahead();
        let ray = Ray::new(Vec3::new(0.3, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = hit(&sphere, &ray).unwrap();
        assert!((rec.t - 0.6).abs() < 1e-12);
        assert!(rec.normal.dot(rec.p - sphere.center) > 0.0);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = unit_sphere_ahead();

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(hit(&sphere, &ray).is_none());
    }

    #[test]
    fn test_sphere_far_root_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, 1);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let rec = hit(&sphere, &ray).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-12);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::X);
        assert_eq!(rec.material, 1);
    }

    #[test]
    fn test_sphere_respects_t_max() {
        let sphere = unit_sphere_ahead();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert!(sphere.intersect(&ray, Interval::new(0.001, 0.4)).is_none());
        // Near root out of range, far root inside
        let t = sphere.intersect(&ray, Interval::new(0.7, 2.0)).unwrap();
        assert!((t - 1.5).abs() < 1e-12);
    }
}
