//! Hit records shared by the scalar and batched intersection paths.

use lumen_math::{Point3, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Short-lived: produced by one intersection test and consumed by the
/// integrator straight away. Materials are referenced by palette index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Point3,
    /// Surface normal at intersection (always points against the ray, unit length)
    pub normal: Vec3,
    /// Index into the world's material palette
    pub material: usize,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl HitRecord {
    /// Build a record whose normal faces against `ray`.
    ///
    /// `outward_normal` must be unit length and point out of the surface.
    pub fn new(ray: &Ray, t: f64, outward_normal: Vec3, material: usize) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face { outward_normal } else { -outward_normal };
        Self {
            p: ray.at(t),
            normal,
            material,
            t,
            front_face,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_face_keeps_outward_normal() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, 3);

        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert_eq!(rec.p, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(rec.material, 3);
    }

    #[test]
    fn test_back_face_flips_normal() {
        // Ray leaving the surface from inside
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, 0);

        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);
    }
}
