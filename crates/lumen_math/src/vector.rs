//! Vector helpers on top of glam's `DVec3`.
//!
//! Points, directions and colors all share one representation. glam
//! supplies the arithmetic (add/sub/scale, component-wise multiply, dot,
//! cross, length); this module adds the handful of operations the
//! scattering code needs with exact, documented semantics.

use glam::DVec3;

/// Direction or offset in 3D space.
pub type Vec3 = DVec3;

/// Position in 3D space.
pub type Point3 = DVec3;

/// Linear RGB color. Components are conventionally in [0, 1] after tonemapping.
pub type Color = DVec3;

/// Per-component threshold below which a vector counts as degenerate.
pub const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Normalize `v`.
///
/// Undefined for zero-length input: the result is non-finite. Callers that
/// may see a degenerate vector must check [`near_zero`] first.
#[inline]
pub fn unit_vector(v: Vec3) -> Vec3 {
    v / v.length()
}

/// True when every component's magnitude is below [`NEAR_ZERO_EPSILON`].
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.x.abs() < NEAR_ZERO_EPSILON && v.y.abs() < NEAR_ZERO_EPSILON && v.z.abs() < NEAR_ZERO_EPSILON
}

/// Mirror `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices (incident over
/// transmitted). `n` must face against `uv`. Round-off can push the
/// parallel component's radicand slightly negative near grazing angles,
/// so it is clamped to zero.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).max(0.0).sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f64 = 1e-12;

    fn random_vec(rng: &mut StdRng) -> Vec3 {
        Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        )
    }

    #[test]
    fn test_unit_vector_has_unit_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_vec(&mut rng);
            if near_zero(v) {
                continue;
            }
            assert!((unit_vector(v).length() - 1.0).abs() < EPS);
        }

        // Tiny but non-degenerate inputs still normalize
        let tiny = Vec3::new(3e-7, 0.0, 4e-7);
        assert!((unit_vector(tiny).length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_unit_vector_of_zero_is_not_finite() {
        assert!(!unit_vector(Vec3::ZERO).is_finite());
    }

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::ZERO));
        assert!(near_zero(Vec3::new(1e-9, -1e-9, 5e-9)));

        // One large component is enough to be non-degenerate
        assert!(!near_zero(Vec3::new(1e-9, 1e-9, 1e-7)));
        assert!(!near_zero(Vec3::new(-2e-8, 0.0, 0.0)));
    }

    #[test]
    fn test_reflect_negates_normal_component() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let v = random_vec(&mut rng);
            let n = random_vec(&mut rng);
            if near_zero(n) {
                continue;
            }
            let n = unit_vector(n);
            let r = reflect(v, n);

            let scale = v.length().max(1.0);
            assert!((r.dot(n) + v.dot(n)).abs() < 1e-9 * scale);
            // Reflection preserves length
            assert!((r.length() - v.length()).abs() < 1e-9 * scale);
        }
    }

    #[test]
    fn test_reflect_axis_aligned() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_identity_ratio_passes_straight_through() {
        let uv = unit_vector(Vec3::new(0.3, -1.0, 0.2));
        let r = refract(uv, Vec3::Y, 1.0);
        assert!((r - uv).length() < 1e-12);
    }

    #[test]
    fn test_refract_obeys_snell() {
        let n = Vec3::Y;
        let uv = unit_vector(Vec3::new(1.0, -1.0, 0.0));
        let ratio = 1.0 / 1.5;
        let r = refract(uv, n, ratio);

        let sin_in = uv.cross(n).length();
        let sin_out = unit_vector(r).cross(n).length();
        assert!((sin_out - ratio * sin_in).abs() < 1e-12);
        // Transmitted ray keeps heading into the surface
        assert!(r.y < 0.0);
        assert!((r.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_refract_grazing_is_finite() {
        // Beyond the critical angle the radicand goes negative; the clamp keeps it finite
        let uv = unit_vector(Vec3::new(1.0, -1e-3, 0.0));
        let r = refract(uv, Vec3::Y, 1.5);
        assert!(r.is_finite());
    }
}
