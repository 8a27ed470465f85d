//! Structure-of-arrays sphere mirror for batched intersection.
//!
//! Sphere fields are split into parallel arrays padded to a multiple of
//! [`LANE_WIDTH`], and four spheres are tested per step with glam's
//! `DVec4`. The answer (winning sphere and `t`) matches the scalar scan
//! in [`World::hit_scalar`](crate::World::hit_scalar); the normal and face
//! are only computed once, for the winner.

use crate::{hittable::HitRecord, Sphere};
use glam::{BVec4, DVec4, IVec4};
use lumen_math::{Interval, Point3, Ray};

/// Spheres tested per batch step.
pub const LANE_WIDTH: usize = 4;

/// Padding lanes sit here with zero radius, far outside any sane scene.
const PADDING_CENTER: f64 = 1e30;

const LANE_OFFSETS: IVec4 = IVec4::new(0, 1, 2, 3);

/// Round `count` up to the next multiple of `factor`.
fn round_up(count: usize, factor: usize) -> usize {
    count.div_ceil(factor) * factor
}

#[inline]
fn sqrt4(v: DVec4) -> DVec4 {
    DVec4::new(v.x.sqrt(), v.y.sqrt(), v.z.sqrt(), v.w.sqrt())
}

/// Padded SoA copy of a sphere list.
///
/// A derived cache: rebuilt from the canonical sphere list whenever the
/// scene changes, never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereLanes {
    center_x: Vec<f64>,
    center_y: Vec<f64>,
    center_z: Vec<f64>,
    squared_radius: Vec<f64>,
    inverse_radius: Vec<f64>,
    material: Vec<usize>,
    count: usize,
}

impl SphereLanes {
    /// Mirror `spheres` into padded lane arrays.
    pub fn build(spheres: &[Sphere]) -> Self {
        let padded = round_up(spheres.len(), LANE_WIDTH);

        let mut lanes = Self {
            center_x: vec![PADDING_CENTER; padded],
            center_y: vec![PADDING_CENTER; padded],
            center_z: vec![PADDING_CENTER; padded],
            squared_radius: vec![0.0; padded],
            inverse_radius: vec![0.0; padded],
            material: vec![0; padded],
            count: spheres.len(),
        };

        for (i, sphere) in spheres.iter().enumerate() {
            lanes.center_x[i] = sphere.center.x;
            lanes.center_y[i] = sphere.center.y;
            lanes.center_z[i] = sphere.center.z;
            lanes.squared_radius[i] = sphere.radius * sphere.radius;
            lanes.inverse_radius[i] = 1.0 / sphere.radius;
            lanes.material[i] = sphere.material;
        }

        lanes
    }

    /// Number of real (non-padding) spheres.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True if no spheres are mirrored.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Array length including padding lanes.
    pub fn padded_len(&self) -> usize {
        self.center_x.len()
    }

    /// Index and parametric distance of the closest sphere hit inside `ray_t`.
    pub fn closest(&self, ray: &Ray, ray_t: Interval) -> Option<(usize, f64)> {
        if self.is_empty() {
            return None;
        }

        let origin = ray.origin();
        let dir = ray.direction();
        let (ox, oy, oz) = (DVec4::splat(origin.x), DVec4::splat(origin.y), DVec4::splat(origin.z));
        let (dx, dy, dz) = (DVec4::splat(dir.x), DVec4::splat(dir.y), DVec4::splat(dir.z));
        let a = DVec4::splat(dir.length_squared());
        let t_min = DVec4::splat(ray_t.min);

        // Each lane keeps its own running bound; the global minimum is
        // taken once at the end.
        let mut best_t = DVec4::splat(ray_t.max);
        let mut best_index = IVec4::splat(-1);

        for base in (0..self.padded_len()).step_by(LANE_WIDTH) {
            let end = base + LANE_WIDTH;
            let ocx = ox - DVec4::from_slice(&self.center_x[base..end]);
            let ocy = oy - DVec4::from_slice(&self.center_y[base..end]);
            let ocz = oz - DVec4::from_slice(&self.center_z[base..end]);

            let half_b = ocx * dx + ocy * dy + ocz * dz;
            let squared_radius = DVec4::from_slice(&self.squared_radius[base..end]);
            let c = (ocx * ocx + ocy * ocy + ocz * ocz) - squared_radius;
            let discriminant = half_b * half_b - a * c;

            let has_roots = discriminant.cmpge(DVec4::ZERO);
            if !has_roots.any() {
                continue;
            }
            let sqrtd = sqrt4(DVec4::select(has_roots, discriminant, DVec4::ZERO));

            let near = (-half_b - sqrtd) / a;
            let far = (-half_b + sqrtd) / a;
            let near_ok = has_roots & in_range(near, t_min, best_t);
            let far_ok = has_roots & in_range(far, t_min, best_t);

            let accept = near_ok | far_ok;
            let t = DVec4::select(near_ok, near, far);
            best_t = DVec4::select(accept, t, best_t);
            let lane_index = IVec4::splat(base as i32) + LANE_OFFSETS;
            best_index = IVec4::select(accept, lane_index, best_index);
        }

        let ts = best_t.to_array();
        let indices = best_index.to_array();
        let mut winner: Option<(usize, f64)> = None;
        for (&index, &t) in indices.iter().zip(ts.iter()) {
            // Padding lanes and empty lanes never win
            if index < 0 || index as usize >= self.count {
                continue;
            }
            let index = index as usize;
            // Equal t resolves to the later sphere, as the scalar scan does
            let better = match winner {
                None => true,
                Some((best, best_t)) => t < best_t || (t == best_t && index > best),
            };
            if better {
                winner = Some((index, t));
            }
        }
        winner
    }

    /// Closest hit with the full record built from the winning sphere.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.closest(ray, ray_t).map(|(index, t)| self.record(ray, index, t))
    }

    /// Hit record for sphere `index` at parameter `t`.
    fn record(&self, ray: &Ray, index: usize, t: f64) -> HitRecord {
        let center = Point3::new(self.center_x[index], self.center_y[index], self.center_z[index]);
        let outward_normal = (ray.at(t) - center) * self.inverse_radius[index];
        HitRecord::new(ray, t, outward_normal, self.material[index])
    }
}

/// Lane mask for `t_min <= t <= t_max`.
#[inline]
fn in_range(t: DVec4, t_min: DVec4, t_max: DVec4) -> BVec4 {
    t.cmpge(t_min) & t.cmple(t_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Vec3;

    fn spheres(count: usize) -> Vec<Sphere> {
        (0..count)
            .map(|i| Sphere::new(Vec3::new(i as f64 * 3.0, 0.0, -5.0), 1.0, i % 2))
            .collect()
    }

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(0, 4), 0);
        assert_eq!(round_up(1, 4), 4);
        assert_eq!(round_up(4, 4), 4);
        assert_eq!(round_up(5, 4), 8);
    }

    #[test]
    fn test_padding_layout() {
        let lanes = SphereLanes::build(&spheres(5));
        assert_eq!(lanes.len(), 5);
        assert_eq!(lanes.padded_len(), 8);

        for i in 5..8 {
            assert_eq!(lanes.squared_radius[i], 0.0);
            assert_eq!(lanes.inverse_radius[i], 0.0);
            assert_eq!(lanes.center_x[i], PADDING_CENTER);
        }
        assert_eq!(lanes.inverse_radius[0], 1.0);
    }

    #[test]
    fn test_empty_lanes_never_hit() {
        let lanes = SphereLanes::build(&[]);
        assert!(lanes.is_empty());
        assert_eq!(lanes.padded_len(), 0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        assert!(lanes.closest(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_padding_lane_is_never_selected() {
        // Aim straight at the padding center, with an unbounded range
        let lanes = SphereLanes::build(&spheres(1));
        let ray = Ray::new(Vec3::ZERO, Vec3::splat(1.0));
        assert!(lanes.closest(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_closest_picks_nearest_across_chunks() {
        // Nearest sphere lives in the second chunk
        let mut list = spheres(6);
        list[5] = Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, 7);
        let lanes = SphereLanes::build(&list);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let (index, t) = lanes.closest(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert_eq!(index, 5);
        assert!((t - 1.5).abs() < 1e-12);

        let rec = lanes.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert_eq!(rec.material, 7);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_far_root_when_inside() {
        let lanes = SphereLanes::build(&[Sphere::new(Vec3::ZERO, 2.0, 0)]);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);

        let rec = lanes.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-12);
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::Y).length() < 1e-12);
    }
}
