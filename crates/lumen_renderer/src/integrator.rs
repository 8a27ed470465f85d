//! Radiance estimation along a single camera path.

use crate::{Intersection, RandomSeries, RenderStats, World};
use lumen_math::{unit_vector, Color, Interval, Ray};

/// Lower bound for hit distances. Keeps scattered rays from re-hitting the
/// surface they start on ("shadow acne").
pub const T_MIN: f64 = 0.001;

const SKY_WHITE: Color = Color::new(1.0, 1.0, 1.0);
const SKY_BLUE: Color = Color::new(0.5, 0.7, 1.0);

/// Vertical white-to-blue gradient seen by rays that escape the scene.
#[inline]
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = unit_vector(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * SKY_WHITE + a * SKY_BLUE
}

/// Compute the color seen by a ray.
///
/// Follows at most `max_depth` surface interactions, multiplying the
/// attenuation of each bounce into a running throughput. Returns black
/// when the path is absorbed or the depth budget runs out, so
/// `max_depth == 0` is always black.
pub fn ray_color(
    ray: &Ray,
    world: &World,
    max_depth: u32,
    mode: Intersection,
    series: &mut RandomSeries,
    stats: &mut RenderStats,
) -> Color {
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..max_depth {
        let Some(rec) = world.hit_with(mode, &ray, Interval::new(T_MIN, f64::INFINITY)) else {
            return throughput * sky_color(&ray);
        };

        match world.material(rec.material).scatter(&ray, &rec, series) {
            Some(result) => {
                stats.bounces += 1;
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            None => return Color::ZERO,
        }
    }

    Color::ZERO
}
