//! Thin-lens camera for ray generation.

use crate::{RandomSeries, RenderConfig};
use lumen_math::{unit_vector, Point3, Ray, Vec3};

/// Camera for generating rays into the scene.
///
/// Immutable once built. Film coordinates `(s, t)` run from the lower-left
/// corner `(0, 0)` of the focus-plane viewport to its upper-right `(1, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f64,
}

impl Camera {
    /// Build the view basis from a pose and lens description.
    ///
    /// - `vertical_fov_degrees`: full vertical field of view
    /// - `aperture`: lens diameter, 0.0 = pinhole
    /// - `focus_dist`: distance to the plane of perfect focus
    pub fn new(
        look_from: Point3,
        look_at: Point3,
        vup: Vec3,
        vertical_fov_degrees: f64,
        aspect_ratio: f64,
        aperture: f64,
        focus_dist: f64,
    ) -> Self {
        let theta = vertical_fov_degrees.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        let w = unit_vector(look_from - look_at);
        let u = unit_vector(vup.cross(w));
        let v = w.cross(u);

        let origin = look_from;
        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: aperture / 2.0,
        }
    }

    /// Build the camera described by a render configuration.
    ///
    /// The aspect ratio comes from the configured image size.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(
            config.lookfrom,
            config.lookat,
            config.vup,
            config.vertical_fov_degrees,
            config.aspect_ratio(),
            config.aperture,
            config.focus_distance,
        )
    }

    /// Generate a ray through film coordinates `(s, t)`.
    ///
    /// The origin is jittered across the lens disk for depth of field;
    /// every ray through the same `(s, t)` meets at the focus plane.
    pub fn get_ray(&self, series: &mut RandomSeries, s: f64, t: f64) -> Ray {
        let offset = self.lens_offset(series);
        let origin = self.origin + offset;
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin)
    }

    /// Sample a point on the lens disk, in world space relative to the origin.
    fn lens_offset(&self, series: &mut RandomSeries) -> Vec3 {
        if self.lens_radius <= 0.0 {
            return Vec3::ZERO;
        }
        let rd = self.lens_radius * series.in_unit_disk();
        self.u * rd.x + self.v * rd.y
    }

    /// Camera position.
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Orthonormal view basis `(u, v, w)`; `w` points backwards, away from the scene.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Lens radius (half the aperture).
    pub fn lens_radius(&self) -> f64 {
        self.lens_radius
    }
}
