//! Surface scattering models.
//!
//! A closed set of variants stored by value in the world's palette and
//! matched explicitly, so the palette is one contiguous array and a
//! scatter call involves no indirection.

use crate::{hittable::HitRecord, RandomSeries, SceneError};
use lumen_math::{near_zero, reflect, refract, unit_vector, Color, Ray};
use serde::{Deserialize, Serialize};

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-channel throughput of the bounce
    pub attenuation: Color,
    /// Continuation ray, starting at the hit point
    pub scattered: Ray,
}

/// How light interacts with a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Material {
    /// Ideal diffuse reflector.
    Lambertian { albedo: Color },
    /// Mirror with optional roughness; `fuzz` 0.0 is a perfect mirror.
    Metal { albedo: Color, fuzz: f64 },
    /// Clear refractive material such as glass (`ior` 1.5) or water (1.33).
    Dielectric { ior: f64 },
}

impl Material {
    /// Diffuse material with the given albedo color.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian { albedo }
    }

    /// Metal material. `fuzz` is clamped to [0, 1].
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Dielectric with the given index of refraction.
    pub fn dielectric(ior: f64) -> Self {
        Material::Dielectric { ior }
    }

    /// Check parameters that did not come through the constructors, e.g.
    /// from a scene file. `index` is the palette slot, used in the error.
    pub fn validate(&self, index: usize) -> Result<(), SceneError> {
        let invalid = |reason: String| -> Result<(), SceneError> {
            Err(SceneError::InvalidMaterial { index, reason })
        };

        match *self {
            Material::Lambertian { albedo } | Material::Metal { albedo, .. }
                if !albedo.is_finite() =>
            {
                invalid(format!("albedo must be finite, got {albedo:?}"))
            }
            Material::Metal { fuzz, .. } if !(0.0..=1.0).contains(&fuzz) => {
                invalid(format!("fuzz must be in [0, 1], got {fuzz}"))
            }
            Material::Dielectric { ior } if !(ior > 0.0 && ior.is_finite()) => {
                invalid(format!("ior must be finite and > 0, got {ior}"))
            }
            _ => Ok(()),
        }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed. Only metal can absorb.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        series: &mut RandomSeries,
    ) -> Option<ScatterResult> {
        match *self {
            Material::Lambertian { albedo } => {
                let mut scatter_direction = rec.normal + series.unit_vector();

                // Catch degenerate scatter direction
                if near_zero(scatter_direction) {
                    scatter_direction = rec.normal;
                }

                Some(ScatterResult {
                    attenuation: albedo,
                    scattered: Ray::new(rec.p, scatter_direction),
                })
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(unit_vector(ray_in.direction()), rec.normal);
                let direction = if fuzz > 0.0 {
                    reflected + fuzz * series.in_unit_sphere()
                } else {
                    reflected
                };

                // Reflections that dip below the surface are absorbed
                if direction.dot(rec.normal) > 0.0 {
                    Some(ScatterResult {
                        attenuation: albedo,
                        scattered: Ray::new(rec.p, direction),
                    })
                } else {
                    None
                }
            }
            Material::Dielectric { ior } => {
                let refraction_ratio = if rec.front_face { 1.0 / ior } else { ior };

                let unit_direction = unit_vector(ray_in.direction());
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                let cannot_refract = refraction_ratio * sin_theta > 1.0;
                let direction = if cannot_refract
                    || reflectance(cos_theta, refraction_ratio) > series.uniform()
                {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, refraction_ratio)
                };

                Some(ScatterResult {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction),
                })
            }
        }
    }
}

/// Schlick's approximation of Fresnel reflectance.
///
/// An index-matched boundary (`ratio == 1`) is invisible and reflects nothing.
fn reflectance(cosine: f64, ratio: f64) -> f64 {
    if ratio == 1.0 {
        return 0.0;
    }
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
