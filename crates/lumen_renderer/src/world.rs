//! Scene container: spheres, material palette and the cached SoA mirror.

use std::path::Path;
use std::sync::OnceLock;

use lumen_math::{Interval, Ray};
use serde::{Deserialize, Serialize};

use crate::{hittable::HitRecord, ConfigError, Material, SceneError, Sphere, SphereLanes};

/// Which intersection representation the integrator queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intersection {
    /// One sphere at a time over the canonical list.
    Scalar,
    /// Four spheres at a time over the SoA mirror.
    #[default]
    Batch,
}

/// Plain-data scene input, e.g. loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub spheres: Vec<Sphere>,
}

/// Spheres plus the read-only material palette they index into.
///
/// Read-only during a render and shared freely between workers.
#[derive(Debug, Clone, Default)]
pub struct World {
    spheres: Vec<Sphere>,
    materials: Vec<Material>,
    lanes: OnceLock<SphereLanes>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and validate a world from a description.
    ///
    /// Materials are checked as well as spheres, since deserialized values
    /// bypass the clamping done by the `Material` constructors.
    pub fn from_description(description: &SceneDescription) -> Result<Self, SceneError> {
        let mut world = World::new();
        for (index, material) in description.materials.iter().enumerate() {
            material.validate(index)?;
            world.add_material(*material);
        }
        for sphere in &description.spheres {
            world.add_sphere(*sphere)?;
        }
        Ok(world)
    }

    /// Parse a JSON scene description.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let description: SceneDescription = serde_json::from_str(json)?;
        Ok(World::from_description(&description)?)
    }

    /// Load a JSON scene description from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        World::from_json_str(&json)
    }

    /// Snapshot of the scene as plain data.
    pub fn to_description(&self) -> SceneDescription {
        SceneDescription {
            materials: self.materials.clone(),
            spheres: self.spheres.clone(),
        }
    }

    /// Append a material and return its stable palette index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Add a sphere and return its index.
    ///
    /// Rejects non-positive or non-finite radii and references to
    /// materials that are not in the palette yet.
    pub fn add_sphere(&mut self, sphere: Sphere) -> Result<usize, SceneError> {
        let index = self.spheres.len();
        if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
            return Err(SceneError::InvalidRadius {
                index,
                radius: sphere.radius,
            });
        }
        if sphere.material >= self.materials.len() {
            return Err(SceneError::UnknownMaterial {
                index,
                material: sphere.material,
            });
        }

        self.spheres.push(sphere);
        self.invalidate_lanes();
        Ok(index)
    }

    /// Remove all spheres. The material palette is kept.
    pub fn clear(&mut self) {
        self.spheres.clear();
        self.invalidate_lanes();
    }

    fn invalidate_lanes(&mut self) {
        self.lanes.take();
    }

    /// Canonical sphere list.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Material palette.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Material at palette `index`.
    ///
    /// Panics if out of range; sphere indices are validated on insertion.
    #[inline]
    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }

    /// Number of spheres.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// True if there are no spheres.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// SoA mirror, built on first use after a change.
    pub fn lanes(&self) -> &SphereLanes {
        self.lanes.get_or_init(|| {
            log::debug!("Building SoA mirror for {} spheres", self.spheres.len());
            SphereLanes::build(&self.spheres)
        })
    }

    /// Build derived data up front so workers never race to do it.
    pub fn prepare(&self) {
        self.lanes();
    }

    /// Closest hit by linear scan over the sphere list.
    ///
    /// Every accepted hit pulls the upper bound in, so later spheres are
    /// tested against a tighter range and scan order does not matter.
    pub fn hit_scalar(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<(&Sphere, f64)> = None;
        let mut closest_so_far = ray_t.max;

        for sphere in &self.spheres {
            if let Some(t) = sphere.intersect(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = t;
                closest = Some((sphere, t));
            }
        }

        closest.map(|(sphere, t)| sphere.hit_record(ray, t))
    }

    /// Closest hit using the SoA mirror.
    pub fn hit_batch(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.lanes().hit(ray, ray_t)
    }

    /// Closest hit using the requested representation.
    #[inline]
    pub fn hit_with(&self, mode: Intersection, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match mode {
            Intersection::Scalar => self.hit_scalar(ray, ray_t),
            Intersection::Batch => self.hit_batch(ray, ray_t),
        }
    }
}
