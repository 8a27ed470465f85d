//! Procedurally generated demo scenes.

use lumen_math::{Color, Point3, Vec3};

use crate::{Material, RandomSeries, RenderConfig, SceneError, Sphere, World};

/// The "book cover" scene: a huge ground sphere, a 22x22 grid of small
/// random spheres and three large feature spheres (glass, diffuse, metal).
///
/// Every small sphere gets its own palette entry. The layout is a pure
/// function of `series`.
pub fn cover_scene(series: &mut RandomSeries) -> Result<World, SceneError> {
    let mut world = World::new();

    let ground = world.add_material(Material::lambertian(Color::splat(0.5)));
    world.add_sphere(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground))?;

    // Keep the area around the big metal sphere clear
    let clearing = Point3::new(4.0, 0.2, 0.0);

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = series.uniform();
            let center = Point3::new(
                a as f64 + 0.9 * series.uniform(),
                0.2,
                b as f64 + 0.9 * series.uniform(),
            );
            if (center - clearing).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                Material::lambertian(series.vec3())
            } else if choose_mat < 0.95 {
                let albedo = series.vec3_range(0.5, 1.0);
                let fuzz = series.uniform_range(0.0, 0.5);
                Material::metal(albedo, fuzz)
            } else {
                Material::dielectric(1.5)
            };
            let material = world.add_material(material);
            world.add_sphere(Sphere::new(center, 0.2, material))?;
        }
    }

    let glass = world.add_material(Material::dielectric(1.5));
    world.add_sphere(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, glass))?;

    let diffuse = world.add_material(Material::lambertian(Color::new(0.4, 0.2, 0.1)));
    world.add_sphere(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0, diffuse))?;

    let mirror = world.add_material(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0));
    world.add_sphere(Sphere::new(Point3::new(4.0, 1.0, 0.0), 1.0, mirror))?;

    log::debug!(
        "Cover scene: {} spheres, {} materials",
        world.len(),
        world.materials().len()
    );
    Ok(world)
}

/// Camera and image settings framing [`cover_scene`].
pub fn cover_config() -> RenderConfig {
    RenderConfig::default()
        .with_resolution(640, 360)
        .with_quality(10, 50)
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_scene_layout() {
        let mut series = RandomSeries::new(42);
        let world = cover_scene(&mut series).unwrap();

        // Ground + most of the 484 grid spheres + 3 feature spheres
        assert!(world.len() > 400 && world.len() <= 1 + 484 + 3);
        assert_eq!(world.materials().len(), world.len());
        assert_eq!(world.spheres()[0].radius, 1000.0);

        for sphere in &world.spheres()[1..world.len() - 3] {
            assert_eq!(sphere.radius, 0.2);
            assert!((sphere.center - Point3::new(4.0, 0.2, 0.0)).length() > 0.9);
        }
    }

    #[test]
    fn test_cover_scene_is_reproducible() {
        let a = cover_scene(&mut RandomSeries::new(5)).unwrap();
        let b = cover_scene(&mut RandomSeries::new(5)).unwrap();
        assert_eq!(a.to_description(), b.to_description());

        let c = cover_scene(&mut RandomSeries::new(6)).unwrap();
        assert_ne!(a.to_description(), c.to_description());
    }

    #[test]
    fn test_cover_config_is_valid() {
        let config = cover_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.aspect_ratio(), 16.0 / 9.0);
    }
}
