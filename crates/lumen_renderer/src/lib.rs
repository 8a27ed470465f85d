//! Lumen renderer - tile-parallel CPU path tracing for sphere scenes.
//!
//! A Monte Carlo path tracer with lambertian, metal and dielectric
//! materials, a thin-lens camera, scalar and 4-wide batched sphere
//! intersection, and a rayon worker pool rendering fixed-size tiles with
//! one deterministic random stream per tile.
//!
//! # Example
//!
//! ```no_run
//! use lumen_renderer::{render, scenes, RandomSeries};
//!
//! let world = scenes::cover_scene(&mut RandomSeries::new(42))?;
//! let output = render(&world, &scenes::cover_config())?;
//! println!("{} rays", output.stats.total_rays());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod camera;
mod config;
mod error;
mod hittable;
mod integrator;
mod lanes;
mod material;
mod random;
mod renderer;
mod sphere;
mod tile;
mod world;

pub mod scenes;

pub use camera::Camera;
pub use config::RenderConfig;
pub use error::{ConfigError, RenderError, RenderResult, SceneError};
pub use hittable::HitRecord;
pub use integrator::{ray_color, sky_color, T_MIN};
pub use lanes::{SphereLanes, LANE_WIDTH};
pub use material::{Material, ScatterResult};
pub use random::RandomSeries;
pub use renderer::{
    color_to_rgba8, linear_to_gamma, plan_tiles, render, render_pixel, render_tile,
    render_with_cancel, CancelToken, ImageBuffer, RenderOutput, RenderStats, TileJob,
};
pub use sphere::Sphere;
pub use tile::{generate_tiles, Tile, DEFAULT_TILE_SIZE};
pub use world::{Intersection, SceneDescription, World};

/// Re-export common math types from lumen_math
pub use lumen_math::{Color, Interval, Point3, Ray, Vec3};
