//! Core path tracing renderer.
//!
//! Implements tile-parallel Monte Carlo path tracing with:
//! - Jittered multi-sampling per pixel
//! - Gamma correction (gamma = 2.0)
//! - One private random stream per tile, derived from a master seed
//! - Cooperative cancellation between tiles

use std::iter::Sum;
use std::ops::AddAssign;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lumen_math::Color;
use rayon::prelude::*;

use crate::integrator::ray_color;
use crate::tile::{generate_tiles, Tile};
use crate::{Camera, Intersection, RandomSeries, RenderConfig, RenderError, RenderResult, World};

/// Ray counters accumulated by each tile and summed after the join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Camera rays, one per sample
    pub rays: u64,
    /// Scattered rays, one per accepted bounce
    pub bounces: u64,
}

impl RenderStats {
    /// Camera rays plus scattered rays.
    pub fn total_rays(&self) -> u64 {
        self.rays + self.bounces
    }
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, other: Self) {
        self.rays += other.rays;
        self.bounces += other.bounces;
    }
}

impl Sum for RenderStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(RenderStats::default(), |mut acc, stats| {
            acc += stats;
            acc
        })
    }
}

/// Shared flag asking a running render to stop.
///
/// Workers check it before starting each tile; a tile in progress is
/// always finished.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Visible to every clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// One unit of parallel work: a tile and the seed for its private stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileJob {
    pub tile: Tile,
    pub seed: u32,
}

/// Partition the image and draw one seed per tile from the master stream.
///
/// Seeds are drawn in tile order before any worker starts, so the image
/// does not depend on scheduling or thread count.
pub fn plan_tiles(config: &RenderConfig) -> Vec<TileJob> {
    let mut master = RandomSeries::new(config.seed);
    generate_tiles(config.image_width, config.image_height, config.tile_size)
        .into_iter()
        .map(|tile| TileJob {
            tile,
            seed: master.next_state(),
        })
        .collect()
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize a gamma-corrected color to 8-bit RGBA.
pub fn color_to_rgba8(color: Color) -> [u8; 4] {
    let quantize = |c: f64| (256.0 * c.clamp(0.0, 0.999)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z), 255]
}

/// Render a single pixel with multi-sampling.
///
/// Returns the gamma-corrected average of `samples_per_pixel` jittered
/// samples. `(x, y) = (0, 0)` is the lower-left corner of the film.
pub fn render_pixel(
    camera: &Camera,
    world: &World,
    config: &RenderConfig,
    x: u32,
    y: u32,
    series: &mut RandomSeries,
    stats: &mut RenderStats,
) -> Color {
    let film_width = config.image_width.saturating_sub(1).max(1) as f64;
    let film_height = config.image_height.saturating_sub(1).max(1) as f64;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (x as f64 + series.uniform()) / film_width;
        let t = (y as f64 + series.uniform()) / film_height;
        let ray = camera.get_ray(series, s, t);
        pixel_color += ray_color(&ray, world, config.max_depth, config.intersection, series, stats);
        stats.rays += 1;
    }

    let scale = 1.0 / config.samples_per_pixel as f64;
    Color::new(
        linear_to_gamma(scale * pixel_color.x),
        linear_to_gamma(scale * pixel_color.y),
        linear_to_gamma(scale * pixel_color.z),
    )
}

/// Render every pixel of one tile with the tile's own random stream.
///
/// `rows` is the slice of the image starting at the tile's first row, with
/// a stride of `image_width`. Only the tile's own pixels are written.
pub fn render_tile(
    job: &TileJob,
    camera: &Camera,
    world: &World,
    config: &RenderConfig,
    rows: &mut [Color],
) -> RenderStats {
    let mut series = RandomSeries::new(job.seed);
    let mut stats = RenderStats::default();
    let width = config.image_width as usize;

    for (x, y) in job.tile.pixels() {
        let offset = (y - job.tile.y) as usize * width + x as usize;
        rows[offset] = render_pixel(camera, world, config, x, y, &mut series, &mut stats);
    }

    stats
}

/// Gamma-corrected image, one color per pixel, row-major.
///
/// Row 0 is the bottom of the film (`t = 0`).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    /// Convert to 8-bit RGBA with the top row first, for display or saving.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                bytes.extend_from_slice(&color_to_rgba8(self.get(x, y)));
            }
        }
        bytes
    }
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ImageBuffer,
    pub stats: RenderStats,
    pub elapsed: Duration,
}

/// Render the world to an image buffer, running to completion.
pub fn render(world: &World, config: &RenderConfig) -> RenderResult<RenderOutput> {
    render_with_cancel(world, config, &CancelToken::new())
}

/// Render the world, stopping early if `cancel` is triggered.
///
/// The image is split into bands of `tile_size` rows, one per row of
/// tiles, and the bands run on a fixed-size worker pool. Each worker
/// writes its tiles straight into its own band; the scene is only read,
/// and every tile owns its random stream and statistics.
pub fn render_with_cancel(
    world: &World,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> RenderResult<RenderOutput> {
    config.validate()?;
    if config.max_depth == 0 {
        log::warn!("max_depth is 0, every pixel will be black");
    }

    let camera = Camera::from_config(config);
    if config.intersection == Intersection::Batch {
        world.prepare();
    }
    let jobs = plan_tiles(config);
    let total = jobs.len();

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = config.threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    log::info!(
        "Rendering {}x{} @ {} spp, depth {}: {} spheres, {} tiles on {} threads",
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        config.max_depth,
        world.len(),
        total,
        pool.current_num_threads()
    );

    let start = Instant::now();
    let completed = AtomicUsize::new(0);
    let width = config.image_width as usize;
    let band_len = width * config.tile_size as usize;
    let tiles_per_band = config.image_width.div_ceil(config.tile_size) as usize;

    let mut image = ImageBuffer::new(config.image_width, config.image_height);
    let bands: Vec<Option<RenderStats>> = pool.install(|| {
        image
            .pixels
            .par_chunks_mut(band_len)
            .zip(jobs.par_chunks(tiles_per_band))
            .map(|(rows, band_jobs)| {
                let mut stats = RenderStats::default();
                for job in band_jobs {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    stats += render_tile(job, &camera, world, config, rows);
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    log::debug!("Tile {} done ({}/{})", job.tile.index, done, total);
                }
                Some(stats)
            })
            .collect()
    });
    let elapsed = start.elapsed();

    let Some(stats) = bands.into_iter().sum::<Option<RenderStats>>() else {
        log::info!(
            "Render cancelled after {}/{} tiles",
            completed.load(Ordering::Relaxed),
            total
        );
        return Err(RenderError::Cancelled);
    };

    let secs = elapsed.as_secs_f64().max(f64::EPSILON);
    log::info!(
        "Rendered in {:?}: {:.2} MRays, {:.2} MBounces, {:.2} MRays/s",
        elapsed,
        stats.rays as f64 / 1e6,
        stats.bounces as f64 / 1e6,
        stats.total_rays() as f64 / secs / 1e6
    );

    Ok(RenderOutput {
        image,
        stats,
        elapsed,
    })
}
