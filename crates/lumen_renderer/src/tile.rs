//! Tile-based partition of the image for parallel rendering.
//!
//! Divides the image into tiles that can be rendered independently:
//! each pixel depends only on its own samples, so tiles never need to
//! see each other's results.

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's first column
    pub x: u32,
    /// Y coordinate of the tile's first row
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
    /// Index of this tile in the render order
    pub index: usize,
}

impl Tile {
    /// Create a new tile.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Image coordinates covered by this tile, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let (x0, y0, x1, y1) = (self.x, self.y, self.x + self.width, self.y + self.height);
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

/// Split a `width` x `height` image into tiles of at most `tile_size` square.
///
/// Edge tiles are clipped to the image. The tiles cover every pixel exactly
/// once and come out row-major, so each run of `width.div_ceil(tile_size)`
/// tiles shares one band of image rows. Returns no tiles for an empty image
/// or a zero tile size.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    if tile_size == 0 {
        return Vec::new();
    }

    let mut tiles = Vec::new();
    let mut y = 0;
    while y < height {
        let th = tile_size.min(height - y);
        let mut x = 0;
        while x < width {
            let tw = tile_size.min(width - x);
            tiles.push(Tile::new(x, y, tw, th, tiles.len()));
            x += tw;
        }
        y += th;
    }

    tiles
}
