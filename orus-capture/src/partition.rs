//! 3x3 grid partitioning of a captured frame.

use image::{RgbImage, imageops};

/// Rows and columns of the capture grid.
const GRID: u32 = 3;

/// Splits a frame into 9 equal tiles in row-major order.
///
/// Tile dimensions are `width / 3` by `height / 3` using integer division.
/// When a dimension is not divisible by 3 the remainder strip along the
/// right or bottom edge is not part of any tile; tile `row * 3 + col + 1`
/// covers the rectangle starting at `(col * tile_w, row * tile_h)`.
pub fn partition(image: &RgbImage) -> Vec<RgbImage> {
    let tile_w = image.width() / GRID;
    let tile_h = image.height() / GRID;

    let mut tiles = Vec::with_capacity((GRID * GRID) as usize);
    for row in 0..GRID {
        for col in 0..GRID {
            let tile =
                imageops::crop_imm(image, col * tile_w, row * tile_h, tile_w, tile_h).to_image();
            tiles.push(tile);
        }
    }

    tiles
}
