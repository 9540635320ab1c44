//! Hex coordinate math for boards (odd-q vertical offset layout)
//!
//! Odd columns sit half a row lower than even columns. Coordinates are
//! plain `(x, y)` column/row offsets, so no conversion is needed between
//! the tile array and the search code.

use crate::core::types::TileCoord;

/// Hex distance between two tiles in offset coordinates
///
/// Uses truncating integer division, so results for negative
/// coordinates follow the same rounding as the board's range checks.
/// Computed in `i64` so any pair of `i32` coordinates is safe; distances
/// beyond `u32::MAX` saturate.
pub fn distance(a: TileCoord, b: TileCoord) -> u32 {
    let (xs, ys, xf, yf) = (
        i64::from(a.x),
        i64::from(a.y),
        i64::from(b.x),
        i64::from(b.y),
    );
    let v1 = ys - yf + (xf - xs + (xf & 1) - (xs & 1)) / 2;
    let v2 = xs - xf;
    u32::try_from((v1.abs() + (v1 + v2).abs() + v2.abs()) / 2).unwrap_or(u32::MAX)
}

/// Whether a coordinate lies inside a `width` x `height` board
pub fn in_bounds(coord: TileCoord, width: usize, height: usize) -> bool {
    coord.x >= 0 && coord.y >= 0 && (coord.x as usize) < width && (coord.y as usize) < height
}

/// All in-bounds tiles adjacent to `coord`
///
/// Order is the vertical pair, then the diagonal pair on the `y + (x + 1) % 2`
/// row, then the diagonal pair on the `y - x % 2` row, each pair low `x` first.
/// An out-of-bounds `coord` has no neighbours.
pub fn adjacent_tiles(coord: TileCoord, width: usize, height: usize) -> Vec<TileCoord> {
    let mut tiles = Vec::with_capacity(6);
    if !in_bounds(coord, width, height) {
        return tiles;
    }

    let TileCoord { x, y } = coord;
    let parity = x & 1;
    let candidates = [
        TileCoord::new(x, y - 1),
        TileCoord::new(x, y + 1),
        TileCoord::new(x - 1, y + 1 - parity),
        TileCoord::new(x + 1, y + 1 - parity),
        TileCoord::new(x - 1, y - parity),
        TileCoord::new(x + 1, y - parity),
    ];

    tiles.extend(
        candidates
            .into_iter()
            .filter(|c| in_bounds(*c, width, height)),
    );
    tiles
}
