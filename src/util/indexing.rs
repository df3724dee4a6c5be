//! Index arithmetic for square row-major grids.
//!
//! A grid of side `dimension` has `dimension * dimension` cells,
//! the outer ring of which is boundary.
//! The interior is `(dimension - 2)^2` cells, and we often address it
//! through a compacted "interior index" that skips the boundary ring.

use crate::util::*;

pub fn buffer_size(dimension: usize) -> usize {
    dimension * dimension
}

/// Number of cells a worker team can write to.
pub fn interior_size(dimension: usize) -> usize {
    let inner = dimension.saturating_sub(2);
    inner * inner
}

pub fn coord_to_linear(coord: &Coord, dimension: usize) -> usize {
    debug_assert!(coord[0] < dimension && coord[1] < dimension);
    coord[0] * dimension + coord[1]
}

pub fn linear_to_coord(linear_index: usize, dimension: usize) -> Coord {
    debug_assert!(linear_index < buffer_size(dimension));
    vector![linear_index / dimension, linear_index % dimension]
}

pub fn is_boundary(coord: &Coord, dimension: usize) -> bool {
    coord[0] == 0
        || coord[1] == 0
        || coord[0] == dimension - 1
        || coord[1] == dimension - 1
}

/// Translate a compacted interior index into a full grid linear index.
/// Every interior row skips two boundary cells,
/// and the first interior cell sits one row plus one column in.
pub fn interior_to_linear(interior_index: usize, dimension: usize) -> usize {
    debug_assert!(dimension >= 3);
    interior_index + 2 * (interior_index / (dimension - 2)) + (dimension + 1)
}

/// Inverse of `interior_to_linear`, `None` for boundary cells.
pub fn linear_to_interior(linear_index: usize, dimension: usize) -> Option<usize> {
    let coord = linear_to_coord(linear_index, dimension);
    if is_boundary(&coord, dimension) {
        return None;
    }
    Some((coord[0] - 1) * (dimension - 2) + (coord[1] - 1))
}
