//! Square row-major grid of `f64` values.
//!
//! The outer ring of cells is the fixed (Dirichlet) boundary,
//! only interior cells are ever written by a relaxation run.

use crate::error::*;
use crate::par_slice;
use crate::util::indexing::*;
use crate::util::*;
use float_cmp::approx_eq;

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    dimension: usize,
    buffer: Vec<f64>,
}

impl Grid {
    /// Zero filled grid.
    pub fn new(dimension: usize) -> Self {
        Grid {
            dimension,
            buffer: vec![0.0; buffer_size(dimension)],
        }
    }

    pub fn from_vec(dimension: usize, buffer: Vec<f64>) -> Result<Self> {
        let expected = buffer_size(dimension);
        if buffer.len() != expected {
            return Err(RelaxError::BufferSize {
                expected,
                found: buffer.len(),
            });
        }
        Ok(Grid { dimension, buffer })
    }

    pub fn from_fn<F: Fn(Coord) -> f64>(dimension: usize, f: F) -> Self {
        let buffer = (0..buffer_size(dimension))
            .map(|i| f(linear_to_coord(i, dimension)))
            .collect();
        Grid { dimension, buffer }
    }

    /// Grid with one value on the boundary ring and another inside it.
    pub fn with_boundary(dimension: usize, boundary: f64, interior: f64) -> Self {
        let mut result = Grid::new(dimension);
        par_slice::set_value(&mut result.buffer, boundary, dimension.max(1));
        for row in 1..dimension.saturating_sub(1) {
            let start = row * dimension + 1;
            let end = (row + 1) * dimension - 1;
            result.buffer[start..end].fill(interior);
        }
        result
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn buffer(&self) -> &[f64] {
        &self.buffer
    }

    #[inline]
    pub fn buffer_mut(&mut self) -> &mut [f64] {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> Vec<f64> {
        self.buffer
    }

    pub fn interior_size(&self) -> usize {
        interior_size(self.dimension)
    }

    #[track_caller]
    pub fn view(&self, coord: &Coord) -> f64 {
        self.buffer[coord_to_linear(coord, self.dimension)]
    }

    #[track_caller]
    pub fn set(&mut self, coord: &Coord, value: f64) {
        let index = coord_to_linear(coord, self.dimension);
        self.buffer[index] = value;
    }

    pub fn is_boundary(&self, coord: &Coord) -> bool {
        is_boundary(coord, self.dimension)
    }

    /// Boundary ring values in linear index order.
    pub fn boundary_values(&self) -> Vec<f64> {
        self.buffer
            .iter()
            .enumerate()
            .filter(|(i, _)| is_boundary(&linear_to_coord(*i, self.dimension), self.dimension))
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn min_max(&self) -> (f64, f64) {
        self.buffer
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            })
    }

    /// Largest cellwise absolute difference, grids must be the same shape.
    pub fn max_abs_diff(&self, other: &Grid) -> f64 {
        debug_assert_eq!(self.dimension, other.dimension);
        par_slice::max_abs_diff(&self.buffer, &other.buffer, self.dimension.max(1))
    }

    pub fn approx_eq(&self, other: &Grid, epsilon: f64) -> bool {
        self.dimension == other.dimension
            && self
                .buffer
                .iter()
                .zip(&other.buffer)
                .all(|(a, b)| approx_eq!(f64, *a, *b, epsilon = epsilon))
    }

    /// Debug printing adapter, boundary cells can be highlighted.
    pub fn display(&self, decimals: usize, highlight_boundary: bool) -> GridDisplay<'_> {
        GridDisplay {
            grid: self,
            decimals,
            highlight_boundary,
        }
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.display(6, false), f)
    }
}

pub struct GridDisplay<'a> {
    grid: &'a Grid,
    decimals: usize,
    highlight_boundary: bool,
}

impl std::fmt::Display for GridDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dimension = self.grid.dimension;
        for row in 0..dimension {
            for col in 0..dimension {
                let coord = vector![row, col];
                let r = self.grid.view(&coord);
                if self.highlight_boundary && is_boundary(&coord, dimension) {
                    write!(
                        f,
                        "{ANSI_COLOR_RED}{:.prec$}{ANSI_COLOR_RESET} ",
                        r,
                        prec = self.decimals
                    )?;
                } else {
                    write!(f, "{:.prec$} ", r, prec = self.decimals)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn from_vec_test() {
        assert!(Grid::from_vec(3, vec![0.0; 9]).is_ok());
        match Grid::from_vec(3, vec![0.0; 8]) {
            Err(RelaxError::BufferSize { expected, found }) => {
                assert_eq!(expected, 9);
                assert_eq!(found, 8);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn with_boundary_test() {
        let grid = Grid::with_boundary(5, 1.0, 3.0);
        for row in 0..5 {
            for col in 0..5 {
                let c = vector![row, col];
                let expected = if grid.is_boundary(&c) { 1.0 } else { 3.0 };
                assert_eq!(grid.view(&c), expected);
            }
        }
        assert_eq!(grid.boundary_values().len(), 16);
        assert_eq!(grid.interior_size(), 9);
    }

    #[test]
    fn diff_test() {
        let a = Grid::with_boundary(4, 0.0, 1.0);
        let mut b = a.clone();
        assert_eq!(a.max_abs_diff(&b), 0.0);
        b.set(&vector![2, 1], 1.25);
        assert_eq!(a.max_abs_diff(&b), 0.25);
        assert!(a.approx_eq(&b, 0.5));
        assert!(!a.approx_eq(&b, 0.1));
        assert_eq!(b.min_max(), (0.0, 1.25));
    }

    #[test]
    fn display_test() {
        let grid = Grid::from_fn(3, |c| (c[0] * 3 + c[1]) as f64);
        let s = grid.display(1, false).to_string();
        assert_eq!(s, "0.0 1.0 2.0 \n3.0 4.0 5.0 \n6.0 7.0 8.0 \n");
        let highlighted = grid.display(1, true).to_string();
        assert!(highlighted.contains(ANSI_COLOR_RED));
        assert!(highlighted.contains(" 4.0 "));
    }
}
