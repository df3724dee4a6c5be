//! Grid Initialization
//!
//! Random grids, value files, and the generator for value files.
//! Requested dimensions smaller than the minimum are clamped.

use crate::config::sanitize_dimension;
use crate::error::*;
use crate::grid::Grid;
use crate::util::indexing::*;
use rand::prelude::*;
use rayon::prelude::*;
use std::io::prelude::*;

pub const RANDOM_MIN: f64 = 1.0;
pub const RANDOM_MAX: f64 = 2.0;

const CHUNK_SIZE: usize = 1000;

fn fill<R: Rng>(values: &mut [f64], rng: &mut R) {
    for value in values {
        *value = rng.gen_range(RANDOM_MIN..RANDOM_MAX);
    }
}

/// Every cell, boundary included, uniform in `[1.0, 2.0)`.
pub fn random(dimension: usize) -> Grid {
    let dimension = sanitize_dimension(dimension);
    let mut grid = Grid::new(dimension);
    grid.buffer_mut()
        .par_chunks_mut(CHUNK_SIZE)
        .for_each(|chunk| fill(chunk, &mut rand::thread_rng()));
    grid
}

/// Same distribution as `random`, but reproducible.
pub fn random_seeded(dimension: usize, seed: u64) -> Grid {
    let dimension = sanitize_dimension(dimension);
    let mut grid = Grid::new(dimension);
    fill(grid.buffer_mut(), &mut StdRng::seed_from_u64(seed));
    grid
}

/// Whitespace separated numbers, row major.
/// At least `dimension²` values are required, extra ones are ignored.
pub fn parse_values(text: &str, dimension: usize) -> Result<Grid> {
    let dimension = sanitize_dimension(dimension);
    let expected = buffer_size(dimension);
    let mut buffer = Vec::with_capacity(expected);
    for (index, token) in text.split_whitespace().take(expected).enumerate() {
        let value = token
            .parse::<f64>()
            .map_err(|source| RelaxError::ParseValue { index, source })?;
        buffer.push(value);
    }
    if buffer.len() < expected {
        return Err(RelaxError::NotEnoughValues {
            expected,
            found: buffer.len(),
        });
    }
    Grid::from_vec(dimension, buffer)
}

pub fn from_file<P: AsRef<std::path::Path>>(path: &P, dimension: usize) -> Result<Grid> {
    log::info!("Reading values from {:?}", path.as_ref());
    let text = std::fs::read_to_string(path)?;
    parse_values(&text, dimension)
}

/// Write `dimension²` random values with five decimals,
/// in the format `from_file` reads.
pub fn write_values<P: AsRef<std::path::Path>, R: Rng>(
    path: &P,
    dimension: usize,
    rng: &mut R,
) -> Result<()> {
    log::info!("Writing: {:?}", path.as_ref());
    let mut output = std::io::BufWriter::new(std::fs::File::create(path)?);
    for _ in 0..buffer_size(dimension) {
        let value: f64 = rng.gen_range(RANDOM_MIN..RANDOM_MAX);
        write!(output, "{value:.5} ")?;
    }
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn random_range_test() {
        for grid in [random(17), random_seeded(17, 5)] {
            assert_eq!(grid.dimension(), 17);
            assert!(grid
                .buffer()
                .iter()
                .all(|v| (RANDOM_MIN..RANDOM_MAX).contains(v)));
        }
    }

    #[test]
    fn seeded_test() {
        assert_eq!(random_seeded(8, 42), random_seeded(8, 42));
        assert_ne!(random_seeded(8, 42), random_seeded(8, 43));
        assert_eq!(random_seeded(1, 0).dimension(), 3);
    }

    #[test]
    fn parse_test() {
        let grid = parse_values("1 2 3\n4 5 6\n7 8 9 10 11", 3).unwrap();
        assert_eq!(grid.buffer(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);

        assert!(matches!(
            parse_values("1 2 3", 3),
            Err(RelaxError::NotEnoughValues {
                expected: 9,
                found: 3
            })
        ));
        assert!(matches!(
            parse_values("1 2 x 4 5 6 7 8 9", 3),
            Err(RelaxError::ParseValue { index: 2, .. })
        ));
    }

    #[test]
    fn write_then_read_test() {
        let mut path = std::env::temp_dir();
        path.push(format!("gridrelax_values_{}.txt", std::process::id()));
        write_values(&path, 5, &mut StdRng::seed_from_u64(3)).unwrap();
        let grid = from_file(&path, 5).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(grid
            .buffer()
            .iter()
            .all(|v| (RANDOM_MIN..=RANDOM_MAX).contains(v)));
    }
}
