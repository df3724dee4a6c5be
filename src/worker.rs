//! A relaxation worker owns one chunk for a whole run.
//!
//! Workers read a complete snapshot of the current grid
//! and write only the cells of their chunk in the next grid.
//! The chunk slices handed to a worker cover `chunk.start..=chunk.end`
//! in full grid coordinates, boundary column cells included,
//! those are never written.

use crate::partition::*;

#[derive(Copy, Clone, Debug)]
pub struct Worker {
    pub id: usize,
    pub chunk: Chunk,
    pub dimension: usize,
    pub precision: f64,
}

impl Worker {
    pub fn new(id: usize, chunk: Chunk, dimension: usize, precision: f64) -> Self {
        Worker {
            id,
            chunk,
            dimension,
            precision,
        }
    }

    /// One Jacobi pass over the chunk,
    /// returns whether every cell stayed within precision.
    pub fn relax(&self, current: &[f64], next_chunk: &mut [f64]) -> bool {
        relax_chunk(current, next_chunk, &self.chunk, self.dimension, self.precision)
    }

    /// Move the chunk's interior cells from one chunk slice into another.
    pub fn copy_back(&self, source_chunk: &[f64], target_chunk: &mut [f64]) {
        copy_chunk(source_chunk, target_chunk, &self.chunk, self.dimension)
    }
}

/// `next[c] = (up + down + left + right) / 4` for each interior cell of `chunk`.
pub fn relax_chunk(
    current: &[f64],
    next_chunk: &mut [f64],
    chunk: &Chunk,
    dimension: usize,
    precision: f64,
) -> bool {
    profiling::scope!("worker::relax_chunk");
    debug_assert_eq!(current.len(), dimension * dimension);
    debug_assert_eq!(next_chunk.len(), chunk.span_len());

    let mut within_precision = true;
    for span in chunk.row_spans(dimension) {
        for i in span.linear_range(dimension) {
            let above = current[i - dimension];
            let below = current[i + dimension];
            let left = current[i - 1];
            let right = current[i + 1];
            let value = (above + below + left + right) / 4.0;
            next_chunk[i - chunk.start] = value;
            if (current[i] - value).abs() > precision {
                within_precision = false;
            }
        }
    }
    within_precision
}

pub fn copy_chunk(
    source_chunk: &[f64],
    target_chunk: &mut [f64],
    chunk: &Chunk,
    dimension: usize,
) {
    profiling::scope!("worker::copy_chunk");
    debug_assert_eq!(source_chunk.len(), chunk.span_len());
    debug_assert_eq!(target_chunk.len(), chunk.span_len());
    for span in chunk.row_spans(dimension) {
        let r = span.linear_range(dimension);
        let local = (r.start() - chunk.start)..=(r.end() - chunk.start);
        target_chunk[local.clone()].copy_from_slice(&source_chunk[local]);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::grid::Grid;
    use crate::util::*;

    #[test]
    fn average_test() {
        // 3x3 grid, the center is the only interior cell
        let current = Grid::from_fn(3, |c| (c[0] * 3 + c[1]) as f64);
        let mut next = current.clone();
        let chunk = partition(3, 1, PartitionStrategy::Balanced).unwrap()[0];
        let worker = Worker::new(0, chunk, 3, 1e-10);
        let next_chunk = &mut next.buffer_mut()[chunk.start..=chunk.end];
        // (1 + 7 + 3 + 5) / 4 = 4, same as the old value
        assert!(worker.relax(current.buffer(), next_chunk));
        assert_eq!(next.view(&vector![1, 1]), 4.0);
    }

    #[test]
    fn reports_violation_test() {
        let current = Grid::with_boundary(4, 0.0, 10.0);
        let mut next = current.clone();
        let chunk = partition(4, 1, PartitionStrategy::Balanced).unwrap()[0];
        let within = relax_chunk(
            current.buffer(),
            &mut next.buffer_mut()[chunk.start..=chunk.end],
            &chunk,
            4,
            1e-10,
        );
        assert!(!within);
        for row in 1..3 {
            for col in 1..3 {
                assert_eq!(next.view(&vector![row, col]), 5.0);
            }
        }
        assert_eq!(next.boundary_values(), current.boundary_values());
    }

    #[test]
    fn only_chunk_written_test() {
        let dimension = 6;
        let current = Grid::with_boundary(dimension, 1.0, 2.0);
        let chunks = partition(dimension, 3, PartitionStrategy::Balanced).unwrap();
        let chunk = chunks[1];
        let mut next = Grid::with_boundary(dimension, -1.0, -1.0);
        relax_chunk(
            current.buffer(),
            &mut next.buffer_mut()[chunk.start..=chunk.end],
            &chunk,
            dimension,
            1e-10,
        );
        let owned: Vec<usize> = chunk.cell_indices(dimension).collect();
        for (i, v) in next.buffer().iter().enumerate() {
            if owned.contains(&i) {
                assert_ne!(*v, -1.0);
            } else {
                assert_eq!(*v, -1.0);
            }
        }
    }

    #[test]
    fn copy_chunk_test() {
        let dimension = 5;
        let chunk = partition(dimension, 2, PartitionStrategy::Balanced).unwrap()[0];
        let source = vec![3.0; chunk.span_len()];
        let mut target = vec![0.0; chunk.span_len()];
        copy_chunk(&source, &mut target, &chunk, dimension);
        for (local, v) in target.iter().enumerate() {
            let col = (chunk.start + local) % dimension;
            if col == 0 || col == dimension - 1 {
                assert_eq!(*v, 0.0);
            } else {
                assert_eq!(*v, 3.0);
            }
        }
    }
}
