//! Chunk partitioning of a grid's interior cells across workers.
//!
//! Workers are handed contiguous runs of the compacted interior index space,
//! which we translate back into inclusive ranges of full grid linear indices.
//! A chunk may span several rows, in which case the full grid range also
//! covers boundary column cells the worker must skip.

use crate::config::MIN_DIMENSION;
use crate::error::*;
use crate::util::indexing::*;
use clap::ValueEnum;
use std::ops::RangeInclusive;

/// How interior cells are split across workers.
#[derive(Copy, Clone, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum PartitionStrategy {
    /// Contiguous cell runs whose sizes differ by at most one.
    #[default]
    Balanced,

    /// Whole interior rows per worker,
    /// falls back to `Balanced` when there are fewer rows than workers.
    RowAligned,
}

/// Contiguous run of interior cells owned by one worker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// First compacted interior index.
    pub interior_start: usize,

    /// Number of interior cells.
    pub len: usize,

    /// Full grid linear index of the first cell, inclusive.
    pub start: usize,

    /// Full grid linear index of the last cell, inclusive.
    pub end: usize,
}

/// The interior columns of one grid row covered by a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowSpan {
    pub row: usize,
    pub first_col: usize,
    pub last_col: usize,
}

impl RowSpan {
    pub fn linear_range(&self, dimension: usize) -> RangeInclusive<usize> {
        let base = self.row * dimension;
        (base + self.first_col)..=(base + self.last_col)
    }
}

impl Chunk {
    pub fn new(interior_start: usize, len: usize, dimension: usize) -> Self {
        debug_assert!(len > 0);
        debug_assert!(interior_start + len <= interior_size(dimension));
        Chunk {
            interior_start,
            len,
            start: interior_to_linear(interior_start, dimension),
            end: interior_to_linear(interior_start + len - 1, dimension),
        }
    }

    pub fn linear_range(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Number of full grid cells between start and end,
    /// including skipped boundary cells.
    pub fn span_len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Walk the full grid range, skipping boundary columns.
    pub fn cell_indices(&self, dimension: usize) -> impl Iterator<Item = usize> {
        self.linear_range().filter(move |i| {
            let col = i % dimension;
            col != 0 && col != dimension - 1
        })
    }

    /// Walk the chunk row by row, each span holds only interior columns.
    pub fn row_spans(&self, dimension: usize) -> impl Iterator<Item = RowSpan> {
        let first = linear_to_coord(self.start, dimension);
        let last = linear_to_coord(self.end, dimension);
        (first[0]..=last[0]).map(move |row| RowSpan {
            row,
            first_col: if row == first[0] { first[1] } else { 1 },
            last_col: if row == last[0] { last[1] } else { dimension - 2 },
        })
    }
}

/// Split the interior of a `dimension` sized grid between `workers`.
/// Never produces empty chunks, so there may be fewer chunks than workers
/// when the interior is tiny.
pub fn partition(
    dimension: usize,
    workers: usize,
    strategy: PartitionStrategy,
) -> Result<Vec<Chunk>> {
    if dimension < MIN_DIMENSION {
        return Err(RelaxError::DimensionTooSmall { dimension });
    }

    let cells = interior_size(dimension);
    let workers = workers.clamp(1, cells);
    let chunks = match strategy {
        PartitionStrategy::Balanced => balanced(dimension, workers),
        PartitionStrategy::RowAligned => row_aligned(dimension, workers),
    };

    log::debug!("Calculations required: {cells}");
    log::debug!(
        "Chunking to size: {} ({} chunks, {:?})",
        cells / chunks.len(),
        chunks.len(),
        strategy
    );
    Ok(chunks)
}

fn balanced(dimension: usize, workers: usize) -> Vec<Chunk> {
    let cells = interior_size(dimension);
    let per_worker = cells / workers;
    let mut remain = cells % workers;

    let mut result = Vec::with_capacity(workers);
    let mut interior_start = 0;
    for _ in 0..workers {
        let mut len = per_worker;
        if remain > 0 {
            len += 1;
            remain -= 1;
        }
        result.push(Chunk::new(interior_start, len, dimension));
        interior_start += len;
    }
    debug_assert_eq!(interior_start, cells);
    result
}

fn row_aligned(dimension: usize, workers: usize) -> Vec<Chunk> {
    let row_len = dimension - 2;
    let rows = row_len;
    if rows < workers {
        return balanced(dimension, workers);
    }

    let rows_per_worker = rows / workers;
    let mut remain = rows % workers;

    let mut result = Vec::with_capacity(workers);
    let mut interior_start = 0;
    for _ in 0..workers {
        let mut worker_rows = rows_per_worker;
        if remain > 0 {
            worker_rows += 1;
            remain -= 1;
        }
        let len = worker_rows * row_len;
        result.push(Chunk::new(interior_start, len, dimension));
        interior_start += len;
    }
    debug_assert_eq!(interior_start, interior_size(dimension));
    result
}

/// Borrow disjoint mutable views of `buffer`, one per chunk,
/// each covering exactly `chunk.linear_range()`.
/// Chunks must be sorted and non overlapping, as `partition` produces them.
pub fn split_chunks_mut<'a>(
    mut buffer: &'a mut [f64],
    chunks: &[Chunk],
) -> Vec<&'a mut [f64]> {
    let mut result = Vec::with_capacity(chunks.len());
    let mut offset = 0;
    for chunk in chunks {
        debug_assert!(chunk.start >= offset);
        let (_, tail) = buffer.split_at_mut(chunk.start - offset);
        let (chunk_slice, rest) = tail.split_at_mut(chunk.span_len());
        result.push(chunk_slice);
        buffer = rest;
        offset = chunk.end + 1;
    }
    result
}
