use crate::util::NumTrait;
use rayon::prelude::*;

/// Sets each element to the same value.
/// `chunk_size` is break the work into tasks for multi-threading.
pub fn set_value<NumType: NumTrait>(
    a_slice: &mut [NumType],
    value: NumType,
    chunk_size: usize,
) {
    a_slice
        .par_chunks_mut(chunk_size)
        .for_each(|a_chunk: &mut [NumType]| {
            for a in a_chunk {
                *a = value;
            }
        });
}

/// Largest element wise absolute difference.
pub fn max_abs_diff(a_slice: &[f64], b_slice: &[f64], chunk_size: usize) -> f64 {
    debug_assert_eq!(a_slice.len(), b_slice.len());
    a_slice
        .par_chunks(chunk_size)
        .zip(b_slice.par_chunks(chunk_size))
        .map(|(a_chunk, b_chunk)| {
            a_chunk
                .iter()
                .zip(b_chunk)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max)
        })
        .reduce(|| 0.0, f64::max)
}
