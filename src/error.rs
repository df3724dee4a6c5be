use thiserror::Error;

// Unified error type for gridrelax

#[derive(Error, Debug)]
pub enum RelaxError {
    #[error("grid dimension {dimension} has no interior cells, at least 3 is required")]
    DimensionTooSmall { dimension: usize },
    #[error("grid buffer holds {found} values, a square grid needs {expected}")]
    BufferSize { expected: usize, found: usize },
    #[error("input provides {found} values, at least {expected} are required")]
    NotEnoughValues { expected: usize, found: usize },
    #[error("could not parse value {index}: {source}")]
    ParseValue {
        index: usize,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("failed to start worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RelaxError>;
