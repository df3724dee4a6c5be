use crate::partition::PartitionStrategy;
use crate::solver::Driver;

/// Smallest precision a run will work to.
/// Anything tighter risks runaway iteration counts.
pub const PRECISION_FLOOR: f64 = 1e-10;

/// Smallest grid with an interior cell.
pub const MIN_DIMENSION: usize = 3;

pub const DEFAULT_CORES: usize = 4;
pub const DEFAULT_DIMENSION: usize = 10;
pub const DEFAULT_PRECISION: f64 = PRECISION_FLOOR;

/// Parameters for one `relax` call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RelaxConfig {
    /// Worker thread count.
    pub cores: usize,

    /// A pass with every cell changing by at most this much has converged.
    pub precision: f64,

    /// Stop after this many passes even if not converged.
    pub max_iterations: Option<usize>,

    pub driver: Driver,

    pub partition: PartitionStrategy,
}

impl Default for RelaxConfig {
    fn default() -> Self {
        RelaxConfig {
            cores: DEFAULT_CORES,
            precision: DEFAULT_PRECISION,
            max_iterations: None,
            driver: Driver::default(),
            partition: PartitionStrategy::default(),
        }
    }
}

impl RelaxConfig {
    pub fn new(cores: usize, precision: f64) -> Self {
        RelaxConfig {
            cores,
            precision,
            ..Default::default()
        }
    }

    pub fn with_driver(mut self, driver: Driver) -> Self {
        self.driver = driver;
        self
    }

    pub fn with_partition(mut self, partition: PartitionStrategy) -> Self {
        self.partition = partition;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Clamp out of range values to defaults and floors.
    /// Bad configuration is never fatal, we warn and carry on.
    pub fn sanitized(mut self) -> Self {
        if self.cores < 1 {
            log::warn!(
                "Invalid core count {}, positive integer required. Using 1 core.",
                self.cores
            );
            self.cores = 1;
        }

        if !self.precision.is_finite() || self.precision <= 0.0 {
            log::warn!(
                "Invalid precision {}, positive value required. Using {:e}.",
                self.precision,
                DEFAULT_PRECISION
            );
            self.precision = DEFAULT_PRECISION;
        } else if self.precision < PRECISION_FLOOR {
            log::warn!(
                "Precision {:e} is below the floor, using {:e}.",
                self.precision,
                PRECISION_FLOOR
            );
            self.precision = PRECISION_FLOOR;
        }

        if self.max_iterations == Some(0) {
            log::warn!("An iteration cap of 0 would never relax, ignoring it.");
            self.max_iterations = None;
        }
        self
    }
}

/// Clamp a requested grid side length to one with an interior.
pub fn sanitize_dimension(dimension: usize) -> usize {
    if dimension < MIN_DIMENSION {
        log::warn!(
            "Dimension {dimension} has no interior cells, using {MIN_DIMENSION}."
        );
        MIN_DIMENSION
    } else {
        dimension
    }
}
