pub use num_traits::Num;

pub trait NumTrait: Num + Copy + Send + Sync {}
impl<T: Num + Copy + Send + Sync> NumTrait for T {}

pub mod indexing;

/// Grid coordinate, `[row, column]`.
pub type Coord = nalgebra::Vector2<usize>;

pub use nalgebra::vector;
