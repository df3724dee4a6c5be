use crate::error::*;
use crate::grid::Grid;
use crate::util::indexing::*;

/// Render the grid with the TURBO gradient,
/// scaled so the smallest value is blue and the largest red.
/// Pixel `(x, y)` is column `x` of row `y`.
pub fn write_png<P: AsRef<std::path::Path>>(grid: &Grid, path: &P) -> Result<()> {
    profiling::scope!("image::write_png");
    let dimension = grid.dimension();
    let (min, max) = grid.min_max();
    let range = max - min;
    let gradient = colorous::TURBO;
    let mut img = image::RgbImage::new(dimension as u32, dimension as u32);
    for (l, r) in grid.buffer().iter().enumerate() {
        let coord = linear_to_coord(l, dimension);
        let t = if range > 0.0 { (r - min) / range } else { 0.5 };
        let c = gradient.eval_continuous(t);
        img.put_pixel(
            coord[1] as u32,
            coord[0] as u32,
            image::Rgb(c.as_array()),
        );
    }
    img.save(path)?;
    Ok(())
}
