use crate::error::*;
use crate::grid::Grid;
use crate::util::*;
use std::io::prelude::*;

/// One line per grid row, comma separated.
pub fn write_csv<P: AsRef<std::path::Path>>(grid: &Grid, path: &P) -> Result<()> {
    log::info!("Writing: {:?}", path.as_ref());
    let mut output = std::io::BufWriter::new(std::fs::File::create(path)?);
    let dimension = grid.dimension();
    for row in 0..dimension {
        let r = grid.view(&vector![row, 0]);
        write!(output, "{r}")?;
        for col in 1..dimension {
            let r = grid.view(&vector![row, col]);
            write!(output, ", {r}")?;
        }
        writeln!(output)?;
    }
    output.flush()?;
    Ok(())
}
