//! Shape-preserving map over scalar-or-grid values.

use tracing::debug;

use crate::Result;
use crate::types::Shaped;

/// Apply `f` to every cell of `value`, keeping its shape.
///
/// Cells are visited strictly sequentially in row-major order. The first
/// error aborts the remaining cells and is returned as-is; side effects of
/// cells already visited (such as cache writes) are kept.
pub fn map_cells<T, U, F>(value: &Shaped<T>, mut f: F) -> Result<Shaped<U>>
where
    F: FnMut(&T) -> Result<U>,
{
    value.validate()?;

    match value {
        Shaped::Scalar(cell) => Ok(Shaped::Scalar(f(cell)?)),
        Shaped::Grid(rows) => {
            let (height, width) = value.dimensions();
            debug!(rows = height, columns = width, "mapping grid");

            let mut out = Vec::with_capacity(rows.len());
            for row in rows {
                let mut out_row = Vec::with_capacity(row.len());
                for cell in row {
                    out_row.push(f(cell)?);
                }
                out.push(out_row);
            }
            Ok(Shaped::Grid(out))
        }
    }
}
