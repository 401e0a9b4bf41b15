//! Scalar-or-grid values as they arrive from (and return to) a spreadsheet.

use serde::{Deserialize, Serialize};

use crate::{CellGptError, Result};

/// Raw content of a single spreadsheet cell.
///
/// Deserializes from plain JSON scalars: `null`, booleans, numbers and
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// A single value or a rectangular grid of values.
///
/// Whatever shape goes into the pipeline comes back out: a scalar yields a
/// scalar, an `r × c` grid yields an `r × c` grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Shaped<T> {
    Scalar(T),
    Grid(Vec<Vec<T>>),
}

/// A prompt argument: one cell or a range of cells.
pub type PromptValue = Shaped<CellValue>;

impl<T> Shaped<T> {
    /// Wrap a single value.
    pub fn scalar(value: impl Into<T>) -> Self {
        Shaped::Scalar(value.into())
    }

    /// Build a grid, rejecting ragged rows.
    pub fn grid(rows: Vec<Vec<T>>) -> Result<Self> {
        let shaped = Shaped::Grid(rows);
        shaped.validate()?;
        Ok(shaped)
    }

    /// Check the rectangular invariant.
    ///
    /// Needed for values built directly from the `Grid` variant or
    /// deserialized from untrusted input.
    pub fn validate(&self) -> Result<()> {
        if let Shaped::Grid(rows) = self
            && let Some(first) = rows.first()
        {
            let width = first.len();
            if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
                return Err(CellGptError::InvalidInput(format!(
                    "grid is not rectangular: row {} has {} cells, expected {width}",
                    index + 1,
                    row.len()
                )));
            }
        }
        Ok(())
    }

    /// `(rows, columns)`; a scalar counts as `1 × 1`.
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Shaped::Scalar(_) => (1, 1),
            Shaped::Grid(rows) => (rows.len(), rows.first().map_or(0, Vec::len)),
        }
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, Shaped::Grid(_))
    }

    /// The scalar value, if this is not a grid.
    pub fn as_scalar(&self) -> Option<&T> {
        match self {
            Shaped::Scalar(value) => Some(value),
            Shaped::Grid(_) => None,
        }
    }

    /// The rows, if this is a grid.
    pub fn as_grid(&self) -> Option<&[Vec<T>]> {
        match self {
            Shaped::Scalar(_) => None,
            Shaped::Grid(rows) => Some(rows),
        }
    }
}

impl<T> From<T> for Shaped<T> {
    fn from(value: T) -> Self {
        Shaped::Scalar(value)
    }
}
