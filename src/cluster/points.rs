//! Immutable, contiguous storage for the input point set.

use super::util::try_with_capacity;
use crate::error::{Error, Result};

/// A read-only view of `n` points of dimension `dim`, stored row-major.
///
/// Points are identified by their position in the input. Coordinates live
/// only here; index structures refer to points by position.
#[derive(Debug, Clone)]
pub struct PointStore {
    coords: Vec<f64>,
    dim: usize,
    n: usize,
}

impl PointStore {
    /// Copy a slice of rows into contiguous storage.
    ///
    /// Every row must have the length of the first one and only finite
    /// values. An empty slice yields an empty store.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Ok(Self::empty());
        };
        let dim = first.len();
        if dim == 0 {
            return Err(Error::InvalidParameter {
                name: "dim",
                message: "points must have at least one dimension",
            });
        }
        for row in rows {
            if row.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: row.len(),
                });
            }
        }

        let total = rows.len().checked_mul(dim).ok_or(Error::InvalidParameter {
            name: "data",
            message: "point count times dimension overflows usize",
        })?;
        let mut coords = try_with_capacity(total, "point coordinates")?;
        for row in rows {
            coords.extend_from_slice(row);
        }
        Self::from_flat(coords, dim)
    }

    /// Take ownership of a row-major buffer of `len / dim` points.
    pub fn from_flat(coords: Vec<f64>, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidParameter {
                name: "dim",
                message: "points must have at least one dimension",
            });
        }
        if coords.len() % dim != 0 {
            return Err(Error::InvalidParameter {
                name: "data",
                message: "buffer length is not a multiple of the dimension",
            });
        }
        if let Some(pos) = coords.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFiniteCoordinate { index: pos / dim });
        }
        let n = coords.len() / dim;
        Ok(Self { coords, dim, n })
    }

    fn empty() -> Self {
        Self {
            coords: Vec::new(),
            dim: 0,
            n: 0,
        }
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    /// True if the store has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Dimensionality (0 only for an empty store).
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Coordinates of point `i`.
    #[inline]
    pub fn point(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterate over all points in input order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        // `chunks_exact(0)` panics, and an empty store has dim 0.
        self.coords.chunks_exact(self.dim.max(1))
    }
}
