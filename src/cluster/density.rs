//! Core-point classification.
//!
//! Every point's `eps`-neighborhood is queried once and kept, because the
//! expansion phase walks the full neighborhood of every core point it
//! reaches. A neighborhood always contains the point itself, so
//! `min_samples <= 1` makes every point core.

use rayon::prelude::*;

use super::index::{QueryBuffer, SpatialIndex};
use super::points::PointStore;
use super::util::{try_filled, try_with_capacity};
use crate::error::{Error, Result};

/// Per-point neighborhoods in compressed row form.
///
/// `indices[offsets[i]..offsets[i + 1]]` holds the ascending neighbor
/// indices of point `i`, including `i` itself.
#[derive(Debug, Clone, Default)]
pub struct Neighborhoods {
    offsets: Vec<usize>,
    indices: Vec<usize>,
}

impl Neighborhoods {
    /// Neighbors of point `i` (including `i`).
    #[inline]
    pub fn of(&self, i: usize) -> &[usize] {
        &self.indices[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Number of points covered.
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// True if no points are covered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of stored (point, neighbor) pairs.
    pub fn total(&self) -> usize {
        self.indices.len()
    }

    fn sequential(points: &PointStore, index: &dyn SpatialIndex, eps: f64) -> Result<Self> {
        let n = points.len();
        let mut offsets = try_with_capacity(n + 1, "neighborhood offsets")?;
        offsets.push(0);
        let mut indices: Vec<usize> = Vec::new();
        let mut buf = QueryBuffer::new();

        for p in points.iter() {
            index.range_query(p, eps, &mut buf);
            let hits = buf.hits();
            indices
                .try_reserve(hits.len())
                .map_err(Error::exhausted("neighborhoods"))?;
            indices.extend_from_slice(hits);
            offsets.push(indices.len());
        }
        Ok(Self { offsets, indices })
    }

    fn parallel(points: &PointStore, index: &dyn SpatialIndex, eps: f64) -> Result<Self> {
        let rows: Vec<Vec<usize>> = (0..points.len())
            .into_par_iter()
            .map_init(QueryBuffer::new, |buf: &mut QueryBuffer, i| -> Result<Vec<usize>> {
                index.range_query(points.point(i), eps, buf);
                let hits = buf.hits();
                let mut row = try_with_capacity(hits.len(), "neighborhoods")?;
                row.extend_from_slice(hits);
                Ok(row)
            })
            .collect::<Result<_>>()?;

        let total = rows.iter().map(Vec::len).sum();
        let mut offsets = try_with_capacity(rows.len() + 1, "neighborhood offsets")?;
        let mut indices = try_with_capacity(total, "neighborhoods")?;
        offsets.push(0);
        for row in &rows {
            indices.extend_from_slice(row);
            offsets.push(indices.len());
        }
        Ok(Self { offsets, indices })
    }
}

/// Memoized core/non-core classification of every point.
#[derive(Debug, Clone)]
pub struct DensityClassifier {
    neighborhoods: Neighborhoods,
    core: Vec<bool>,
    n_core: usize,
}

impl DensityClassifier {
    /// Query every point's `eps`-neighborhood and flag points whose
    /// neighborhood holds at least `min_samples` points.
    ///
    /// With `parallel`, queries run on the rayon pool; the result is
    /// identical to the sequential pass.
    pub fn classify(
        points: &PointStore,
        index: &dyn SpatialIndex,
        eps: f64,
        min_samples: usize,
        parallel: bool,
    ) -> Result<Self> {
        let neighborhoods = if parallel {
            Neighborhoods::parallel(points, index, eps)?
        } else {
            Neighborhoods::sequential(points, index, eps)?
        };

        let n = points.len();
        let mut core = try_filled(n, false, "core flags")?;
        let mut n_core = 0;
        for (i, flag) in core.iter_mut().enumerate() {
            if neighborhoods.of(i).len() >= min_samples {
                *flag = true;
                n_core += 1;
            }
        }

        log::debug!(
            "classified {} points: {} core, {} neighbor pairs",
            n,
            n_core,
            neighborhoods.total()
        );

        Ok(Self {
            neighborhoods,
            core,
            n_core,
        })
    }

    /// Whether point `i` is a core point.
    #[inline]
    pub fn is_core(&self, i: usize) -> bool {
        self.core[i]
    }

    /// The memoized neighborhood of point `i` (including `i`).
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        self.neighborhoods.of(i)
    }

    /// Core flags, one per point.
    pub fn core_mask(&self) -> &[bool] {
        &self.core
    }

    /// Number of core points.
    pub fn n_core(&self) -> usize {
        self.n_core
    }

    /// Number of classified points.
    pub fn len(&self) -> usize {
        self.core.len()
    }

    /// True if nothing was classified.
    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }
}
