//! Radius-query indexes over a [`PointStore`].
//!
//! Two implementations:
//!
//! - [`GridIndex`]: a uniform grid whose cell side is `eps`. A query for
//!   radius `r` only inspects cells whose per-axis coordinate range overlaps
//!   `[c - r, c + r]`; for `r == eps` that is the 3^D block around the query
//!   cell. When that block has more cells than the grid has occupied cells
//!   (high dimension, sparse data), the query walks the occupied cells
//!   instead, so it never costs more than a linear scan over cells.
//! - [`BruteForce`]: a linear scan, for metrics that do not bound per-axis
//!   differences and as a reference in tests.
//!
//! Both answer queries with the indices of every point `p` such that
//! `metric.within(center, p, r)`, in ascending order, without duplicates.

use std::collections::HashMap;

use super::metric::Metric;
use super::points::PointStore;
use super::util::{try_filled, try_with_capacity};
use crate::error::{Error, Result};

/// Relative widening of the per-axis cell range, so points whose float
/// distance rounds to exactly `r` are never cut off by the grid.
const RANGE_SLACK: f64 = 1e-9;

/// Which index structure to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexKind {
    /// [`GridIndex`] when the metric bounds coordinates, else [`BruteForce`].
    #[default]
    Auto,
    /// Always build a grid. Fails for metrics that cannot use one.
    Grid,
    /// Always scan linearly.
    BruteForce,
}

/// Result and scratch space of a range query, reused across queries.
///
/// Keep one per thread; after the first few queries no call allocates.
#[derive(Debug, Clone, Default)]
pub struct QueryBuffer {
    hits: Vec<usize>,
    lo: Vec<i64>,
    hi: Vec<i64>,
    cell: Vec<i64>,
}

impl QueryBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ascending point indices found by the last query.
    #[inline]
    pub fn hits(&self) -> &[usize] {
        &self.hits
    }
}

/// Answers "all points within `radius` of `center`" queries.
///
/// Indexes are read-only after construction and may be queried from many
/// threads at once.
pub trait SpatialIndex: Sync {
    /// Fill `buf` with the ascending indices of all points within `radius`
    /// of `center` (inclusive), replacing the previous result.
    fn range_query(&self, center: &[f64], radius: f64, buf: &mut QueryBuffer);

    /// Number of indexed points.
    fn len(&self) -> usize;

    /// True if no points are indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the index selected by `kind`.
pub fn build_index<'a, M: Metric>(
    kind: IndexKind,
    points: &'a PointStore,
    metric: &'a M,
    eps: f64,
) -> Result<Box<dyn SpatialIndex + 'a>> {
    let index: Box<dyn SpatialIndex + 'a> = match kind {
        IndexKind::BruteForce => Box::new(BruteForce::new(points, metric)),
        IndexKind::Auto if !metric.bounds_coordinates() => {
            Box::new(BruteForce::new(points, metric))
        }
        IndexKind::Auto | IndexKind::Grid => Box::new(GridIndex::build(points, metric, eps)?),
    };
    Ok(index)
}

/// Linear-scan index.
pub struct BruteForce<'a, M> {
    points: &'a PointStore,
    metric: &'a M,
}

impl<'a, M: Metric> BruteForce<'a, M> {
    /// Wrap a point store; no preprocessing.
    pub fn new(points: &'a PointStore, metric: &'a M) -> Self {
        Self { points, metric }
    }
}

impl<M: Metric> SpatialIndex for BruteForce<'_, M> {
    fn range_query(&self, center: &[f64], radius: f64, buf: &mut QueryBuffer) {
        buf.hits.clear();
        buf.hits.extend(
            self.points
                .iter()
                .enumerate()
                .filter(|(_, p)| self.metric.within(center, p, radius))
                .map(|(i, _)| i),
        );
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

/// Uniform grid index with cell side `eps`.
///
/// Cells are stored in compressed form: `members[starts[c]..starts[c + 1]]`
/// are the (ascending) point indices of cell slot `c`, and `cells` maps an
/// integer cell coordinate to its slot. Only occupied cells exist.
pub struct GridIndex<'a, M> {
    points: &'a PointStore,
    metric: &'a M,
    side: f64,
    cells: HashMap<Box<[i64]>, usize>,
    starts: Vec<usize>,
    members: Vec<usize>,
}

impl<'a, M: Metric> GridIndex<'a, M> {
    /// Bucket every point into its cell.
    pub fn build(points: &'a PointStore, metric: &'a M, eps: f64) -> Result<Self> {
        if !metric.bounds_coordinates() {
            return Err(Error::InvalidParameter {
                name: "index",
                message: "grid index requires a metric that bounds per-axis differences",
            });
        }
        if !(eps.is_finite() && eps > 0.0) {
            return Err(Error::InvalidParameter {
                name: "eps",
                message: "must be finite and positive",
            });
        }

        let n = points.len();
        let dim = points.dim();

        let mut cells: HashMap<Box<[i64]>, usize> = HashMap::new();
        cells
            .try_reserve(n.min(1 << 20))
            .map_err(Error::exhausted("grid cells"))?;
        let mut slot_of = try_with_capacity(n, "grid slots")?;
        let mut key = vec![0i64; dim];

        for p in points.iter() {
            for (k, &x) in key.iter_mut().zip(p) {
                *k = cell_coord(x, eps);
            }
            let next = cells.len();
            let slot = match cells.get(key.as_slice()).copied() {
                Some(slot) => slot,
                None => {
                    cells.insert(key.clone().into_boxed_slice(), next);
                    next
                }
            };
            slot_of.push(slot);
        }

        // Counting sort of point indices by slot. Iterating points in order
        // keeps each cell's member list ascending.
        let n_cells = cells.len();
        let mut starts = try_filled(n_cells + 1, 0usize, "grid offsets")?;
        for &slot in &slot_of {
            starts[slot + 1] += 1;
        }
        for c in 0..n_cells {
            starts[c + 1] += starts[c];
        }
        let mut cursor = starts.clone();
        let mut members = try_filled(n, 0usize, "grid members")?;
        for (i, &slot) in slot_of.iter().enumerate() {
            members[cursor[slot]] = i;
            cursor[slot] += 1;
        }

        log::debug!("grid index: {} points in {} cells (side {})", n, n_cells, eps);

        Ok(Self {
            points,
            metric,
            side: eps,
            cells,
            starts,
            members,
        })
    }

    /// Number of occupied cells.
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    fn scan_cell(&self, slot: usize, center: &[f64], radius: f64, out: &mut Vec<usize>) {
        for &i in &self.members[self.starts[slot]..self.starts[slot + 1]] {
            if self.metric.within(center, self.points.point(i), radius) {
                out.push(i);
            }
        }
    }
}

impl<M: Metric> SpatialIndex for GridIndex<'_, M> {
    fn range_query(&self, center: &[f64], radius: f64, buf: &mut QueryBuffer) {
        let QueryBuffer { hits, lo, hi, cell } = buf;
        hits.clear();
        if self.cells.is_empty() {
            return;
        }
        debug_assert_eq!(center.len(), self.points.dim());

        // Per-axis inclusive range of cell coordinates that can hold a hit.
        // Float rounding is monotone, so flooring the rounded bounds never
        // excludes a cell containing a point inside the true interval.
        let reach = radius * (1.0 + RANGE_SLACK);
        lo.clear();
        lo.extend(center.iter().map(|&c| cell_coord(c - reach, self.side)));
        hi.clear();
        hi.extend(center.iter().map(|&c| cell_coord(c + reach, self.side)));

        let block = lo
            .iter()
            .zip(hi.iter())
            .try_fold(1usize, |acc, (&l, &h)| {
                let width = usize::try_from(h.saturating_sub(l)).ok()?.checked_add(1)?;
                acc.checked_mul(width)
            })
            .unwrap_or(usize::MAX);

        if block > self.cells.len() {
            for (key, &slot) in &self.cells {
                let inside = key
                    .iter()
                    .zip(lo.iter().zip(hi.iter()))
                    .all(|(k, (l, h))| l <= k && k <= h);
                if inside {
                    self.scan_cell(slot, center, radius, hits);
                }
            }
        } else {
            // Odometer over the block, last axis fastest.
            cell.clear();
            cell.extend_from_slice(lo);
            'block: loop {
                if let Some(&slot) = self.cells.get(cell.as_slice()) {
                    self.scan_cell(slot, center, radius, hits);
                }
                let mut axis = cell.len();
                loop {
                    if axis == 0 {
                        break 'block;
                    }
                    axis -= 1;
                    if cell[axis] < hi[axis] {
                        cell[axis] += 1;
                        break;
                    }
                    cell[axis] = lo[axis];
                }
            }
        }

        hits.sort_unstable();
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

/// Integer cell coordinate of `x` for cell side `side`.
///
/// The float-to-int cast saturates, so extreme coordinates collapse into the
/// outermost cells; exact filtering keeps query results correct.
#[inline]
fn cell_coord(x: f64, side: f64) -> i64 {
    (x / side).floor() as i64
}
