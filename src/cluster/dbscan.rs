//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points by neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Determines the number of clusters itself
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **eps (ε)**: Neighborhood radius. Points at distance exactly ε are neighbors.
//! - **min_samples**: Minimum neighborhood size, *counting the point itself*,
//!   for a point to be core.
//! - **Core point**: Has at least `min_samples` points within ε.
//! - **Border point**: Not core, but within ε of a core point.
//! - **Noise point**: Neither core nor border. Labeled [`NOISE`] (`-1`).
//!
//! ## Pipeline
//!
//! 1. [`PointStore`]: validate and pack the input row-major.
//! 2. [`SpatialIndex`](crate::cluster::SpatialIndex): a grid with cell side ε
//!    (or a linear scan for metrics the grid cannot prune with).
//! 3. [`DensityClassifier`]: one radius query per point, memoized, core flags.
//! 4. [`ClusterExpander`]: grow clusters from core points in scan order.
//! 5. [`assign_labels`]: unreached points become noise.
//!
//! ## Determinism
//!
//! For fixed input order and parameters the output is identical on every
//! call, with or without [`Dbscan::with_parallel`]. Cluster ids follow
//! discovery order, and a border point shared by two clusters belongs to the
//! one discovered first. Permuting the input can renumber clusters and move
//! such shared border points; the grouping of core points never changes.
//!
//! ## Complexity
//!
//! - **Time**: O(n · k) for k the mean neighborhood size, plus O(n) to
//!   build the grid. Degrades to O(n²) when every point neighbors every
//!   other point.
//! - **Space**: O(n · k) for the memoized neighborhoods.
//!
//! ## Limitations
//!
//! - Struggles with varying densities (consider OPTICS or HDBSCAN)
//! - ε is sensitive and dataset-dependent; a k-distance plot with
//!   k = `min_samples - 1` is the usual way to pick it
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use super::density::DensityClassifier;
use super::expand::{ClusterExpander, Expansion};
use super::index::{build_index, IndexKind};
use super::labels::{assign_labels, DbscanFit, NOISE};
use super::metric::{Euclidean, Metric};
use super::points::PointStore;
use super::traits::Clustering;
use super::util::try_with_capacity;
use crate::error::{Error, Result};

/// Tunable parameters of a [`Dbscan`] run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbscanParams {
    /// Neighborhood radius. Must be finite and positive.
    pub eps: f64,
    /// Minimum neighborhood size (including the point itself) for a core point.
    pub min_samples: usize,
    /// Neighbor index to build.
    pub index: IndexKind,
    /// Cluster growth strategy.
    pub expansion: Expansion,
    /// Run neighborhood queries on the rayon pool.
    pub parallel: bool,
}

impl Default for DbscanParams {
    fn default() -> Self {
        Self {
            eps: 0.5,
            min_samples: 5,
            index: IndexKind::Auto,
            expansion: Expansion::BreadthFirst,
            parallel: false,
        }
    }
}

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan<M = Euclidean> {
    params: DbscanParams,
    metric: M,
}

impl Dbscan<Euclidean> {
    /// Create a Euclidean DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `eps` - Maximum distance between two points to be neighbors.
    /// * `min_samples` - Minimum number of points (including itself) in a
    ///   point's neighborhood for it to be core.
    ///
    /// Parameters are checked when fitting, not here.
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self::from_params(DbscanParams {
            eps,
            min_samples,
            ..DbscanParams::default()
        })
    }

    /// Create a Euclidean DBSCAN clusterer from a parameter set.
    pub fn from_params(params: DbscanParams) -> Self {
        Self {
            params,
            metric: Euclidean,
        }
    }
}

impl Default for Dbscan<Euclidean> {
    fn default() -> Self {
        Self::from_params(DbscanParams::default())
    }
}

impl<M: Metric> Dbscan<M> {
    /// Create a clusterer with a custom distance function.
    pub fn with_metric(eps: f64, min_samples: usize, metric: M) -> Self {
        Self {
            params: DbscanParams {
                eps,
                min_samples,
                ..DbscanParams::default()
            },
            metric,
        }
    }

    /// Set eps (neighborhood radius).
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.params.eps = eps;
        self
    }

    /// Set the minimum neighborhood size for core points.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.params.min_samples = min_samples;
        self
    }

    /// Choose the neighbor index.
    pub fn with_index(mut self, index: IndexKind) -> Self {
        self.params.index = index;
        self
    }

    /// Choose the cluster growth strategy.
    pub fn with_expansion(mut self, expansion: Expansion) -> Self {
        self.params.expansion = expansion;
        self
    }

    /// Run neighborhood queries in parallel. Labels are unaffected.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.params.parallel = parallel;
        self
    }

    /// Current parameters.
    pub fn params(&self) -> &DbscanParams {
        &self.params
    }

    /// The distance function.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    fn validate(&self) -> Result<()> {
        let p = &self.params;
        if !(p.eps.is_finite() && p.eps > 0.0) {
            return Err(Error::InvalidParameter {
                name: "eps",
                message: "must be finite and positive",
            });
        }
        if p.min_samples == 0 {
            return Err(Error::InvalidParameter {
                name: "min_samples",
                message: "must be at least 1",
            });
        }
        if p.index == IndexKind::Grid && !self.metric.bounds_coordinates() {
            return Err(Error::InvalidParameter {
                name: "index",
                message: "grid index requires a metric that bounds per-axis differences",
            });
        }
        Ok(())
    }

    /// Cluster `data` and return labels plus core samples and counts.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<DbscanFit> {
        self.validate()?;
        let points = PointStore::from_rows(data)?;
        self.run(&points)
    }

    /// Cluster a row-major buffer of `data.len() / dim` points.
    pub fn fit_predict_flat(&self, data: &[f64], dim: usize) -> Result<Vec<i32>> {
        self.validate()?;
        let mut coords = try_with_capacity(data.len(), "point coordinates")?;
        coords.extend_from_slice(data);
        let points = PointStore::from_flat(coords, dim)?;
        Ok(self.run(&points)?.labels)
    }

    /// Cluster an already validated point store.
    pub fn fit_points(&self, points: &PointStore) -> Result<DbscanFit> {
        self.validate()?;
        self.run(points)
    }

    /// Pipeline body; parameters are already validated.
    fn run(&self, points: &PointStore) -> Result<DbscanFit> {
        if points.len() > i32::MAX as usize {
            return Err(Error::InvalidParameter {
                name: "data",
                message: "more points than i32 labels can address",
            });
        }
        let DbscanParams {
            eps,
            min_samples,
            index,
            expansion,
            parallel,
        } = self.params;

        let index = build_index(index, points, &self.metric, eps)?;
        let classifier =
            DensityClassifier::classify(points, index.as_ref(), eps, min_samples, parallel)?;
        let expanded = ClusterExpander::new(&classifier).run(expansion)?;
        let labels = assign_labels(&expanded)?;
        let fit = DbscanFit::new(labels, classifier.core_mask(), expanded.n_clusters);

        log::debug!(
            "dbscan eps={} min_samples={}: {} points, {} core, {} clusters, {} noise",
            eps,
            min_samples,
            points.len(),
            fit.core_sample_indices.len(),
            fit.n_clusters,
            fit.n_noise
        );
        Ok(fit)
    }
}

impl<M: Metric> Clustering for Dbscan<M> {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<i32>> {
        Ok(self.fit(data)?.labels)
    }
}

/// Extended DBSCAN interface with noise as `None`.
pub trait DbscanExt {
    /// Fit and predict, returning labels where noise is marked as `None`.
    fn fit_predict_with_noise(&self, data: &[Vec<f64>]) -> Result<Vec<Option<usize>>>;

    /// Check if a label represents noise.
    fn is_noise(label: i32) -> bool {
        label == NOISE
    }
}

impl<M: Metric> DbscanExt for Dbscan<M> {
    fn fit_predict_with_noise(&self, data: &[Vec<f64>]) -> Result<Vec<Option<usize>>> {
        Ok(self
            .fit_predict(data)?
            .into_iter()
            .map(|l| usize::try_from(l).ok())
            .collect())
    }
}
