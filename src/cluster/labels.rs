//! Final label materialization.

use super::expand::{Expanded, PointLabel};
use super::util::try_with_capacity;
use crate::error::Result;

/// Label of a noise point in the output of `fit_predict`.
pub const NOISE: i32 = -1;

/// Convert expansion state into the output label sequence.
///
/// Clusters keep their discovery-order ids; points never reached from a core
/// point become [`NOISE`].
pub fn assign_labels(expanded: &Expanded) -> Result<Vec<i32>> {
    let mut out = try_with_capacity(expanded.states.len(), "labels")?;
    out.extend(expanded.states.iter().map(|s| match s.label {
        // Cluster ids are bounded by the point count, which callers keep
        // below `i32::MAX` (checked in `Dbscan::fit_*`).
        PointLabel::Cluster(c) => c as i32,
        PointLabel::Unassigned => NOISE,
    }));
    Ok(out)
}

/// Everything learned by one DBSCAN run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbscanFit {
    /// One label per input point: [`NOISE`] or a cluster id in `0..n_clusters`.
    pub labels: Vec<i32>,
    /// Ascending indices of the core points.
    pub core_sample_indices: Vec<usize>,
    /// Number of clusters discovered.
    pub n_clusters: usize,
    /// Number of points labeled [`NOISE`].
    pub n_noise: usize,
}

impl DbscanFit {
    pub(crate) fn new(labels: Vec<i32>, core_mask: &[bool], n_clusters: usize) -> Self {
        let core_sample_indices = core_mask
            .iter()
            .enumerate()
            .filter(|&(_, &core)| core)
            .map(|(i, _)| i)
            .collect();
        let n_noise = labels.iter().filter(|&&l| l == NOISE).count();
        Self {
            labels,
            core_sample_indices,
            n_clusters,
            n_noise,
        }
    }

    /// Number of points in each cluster, indexed by cluster id.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters];
        for &l in &self.labels {
            if l != NOISE {
                sizes[l as usize] += 1;
            }
        }
        sizes
    }

    /// Whether point `i` is a core point.
    pub fn is_core(&self, i: usize) -> bool {
        self.core_sample_indices.binary_search(&i).is_ok()
    }
}
