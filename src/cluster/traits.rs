use crate::error::Result;

/// Common interface for hard clustering algorithms (one label per point).
pub trait Clustering {
    /// Fit the model and return one cluster label per input point.
    ///
    /// Labels are `-1` for noise or a cluster id in `0..k`, numbered in the
    /// order clusters were discovered.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<i32>>;
}
