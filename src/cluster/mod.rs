//! Density-based clustering of points in a metric space.
//!
//! ## DBSCAN
//!
//! Given a radius `eps` and a density threshold `min_samples`, every point is
//! either assigned to a cluster (a maximal set of density-connected points)
//! or labeled noise. DBSCAN finds non-convex clusters, needs no cluster
//! count up front, and flags outliers.
//!
//! The engine is split into stages that can also be used on their own:
//!
//! | Stage | Type |
//! |---|---|
//! | input | [`PointStore`] |
//! | neighbor queries | [`GridIndex`], [`BruteForce`] ([`SpatialIndex`]) |
//! | core classification | [`DensityClassifier`] |
//! | cluster growth | [`ClusterExpander`] |
//! | output | [`assign_labels`], [`DbscanFit`] |
//!
//! Distances come from a [`Metric`]; [`Euclidean`] is the default.
//!
//! ## Usage
//!
//! ```rust
//! use dbscan::cluster::{Clustering, Dbscan, DbscanExt, NOISE};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//!     vec![50.0, 50.0],
//! ];
//!
//! let labels = Dbscan::new(0.5, 2).fit_predict(&data).unwrap();
//! assert_eq!(labels, vec![0, 0, 1, 1, NOISE]);
//!
//! // Noise as `None`.
//! let labels = Dbscan::new(0.5, 2).fit_predict_with_noise(&data).unwrap();
//! assert_eq!(labels[4], None);
//!
//! // Core samples and counts.
//! let fit = Dbscan::new(0.5, 2).fit(&data).unwrap();
//! assert_eq!(fit.n_clusters, 2);
//! assert_eq!(fit.core_sample_indices, vec![0, 1, 2, 3]);
//! ```

mod dbscan;
mod density;
mod expand;
mod index;
mod labels;
mod metric;
mod points;
mod traits;
mod util;

pub use dbscan::{Dbscan, DbscanExt, DbscanParams};
pub use density::{DensityClassifier, Neighborhoods};
pub use expand::{ClusterExpander, Expanded, Expansion, PointLabel, PointState};
pub use index::{build_index, BruteForce, GridIndex, IndexKind, QueryBuffer, SpatialIndex};
pub use labels::{assign_labels, DbscanFit, NOISE};
pub use metric::{Euclidean, Metric};
pub use points::PointStore;
pub use traits::Clustering;
