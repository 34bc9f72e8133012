//! Density-based spatial clustering.
//!
//! `dbscan` is a small library implementing DBSCAN over in-memory point sets
//! of any dimension, with a grid-accelerated neighbor index.
//!
//! The primary public API is under [`cluster`], which provides:
//! - [`Dbscan`]: the clustering engine (`fit_predict`, `fit`)
//! - the stages it is built from (point store, index, classifier, expander)
//! - the [`Metric`] trait for custom distance functions

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    Clustering, Dbscan, DbscanExt, DbscanFit, DbscanParams, Euclidean, Expansion, IndexKind,
    Metric, NOISE,
};
pub use error::{Error, Result};
