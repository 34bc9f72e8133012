//! Density-reachability traversal.
//!
//! Points are scanned in input order. The first unvisited core point seeds
//! cluster `0`, the next seed (a core point not reached from an earlier
//! seed) cluster `1`, and so on. From a seed the traversal works through an
//! explicit queue of core points: each one labels every unlabeled point in
//! its neighborhood and enqueues every not-yet-visited core neighbor.
//!
//! # Ordering
//!
//! Which points end up together does not depend on scan order: core points
//! partition by density-connectivity. Two things do:
//!
//! - cluster ids are assigned in discovery order, i.e. ordered by the
//!   smallest core index of each cluster;
//! - a border point within `eps` of core points from two different clusters
//!   keeps the first label it receives. Clusters are expanded one at a time,
//!   so that is the cluster with the smaller id, not the nearest core point.
//!
//! [`Expansion::UnionFind`] computes the same labels from core-point
//! connected components and applies both rules explicitly.

use std::collections::VecDeque;

use super::density::DensityClassifier;
use super::util::{try_filled, UnionFind};
use crate::error::{Error, Result};

/// Strategy used to grow clusters from core points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Expansion {
    /// Queue-driven traversal from each seed, in scan order.
    #[default]
    BreadthFirst,
    /// Union-find over adjacent core points, then a border-assignment pass.
    UnionFind,
}

/// Label of a point during and after expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLabel {
    /// Not reached from any core point (yet).
    Unassigned,
    /// Member of a cluster.
    Cluster(usize),
}

/// Per-point traversal state, stored in one flat array indexed by point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointState {
    /// Scanned or reached by the traversal.
    pub visited: bool,
    /// Copied from the classifier.
    pub is_core: bool,
    /// Current label.
    pub label: PointLabel,
}

impl PointState {
    const INITIAL: PointState = PointState {
        visited: false,
        is_core: false,
        label: PointLabel::Unassigned,
    };
}

/// Result of an expansion pass.
#[derive(Debug, Clone)]
pub struct Expanded {
    /// Final state of every point.
    pub states: Vec<PointState>,
    /// Number of clusters discovered.
    pub n_clusters: usize,
}

/// Grows clusters from the core points of a [`DensityClassifier`].
pub struct ClusterExpander<'a> {
    classifier: &'a DensityClassifier,
}

impl<'a> ClusterExpander<'a> {
    /// Expander over an already classified point set.
    pub fn new(classifier: &'a DensityClassifier) -> Self {
        Self { classifier }
    }

    /// Run the selected strategy to completion.
    pub fn run(&self, strategy: Expansion) -> Result<Expanded> {
        let expanded = match strategy {
            Expansion::BreadthFirst => self.breadth_first()?,
            Expansion::UnionFind => self.union_find()?,
        };
        log::debug!(
            "expansion ({:?}): {} clusters over {} points",
            strategy,
            expanded.n_clusters,
            expanded.states.len()
        );
        Ok(expanded)
    }

    fn initial_states(&self) -> Result<Vec<PointState>> {
        let mut states = try_filled(self.classifier.len(), PointState::INITIAL, "point states")?;
        for (i, s) in states.iter_mut().enumerate() {
            s.is_core = self.classifier.is_core(i);
        }
        Ok(states)
    }

    fn breadth_first(&self) -> Result<Expanded> {
        let mut states = self.initial_states()?;
        let n = states.len();

        // Only core points are ever queued, each at most once.
        let mut frontier: VecDeque<usize> = VecDeque::new();
        frontier
            .try_reserve(self.classifier.n_core())
            .map_err(Error::exhausted("frontier"))?;

        let mut n_clusters = 0;
        for seed in 0..n {
            if states[seed].visited {
                continue;
            }
            states[seed].visited = true;
            if !states[seed].is_core {
                // May still become a border point of a later cluster.
                continue;
            }

            let cluster = n_clusters;
            n_clusters += 1;
            states[seed].label = PointLabel::Cluster(cluster);
            frontier.push_back(seed);

            let mut size = 1;
            while let Some(p) = frontier.pop_front() {
                for &q in self.classifier.neighbors(p) {
                    let s = &mut states[q];
                    if s.label == PointLabel::Unassigned {
                        s.label = PointLabel::Cluster(cluster);
                        size += 1;
                    }
                    if !s.visited {
                        s.visited = true;
                        if s.is_core {
                            frontier.push_back(q);
                        }
                    }
                }
            }
            log::trace!("cluster {} seeded at point {}: {} points", cluster, seed, size);
        }

        Ok(Expanded { states, n_clusters })
    }

    fn union_find(&self) -> Result<Expanded> {
        let mut states = self.initial_states()?;
        let n = states.len();

        let mut uf = UnionFind::new(n)?;
        for p in (0..n).filter(|&p| states[p].is_core) {
            for &q in self.classifier.neighbors(p) {
                if q > p && states[q].is_core {
                    uf.union(p, q);
                }
            }
        }

        // Number components by their smallest core index, which is the order
        // the scan would discover them in.
        let mut cluster_of_root = try_filled(n, usize::MAX, "component ids")?;
        let mut n_clusters = 0;
        for p in 0..n {
            if !states[p].is_core {
                continue;
            }
            let root = uf.find(p);
            if cluster_of_root[root] == usize::MAX {
                cluster_of_root[root] = n_clusters;
                n_clusters += 1;
            }
            states[p].label = PointLabel::Cluster(cluster_of_root[root]);
        }

        // Border points take the earliest-discovered adjacent cluster.
        for p in 0..n {
            states[p].visited = true;
            if states[p].is_core {
                continue;
            }
            let claimed = self
                .classifier
                .neighbors(p)
                .iter()
                .filter_map(|&q| match states[q] {
                    PointState {
                        is_core: true,
                        label: PointLabel::Cluster(c),
                        ..
                    } => Some(c),
                    _ => None,
                })
                .min();
            if let Some(c) = claimed {
                states[p].label = PointLabel::Cluster(c);
            }
        }

        Ok(Expanded { states, n_clusters })
    }
}
