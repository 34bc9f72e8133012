//! Distance functions consumed by the neighbor index.

/// A distance function over points of equal dimensionality.
///
/// Implementations must satisfy the metric axioms; in particular the
/// distance from a point to itself is `0.0`, so every point is inside its own
/// `eps`-neighborhood.
pub trait Metric: Sync {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;

    /// Whether `distance(a, b) <= eps`.
    ///
    /// Override when the comparison can skip work (e.g. a square root).
    #[inline]
    fn within(&self, a: &[f64], b: &[f64], eps: f64) -> bool {
        self.distance(a, b) <= eps
    }

    /// Whether `|a[k] - b[k]| <= distance(a, b)` holds on every axis.
    ///
    /// When true, a uniform grid with cell side `eps` can discard every cell
    /// that is not adjacent to the query cell. Metrics that return `false`
    /// are served by a linear scan.
    fn bounds_coordinates(&self) -> bool {
        false
    }
}

/// Euclidean (L2) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Metric for Euclidean {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        squared_euclidean(a, b).sqrt()
    }

    #[inline]
    fn within(&self, a: &[f64], b: &[f64], eps: f64) -> bool {
        let eps2 = eps * eps;
        let d2 = squared_euclidean(a, b);
        if eps2.is_normal() && d2.is_finite() {
            return d2 <= eps2;
        }
        scaled_within(a, b, eps)
    }

    fn bounds_coordinates(&self) -> bool {
        true
    }
}

#[inline]
pub(crate) fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// `within` for magnitudes whose squares overflow or underflow.
///
/// Differences are divided by the largest one before squaring, so every
/// squared term lies in `[0, 1]`.
#[cold]
fn scaled_within(a: &[f64], b: &[f64], eps: f64) -> bool {
    let scale = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max);
    if scale == 0.0 {
        return true;
    }
    // The distance is at least the largest axis difference.
    if scale > eps {
        return false;
    }
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let d = (x - y) / scale;
            d * d
        })
        .sum();
    let r = eps / scale;
    sum <= r * r
}
