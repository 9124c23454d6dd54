//! Interpolation primitives for anchor tables.
//!
//! Corrections are tabulated at a handful of anchor frequencies and
//! compositions. Between anchors they are blended linearly; across
//! composition they are interpolated with a Lagrange polynomial through
//! every tabulated node.

/// Position of a query relative to a sorted list of knots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bracket {
    /// The query coincides with knot `index`.
    Exact(usize),
    /// The query lies outside the knot span; use boundary knot `index`.
    Clamped(usize),
    /// The query lies strictly between knots `lo` and `hi = lo + 1`,
    /// at fractional position `t = (x - x_lo) / (x_hi - x_lo)`.
    Between { lo: usize, hi: usize, t: f64 },
}

/// Locate `x` among strictly increasing `knots`.
///
/// # Panics
/// Panics if `knots` is empty.
pub fn bracket(knots: &[f64], x: f64) -> Bracket {
    assert!(!knots.is_empty(), "Need at least 1 knot");
    let last = knots.len() - 1;

    if x <= knots[0] {
        return if x == knots[0] {
            Bracket::Exact(0)
        } else {
            Bracket::Clamped(0)
        };
    }
    if x >= knots[last] {
        return if x == knots[last] {
            Bracket::Exact(last)
        } else {
            Bracket::Clamped(last)
        };
    }

    // First knot >= x; in 1..=last for any non-NaN x after the checks above.
    let hi = knots.partition_point(|&k| k < x);
    if hi == 0 {
        return Bracket::Clamped(0);
    }
    if knots[hi] == x {
        return Bracket::Exact(hi);
    }
    let lo = hi - 1;
    let t = (x - knots[lo]) / (knots[hi] - knots[lo]);
    Bracket::Between { lo, hi, t }
}

/// Linear blend `y0 + t (y1 - y0)`.
#[inline]
pub fn lerp(y0: f64, y1: f64, t: f64) -> f64 {
    y0 + t * (y1 - y0)
}

/// Evaluate the Lagrange polynomial through `(xs[i], ys[i])` at `x`.
///
/// Exact at the nodes. Nodes must be distinct.
///
/// # Panics
/// Panics if `xs` and `ys` differ in length or are empty.
pub fn lagrange(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    assert_eq!(xs.len(), ys.len(), "xs and ys must have equal length");
    assert!(!xs.is_empty(), "Need at least 1 node");

    // Return node values verbatim so tabulated points are reproduced bit-exactly.
    if let Some(i) = xs.iter().position(|&xi| xi == x) {
        return ys[i];
    }

    let mut sum = 0.0;
    for (i, (&xi, &yi)) in xs.iter().zip(ys).enumerate() {
        let mut basis = 1.0;
        for (j, &xj) in xs.iter().enumerate() {
            if i != j {
                basis *= (x - xj) / (xi - xj);
            }
        }
        sum += yi * basis;
    }
    sum
}

/// A straight line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    /// The line through two points. A vertical pair yields a flat line
    /// through their mean.
    pub fn through(p0: (f64, f64), p1: (f64, f64)) -> Self {
        let dx = p1.0 - p0.0;
        if dx == 0.0 {
            return Self {
                slope: 0.0,
                intercept: 0.5 * (p0.1 + p1.1),
            };
        }
        let slope = (p1.1 - p0.1) / dx;
        Self {
            slope,
            intercept: p0.1 - slope * p0.0,
        }
    }

    /// Ordinary least-squares fit. When `xs` has zero variance the slope is
    /// 0 and the intercept is the mean of `ys`.
    ///
    /// # Panics
    /// Panics if `xs` and `ys` differ in length or are empty.
    pub fn least_squares(xs: &[f64], ys: &[f64]) -> Self {
        assert_eq!(xs.len(), ys.len(), "xs and ys must have equal length");
        assert!(!xs.is_empty(), "Need at least 1 data point");

        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            numerator += (x - mean_x) * (y - mean_y);
            denominator += (x - mean_x) * (x - mean_x);
        }
        let slope = if denominator != 0.0 {
            numerator / denominator
        } else {
            0.0
        };

        Self {
            slope,
            intercept: mean_y - slope * mean_x,
        }
    }

    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
