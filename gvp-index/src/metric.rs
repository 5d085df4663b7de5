//! # Distance and Similarity Metrics
//!
//! Scalar scoring of two same-dimension vectors.
//!
//! ## Supported Operations
//! - Cosine similarity and cosine distance
//! - Euclidean (L2) distance
//! - Dot product
//!
//! ## Numeric Policy
//! Components are stored as `f32`; every sum is accumulated in `f64`.
//! NaN and infinite inputs propagate to the result unchanged.

use std::cmp::Ordering;

use gvp_core::error::{Error, Result};
use gvp_core::DistanceMetric;

/// Which end of a metric's range is better
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Similarities: larger scores rank first
    HigherIsBetter,
    /// Distances: smaller scores rank first
    LowerIsBetter,
}

impl Direction {
    /// Compare two scores so that the better one orders first.
    /// NaN orders after every number in both directions; `-0.0` and `0.0`
    /// are equal.
    #[inline]
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = match self {
                    Direction::HigherIsBetter => b.partial_cmp(&a),
                    Direction::LowerIsBetter => a.partial_cmp(&b),
                };
                // Both operands are numbers here
                ord.unwrap_or(Ordering::Equal)
            }
        }
    }
}

/// A pure scoring function over two vectors
pub trait Metric: Send + Sync {
    /// Stable name
    fn name(&self) -> &'static str;

    fn direction(&self) -> Direction;

    /// Score `a` against `b`
    fn compute(&self, a: &[f32], b: &[f32]) -> Result<f64>;
}

/// Cosine similarity: dot(a,b) / (||a|| * ||b||)
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

/// Cosine distance: 1 - cosine_similarity
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineDistance;

/// Euclidean distance: sqrt(sum((a_i - b_i)^2))
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

#[derive(Debug, Clone, Copy, Default)]
pub struct DotProduct;

impl Metric for CosineSimilarity {
    fn name(&self) -> &'static str {
        "cosine"
    }

    fn direction(&self) -> Direction {
        Direction::HigherIsBetter
    }

    fn compute(&self, a: &[f32], b: &[f32]) -> Result<f64> {
        cosine_similarity(a, b)
    }
}

impl Metric for CosineDistance {
    fn name(&self) -> &'static str {
        "cosine-distance"
    }

    fn direction(&self) -> Direction {
        Direction::LowerIsBetter
    }

    fn compute(&self, a: &[f32], b: &[f32]) -> Result<f64> {
        cosine_distance(a, b)
    }
}

impl Metric for EuclideanDistance {
    fn name(&self) -> &'static str {
        "euclidean"
    }

    fn direction(&self) -> Direction {
        Direction::LowerIsBetter
    }

    fn compute(&self, a: &[f32], b: &[f32]) -> Result<f64> {
        euclidean_distance(a, b)
    }
}

impl Metric for DotProduct {
    fn name(&self) -> &'static str {
        "dot-product"
    }

    fn direction(&self) -> Direction {
        Direction::HigherIsBetter
    }

    fn compute(&self, a: &[f32], b: &[f32]) -> Result<f64> {
        dot_product(a, b)
    }
}

/// Resolve a built-in metric name to its implementation
pub fn resolve(metric: DistanceMetric) -> &'static dyn Metric {
    match metric {
        DistanceMetric::Cosine => &CosineSimilarity,
        DistanceMetric::CosineDistance => &CosineDistance,
        DistanceMetric::Euclidean => &EuclideanDistance,
        DistanceMetric::DotProduct => &DotProduct,
    }
}

#[inline]
fn check_lengths(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Compute dot product
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> Result<f64> {
    check_lengths(a, b)?;
    Ok(a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum())
}

/// Compute cosine similarity in one pass over both vectors
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    check_lengths(a, b)?;

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(Error::DegenerateVector);
    }

    Ok(dot / (norm_a * norm_b))
}

/// Compute cosine distance: 1 - cosine_similarity
#[inline]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    Ok(1.0 - cosine_similarity(a, b)?)
}

/// Compute Euclidean distance
#[inline]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    check_lengths(a, b)?;
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum();
    Ok(sum.sqrt())
}

/// Compute vector norm (magnitude)
#[inline]
pub fn norm(v: &[f32]) -> f64 {
    v.iter()
        .map(|&x| {
            let x = f64::from(x);
            x * x
        })
        .sum::<f64>()
        .sqrt()
}
