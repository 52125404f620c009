use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::EPSILON;
use crate::error::{Result, ScanError};

use super::Histogram;

/// Histogram comparison measures.
///
/// Correlation and Intersection grow with similarity; the others are
/// distances. Only Hellinger is bounded to [0, 1], which is why the
/// classifier uses it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareMethod {
    Correlation,
    ChiSquare,
    Intersection,
    #[default]
    Hellinger,
    ChiSquareAlt,
    KlDivergence,
}

impl CompareMethod {
    pub const ALL: [CompareMethod; 6] = [
        Self::Correlation,
        Self::ChiSquare,
        Self::Intersection,
        Self::Hellinger,
        Self::ChiSquareAlt,
        Self::KlDivergence,
    ];
}

impl fmt::Display for CompareMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correlation => write!(f, "Correlation"),
            Self::ChiSquare => write!(f, "Chi-Square"),
            Self::Intersection => write!(f, "Intersection"),
            Self::Hellinger => write!(f, "Hellinger"),
            Self::ChiSquareAlt => write!(f, "Chi-Square (alt)"),
            Self::KlDivergence => write!(f, "KL Divergence"),
        }
    }
}

/// Compare two histograms of equal length.
pub fn compare_histograms(a: &Histogram, b: &Histogram, method: CompareMethod) -> Result<f64> {
    if a.len() != b.len() {
        return Err(ScanError::HistogramLengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let pairs = a
        .bins()
        .iter()
        .zip(b.bins())
        .map(|(&p, &q)| (p as f64, q as f64));

    let value: f64 = match method {
        CompareMethod::Correlation => correlation(a, b),
        CompareMethod::ChiSquare => pairs
            .filter(|(p, _)| p.abs() > EPSILON)
            .map(|(p, q)| (p - q) * (p - q) / p)
            .sum(),
        CompareMethod::Intersection => pairs.map(|(p, q)| p.min(q)).sum(),
        CompareMethod::Hellinger => hellinger(a, b),
        CompareMethod::ChiSquareAlt => {
            2.0 * pairs
                .filter(|(p, q)| (p + q).abs() > EPSILON)
                .map(|(p, q)| (p - q) * (p - q) / (p + q))
                .sum::<f64>()
        }
        CompareMethod::KlDivergence => pairs
            .filter(|(p, _)| p.abs() > EPSILON)
            .map(|(p, q)| {
                let q = if q.abs() <= EPSILON { EPSILON } else { q };
                p * (p / q).ln()
            })
            .sum(),
    };
    Ok(value)
}

/// Bounded similarity in [0, 1]: one minus the Hellinger distance.
pub fn similarity(a: &Histogram, b: &Histogram) -> Result<f64> {
    let d = compare_histograms(a, b, CompareMethod::Hellinger)?;
    Ok((1.0 - d).clamp(0.0, 1.0))
}

fn hellinger(a: &Histogram, b: &Histogram) -> f64 {
    let overlap: f64 = a
        .bins()
        .iter()
        .zip(b.bins())
        .map(|(&p, &q)| (p as f64 * q as f64).sqrt())
        .sum();
    let mass = a.total() * b.total();
    let scale = if mass.abs() > EPSILON {
        1.0 / mass.sqrt()
    } else {
        1.0
    };
    (1.0 - overlap * scale).max(0.0).sqrt()
}

fn correlation(a: &Histogram, b: &Histogram) -> f64 {
    let n = a.len() as f64;
    if n == 0.0 {
        return 1.0;
    }
    let mean_a = a.total() / n;
    let mean_b = b.total() / n;

    let (mut num, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (&p, &q) in a.bins().iter().zip(b.bins()) {
        let da = p as f64 - mean_a;
        let db = q as f64 - mean_b;
        num += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denom = var_a * var_b;
    if denom.abs() > EPSILON {
        num / denom.sqrt()
    } else {
        1.0
    }
}
