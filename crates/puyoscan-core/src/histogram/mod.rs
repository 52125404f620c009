pub mod compare;
pub mod compute;
pub mod mask;

pub use compare::{compare_histograms, similarity, CompareMethod};
pub use compute::compute_histogram;
pub use mask::{ellipse_mask, Mask, MaskConfig};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HSV_BINS, HUE_RANGE, MAX_HISTOGRAM_BINS, SV_RANGE};
use crate::error::{Result, ScanError};

/// Flat histogram of raw (masked) pixel counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Histogram(Vec<f32>);

impl Histogram {
    pub fn new(bins: Vec<f32>) -> Self {
        Self(bins)
    }

    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bins(&self) -> &[f32] {
        &self.0
    }

    pub fn total(&self) -> f64 {
        self.0.iter().map(|&v| v as f64).sum()
    }

    /// Bin-wise arithmetic mean of equally sized histograms.
    pub fn mean_of(histograms: &[Histogram]) -> Result<Histogram> {
        let first = histograms.first().ok_or_else(|| {
            ScanError::InvalidHistogramConfig("cannot average zero histograms".into())
        })?;
        let len = first.len();

        let mut sums = vec![0.0f64; len];
        for hist in histograms {
            if hist.len() != len {
                return Err(ScanError::HistogramLengthMismatch {
                    left: len,
                    right: hist.len(),
                });
            }
            for (sum, &v) in sums.iter_mut().zip(&hist.0) {
                *sum += v as f64;
            }
        }

        let n = histograms.len() as f64;
        Ok(Histogram(sums.into_iter().map(|s| (s / n) as f32).collect()))
    }
}

/// Which channels to bin, how many bins each, and over which value range.
///
/// All channels listed are combined into one joint histogram; the last
/// channel varies fastest in the flat layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramConfig {
    pub channels: Vec<usize>,
    pub bins: Vec<usize>,
    /// Half-open `[lo, hi)` value range per channel.
    pub ranges: Vec<[f32; 2]>,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            channels: vec![0, 1, 2],
            bins: DEFAULT_HSV_BINS.to_vec(),
            ranges: vec![
                [HUE_RANGE.0, HUE_RANGE.1],
                [SV_RANGE.0, SV_RANGE.1],
                [SV_RANGE.0, SV_RANGE.1],
            ],
        }
    }
}

impl HistogramConfig {
    pub fn validate(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(ScanError::InvalidHistogramConfig(
                "at least one channel is required".into(),
            ));
        }
        if self.bins.len() != self.channels.len() || self.ranges.len() != self.channels.len() {
            return Err(ScanError::InvalidHistogramConfig(format!(
                "{} channels, {} bin counts, {} ranges",
                self.channels.len(),
                self.bins.len(),
                self.ranges.len()
            )));
        }
        if let Some(i) = self.bins.iter().position(|&b| b == 0) {
            return Err(ScanError::InvalidHistogramConfig(format!(
                "channel {} has zero bins",
                self.channels[i]
            )));
        }
        let total = self
            .bins
            .iter()
            .try_fold(1usize, |acc, &b| acc.checked_mul(b));
        if !matches!(total, Some(n) if n <= MAX_HISTOGRAM_BINS) {
            return Err(ScanError::InvalidHistogramConfig(format!(
                "bin counts {:?} exceed {MAX_HISTOGRAM_BINS} bins",
                self.bins
            )));
        }
        for (i, [lo, hi]) in self.ranges.iter().enumerate() {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(ScanError::InvalidHistogramConfig(format!(
                    "channel {} has empty range [{lo}, {hi})",
                    self.channels[i]
                )));
            }
        }
        Ok(())
    }

    /// Flat histogram length: product of per-channel bin counts.
    pub fn total_bins(&self) -> usize {
        self.bins.iter().fold(1usize, |acc, &b| acc.saturating_mul(b))
    }
}
