use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::consts::{
    GARBAGE_SWATCH_COLUMN, GARBAGE_SWATCH_ROW, GARBAGE_SWATCH_SAMPLES, SWATCH_HEIGHT,
    SWATCH_PITCH, SWATCH_SAMPLES, SWATCH_WIDTH,
};
use crate::error::Result;
use crate::frame::Frame;
use crate::geometry::Rect;
use crate::histogram::{
    compare_histograms, compute_histogram, similarity, CompareMethod, Histogram,
    HistogramConfig, MaskConfig,
};

use super::label::ColorLabel;
use super::store::ColorProfile;

/// Where the labeled swatches sit in a calibration image.
///
/// Colored labels each fill one row (`y = pitch * row`) with `samples`
/// swatches at `x = pitch * i`; garbage has its own block further right.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwatchLayout {
    #[serde(default = "default_swatch_width")]
    pub swatch_width: usize,
    #[serde(default = "default_swatch_height")]
    pub swatch_height: usize,
    #[serde(default = "default_pitch")]
    pub pitch: usize,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_garbage_column")]
    pub garbage_column: usize,
    #[serde(default = "default_garbage_row")]
    pub garbage_row: usize,
    #[serde(default = "default_garbage_samples")]
    pub garbage_samples: usize,
}

fn default_swatch_width() -> usize {
    SWATCH_WIDTH
}
fn default_swatch_height() -> usize {
    SWATCH_HEIGHT
}
fn default_pitch() -> usize {
    SWATCH_PITCH
}
fn default_samples() -> usize {
    SWATCH_SAMPLES
}
fn default_garbage_column() -> usize {
    GARBAGE_SWATCH_COLUMN
}
fn default_garbage_row() -> usize {
    GARBAGE_SWATCH_ROW
}
fn default_garbage_samples() -> usize {
    GARBAGE_SWATCH_SAMPLES
}

impl Default for SwatchLayout {
    fn default() -> Self {
        Self {
            swatch_width: SWATCH_WIDTH,
            swatch_height: SWATCH_HEIGHT,
            pitch: SWATCH_PITCH,
            samples: SWATCH_SAMPLES,
            garbage_column: GARBAGE_SWATCH_COLUMN,
            garbage_row: GARBAGE_SWATCH_ROW,
            garbage_samples: GARBAGE_SWATCH_SAMPLES,
        }
    }
}

impl SwatchLayout {
    /// Swatch rects for `label`, in calibration-image pixels.
    pub fn swatches(&self, label: ColorLabel) -> Vec<Rect> {
        let (col0, row, count) = match label {
            ColorLabel::Garbage => (self.garbage_column, self.garbage_row, self.garbage_samples),
            colored => (0, colored.index(), self.samples),
        };
        (0..count)
            .map(|i| {
                Rect::from_pixels(
                    self.pitch * (col0 + i),
                    self.pitch * row,
                    self.swatch_width,
                    self.swatch_height,
                )
            })
            .collect()
    }
}

/// Averaged profile plus the per-swatch histograms it came from.
#[derive(Clone, Debug)]
pub struct Calibration {
    pub profile: ColorProfile,
    /// Indexed by [`ColorLabel::index`].
    pub samples: [Vec<Histogram>; ColorLabel::COUNT],
}

/// Crop every swatch, histogram it through the cell mask and average per label.
pub fn calibrate(
    image: &Frame,
    layout: &SwatchLayout,
    histogram: &HistogramConfig,
    mask: &MaskConfig,
) -> Result<Calibration> {
    let hsv = image.to_hsv()?;
    let swatch_mask = mask.mask_for(layout.swatch_width, layout.swatch_height);

    let mut samples: [Vec<Histogram>; ColorLabel::COUNT] = Default::default();
    let mut means = Vec::with_capacity(ColorLabel::COUNT);

    for label in ColorLabel::ALL {
        let hists = layout
            .swatches(label)
            .iter()
            .map(|rect| compute_histogram(&hsv.crop(rect)?, histogram, Some(&swatch_mask)))
            .collect::<Result<Vec<_>>>()?;
        debug!(%label, swatches = hists.len(), "Histogrammed calibration swatches");
        means.push(Histogram::mean_of(&hists)?);
        samples[label.index()] = hists;
    }

    let profile = ColorProfile::from_vec(means)?;
    info!(
        width = image.width(),
        height = image.height(),
        bins = profile.bin_count(),
        "Built color profile from calibration image"
    );

    Ok(Calibration { profile, samples })
}

/// Build a profile from a calibration image.
pub fn build_profile(
    image: &Frame,
    layout: &SwatchLayout,
    histogram: &HistogramConfig,
    mask: &MaskConfig,
) -> Result<ColorProfile> {
    Ok(calibrate(image, layout, histogram, mask)?.profile)
}

/// One swatch compared against one label's averaged histogram.
#[derive(Clone, Debug, Serialize)]
pub struct SwatchComparison {
    pub reference: ColorLabel,
    pub sample_label: ColorLabel,
    pub sample_index: usize,
    /// Values in [`CompareMethod::ALL`] order.
    pub scores: [f64; 6],
}

/// How well a label's swatches stand apart from the other labels.
#[derive(Clone, Debug, Serialize)]
pub struct LabelSeparability {
    pub label: ColorLabel,
    /// Mean similarity of this label's swatches to their own average.
    pub self_similarity: f64,
    /// Closest other label by mean similarity of this label's swatches.
    pub nearest_other: ColorLabel,
    pub nearest_similarity: f64,
}

impl LabelSeparability {
    pub fn is_separable(&self) -> bool {
        self.self_similarity > self.nearest_similarity
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CalibrationReport {
    pub comparisons: Vec<SwatchComparison>,
    pub separability: Vec<LabelSeparability>,
}

impl CalibrationReport {
    /// Per-method mean over the `sample_label` swatches compared against the
    /// `reference` average, in [`CompareMethod::ALL`] order.
    pub fn mean_scores(&self, reference: ColorLabel, sample_label: ColorLabel) -> Option<[f64; 6]> {
        let mut sums = [0.0; 6];
        let mut count = 0usize;
        for c in self
            .comparisons
            .iter()
            .filter(|c| c.reference == reference && c.sample_label == sample_label)
        {
            for (sum, score) in sums.iter_mut().zip(c.scores) {
                *sum += score;
            }
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(sums.map(|sum| sum / count as f64))
    }
}

impl Calibration {
    /// Compare every swatch against every label average with every method.
    pub fn report(&self) -> Result<CalibrationReport> {
        let mut comparisons = Vec::new();
        for (reference, base) in self.profile.iter() {
            for sample_label in ColorLabel::ALL {
                for (i, hist) in self.samples[sample_label.index()].iter().enumerate() {
                    let mut scores = [0.0; 6];
                    for (score, method) in scores.iter_mut().zip(CompareMethod::ALL) {
                        *score = compare_histograms(base, hist, method)?;
                    }
                    comparisons.push(SwatchComparison {
                        reference,
                        sample_label,
                        sample_index: i,
                        scores,
                    });
                }
            }
        }

        let mut separability = Vec::with_capacity(ColorLabel::COUNT);
        for label in ColorLabel::ALL {
            let hists = &self.samples[label.index()];
            let mut mean_sims = [0.0; ColorLabel::COUNT];
            for (reference, base) in self.profile.iter() {
                let total: f64 = hists
                    .iter()
                    .map(|h| similarity(base, h))
                    .sum::<Result<f64>>()?;
                mean_sims[reference.index()] = total / hists.len().max(1) as f64;
            }

            let (nearest_other, nearest_similarity) = ColorLabel::ALL
                .into_iter()
                .filter(|&other| other != label)
                .map(|other| (other, mean_sims[other.index()]))
                .fold((label, f64::NEG_INFINITY), |best, cur| {
                    if cur.1 > best.1 {
                        cur
                    } else {
                        best
                    }
                });

            let entry = LabelSeparability {
                label,
                self_similarity: mean_sims[label.index()],
                nearest_other,
                nearest_similarity,
            };
            if !entry.is_separable() {
                warn!(
                    %label,
                    nearest = %entry.nearest_other,
                    self_similarity = entry.self_similarity,
                    nearest_similarity = entry.nearest_similarity,
                    "Calibration swatches are closer to another label than to their own"
                );
            }
            separability.push(entry);
        }

        Ok(CalibrationReport {
            comparisons,
            separability,
        })
    }
}
