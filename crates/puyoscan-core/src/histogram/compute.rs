use ndarray::{ArrayView1, Axis};

use crate::error::{Result, ScanError};
use crate::frame::FrameView;

use super::mask::Mask;
use super::{Histogram, HistogramConfig};

/// Bin for `v` in the half-open range `[lo, hi)` split into `n` bins.
fn bin_index(v: f32, lo: f32, hi: f32, n: usize) -> Option<usize> {
    if v < lo || v >= hi {
        return None;
    }
    let bin = ((v - lo) * n as f32 / (hi - lo)) as usize;
    Some(bin.min(n - 1))
}

/// Flat joint-bin index of one pixel, or `None` if any channel is out of range.
fn joint_index(px: &ArrayView1<u8>, config: &HistogramConfig, strides: &[usize]) -> Option<usize> {
    let mut index = 0;
    for (i, &channel) in config.channels.iter().enumerate() {
        let [lo, hi] = config.ranges[i];
        index += bin_index(f32::from(px[channel]), lo, hi, config.bins[i])? * strides[i];
    }
    Some(index)
}

/// Joint histogram of the configured channels over `view`.
///
/// Only pixels set in `mask` contribute; without a mask every pixel does.
/// Pixels whose value falls outside a channel's range are skipped.
pub fn compute_histogram(
    view: &FrameView,
    config: &HistogramConfig,
    mask: Option<&Mask>,
) -> Result<Histogram> {
    config.validate()?;

    if view.is_empty() {
        return Err(ScanError::EmptyRegion);
    }
    let channels = view.channels();
    if let Some(&index) = config.channels.iter().find(|&&c| c >= channels) {
        return Err(ScanError::ChannelMismatch { index, channels });
    }
    if let Some(m) = mask {
        if m.width() != view.width() || m.height() != view.height() {
            return Err(ScanError::MaskMismatch {
                mask_width: m.width(),
                mask_height: m.height(),
                width: view.width(),
                height: view.height(),
            });
        }
    }

    // Row-major strides: the last channel varies fastest.
    let mut strides = vec![1usize; config.bins.len()];
    for i in (0..config.bins.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * config.bins[i + 1];
    }

    let mut counts = vec![0.0f32; config.total_bins()];
    let data = view.data();

    for (row, line) in data.axis_iter(Axis(0)).enumerate() {
        for (col, px) in line.axis_iter(Axis(0)).enumerate() {
            if mask.is_some_and(|m| !m.get(col, row)) {
                continue;
            }
            if let Some(index) = joint_index(&px, config, &strides) {
                counts[index] += 1.0;
            }
        }
    }

    Ok(Histogram::new(counts))
}
