use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::classify::classify_field;
use crate::error::{Result, ScanError};
use crate::frame::{Frame, FrameView};
use crate::histogram::{compute_histogram, Histogram, Mask};
use crate::layout::{player_fields, Player, PlayerFields};
use crate::profile::{ColorProfile, ProfileSet};

use super::config::AnalyzerConfig;
use super::types::FieldAnalysis;

/// Classifies play fields in captured frames.
///
/// Construction validates the configuration and resolves the profile once;
/// afterwards the analyzer is immutable and can be shared across threads.
#[derive(Clone, Debug)]
pub struct FieldAnalyzer {
    config: AnalyzerConfig,
    profile: ColorProfile,
}

impl FieldAnalyzer {
    /// Select `config.profile` from `profiles`.
    pub fn new(config: AnalyzerConfig, profiles: &ProfileSet) -> Result<Self> {
        let profile = profiles.get(&config.profile)?.clone();
        Self::with_profile(config, profile)
    }

    pub fn with_profile(config: AnalyzerConfig, profile: ColorProfile) -> Result<Self> {
        config.validate()?;
        let expected = config.histogram.total_bins();
        if profile.bin_count() != expected {
            return Err(ScanError::MalformedProfile(format!(
                "profile '{}' has {} bins, configuration expects {expected}",
                config.profile,
                profile.bin_count()
            )));
        }
        info!(
            profile = %config.profile,
            bins = expected,
            threshold = config.threshold,
            "Field analyzer ready"
        );
        Ok(Self { config, profile })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn profile(&self) -> &ColorProfile {
        &self.profile
    }

    /// Resolve a player's region geometry for `frame` without classifying.
    pub fn locate(&self, frame: &Frame, player: Player) -> Result<PlayerFields> {
        self.config.locate(frame, player)
    }

    /// Masked histogram of every cell. `hsv` must already be in HSV.
    pub fn cell_histograms(&self, hsv: &Frame, fields: &PlayerFields) -> Result<Array2<Histogram>> {
        let regions = fields.cell_regions(hsv.view());
        let views: Vec<FrameView> = regions.iter().map(|r| r.view()).collect::<Result<_>>()?;

        let first = views.first().ok_or(ScanError::EmptyRegion)?;
        let mask = self.config.mask.mask_for(first.width(), first.height());

        let hists: Vec<Histogram> = views
            .par_iter()
            .map(|view| {
                if view.width() == mask.width() && view.height() == mask.height() {
                    compute_histogram(view, &self.config.histogram, Some(&mask))
                } else {
                    let own: Mask = self.config.mask.mask_for(view.width(), view.height());
                    compute_histogram(view, &self.config.histogram, Some(&own))
                }
            })
            .collect::<Result<_>>()?;

        Array2::from_shape_vec(regions.raw_dim(), hists)
            .map_err(|e| ScanError::InvalidGeometry(e.to_string()))
    }

    /// Full pipeline for one frame and player.
    pub fn analyze(&self, frame: &Frame, player: Player) -> Result<FieldAnalysis> {
        let hsv = frame.to_hsv()?;
        debug!(
            width = hsv.width(),
            height = hsv.height(),
            from = %frame.color_space(),
            "Converted frame to HSV"
        );

        let screen = self.config.screen_rect(&hsv)?;
        let fields = player_fields(&screen, &self.config.layout, player)?;
        debug!(%player, field = ?fields.field, "Resolved player regions");

        let histograms = self.cell_histograms(&hsv, &fields)?;
        debug!(cells = histograms.len(), "Computed cell histograms");

        let cells = classify_field(&histograms, &self.profile, self.config.threshold)?;

        let analysis = FieldAnalysis {
            player,
            screen,
            fields,
            cells,
        };
        info!(%player, occupied = analysis.occupied(), "Classified field");
        Ok(analysis)
    }
}
