use serde::{Deserialize, Serialize};

use crate::classify::check_threshold;
use crate::consts::{DEFAULT_PROFILE_NAME, DEFAULT_THRESHOLD};
use crate::error::{Result, ScanError};
use crate::frame::Frame;
use crate::geometry::Rect;
use crate::histogram::{HistogramConfig, MaskConfig};
use crate::layout::{player_fields, LayoutTable, Player, PlayerFields};
use crate::profile::SwatchLayout;

/// Everything the analyzer needs besides the profiles themselves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Name of the profile in the profile set to classify against.
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Similarity at or below which a label is rejected.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Game screen inside the frame; the whole frame when unset.
    #[serde(default)]
    pub screen: Option<Rect>,
    #[serde(default)]
    pub layout: LayoutTable,
    #[serde(default)]
    pub histogram: HistogramConfig,
    #[serde(default)]
    pub mask: MaskConfig,
    #[serde(default)]
    pub calibration: SwatchLayout,
}

fn default_profile() -> String {
    DEFAULT_PROFILE_NAME.to_string()
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            threshold: DEFAULT_THRESHOLD,
            screen: None,
            layout: LayoutTable::default(),
            histogram: HistogramConfig::default(),
            mask: MaskConfig::default(),
            calibration: SwatchLayout::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        check_threshold(self.threshold)?;
        let ratio = self.mask.ellipse_height_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ScanError::InvalidGeometry(format!(
                "ellipse height ratio must lie in (0, 1], got {ratio}"
            )));
        }
        self.layout.validate()?;
        self.histogram.validate()
    }

    /// Game screen inside `frame`: the configured rect, or the whole frame.
    pub fn screen_rect(&self, frame: &Frame) -> Result<Rect> {
        match self.screen {
            Some(screen) => {
                frame.crop(&screen)?;
                Ok(screen)
            }
            None => Ok(frame.bounds()),
        }
    }

    /// Resolve a player's region geometry for `frame`.
    pub fn locate(&self, frame: &Frame, player: Player) -> Result<PlayerFields> {
        player_fields(&self.screen_rect(frame)?, &self.layout, player)
    }
}
