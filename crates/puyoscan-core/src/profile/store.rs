use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::error::{Result, ScanError};
use crate::histogram::Histogram;

use super::label::ColorLabel;

/// Persisted form of one profile: label name -> flat histogram.
pub type ProfileData = BTreeMap<String, Vec<f32>>;

/// One reference histogram per [`ColorLabel`], all of the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorProfile {
    histograms: [Histogram; ColorLabel::COUNT],
}

impl ColorProfile {
    pub fn new(histograms: [Histogram; ColorLabel::COUNT]) -> Result<Self> {
        let bins = histograms[0].len();
        if bins == 0 {
            return Err(ScanError::MalformedProfile("histograms are empty".into()));
        }
        for (label, hist) in ColorLabel::ALL.iter().zip(&histograms) {
            if hist.len() != bins {
                return Err(ScanError::MalformedProfile(format!(
                    "'{label}' has {} bins, expected {bins}",
                    hist.len()
                )));
            }
            if hist.bins().iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(ScanError::MalformedProfile(format!(
                    "'{label}' contains negative or non-finite bins"
                )));
            }
        }
        Ok(Self { histograms })
    }

    /// Build from histograms given in label order.
    pub fn from_vec(histograms: Vec<Histogram>) -> Result<Self> {
        let n = histograms.len();
        let histograms: [Histogram; ColorLabel::COUNT] = histograms.try_into().map_err(|_| {
            ScanError::MalformedProfile(format!(
                "expected {} histograms, got {n}",
                ColorLabel::COUNT
            ))
        })?;
        Self::new(histograms)
    }

    pub fn get(&self, label: ColorLabel) -> &Histogram {
        &self.histograms[label.index()]
    }

    /// Length shared by every histogram in the profile.
    pub fn bin_count(&self) -> usize {
        self.histograms[0].len()
    }

    /// Reference histograms in label order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorLabel, &Histogram)> {
        ColorLabel::ALL.into_iter().zip(self.histograms.iter())
    }

    pub fn to_data(&self) -> ProfileData {
        self.iter()
            .map(|(label, hist)| (label.name().to_string(), hist.bins().to_vec()))
            .collect()
    }
}

/// Validate persisted data and build a profile from it.
///
/// Every label must be present, no unknown labels are allowed, and all
/// histograms must share one bin count.
pub fn load_profile(data: &ProfileData) -> Result<ColorProfile> {
    if let Some(unknown) = data.keys().find(|k| k.parse::<ColorLabel>().is_err()) {
        return Err(ScanError::MalformedProfile(format!(
            "unknown color label '{unknown}'"
        )));
    }

    let mut histograms = Vec::with_capacity(ColorLabel::COUNT);
    for label in ColorLabel::ALL {
        let bins = data.get(label.name()).ok_or_else(|| {
            ScanError::MalformedProfile(format!("missing color label '{label}'"))
        })?;
        histograms.push(Histogram::new(bins.clone()));
    }
    ColorProfile::from_vec(histograms)
}

/// Named profiles, loaded once and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileSet {
    profiles: BTreeMap<String, ColorProfile>,
}

impl ProfileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, profile: ColorProfile) -> Option<ColorProfile> {
        self.profiles.insert(name.into(), profile)
    }

    pub fn get(&self, name: &str) -> Result<&ColorProfile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ScanError::UnknownProfile(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColorProfile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Check that every profile was built with `bins`-long histograms.
    pub fn expect_bins(&self, bins: usize) -> Result<()> {
        for (name, profile) in &self.profiles {
            if profile.bin_count() != bins {
                return Err(ScanError::MalformedProfile(format!(
                    "profile '{name}' has {} bins, configuration expects {bins}",
                    profile.bin_count()
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, ProfileData> = serde_json::from_str(json)?;
        let mut profiles = BTreeMap::new();
        for (name, data) in raw {
            let profile = load_profile(&data).map_err(|e| match e {
                ScanError::MalformedProfile(msg) => {
                    ScanError::MalformedProfile(format!("profile '{name}': {msg}"))
                }
                other => other,
            })?;
            profiles.insert(name, profile);
        }
        Ok(Self { profiles })
    }

    pub fn to_json_string(&self) -> Result<String> {
        let raw: BTreeMap<&str, ProfileData> = self
            .profiles
            .iter()
            .map(|(name, profile)| (name.as_str(), profile.to_data()))
            .collect();
        Ok(serde_json::to_string(&raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let set = Self::from_json_str(&json)?;
        info!(path = %path.display(), profiles = set.len(), "Loaded color profiles");
        Ok(set)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
