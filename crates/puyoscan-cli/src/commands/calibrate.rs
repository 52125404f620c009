use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use puyoscan_core::consts::DEFAULT_PROFILE_NAME;
use puyoscan_core::io::image_io::load_frame;
use puyoscan_core::profile::{calibrate, ProfileSet};
use tracing::info;

use crate::summary::print_calibration_report;

#[derive(Args)]
pub struct CalibrateArgs {
    /// Calibration image with the labeled swatches
    pub image: PathBuf,

    /// Name to store the profile under
    #[arg(long, default_value = DEFAULT_PROFILE_NAME)]
    pub name: String,

    /// Profile file to write
    #[arg(short, long, default_value = "profiles.json")]
    pub output: PathBuf,

    /// Keep the other profiles already stored in the output file
    #[arg(long)]
    pub merge: bool,

    /// Analyzer config file (TOML) with the swatch layout and histogram bins
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Compare every swatch against every label and print a summary
    #[arg(long)]
    pub report: bool,

    /// Print the full comparison report as JSON instead of the summary
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &CalibrateArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let image = load_frame(&args.image)
        .with_context(|| format!("Failed to load calibration image {}", args.image.display()))?;

    let calibration = calibrate(&image, &config.calibration, &config.histogram, &config.mask)?;

    let mut profiles = if args.merge && args.output.exists() {
        ProfileSet::load(&args.output)
            .with_context(|| format!("Failed to read profiles {}", args.output.display()))?
    } else {
        ProfileSet::new()
    };
    if profiles.insert(args.name.clone(), calibration.profile.clone()).is_some() {
        info!(name = %args.name, "Replacing existing profile");
    }
    profiles
        .save(&args.output)
        .with_context(|| format!("Failed to write profiles to {}", args.output.display()))?;

    if args.json {
        info!(name = %args.name, path = %args.output.display(), "Saved profile");
        println!("{}", serde_json::to_string_pretty(&calibration.report()?)?);
        return Ok(());
    }

    println!(
        "Profile '{}' ({} bins) saved to {}",
        args.name,
        calibration.profile.bin_count(),
        args.output.display()
    );

    if args.report {
        print_calibration_report(&args.name, &calibration.report()?);
    }

    Ok(())
}
