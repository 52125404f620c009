use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use puyoscan_core::profile::{ColorLabel, ProfileSet};

#[derive(Args)]
pub struct ProfilesArgs {
    /// Profile file
    #[arg(default_value = "profiles.json")]
    pub file: PathBuf,
}

pub fn run(args: &ProfilesArgs) -> Result<()> {
    let profiles = ProfileSet::load(&args.file)
        .with_context(|| format!("Failed to read profiles {}", args.file.display()))?;

    println!("File:      {}", args.file.display());
    println!("Profiles:  {}", profiles.len());
    println!();

    print!("{:<20}{:>8}", "Name", "Bins");
    for label in ColorLabel::ALL {
        print!("{:>10}", label.name());
    }
    println!();
    println!("{}", "-".repeat(28 + 10 * ColorLabel::COUNT));

    // Per-label totals are the average masked pixel count of the swatches.
    for (name, profile) in profiles.iter() {
        print!("{:<20}{:>8}", name, profile.bin_count());
        for (_, hist) in profile.iter() {
            print!("{:>10.0}", hist.total());
        }
        println!();
    }

    Ok(())
}
