use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use puyoscan_core::io::image_io::{load_frame, save_png};
use puyoscan_core::layout::Player;
use puyoscan_core::overlay::{draw_player_regions, OUTLINE_RGB};

use crate::summary::print_regions;

#[derive(Args)]
pub struct RegionsArgs {
    /// Captured frame
    pub frame: PathBuf,

    /// Player slot (1 or 2)
    #[arg(long, default_value = "1")]
    pub player: u8,

    /// Analyzer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print regions as JSON
    #[arg(long)]
    pub json: bool,

    /// Save the frame with every cell and digit outlined
    #[arg(long)]
    pub overlay: Option<PathBuf>,
}

pub fn run(args: &RegionsArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let mut frame = load_frame(&args.frame)
        .with_context(|| format!("Failed to load frame {}", args.frame.display()))?;

    let fields = config.locate(&frame, Player(args.player))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
    } else {
        print_regions(&args.frame, &fields);
    }

    if let Some(ref path) = args.overlay {
        draw_player_regions(&mut frame, &fields, OUTLINE_RGB)?;
        save_png(&frame, path)
            .with_context(|| format!("Failed to write overlay {}", path.display()))?;
        println!("Overlay saved to {}", path.display());
    }

    Ok(())
}
