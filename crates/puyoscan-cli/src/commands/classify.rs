use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use puyoscan_core::io::image_io::{load_frame, save_png};
use puyoscan_core::layout::Player;
use puyoscan_core::overlay::{draw_player_regions, OUTLINE_RGB};
use puyoscan_core::pipeline::{FieldAnalysis, FieldAnalyzer};
use puyoscan_core::profile::ProfileSet;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::summary::print_analysis;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Captured frames to classify
    #[arg(required = true)]
    pub frames: Vec<PathBuf>,

    /// Profile file written by `calibrate`
    #[arg(long, default_value = "profiles.json")]
    pub profiles: PathBuf,

    /// Profile to classify against (overrides the config)
    #[arg(long)]
    pub profile: Option<String>,

    /// Player slot (1 or 2)
    #[arg(long, default_value = "1")]
    pub player: u8,

    /// Similarity at or below which a cell is empty (overrides the config)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Analyzer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write each frame with its regions outlined into this directory
    #[arg(long)]
    pub overlay_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct FrameReport<'a> {
    file: &'a Path,
    matrix: Vec<String>,
    analysis: &'a FieldAnalysis,
}

pub fn run(args: &ClassifyArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(ref name) = args.profile {
        config.profile = name.clone();
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }

    let profiles = ProfileSet::load(&args.profiles)
        .with_context(|| format!("Failed to read profiles {}", args.profiles.display()))?;
    let analyzer = FieldAnalyzer::new(config, &profiles)?;
    let player = Player(args.player);

    if let Some(ref dir) = args.overlay_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let pb = ProgressBar::new(args.frames.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Classifying frames");

    let results: Vec<FieldAnalysis> = args
        .frames
        .par_iter()
        .map(|path| {
            let analysis = classify_frame(&analyzer, path, player, args.overlay_dir.as_deref());
            pb.inc(1);
            analysis
        })
        .collect::<Result<_>>()?;

    pb.finish_and_clear();

    if args.json {
        let reports: Vec<FrameReport> = args
            .frames
            .iter()
            .zip(&results)
            .map(|(path, analysis)| FrameReport {
                file: path,
                matrix: analysis.matrix().to_rows(),
                analysis,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (path, analysis) in args.frames.iter().zip(&results) {
            print_analysis(path, analysis);
        }
    }

    Ok(())
}

fn classify_frame(
    analyzer: &FieldAnalyzer,
    path: &Path,
    player: Player,
    overlay_dir: Option<&Path>,
) -> Result<FieldAnalysis> {
    let mut frame =
        load_frame(path).with_context(|| format!("Failed to load frame {}", path.display()))?;
    let analysis = analyzer
        .analyze(&frame, player)
        .with_context(|| format!("Failed to classify {}", path.display()))?;

    if let Some(dir) = overlay_dir {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame".to_string());
        let out = dir.join(format!("{stem}_overlay.png"));
        draw_player_regions(&mut frame, &analysis.fields, OUTLINE_RGB)?;
        save_png(&frame, &out)
            .with_context(|| format!("Failed to write overlay {}", out.display()))?;
        debug!(path = %out.display(), "Saved overlay");
    }

    Ok(analysis)
}
