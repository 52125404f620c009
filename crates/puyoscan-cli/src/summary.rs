use std::path::Path;

use console::Style;
use puyoscan_core::classify::EMPTY_CODE;
use puyoscan_core::geometry::Rect;
use puyoscan_core::histogram::CompareMethod;
use puyoscan_core::layout::PlayerFields;
use puyoscan_core::pipeline::FieldAnalysis;
use puyoscan_core::profile::{CalibrationReport, ColorLabel};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    piece: Style,
    empty: Style,
    warn: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            piece: Style::new().green().bold(),
            empty: Style::new().dim(),
            warn: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn rule(len: usize) -> String {
    "\u{2550}".repeat(len)
}

fn rect_text(rect: &Rect) -> String {
    format!(
        "{:.1},{:.1}  {:.1}x{:.1}",
        rect.x(),
        rect.y(),
        rect.width(),
        rect.height()
    )
}

pub fn print_analysis(path: &Path, analysis: &FieldAnalysis) {
    let s = Styles::new();

    println!();
    println!(
        "  {} {}",
        s.title.apply_to(format!("Field {}", analysis.player)),
        s.path.apply_to(path.display())
    );
    println!("  {}", s.title.apply_to(rule(16)));
    println!();

    for row in analysis.matrix().to_rows() {
        let cells: Vec<String> = row
            .chars()
            .map(|c| {
                if c == EMPTY_CODE {
                    s.empty.apply_to(c).to_string()
                } else {
                    s.piece.apply_to(c).to_string()
                }
            })
            .collect();
        println!("    {}", cells.join(" "));
    }
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Occupied"),
        s.value.apply_to(analysis.occupied())
    );

    // Low-confidence pieces are the usual sign of a stale profile.
    let mut weakest: Option<(usize, usize, f64)> = None;
    for ((x, y), cell) in analysis.cells.indexed_iter() {
        if !cell.is_empty() && weakest.map_or(true, |(_, _, c)| cell.confidence < c) {
            weakest = Some((x, y, cell.confidence));
        }
    }
    if let Some((x, y, confidence)) = weakest {
        println!(
            "  {:<14}{} at ({x},{y})",
            s.label.apply_to("Weakest"),
            s.value.apply_to(format!("{confidence:.3}"))
        );
    }
}

pub fn print_regions(path: &Path, fields: &PlayerFields) {
    let s = Styles::new();

    println!();
    println!(
        "  {} {}",
        s.title.apply_to(format!("Regions {}", fields.player)),
        s.path.apply_to(path.display())
    );
    println!("  {}", s.title.apply_to(rule(18)));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Field"),
        s.value.apply_to(rect_text(&fields.field))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Score"),
        s.value.apply_to(rect_text(&fields.score_area))
    );
    println!();

    println!("  {}", s.header.apply_to("Cells"));
    for ((x, y), rect) in fields.cells.indexed_iter() {
        println!(
            "    {:<12}{}",
            s.label.apply_to(format!("({x},{y})")),
            rect_text(rect)
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Score digits"));
    for (i, rect) in fields.score_digits.iter().enumerate() {
        println!("    {:<12}{}", s.label.apply_to(i), rect_text(rect));
    }
    println!();
}

pub fn print_calibration_report(name: &str, report: &CalibrationReport) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to(format!("Calibration '{name}'")));
    println!("  {}", s.title.apply_to(rule(24)));
    println!();

    println!(
        "  {:<10}{:>8}  {:<10}{:>8}",
        s.header.apply_to("Label"),
        s.header.apply_to("Self"),
        s.header.apply_to("Nearest"),
        s.header.apply_to("Score")
    );
    for entry in &report.separability {
        let style = if entry.is_separable() { &s.value } else { &s.warn };
        println!(
            "  {:<10}{:>8.3}  {:<10}{:>8.3}",
            style.apply_to(entry.label),
            entry.self_similarity,
            entry.nearest_other.name(),
            entry.nearest_similarity
        );
    }
    println!();

    let swatches: usize = ColorLabel::ALL
        .iter()
        .map(|&label| {
            report
                .comparisons
                .iter()
                .filter(|c| c.reference == label && c.sample_label == label)
                .count()
        })
        .sum();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Swatches"),
        s.value.apply_to(swatches)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Comparisons"),
        s.value.apply_to(report.comparisons.len())
    );
    println!();

    // Rows are label averages, columns the swatches compared against them.
    for (m, method) in CompareMethod::ALL.iter().enumerate() {
        println!("  {}", s.header.apply_to(method));
        print!("  {:<10}", "");
        for sample in ColorLabel::ALL {
            print!("{:>10}", s.label.apply_to(sample));
        }
        println!();
        for reference in ColorLabel::ALL {
            print!("  {:<10}", s.label.apply_to(reference));
            for sample in ColorLabel::ALL {
                match report.mean_scores(reference, sample) {
                    Some(scores) => print!("{:>10.3}", scores[m]),
                    None => print!("{:>10}", "-"),
                }
            }
            println!();
        }
        println!();
    }
}
