//! pdf2word CLI - layout enrichment and Word reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf2word::{
    inspect, CoordinateMode, EnrichOptions, FontSizeFallback, LayoutDocument, Pdf2Word,
    ReplayOptions, ReplayReport,
};

#[derive(Parser)]
#[command(name = "pdf2word")]
#[command(version)]
#[command(about = "Rebuild PDF layouts as Word documents with positioned text boxes and images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach average font sizes to text and title blocks
    Enrich {
        /// Structural layout JSON
        #[arg(value_name = "LAYOUT")]
        layout: PathBuf,

        /// Span-size dump JSON
        #[arg(value_name = "SPANS")]
        spans: PathBuf,

        /// Output file (default: <LAYOUT stem>_enriched.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Minimum fuzzy score (exclusive) for a match
        #[arg(long, default_value = "90")]
        threshold: u8,

        /// Fold compatibility characters (NFKC) before matching
        #[arg(long)]
        unicode_fold: bool,
    },

    /// Replay a layout into a .docx document
    Replay {
        /// Layout JSON, usually enriched
        #[arg(value_name = "LAYOUT")]
        layout: PathBuf,

        /// Output file (default: <LAYOUT stem>.docx)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        replay: ReplayArgs,
    },

    /// Enrich then replay in one run
    Convert {
        /// Structural layout JSON
        #[arg(value_name = "LAYOUT")]
        layout: PathBuf,

        /// Span-size dump JSON
        #[arg(value_name = "SPANS")]
        spans: PathBuf,

        /// Output .docx file (default: <LAYOUT stem>.docx)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Where to keep the enriched layout (default: <LAYOUT stem>_enriched.json)
        #[arg(long, value_name = "FILE")]
        enriched: Option<PathBuf>,

        /// Minimum fuzzy score (exclusive) for a match
        #[arg(long, default_value = "90")]
        threshold: u8,

        #[command(flatten)]
        replay: ReplayArgs,
    },

    /// Show layout information
    Info {
        /// Layout JSON
        #[arg(value_name = "LAYOUT")]
        layout: PathBuf,

        /// Image directory to check references against
        #[arg(long, value_name = "DIR")]
        image_dir: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct ReplayArgs {
    /// Image directory (default: images/ next to the layout)
    #[arg(long, value_name = "DIR", env = "PDF2WORD_IMAGE_DIR")]
    image_dir: Option<PathBuf>,

    /// How block boxes relate to their page
    #[arg(long, value_enum, default_value = "as-is")]
    coords: CoordsMode,

    /// Font size for blocks without a matched size
    #[arg(long, value_enum, default_value = "fixed")]
    font_fallback: FontMode,

    /// Write the per-block replay report as JSON
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CoordsMode {
    /// Boxes are already relative to their page
    AsIs,
    /// Boxes are in a stacked multi-page space
    PageRelative,
}

impl From<CoordsMode> for CoordinateMode {
    fn from(mode: CoordsMode) -> Self {
        match mode {
            CoordsMode::AsIs => CoordinateMode::AsIs,
            CoordsMode::PageRelative => CoordinateMode::PageRelative,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FontMode {
    /// 12pt titles, 10pt text
    Fixed,
    /// Estimate from the block box and character count
    Estimated,
}

impl From<FontMode> for FontSizeFallback {
    fn from(mode: FontMode) -> Self {
        match mode {
            FontMode::Fixed => FontSizeFallback::default(),
            FontMode::Estimated => FontSizeFallback::Estimated,
        }
    }
}

impl ReplayArgs {
    fn options(&self) -> ReplayOptions {
        let mut options = ReplayOptions::new()
            .with_coordinate_mode(self.coords.into())
            .with_font_fallback(self.font_fallback.into());
        if let Some(dir) = &self.image_dir {
            options = options.with_image_dir(dir.clone());
        }
        log::debug!("Replay options: {:?}", options);
        options
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Enrich {
            layout,
            spans,
            output,
            threshold,
            unicode_fold,
        }) => cmd_enrich(&layout, &spans, output.as_deref(), threshold, unicode_fold),
        Some(Commands::Replay {
            layout,
            output,
            replay,
        }) => cmd_replay(&layout, output.as_deref(), &replay),
        Some(Commands::Convert {
            layout,
            spans,
            output,
            enriched,
            threshold,
            replay,
        }) => cmd_convert(
            &layout,
            &spans,
            output.as_deref(),
            enriched.as_deref(),
            threshold,
            &replay,
        ),
        Some(Commands::Info {
            layout,
            image_dir,
            json,
        }) => cmd_info(&layout, image_dir.as_deref(), json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pdf2word <COMMAND> ...".yellow());
            println!("       pdf2word --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// `<dir>/<stem><suffix>` next to `input`.
fn sibling(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}{}", stem, suffix))
}

fn progress(steps: u64) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(steps);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn cmd_enrich(
    layout: &Path,
    spans: &Path,
    output: Option<&Path>,
    threshold: u8,
    unicode_fold: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sibling(layout, "_enriched.json"));

    let pb = progress(1)?;
    pb.set_message("Matching blocks against spans...");
    let options = EnrichOptions::new()
        .with_accept_score(threshold)
        .with_unicode_fold(unicode_fold);
    let stats = Pdf2Word::new()
        .with_enrich_options(options)
        .enrich(layout, spans, &output)?;
    pb.inc(1);
    pb.finish_with_message("Done!");

    println!("\n{}", "Enrichment".green().bold());
    println!("  {} {} blocks considered", "├─".dimmed(), stats.blocks_considered);
    println!("  {} {} enriched", "├─".dimmed(), stats.enriched.to_string().green());
    println!(
        "  {} {} unmatched, {} index misses, {} empty",
        "├─".dimmed(),
        stats.unmatched,
        stats.index_misses,
        stats.empty
    );
    println!("  {} {}", "└─".dimmed(), output.display());

    Ok(())
}

fn cmd_replay(layout: &Path, output: Option<&Path>, args: &ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sibling(layout, ".docx"));

    let pb = progress(1)?;
    pb.set_message("Placing blocks...");
    let report = Pdf2Word::new()
        .with_replay_options(args.options())
        .replay(layout, &output)?;
    pb.inc(1);
    pb.finish_with_message("Done!");

    print_report(&report);
    write_report(&report, args.report.as_deref())?;
    println!("\n{} {}", "Saved to".green(), output.display());

    Ok(())
}

fn cmd_convert(
    layout: &Path,
    spans: &Path,
    output: Option<&Path>,
    enriched: Option<&Path>,
    threshold: u8,
    args: &ReplayArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sibling(layout, ".docx"));
    let enriched = enriched
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sibling(layout, "_enriched.json"));

    let pb = progress(1)?;
    pb.set_message("Enriching and replaying...");
    let summary = Pdf2Word::new()
        .with_accept_score(threshold)
        .with_replay_options(args.options())
        .convert(layout, spans, &enriched, &output)?;
    pb.inc(1);
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} blocks",
        "Enriched".green().bold(),
        summary.enrich.enriched,
        summary.enrich.blocks_considered
    );
    print_report(&summary.replay);
    write_report(&summary.replay, args.report.as_deref())?;

    println!("\n{}", "Output files:".green().bold());
    println!("  {} {}", "├─".dimmed(), enriched.display());
    println!("  {} {}", "└─".dimmed(), output.display());

    Ok(())
}

fn print_report(report: &ReplayReport) {
    println!("\n{}", "Replay".green().bold());
    println!("  {} {} pages", "├─".dimmed(), report.pages);
    println!("  {} {} inserted", "├─".dimmed(), report.inserted.to_string().green());
    println!("  {} {} degraded", "├─".dimmed(), report.degraded.to_string().yellow());
    println!("  {} {} skipped", "└─".dimmed(), report.skipped.to_string().red());
    if report.geometry_failures > 0 {
        println!(
            "{} page setup failed on {} pages",
            "Warning:".yellow().bold(),
            report.geometry_failures
        );
    }
}

fn write_report(report: &ReplayReport, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = path {
        fs::write(path, report.to_json()?)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }
    Ok(())
}

fn cmd_info(layout: &Path, image_dir: Option<&Path>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = LayoutDocument::from_path(layout)?;
    let default_dir = layout.parent().unwrap_or_else(|| Path::new("")).join("images");
    log::debug!("Checking image references against {}", image_dir.unwrap_or(&default_dir).display());
    let summary = inspect(&doc, Some(image_dir.unwrap_or(&default_dir)));

    if json {
        println!("{}", summary.to_json()?);
        return Ok(());
    }

    println!("{}", "Layout Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), layout.display());
    println!("{}: {}", "Pages".bold(), summary.pages);
    println!("{}: {}", "Blocks".bold(), summary.blocks);
    for (kind, count) in &summary.kinds {
        println!("  {} {}: {}", "·".dimmed(), kind, count);
    }
    println!("{}: {}", "Inferred types".bold(), summary.inferred);
    println!("{}: {}", "Unresolved".bold(), summary.unresolved);

    println!();
    println!("{}", "Enrichment".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {} / {} ({:.0}%)",
        "Sized blocks".bold(),
        summary.enriched,
        summary.textual,
        summary.enrichment_ratio() * 100.0
    );

    println!();
    println!("{}", "Assets".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Image references".bold(), summary.image_refs);
    if summary.missing_images.is_empty() {
        println!("{}: {}", "Missing".bold(), "none".green());
    } else {
        println!("{}: {}", "Missing".bold(), summary.missing_images.len().to_string().red());
        for name in &summary.missing_images {
            println!("  {} {}", "·".dimmed(), name);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf2word".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout-preserving PDF to Word reconstruction");
    println!();
    println!("Library: pdf2word {}", pdf2word::VERSION);
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_paths() {
        assert_eq!(
            sibling(Path::new("out/layout.json"), "_enriched.json"),
            PathBuf::from("out/layout_enriched.json")
        );
        assert_eq!(sibling(Path::new("layout.json"), ".docx"), PathBuf::from("layout.docx"));
    }

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "pdf2word",
            "convert",
            "layout.json",
            "analysis.json",
            "--coords",
            "page-relative",
            "--font-fallback",
            "estimated",
        ])
        .unwrap();
        let Some(Commands::Convert { replay, threshold, .. }) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(threshold, 90);
        let options = replay.options();
        assert_eq!(options.coordinate_mode, CoordinateMode::PageRelative);
        assert_eq!(options.font_fallback, FontSizeFallback::Estimated);
    }
}
