use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cvpager::{
    Config, DisplayMode, FontSizeTier, LineSpacing, RenderOptions, Rgb, TemplateId,
    render_cv_to_pdf,
};

#[derive(Parser)]
#[command(version, about = "Lay out a resume document into fixed-size pages and write a PDF preview")]
struct Cli {
    /// Input document (JSON)
    input: PathBuf,

    /// Output PDF, defaults to the input path with a .pdf extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// luna, athena, phoenix, orion, caesar, sherlock or gatsby
    #[arg(long)]
    template: Option<TemplateId>,

    /// Font family
    #[arg(long)]
    font: Option<String>,

    /// xs, s, m, l or xl
    #[arg(long)]
    font_size: Option<FontSizeTier>,

    /// 1, 1.15, 1.25, 1.5 or 2
    #[arg(long)]
    line_spacing: Option<LineSpacing>,

    /// Accent color as #RRGGBB
    #[arg(long, value_parser = parse_accent)]
    accent: Option<Rgb>,

    /// Lay out for the thumbnail strip (no page padding)
    #[arg(long)]
    thumbnail: bool,

    /// Container width in px, used for the display scale
    #[arg(long)]
    width: Option<f32>,

    /// Print which chunks landed on each page
    #[arg(long)]
    partition: bool,
}

fn parse_accent(val: &str) -> Result<Rgb, String> {
    cvpager::content::parse_hex_color(val).ok_or_else(|| format!("'{val}' is not a #RRGGBB color"))
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("pdf"));
    let options = RenderOptions {
        template: cli.template,
        font: cli.font,
        font_size: cli.font_size,
        line_spacing: cli.line_spacing,
        accent: cli.accent,
        mode: if cli.thumbnail {
            DisplayMode::Thumbnail
        } else {
            DisplayMode::Full
        },
        width: cli.width,
        config: Config::from_env(),
    };

    match render_cv_to_pdf(&cli.input, &output, &options) {
        Ok(summary) => {
            println!(
                "{} -> {} ({}, {} chunks, {} pages, scale {:.3})",
                cli.input.display(),
                output.display(),
                summary.template,
                summary.chunks,
                summary.pages,
                summary.scale,
            );
            if summary.unpaginated {
                println!("warning: measurement failed, content was not paginated");
            }
            if cli.partition {
                for (i, chunks) in summary.partition.iter().enumerate() {
                    println!("  page {}: {:?}", i + 1, chunks);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
