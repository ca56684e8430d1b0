//! Extract command - read contact details from a single card image.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cardex_core::{ContactPipeline, ExtractionSource};

use crate::output::{format_result, OutputFormat};
use crate::store::ContactArchive;

use super::{load_config, read_card};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Card image (JPEG, PNG, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Save the result to the contact archive
    #[arg(long)]
    archive: bool,

    /// Send the image to vision backends unchanged
    #[arg(long)]
    no_compress: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing card: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));

    pb.set_message("Preparing image...");
    let card = read_card(&args.input, &config.image, args.no_compress)?;
    debug!(
        "Payload: {} bytes ({})",
        card.payload.data.len(),
        card.payload.mime_type
    );

    let pipeline = ContactPipeline::from_config(&config)?;
    pb.set_message(format!(
        "Reading card ({} vision backends)...",
        pipeline.cascade().len()
    ));

    let result = tokio::select! {
        result = pipeline.run(&card) => result?,
        Ok(()) = tokio::signal::ctrl_c() => {
            pb.abandon_with_message("Cancelled");
            anyhow::bail!("Extraction cancelled");
        }
    };

    pb.finish_and_clear();

    for failure in &result.failures {
        eprintln!("{} {}", style("!").yellow(), failure);
    }
    if result.source == ExtractionSource::Ocr {
        eprintln!("{} Vision unavailable, used OCR fallback", style("ℹ").blue());
    }

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.archive {
        let archive = ContactArchive::from_config(&config.archive);
        let file = args.input.file_name().and_then(|n| n.to_str());
        let photo = config.archive.store_photos.then_some(card.payload.data.as_slice());
        let entry = archive.append(file, &result, photo)?;
        eprintln!(
            "{} Archived as job {} in {}",
            style("✓").green(),
            entry.job_id,
            archive.path().display()
        );
    }

    debug!("Total processing time: {}ms", result.processing_time_ms);

    Ok(())
}
