//! Batch command - extract many cards concurrently.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use cardex_core::models::config::ImageConfig;
use cardex_core::{ContactPipeline, ExtractionResult};

use crate::output::{format_result, OutputFormat};
use crate::store::ContactArchive;

use super::{is_card_image, load_config, read_card};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching card images
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each card
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of cards processed at once
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Save results to the contact archive
    #[arg(long)]
    archive: bool,

    /// Send images to vision backends unchanged
    #[arg(long)]
    no_compress: bool,
}

/// Outcome of one card.
struct CardOutcome {
    index: usize,
    path: PathBuf,
    result: Result<(ExtractionResult, Vec<u8>), String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_card_image(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} cards to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cards")?
            .progress_chars("=>-"),
    );

    let pipeline = Arc::new(ContactPipeline::from_config(&config)?);
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let pipeline = Arc::clone(&pipeline);
        let semaphore = Arc::clone(&semaphore);
        let image_config = config.image.clone();
        let no_compress = args.no_compress;

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let file_start = Instant::now();
            let result = process_card(&pipeline, &path, &image_config, no_compress)
                .await
                .map_err(|e| e.to_string());
            CardOutcome {
                index,
                path,
                result,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            }
        });
    }

    let mut outcomes = Vec::new();
    loop {
        let joined = tokio::select! {
            joined = tasks.join_next() => joined,
            Ok(()) = tokio::signal::ctrl_c() => {
                tasks.abort_all();
                pb.abandon_with_message("Cancelled");
                anyhow::bail!("Batch cancelled after {} cards", outcomes.len());
            }
        };
        let Some(joined) = joined else { break };
        let outcome = joined?;

        if let Err(e) = &outcome.result {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", outcome.path.display(), e);
            } else {
                error!("Failed to process {}: {}", outcome.path.display(), e);
                tasks.abort_all();
                pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", outcome.path.display(), e);
            }
        }

        pb.inc(1);
        outcomes.push(outcome);
    }

    pb.finish_with_message("Complete");
    outcomes.sort_by_key(|o| o.index);

    if let Some(output_dir) = &args.output_dir {
        for outcome in &outcomes {
            if let Ok((result, _)) = &outcome.result {
                let output_name = outcome
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("card");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));
                fs::write(&output_path, format_result(result, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.archive {
        let archive = ContactArchive::from_config(&config.archive);
        for outcome in &outcomes {
            if let Ok((result, photo)) = &outcome.result {
                let file = outcome.path.file_name().and_then(|n| n.to_str());
                let photo = config.archive.store_photos.then_some(photo.as_slice());
                archive.append(file, result, photo)?;
            }
        }
        println!(
            "{} Archived to {}",
            style("✓").green(),
            archive.path().display()
        );
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = outcomes.iter().filter(|o| o.result.is_err()).collect();
    let from_ocr = outcomes
        .iter()
        .filter(|o| matches!(&o.result, Ok((r, _)) if r.source == cardex_core::ExtractionSource::Ocr))
        .count();

    println!();
    println!(
        "{} Processed {} cards in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful ({} via OCR), {} failed",
        style(outcomes.len() - failed.len()).green(),
        from_ocr,
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            if let Err(e) = &outcome.result {
                println!("  - {}: {}", outcome.path.display(), e);
            }
        }
    }

    Ok(())
}

async fn process_card(
    pipeline: &ContactPipeline,
    path: &Path,
    image_config: &ImageConfig,
    no_compress: bool,
) -> anyhow::Result<(ExtractionResult, Vec<u8>)> {
    let card = read_card(path, image_config, no_compress)?;
    let result = pipeline.run(&card).await?;
    Ok((result, card.payload.data))
}

fn write_summary(path: &Path, outcomes: &[CardOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "source",
        "name",
        "company",
        "title",
        "phone",
        "email",
        "address",
        "website",
        "processing_time_ms",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = outcome.processing_time_ms.to_string();

        match &outcome.result {
            Ok((result, _)) => {
                let r = &result.record;
                wtr.write_record([
                    filename,
                    "success",
                    result.source.label(),
                    &r.name,
                    &r.company,
                    &r.title,
                    &r.phone,
                    &r.email,
                    &r.address,
                    &r.website,
                    &time,
                    "",
                ])?;
            }
            Err(e) => {
                wtr.write_record([
                    filename, "error", "", "", "", "", "", "", "", "", &time, e,
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
