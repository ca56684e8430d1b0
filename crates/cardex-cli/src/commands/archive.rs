//! Archive command - browse previously extracted cards.

use clap::{Args, Subcommand};
use console::style;

use crate::output::{format_csv, OutputFormat};
use crate::store::{ArchiveEntry, ContactArchive};

use super::load_config;

/// Arguments for the archive command.
#[derive(Args)]
pub struct ArchiveArgs {
    #[command(subcommand)]
    command: ArchiveCommand,
}

#[derive(Subcommand)]
enum ArchiveCommand {
    /// List archived cards, newest first
    List {
        /// Maximum number of cards to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show archive file path
    Path,
}

pub async fn run(args: ArchiveArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let archive = ContactArchive::from_config(&config.archive);

    match args.command {
        ArchiveCommand::List { limit, format } => list(&archive, limit, format),
        ArchiveCommand::Path => {
            println!("Archive file: {}", archive.path().display());
            Ok(())
        }
    }
}

fn list(archive: &ContactArchive, limit: Option<usize>, format: OutputFormat) -> anyhow::Result<()> {
    let entries = archive.list(limit)?;

    match format {
        OutputFormat::Json => {
            // Photos are omitted from listings.
            let entries: Vec<ArchiveEntry> = entries
                .into_iter()
                .map(|e| ArchiveEntry { photo: None, ..e })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Csv => {
            let records: Vec<_> = entries.into_iter().map(|e| e.record).collect();
            print!("{}", format_csv(&records)?);
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("{} No archived cards.", style("ℹ").blue());
                return Ok(());
            }
            for entry in &entries {
                println!(
                    "{:>5}  {}  {:<28} {:<24} {}",
                    style(entry.job_id).cyan(),
                    entry.created_at.format("%Y-%m-%d %H:%M"),
                    entry.record.name,
                    entry.record.company,
                    style(entry.source.label()).dim()
                );
                println!("       {}", style(&entry.notes).dim());
            }
        }
    }

    Ok(())
}
