use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use waybill::source::{JsonFileRecordSource, RecordSource};
use waybill::types::PageGeometry;
use waybill::{CancellationFlag, DocumentGenerator, GeneratorConfig};

/// Generate shipment waybill PDFs from exported tracking records.
#[derive(Parser, Debug)]
#[command(name = "waybill", version, about)]
struct Cli {
    /// Configuration file (TOML). Defaults to ./waybill.toml when present.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the PDF for a tracking number.
    Render {
        /// JSON file holding one record or an array of records.
        #[arg(short, long)]
        records: PathBuf,
        tracking_number: String,
        /// Directory the PDF is written to.
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Use US Letter instead of the configured page size.
        #[arg(long)]
        letter: bool,
    },
    /// Print the stored record for a tracking number as JSON.
    Show {
        #[arg(short, long)]
        records: PathBuf,
        tracking_number: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = GeneratorConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Command::Render {
            records,
            tracking_number,
            out_dir,
            letter,
        } => {
            let source = open_source(&records).await?;
            let geometry = if letter {
                PageGeometry::letter()
            } else {
                config.page
            };
            let generator = DocumentGenerator::new(source, config)?;

            let written = generator
                .generate_to_file(&tracking_number, &geometry, &out_dir, CancellationFlag::new())
                .await
                .with_context(|| format!("rendering {} into {}", tracking_number, out_dir.display()))?;
            info!("Wrote {} page(s) to {}", written.page_count, written.path.display());
        }
        Command::Show {
            records,
            tracking_number,
        } => {
            let source = open_source(&records).await?;
            let generator = DocumentGenerator::new(source, config)?;
            let record = generator.lookup(&tracking_number).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}

async fn open_source(path: &PathBuf) -> anyhow::Result<Arc<dyn RecordSource>> {
    let source = JsonFileRecordSource::open(path)
        .await
        .with_context(|| format!("reading records from {}", path.display()))?;
    Ok(Arc::new(source))
}
