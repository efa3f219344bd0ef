use std::path::{Path, PathBuf};

use catalog::prelude::*;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(about = "Materialize sorted product views and page through them")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (defaults to ./catalog.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level filter, overrides the configured level (RUST_LOG wins over both)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read the source file once and write the three sorted views
    Materialize,

    /// Print one page of a sorted view
    Page {
        /// Sort key: id, name or price (anything else selects id)
        #[arg(short, long)]
        sort_by: Option<String>,

        /// 1-based page number
        #[arg(short, long, allow_hyphen_values = true)]
        page: Option<i64>,

        /// Records per page
        #[arg(long, allow_hyphen_values = true)]
        page_size: Option<i64>,

        /// Print the page as JSON instead of one line per record
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    CliApp::new("catalog")
        .run(|mut stdout, cancel| async move {
            let config = load_config(cli.config.as_deref())?;
            init_tracing(&config.log, cli.log_level.as_deref())?;

            match cli.command {
                Command::Materialize => materialize(&config, &mut stdout, cancel).await,
                Command::Page {
                    sort_by,
                    page,
                    page_size,
                    json,
                } => {
                    let query = PageQuery {
                        page_number: page,
                        page_size,
                        sort_by,
                    };
                    print_page(&config, &query, json, &mut stdout).await
                }
            }
        })
        .await
}

/// Explicit path must exist; the implicit default file is optional
fn load_config(path: Option<&Path>) -> Result<AppConfig, AppError> {
    match path {
        Some(path) => Ok(AppConfig::from_file(path)?),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Ok(AppConfig::from_file(DEFAULT_CONFIG_FILE)?)
        }
        None => Ok(AppConfig::default()),
    }
}

async fn materialize<W: AsyncWrite + Unpin>(
    config: &AppConfig,
    out: &mut W,
    cancel: CancellationToken,
) -> Result<(), AppError> {
    let layout = DataLayout::from_config(&config.storage);
    let pipeline = MaterializationPipeline::new(layout, config.pipeline.clone());

    let report = pipeline
        .spawn(cancel)
        .await
        .map_err(|e| AppError::Task(e.to_string()))??;

    let summary = format!(
        "Materialized {} records ({} rejected lines, {} batches)\n",
        report.records_written, report.lines_rejected, report.batches_written
    );
    out.write_all(summary.as_bytes()).await?;
    for path in &report.outputs {
        out.write_all(format!("{}\n", path.display()).as_bytes())
            .await?;
    }
    out.flush().await?;
    Ok(())
}

async fn print_page<W: AsyncWrite + Unpin>(
    config: &AppConfig,
    query: &PageQuery,
    json: bool,
    out: &mut W,
) -> Result<(), AppError> {
    let reader = PageReader::new(
        DataLayout::from_config(&config.storage),
        config.reader.clone(),
    );
    let page = reader.query(query).await?;

    if json {
        let mut body = serde_json::to_vec_pretty(&page)?;
        body.push(b'\n');
        out.write_all(&body).await?;
    } else {
        for record in &page.items {
            out.write_all(format!("{record}\n").as_bytes()).await?;
        }
    }
    out.flush().await?;
    Ok(())
}
