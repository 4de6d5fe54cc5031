//! CLI entry point for the carbon footprint estimator.
//!
//! Provides subcommands for computing the weekly footprint from a store file,
//! saving slider values into it, serving the client pages, and stitching the
//! shared layout fragments into a page.

use anyhow::{Context, Result};
use carbon_footprint::{
    calculator::compute_total_footprint,
    fetch::BasicClient,
    layout::{
        FragmentSource, FragmentStatus, FsFragmentSource, HttpFragmentSource, default_fragments,
        load_layout,
    },
    output::{FootprintRecord, append_record, print_json, print_pretty},
    server::{self, StaticSite},
    store::{JsonFileStore, KeyValueStore, save_slider_value},
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "carbon_footprint")]
#[command(about = "Estimate weekly transport CO2 emissions and the Earths needed", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the footprint from a store file and write the results back into it
    Calculate {
        /// JSON store holding the slider values
        #[arg(short, long, default_value = "store.json")]
        store: PathBuf,

        /// CSV file to append the result to
        #[arg(long)]
        history: Option<String>,

        /// Log the result as JSON instead of a summary
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Save a slider value into a store file
    Set {
        /// JSON store to update
        #[arg(short, long, default_value = "store.json")]
        store: PathBuf,

        /// Store key, e.g. car_distance_1 or car_size_1
        key: String,

        /// Value; numbers are normalised, anything else is stored as text
        value: String,
    },
    /// Serve the client pages
    Serve {
        /// Directory holding the client pages
        #[arg(short, long, default_value = "client")]
        root: PathBuf,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 3000)]
        port: u16,

        /// Insert the shared header, footer and navigation into HTML pages
        #[arg(long, default_value_t = false)]
        stitch_layout: bool,
    },
    /// Insert the shared layout fragments into a page and print it
    Layout {
        /// HTML page to fill
        #[arg(value_name = "PAGE")]
        page: PathBuf,

        /// Directory to read fragments from (defaults to the page's directory)
        #[arg(short, long, conflicts_with = "base_url")]
        fragments_dir: Option<PathBuf>,

        /// URL the fragment names are resolved against
        #[arg(short, long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/carbon_footprint.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("carbon_footprint.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Calculate {
            store,
            history,
            json,
        } => {
            let mut store = JsonFileStore::open(&store)?;
            let result = compute_total_footprint(&mut store);

            if json {
                print_json(&result)?;
            } else {
                print_pretty(&result);
            }

            if let Some(path) = history {
                append_record(&path, &FootprintRecord::from_result(&result))?;
                info!(path = %path, "History record appended");
            }
        }
        Commands::Set { store, key, value } => {
            let mut store = JsonFileStore::open(&store)?;
            match value.trim().parse::<f64>() {
                Ok(number) => save_slider_value(&mut store, &key, number)?,
                Err(_) => store.set(&key, &value)?,
            }
            info!(key = %key, path = %store.path().display(), "Value saved");
        }
        Commands::Serve {
            root,
            port,
            stitch_layout,
        } => {
            if !root.is_dir() {
                warn!(root = %root.display(), "Client directory does not exist");
            }
            let mut site = StaticSite::new(root);
            if stitch_layout {
                site = site.with_layout(default_fragments());
            }
            let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
            server::run(addr, site).await?;
        }
        Commands::Layout {
            page,
            fragments_dir,
            base_url,
        } => {
            layout_page(&page, fragments_dir, base_url).await?;
        }
    }

    Ok(())
}

/// Stitches the default fragments into `page` and writes the result to stdout.
#[tracing::instrument(skip_all, fields(page = %page.display()))]
async fn layout_page(
    page: &Path,
    fragments_dir: Option<PathBuf>,
    base_url: Option<String>,
) -> Result<()> {
    let html = std::fs::read_to_string(page)
        .with_context(|| format!("failed to read page '{}'", page.display()))?;

    let source: Arc<dyn FragmentSource> = match base_url {
        Some(url) => Arc::new(HttpFragmentSource::new(BasicClient::new()?, &url)?),
        None => {
            let dir = fragments_dir.unwrap_or_else(|| {
                page.parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."))
                    .to_path_buf()
            });
            Arc::new(FsFragmentSource::new(dir))
        }
    };

    let report = load_layout(&html, source, &default_fragments()).await;

    for outcome in &report.outcomes {
        match &outcome.status {
            FragmentStatus::Inserted { bytes } => {
                info!(slot = %outcome.slot, source = %outcome.source, bytes, "Fragment inserted")
            }
            FragmentStatus::Skipped => {
                info!(slot = %outcome.slot, "No placeholder on page")
            }
            FragmentStatus::Failed { error } => {
                error!(slot = %outcome.slot, source = %outcome.source, error = %error, "Fragment not inserted")
            }
        }
    }

    println!("{}", report.html);
    Ok(())
}
