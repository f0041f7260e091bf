#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the school map ingestion tool.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use school_map_database::paths;
use school_map_database::schools::count_status;
use school_map_geocoder::nominatim::NominatimClient;
use school_map_geocoder::service_registry::nominatim_service;
use school_map_ingest::geocode::{DEFAULT_LIMIT, geocode_pending};
use school_map_ingest::{
    all_sources, default_export_path, dump_text, export_json, format_status, import_source,
    source_by_id,
};

#[derive(Parser)]
#[command(name = "school_map_ingest", about = "School social index ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a report into the store
    Import {
        /// Source identifier (e.g., "`sh_sozialindex`")
        source: String,
        /// Report to read instead of the source's default PDF
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
    /// Geocode schools that are missing coordinates
    Geocode {
        /// Maximum number of schools to geocode in this run
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u64,
    },
    /// Show how many schools have been geocoded
    Status,
    /// Write all located schools as JSON for the static map
    Export {
        /// Output file (defaults to `docs/schools.json`)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the raw text of a PDF to a file for layout analysis
    Dump {
        /// PDF to read
        pdf: PathBuf,
        /// Output text file
        #[arg(long, default_value = "debug_output.txt")]
        out: PathBuf,
    },
    /// List all configured report sources
    Sources,
    /// Start the API server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Import { source, pdf } => {
            let src = source_by_id(&source)?;
            let pdf = pdf.unwrap_or_else(|| src.default_pdf_path());
            let mut conn = school_map_database::open_default()?;

            let start = Instant::now();
            let summary = import_source(&mut conn, &src, &pdf)?;
            log::info!(
                "Import of {} complete in {:.1}s: {} new, {} reset, {} unchanged",
                src.id(),
                start.elapsed().as_secs_f64(),
                summary.inserted,
                summary.reset,
                summary.retained
            );
        }
        Commands::Geocode { limit } => {
            let conn = school_map_database::open_default()?;
            let service = nominatim_service();
            let client = NominatimClient::new(&service)?;

            let start = Instant::now();
            let summary = geocode_pending(&conn, &client, &service, limit).await?;
            log::info!(
                "Geocoded {} schools ({} not found) in {:.1}s",
                summary.located,
                summary.failed,
                start.elapsed().as_secs_f64()
            );
        }
        Commands::Status => {
            let conn = school_map_database::open_default()?;
            println!("{}", format_status(&count_status(&conn)?));
        }
        Commands::Export { out } => {
            let conn = school_map_database::open_default()?;
            let out = out.unwrap_or_else(default_export_path);
            let count = export_json(&conn, &out)?;
            println!("Wrote {count} schools to {}", out.display());
        }
        Commands::Dump { pdf, out } => {
            let chars = dump_text(&pdf, &out)?;
            println!("Wrote {chars} characters to {}", out.display());
        }
        Commands::Sources => {
            let sources = all_sources();
            println!("{:<20} {:<6} NAME", "ID", "STATE");
            println!("{}", "-".repeat(60));
            for source in &sources {
                println!("{:<20} {:<6} {}", source.id(), source.state, source.name());
            }
        }
        Commands::Serve => {
            let db_path = paths::db_path_from_env();
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(school_map_server::run_server(&db_path))
            })
            .await??;
        }
    }

    Ok(())
}
