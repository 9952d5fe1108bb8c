use std::path::Path;
use std::process::ExitCode;

use pdf_image_ingest::config::manifest::Manifest;
use pdf_image_ingest::config::merged::MergedEntryConfig;
use pdf_image_ingest::config::{self};
use pdf_image_ingest::image::jbig2::count_distinct_globals;
use pdf_image_ingest::pipeline::ingest::IngestJob;
use pdf_image_ingest::pipeline::orchestrator::run_all;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: pdf_image_ingest <manifest.yaml>...");
        eprintln!("  Validate CCITT, JBIG2 and placeable WMF images listed in each manifest.");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pdf_image_ingest {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let mut jobs: Vec<IngestJob> = Vec::new();
    let mut parallel_workers = 0;

    for manifest_arg in &args {
        let manifest_path = Path::new(manifest_arg);

        // Load settings from the same directory as the manifest.
        let settings = match config::load_settings_for_manifest(manifest_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings for {manifest_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };
        parallel_workers = parallel_workers.max(settings.parallel_workers);

        let manifest = match Manifest::from_file(manifest_path) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("ERROR: Failed to read manifest {manifest_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Resolve manifest directory for relative paths.
        let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));

        for entry in manifest.images {
            let merged = MergedEntryConfig::new(&settings, &entry);
            jobs.push(IngestJob::new(base_dir, entry, merged));
        }
    }

    let results = match run_all(&jobs, parallel_workers) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut has_error = false;
    let mut records = Vec::new();
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(ingested) => {
                let record = &ingested.record;
                eprintln!(
                    "OK: {} ({:?}, {} x {} pt)",
                    ingested.source_path.display(),
                    record.kind(),
                    record.width(),
                    record.height()
                );
                records.push(ingested.record);
            }
            Err(e) => {
                eprintln!("ERROR: {}: {e}", job.source_path.display());
                has_error = true;
            }
        }
    }

    eprintln!(
        "{} image(s) ingested, {} distinct JBIG2 globals",
        records.len(),
        count_distinct_globals(&records)
    );

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
