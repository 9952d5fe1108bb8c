// Phase 7: 全エントリ実行

use rayon::prelude::*;
use tracing::warn;

use crate::error::IngestError;
use crate::pipeline::ingest::{IngestJob, IngestResult, SharedGlobals, ingest_entry_shared};

/// Ingest all entries in parallel, collecting results in input order.
/// One entry failure does NOT prevent other entries from being ingested.
///
/// Entries naming the same globals file share one store.
/// `parallel_workers == 0` uses the global rayon pool.
pub fn run_all(
    jobs: &[IngestJob],
    parallel_workers: usize,
) -> crate::error::Result<Vec<crate::error::Result<IngestResult>>> {
    let shared = SharedGlobals::load(jobs);
    if parallel_workers == 0 {
        return Ok(ingest_parallel(jobs, &shared));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallel_workers)
        .build()
        .map_err(|e| IngestError::config(format!("Failed to build worker pool: {e}")))?;
    Ok(pool.install(|| ingest_parallel(jobs, &shared)))
}

fn ingest_parallel(
    jobs: &[IngestJob],
    shared: &SharedGlobals,
) -> Vec<crate::error::Result<IngestResult>> {
    jobs.par_iter()
        .map(|job| {
            let result = ingest_entry_shared(job, shared);
            if let Err(e) = &result {
                warn!(source = %job.source_path.display(), error = %e, "image ingestion failed");
            }
            result
        })
        .collect()
}
