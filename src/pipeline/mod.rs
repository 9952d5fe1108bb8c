pub mod ingest;
pub mod orchestrator;
