// fernctl/src/sync/mod.rs
pub(crate) mod logic;
pub(crate) mod prune;

use std::path::PathBuf;

use crate::errors::Result;
use crate::ssm::ParameterStore;

/// Tag attached to every parameter a sync run writes.
pub const MARKER_TAG_KEY: &str = "fernctl-last-synced";

#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub prefix: String,
    pub file: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Treat parameters without a marker tag as stale.
    pub prune_untagged: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub timestamp: String,
    pub upserted: Vec<String>,
    pub pruned: Vec<String>,
    pub dry_run: bool,
}

/// Public entry point for the sync process.
///
/// Fail-fast: the first remote error aborts the run. Parameters written before
/// the failure stay written; nothing is rolled back.
pub async fn run_sync_flow(
    store: &dyn ParameterStore,
    request: &SyncRequest,
    options: SyncOptions,
) -> Result<SyncReport> {
    let timestamp = logic::sync_timestamp();
    logic::perform_sync_orchestration(store, request, options, &timestamp).await
}
