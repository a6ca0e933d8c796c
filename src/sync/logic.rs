// fernctl/src/sync/logic.rs
use chrono::{SecondsFormat, Utc};
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::prune::{find_stale, prune};
use super::{MARKER_TAG_KEY, SyncOptions, SyncReport, SyncRequest};
use crate::document::{self, DocumentMap};
use crate::errors::Result;
use crate::ssm::{ParameterStore, Tag};

/// Run timestamp, RFC3339 in UTC with second precision.
pub fn sync_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Prepends `/` when missing.
pub fn with_leading_slash(key: &str) -> String {
    if key.starts_with('/') {
        key.to_string()
    } else {
        format!("/{}", key)
    }
}

/// Normalizes a sync prefix to `/name` form. The root prefix becomes the
/// empty string so that joining with a `/key` never doubles the slash.
pub fn normalize_prefix(prefix: &str) -> String {
    with_leading_slash(prefix).trim_end_matches('/').to_string()
}

/// Path handed to by-path listings for a normalized prefix.
fn listing_path(prefix: &str) -> &str {
    if prefix.is_empty() { "/" } else { prefix }
}

/// Everything a run will write, computed before the first remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub prefix: String,
    pub writes: Vec<(String, String)>,
}

impl SyncPlan {
    pub fn build(prefix: &str, doc: &DocumentMap) -> Result<Self> {
        let prefix = normalize_prefix(prefix);
        let writes = document::flatten(doc, "/")?
            .into_iter()
            .map(|(key, value)| (format!("{}{}", prefix, with_leading_slash(&key)), value))
            .collect();
        Ok(SyncPlan { prefix, writes })
    }

    fn names(&self) -> BTreeSet<String> {
        self.writes.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// Orchestrates a sync run:
/// 1. Reads and flattens the document into a write plan.
/// 2. Upserts every entry as a secure string and tags it with `timestamp`.
/// 3. Lists the prefix and deletes parameters whose marker is stale.
///
/// With `dry_run` set, steps 2 and 3 only report what they would do.
pub async fn perform_sync_orchestration(
    store: &dyn ParameterStore,
    request: &SyncRequest,
    options: SyncOptions,
    timestamp: &str,
) -> Result<SyncReport> {
    let doc = document::load_file(&request.file)?;
    let plan = SyncPlan::build(&request.prefix, &doc)?;
    info!(
        prefix = %plan.prefix,
        entries = plan.writes.len(),
        timestamp,
        dry_run = request.dry_run,
        "Starting sync"
    );

    let mut report = SyncReport {
        timestamp: timestamp.to_string(),
        dry_run: request.dry_run,
        ..SyncReport::default()
    };

    let marker = Tag::new(MARKER_TAG_KEY, timestamp);
    for (name, value) in &plan.writes {
        if request.dry_run {
            println!("Would upsert {}", name);
        } else {
            println!("Upserting {}", name);
            store.put_secure_parameter(name, value).await?;
            store.add_tag(name, &marker).await?;
        }
        report.upserted.push(name.clone());
    }

    let stale = find_stale(
        store,
        listing_path(&plan.prefix),
        timestamp,
        options.prune_untagged,
        &plan.names(),
    )
    .await?;
    debug!(count = stale.len(), "Stale parameters found");

    if request.dry_run {
        for name in &stale {
            println!("Would prune {}", name);
        }
        report.pruned = stale;
    } else {
        report.pruned = prune(store, &stale).await?;
    }

    Ok(report)
}
