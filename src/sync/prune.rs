// fernctl/src/sync/prune.rs
use std::collections::BTreeSet;
use tracing::debug;

use super::MARKER_TAG_KEY;
use crate::errors::Result;
use crate::ssm::{ParameterStore, PathPages, Tag};

/// A parameter is stale when its marker differs from `current` by exact
/// string comparison. A missing marker counts as stale only if
/// `prune_untagged` is set.
pub fn is_stale(tags: &[Tag], current: &str, prune_untagged: bool) -> bool {
    match tags.iter().find(|tag| tag.key == MARKER_TAG_KEY) {
        Some(tag) => tag.value != current,
        None => prune_untagged,
    }
}

/// Lists everything under `path` and returns the stale names, skipping
/// `exempt`. The whole listing is read before anything is deleted.
pub async fn find_stale(
    store: &dyn ParameterStore,
    path: &str,
    current: &str,
    prune_untagged: bool,
    exempt: &BTreeSet<String>,
) -> Result<Vec<String>> {
    let mut stale = Vec::new();
    let mut pages = PathPages::new(store, path);

    while let Some(batch) = pages.next_batch().await? {
        for parameter in batch {
            if exempt.contains(&parameter.name) {
                continue;
            }
            let tags = store.list_tags(&parameter.name).await?;
            if is_stale(&tags, current, prune_untagged) {
                debug!(name = %parameter.name, "Parameter is stale");
                stale.push(parameter.name);
            }
        }
    }

    Ok(stale)
}

/// Deletes `names` in order, stopping at the first failure.
pub async fn prune(store: &dyn ParameterStore, names: &[String]) -> Result<Vec<String>> {
    let mut pruned = Vec::with_capacity(names.len());
    for name in names {
        println!("Pruning {}", name);
        store.delete_parameter(name).await?;
        pruned.push(name.clone());
    }
    Ok(pruned)
}
