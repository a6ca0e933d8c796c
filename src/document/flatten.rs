// fernctl/src/document/flatten.rs
use std::collections::BTreeMap;

use super::{Document, DocumentError, DocumentMap, Scalar};

/// Fully-qualified path to string value, ordered by path.
pub type FlatEntries = BTreeMap<String, String>;

/// Flattens `root` into `path -> value` pairs rooted at `prefix`.
///
/// Map keys and list indices are joined with `/`. List elements must be maps
/// and leaves must be strings; anything else is reported with the offending
/// path. The traversal uses an explicit work stack rather than recursion.
pub fn flatten(root: &DocumentMap, prefix: &str) -> Result<FlatEntries, DocumentError> {
    let mut entries = FlatEntries::new();
    let mut pending: Vec<(String, &DocumentMap)> = vec![(prefix.to_string(), root)];

    while let Some((base, map)) = pending.pop() {
        for (key, value) in map {
            let path = format!("{base}{key}");
            match value {
                Document::Map(child) => pending.push((format!("{path}/"), child)),
                Document::List(items) => {
                    for (index, item) in items.iter().enumerate() {
                        let item_path = format!("{path}/{index}");
                        match item {
                            Document::Map(child) => pending.push((format!("{item_path}/"), child)),
                            other => {
                                return Err(DocumentError::ListElementNotMap {
                                    path: item_path,
                                    found: other.kind(),
                                });
                            }
                        }
                    }
                }
                Document::Scalar(Scalar::String(s)) => {
                    entries.insert(path, s.clone());
                }
                other => {
                    return Err(DocumentError::NonStringLeaf {
                        path,
                        found: other.kind(),
                    });
                }
            }
        }
    }

    Ok(entries)
}
