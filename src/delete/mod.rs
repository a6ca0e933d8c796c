// fernctl/src/delete/mod.rs
//! `ssm delete`: fail-soft removal of one parameter or a whole path.
//!
//! Individual failures never abort the command; they are collected into the
//! report's failure list. Only a failure to list the path is returned as an
//! error.

use std::io::Write;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::ssm::{ParameterStore, ParameterTarget, PathPages};

/// Names deleted and names that could not be deleted, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
}

impl DeleteReport {
    pub fn print(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "Success: [{}]", self.deleted.join(", "))?;
        writeln!(out, "Failures: [{}]", self.failed.join(", "))
    }
}

pub async fn run_delete(
    store: &dyn ParameterStore,
    target: &ParameterTarget,
    batch_size: usize,
) -> Result<DeleteReport> {
    let mut report = DeleteReport::default();

    match target {
        ParameterTarget::Path(path) => {
            let names: Vec<String> = PathPages::new(store, path.as_str())
                .collect_all()
                .await?
                .into_iter()
                .map(|parameter| parameter.name)
                .collect();
            debug!(path = %path, count = names.len(), "Deleting parameters by path");

            for chunk in names.chunks(batch_size.max(1)) {
                match store.delete_parameters(chunk).await {
                    Ok(outcome) => {
                        report.deleted.extend(outcome.deleted);
                        report.failed.extend(outcome.invalid);
                    }
                    Err(e) => {
                        warn!(error = %e, "Batch delete rejected");
                        report.failed.extend(chunk.iter().cloned());
                    }
                }
            }
        }
        ParameterTarget::Name(name) => match store.delete_parameter(name).await {
            Ok(()) => report.deleted.push(name.clone()),
            Err(e) => {
                warn!(error = %e, "Delete rejected");
                report.failed.push(name.clone());
            }
        },
    }

    Ok(report)
}
