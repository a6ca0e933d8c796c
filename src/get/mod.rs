// fernctl/src/get/mod.rs
use std::io::Write;
use tracing::debug;

use crate::errors::Result;
use crate::ssm::{Parameter, ParameterStore, ParameterTarget, PathPages};

/// Prints the parameters `target` selects, one `name: 'value'` line each.
///
/// Path listings are printed page by page as they arrive. A missing single
/// parameter surfaces the store's not-found error unchanged.
pub async fn run_get(
    store: &dyn ParameterStore,
    target: &ParameterTarget,
    out: &mut dyn Write,
) -> Result<()> {
    match target {
        ParameterTarget::Path(path) => {
            let mut pages = PathPages::new(store, path.as_str());
            let mut printed = 0usize;
            while let Some(batch) = pages.next_batch().await? {
                for parameter in &batch {
                    print_parameter(out, parameter)?;
                }
                printed += batch.len();
            }
            debug!(path = %path, count = printed, "Listed parameters by path");
        }
        ParameterTarget::Name(name) => {
            let parameter = store.get_parameter(name).await?;
            print_parameter(out, &parameter)?;
        }
    }
    Ok(())
}

fn print_parameter(out: &mut dyn Write, parameter: &Parameter) -> Result<()> {
    writeln!(out, "{}: '{}'", parameter.name, parameter.value)?;
    Ok(())
}
