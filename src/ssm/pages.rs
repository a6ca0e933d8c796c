// fernctl/src/ssm/pages.rs
use super::{Parameter, ParameterStore};
use crate::errors::Result;

/// Lazy cursor over a recursive by-path listing.
///
/// Each call to [`PathPages::next_batch`] issues at most one request; the
/// listing ends when the store returns no continuation token (or an empty one).
pub struct PathPages<'a> {
    store: &'a dyn ParameterStore,
    path: String,
    next_token: Option<String>,
    done: bool,
}

impl<'a> PathPages<'a> {
    pub fn new(store: &'a dyn ParameterStore, path: impl Into<String>) -> Self {
        PathPages {
            store,
            path: path.into(),
            next_token: None,
            done: false,
        }
    }

    pub async fn next_batch(&mut self) -> Result<Option<Vec<Parameter>>> {
        if self.done {
            return Ok(None);
        }

        let page = self
            .store
            .get_parameters_by_path(&self.path, self.next_token.take())
            .await?;

        self.next_token = page.next_token.filter(|token| !token.is_empty());
        self.done = self.next_token.is_none();
        Ok(Some(page.parameters))
    }

    /// Drains every remaining page.
    pub async fn collect_all(mut self) -> Result<Vec<Parameter>> {
        let mut parameters = Vec::new();
        while let Some(batch) = self.next_batch().await? {
            parameters.extend(batch);
        }
        Ok(parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssm::memory::MemoryParameterStore;

    #[tokio::test]
    async fn test_batches_follow_page_size() {
        let store = MemoryParameterStore::with_page_size(2);
        for name in ["/app/a", "/app/b", "/app/c", "/app/d", "/app/e"] {
            store.insert(name, "v", None);
        }

        let mut pages = PathPages::new(&store, "/app");
        let mut sizes = Vec::new();
        while let Some(batch) = pages.next_batch().await.unwrap() {
            sizes.push(batch.len());
        }

        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(store.by_path_calls(), 3);
    }

    #[tokio::test]
    async fn test_collect_all_is_recursive_and_scoped() {
        let store = MemoryParameterStore::with_page_size(3);
        store.insert("/app/a", "1", None);
        store.insert("/app/db/host", "2", None);
        store.insert("/apple/x", "3", None);
        store.insert("/other", "4", None);

        let names: Vec<String> = PathPages::new(&store, "/app")
            .collect_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["/app/a", "/app/db/host"]);
    }

    #[tokio::test]
    async fn test_empty_listing_yields_one_empty_batch() {
        let store = MemoryParameterStore::new();
        let mut pages = PathPages::new(&store, "/missing");

        assert_eq!(pages.next_batch().await.unwrap(), Some(Vec::new()));
        assert_eq!(pages.next_batch().await.unwrap(), None);
    }
}
