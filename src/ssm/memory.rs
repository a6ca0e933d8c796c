// fernctl/src/ssm/memory.rs
//! In-memory parameter store used by the command tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{BatchDeleteOutcome, Parameter, ParameterPage, ParameterStore, Tag};
use crate::errors::{AppError, Result};

#[derive(Debug, Clone)]
struct StoredParameter {
    value: String,
    tags: Vec<Tag>,
}

pub struct MemoryParameterStore {
    parameters: Mutex<BTreeMap<String, StoredParameter>>,
    failing: Mutex<BTreeSet<String>>,
    page_size: usize,
    by_path_calls: AtomicUsize,
    write_calls: AtomicUsize,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::with_page_size(10)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        MemoryParameterStore {
            parameters: Mutex::new(BTreeMap::new()),
            failing: Mutex::new(BTreeSet::new()),
            page_size,
            by_path_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, name: &str, value: &str, tag: Option<Tag>) {
        self.parameters.lock().unwrap().insert(
            name.to_string(),
            StoredParameter {
                value: value.to_string(),
                tags: tag.into_iter().collect(),
            },
        );
    }

    /// Every write, tag or delete call touching `name` fails from now on.
    pub fn fail_on(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    pub fn names(&self) -> Vec<String> {
        self.parameters.lock().unwrap().keys().cloned().collect()
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.parameters.lock().unwrap().get(name).map(|p| p.value.clone())
    }

    pub fn tags(&self, name: &str) -> Vec<Tag> {
        self.parameters
            .lock()
            .unwrap()
            .get(name)
            .map(|p| p.tags.clone())
            .unwrap_or_default()
    }

    pub fn by_path_calls(&self) -> usize {
        self.by_path_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    fn check(&self, operation: &'static str, name: &str) -> Result<()> {
        if self.failing.lock().unwrap().contains(name) {
            return Err(AppError::remote(operation, name, "AccessDeniedException"));
        }
        Ok(())
    }
}

#[async_trait]
impl ParameterStore for MemoryParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<Parameter> {
        self.parameters
            .lock()
            .unwrap()
            .get(name)
            .map(|p| Parameter {
                name: name.to_string(),
                value: p.value.clone(),
            })
            .ok_or_else(|| AppError::NotFound {
                name: name.to_string(),
                message: "ParameterNotFound".to_string(),
            })
    }

    async fn get_parameters_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> Result<ParameterPage> {
        self.by_path_calls.fetch_add(1, Ordering::SeqCst);
        if !path.starts_with('/') {
            return Err(AppError::remote(
                "GetParametersByPath",
                path,
                "ValidationException: path must begin with '/'",
            ));
        }

        let scope = format!("{}/", path.trim_end_matches('/'));
        let offset: usize = match next_token {
            Some(token) => token
                .parse()
                .map_err(|_| AppError::remote("GetParametersByPath", path, "InvalidNextToken"))?,
            None => 0,
        };

        let matching: Vec<Parameter> = self
            .parameters
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name.starts_with(&scope))
            .map(|(name, p)| Parameter {
                name: name.clone(),
                value: p.value.clone(),
            })
            .collect();

        let end = (offset + self.page_size).min(matching.len());
        let parameters = matching.get(offset..end).unwrap_or_default().to_vec();
        let next_token = (end < matching.len()).then(|| end.to_string());
        Ok(ParameterPage {
            parameters,
            next_token,
        })
    }

    async fn put_secure_parameter(&self, name: &str, value: &str) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check("PutParameter", name)?;
        let mut parameters = self.parameters.lock().unwrap();
        let entry = parameters.entry(name.to_string()).or_insert_with(|| StoredParameter {
            value: String::new(),
            tags: Vec::new(),
        });
        entry.value = value.to_string();
        Ok(())
    }

    async fn add_tag(&self, name: &str, tag: &Tag) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check("AddTagsToResource", name)?;
        let mut parameters = self.parameters.lock().unwrap();
        let stored = parameters
            .get_mut(name)
            .ok_or_else(|| AppError::remote("AddTagsToResource", name, "InvalidResourceId"))?;
        stored.tags.retain(|t| t.key != tag.key);
        stored.tags.push(tag.clone());
        Ok(())
    }

    async fn list_tags(&self, name: &str) -> Result<Vec<Tag>> {
        self.parameters
            .lock()
            .unwrap()
            .get(name)
            .map(|p| p.tags.clone())
            .ok_or_else(|| AppError::remote("ListTagsForResource", name, "InvalidResourceId"))
    }

    async fn delete_parameter(&self, name: &str) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check("DeleteParameter", name)?;
        self.parameters
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| AppError::remote("DeleteParameter", name, "ParameterNotFound"))
    }

    async fn delete_parameters(&self, names: &[String]) -> Result<BatchDeleteOutcome> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        for name in names {
            self.check("DeleteParameters", name)?;
        }
        let mut parameters = self.parameters.lock().unwrap();
        let mut outcome = BatchDeleteOutcome::default();
        for name in names {
            if parameters.remove(name).is_some() {
                outcome.deleted.push(name.clone());
            } else {
                outcome.invalid.push(name.clone());
            }
        }
        Ok(outcome)
    }
}
