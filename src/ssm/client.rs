// fernctl/src/ssm/client.rs
use async_trait::async_trait;
use aws_sdk_ssm as ssm;
use ssm::config::{BehaviorVersion, Region};
use ssm::error::{DisplayErrorContext, SdkError};
use ssm::operation::get_parameter::GetParameterError;
use ssm::types::{ParameterType, ResourceTypeForTagging};
use std::fmt::Debug;
use tracing::debug;

use super::{BatchDeleteOutcome, Parameter, ParameterPage, ParameterStore, Tag};
use crate::config::AwsSettings;
use crate::errors::{AppError, Result};

/// Parameter store backed by AWS Systems Manager.
pub struct AwsParameterStore {
    client: ssm::Client,
}

impl AwsParameterStore {
    /// Builds a client from the default AWS credential chain, applying any
    /// region, profile or endpoint overrides.
    pub async fn connect(settings: &AwsSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;
        debug!(region = ?sdk_config.region(), "SSM client configured");

        AwsParameterStore {
            client: ssm::Client::new(&sdk_config),
        }
    }
}

fn remote_error<E, R>(operation: &'static str, target: &str, err: SdkError<E, R>) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    AppError::remote(operation, target, DisplayErrorContext(&err).to_string())
}

fn to_parameter(parameter: &ssm::types::Parameter) -> Parameter {
    Parameter {
        name: parameter.name().unwrap_or_default().to_string(),
        value: parameter.value().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl ParameterStore for AwsParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<Parameter> {
        let output = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(GetParameterError::is_parameter_not_found)
                {
                    AppError::NotFound {
                        name: name.to_string(),
                        message: DisplayErrorContext(&err).to_string(),
                    }
                } else {
                    remote_error("GetParameter", name, err)
                }
            })?;

        output
            .parameter()
            .map(to_parameter)
            .ok_or_else(|| AppError::remote("GetParameter", name, "response contained no parameter"))
    }

    async fn get_parameters_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> Result<ParameterPage> {
        let output = self
            .client
            .get_parameters_by_path()
            .path(path)
            .recursive(true)
            .with_decryption(true)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|err| remote_error("GetParametersByPath", path, err))?;

        Ok(ParameterPage {
            parameters: output.parameters().iter().map(to_parameter).collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn put_secure_parameter(&self, name: &str, value: &str) -> Result<()> {
        self.client
            .put_parameter()
            .name(name)
            .value(value)
            .overwrite(true)
            .r#type(ParameterType::SecureString)
            .send()
            .await
            .map_err(|err| remote_error("PutParameter", name, err))?;
        Ok(())
    }

    async fn add_tag(&self, name: &str, tag: &Tag) -> Result<()> {
        let sdk_tag = ssm::types::Tag::builder()
            .key(&tag.key)
            .value(&tag.value)
            .build()
            .map_err(|err| AppError::remote("AddTagsToResource", name, err.to_string()))?;

        self.client
            .add_tags_to_resource()
            .resource_type(ResourceTypeForTagging::Parameter)
            .resource_id(name)
            .tags(sdk_tag)
            .send()
            .await
            .map_err(|err| remote_error("AddTagsToResource", name, err))?;
        Ok(())
    }

    async fn list_tags(&self, name: &str) -> Result<Vec<Tag>> {
        let output = self
            .client
            .list_tags_for_resource()
            .resource_type(ResourceTypeForTagging::Parameter)
            .resource_id(name)
            .send()
            .await
            .map_err(|err| remote_error("ListTagsForResource", name, err))?;

        Ok(output
            .tag_list()
            .iter()
            .map(|tag| Tag::new(tag.key(), tag.value()))
            .collect())
    }

    async fn delete_parameter(&self, name: &str) -> Result<()> {
        self.client
            .delete_parameter()
            .name(name)
            .send()
            .await
            .map_err(|err| remote_error("DeleteParameter", name, err))?;
        Ok(())
    }

    async fn delete_parameters(&self, names: &[String]) -> Result<BatchDeleteOutcome> {
        let output = self
            .client
            .delete_parameters()
            .set_names(Some(names.to_vec()))
            .send()
            .await
            .map_err(|err| remote_error("DeleteParameters", &names.join(","), err))?;

        Ok(BatchDeleteOutcome {
            deleted: output.deleted_parameters().to_vec(),
            invalid: output.invalid_parameters().to_vec(),
        })
    }
}
