use std::collections::HashMap;

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use serde_dynamo::{from_item, to_attribute_value, to_item};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::{FieldPath, Project, ProjectId};

/// DynamoDB client wrapper for project storage.
///
/// Holds no state beyond the client and table name; the table is the single
/// source of truth for record existence.
pub struct ProjectStore {
    client: Client,
    table_name: String,
}

impl ProjectStore {
    /// Create a new `ProjectStore` by loading AWS configuration from the
    /// environment and constructing a DynamoDB client.
    pub async fn new(table_name: impl Into<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let client = Client::new(&config);
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Create a `ProjectStore` around an existing client.
    pub fn with_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// The DynamoDB table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Fetch a single project. An absent item is `Ok(None)`, not an error.
    pub async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>, CoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        match output.item {
            Some(item) => Ok(Some(from_item(item)?)),
            None => Ok(None),
        }
    }

    /// Persist a full record. Unconditional: an existing item with the same
    /// id is overwritten.
    pub async fn put_project(&self, project: &Project) -> Result<(), CoreError> {
        let item: HashMap<String, AttributeValue> = to_item(project)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        Ok(())
    }

    /// Set exactly one top-level attribute on an existing record and return
    /// the post-update snapshot of the changed attribute.
    ///
    /// The `attribute_exists(id)` condition means updating an absent record
    /// fails with [`CoreError::NotFound`] instead of creating it.
    pub async fn update_field(
        &self,
        id: &ProjectId,
        field: &FieldPath,
        value: &Value,
    ) -> Result<Map<String, Value>, CoreError> {
        let attribute: AttributeValue = to_attribute_value(value)?;

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .update_expression("SET #field = :value")
            .expression_attribute_names("#field", field.as_ref())
            .expression_attribute_values(":value", attribute)
            .condition_expression("attribute_exists(id)")
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await;

        match result {
            Ok(output) => {
                let attributes = output.attributes.unwrap_or_default();
                Ok(from_item(attributes)?)
            }
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception())
                {
                    Err(CoreError::NotFound(format!("project {id} does not exist")))
                } else {
                    Err(CoreError::Dynamo(err.into()))
                }
            }
        }
    }

    /// Remove a record. Idempotent: deleting an absent id succeeds.
    pub async fn delete_project(&self, id: &ProjectId) -> Result<(), CoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        Ok(())
    }

    /// Fetch every record in the table by draining the scan cursor.
    ///
    /// Pages are appended in the order DynamoDB returns them; the loop ends
    /// when a response carries no `LastEvaluatedKey`. The whole result set
    /// is held in memory.
    pub async fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        let mut projects = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(aws_sdk_dynamodb::Error::from)?;

            let items = output.items.unwrap_or_default();
            tracing::debug!(page_size = items.len(), "scan page fetched");

            for item in items {
                projects.push(from_item(item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(projects)
    }
}
