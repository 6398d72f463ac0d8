//! Notion workspace implementation
//!
//! Maps canonical action items onto rows of a Notion database. Lookup runs
//! against a rich-text "External ID" property, so the same item always lands
//! on the same page across runs.

use crate::SyncError;
use adjutant_domain::traits::Workspace;
use adjutant_domain::{ActionItem, ExternalId, ItemStatus};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Default Notion API base
pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";

/// Notion-Version header value
pub const NOTION_VERSION: &str = "2022-06-28";

/// Default timeout for workspace requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Database property names; change if the target database differs.
const PROP_NAME: &str = "Name";
const PROP_STATUS: &str = "Status";
const PROP_PRIORITY: &str = "Priority";
const PROP_DUE: &str = "Due";
const PROP_ASSIGNEE: &str = "Assignee";
const PROP_CONTEXT: &str = "Context";
const PROP_SOURCE_DOC: &str = "Source Document";
const PROP_EXTERNAL_ID: &str = "External ID";

const STATUS_TODO: &str = "To do";
const STATUS_DONE: &str = "Done";

/// Workspace implementation over the Notion HTTP API
pub struct NotionWorkspace {
    api_base: String,
    api_key: String,
    database_id: String,
    client: reqwest::blocking::Client,
    user_map: HashMap<String, String>,
}

impl NotionWorkspace {
    /// Create a workspace client for the given database
    pub fn new(
        api_key: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Result<Self, SyncError> {
        let api_key = api_key.into();
        let database_id = database_id.into();
        if api_key.is_empty() {
            return Err(SyncError::NotConfigured("missing API key".to_string()));
        }
        if database_id.is_empty() {
            return Err(SyncError::NotConfigured("missing database id".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SyncError::Workspace(format!("client construction: {}", e)))?;

        Ok(Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key,
            database_id,
            client,
            user_map: HashMap::new(),
        })
    }

    /// Override the API base (self-hosted proxies, tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Map owner names to workspace user ids for the Assignee property
    ///
    /// Accepts the `"Name:id,Name2:id2"` shape used in deployment
    /// configuration; names match case-insensitively.
    pub fn with_user_map_str(mut self, mapping: &str) -> Self {
        for pair in mapping.split(',') {
            if let Some((name, id)) = pair.split_once(':') {
                self.user_map
                    .insert(name.trim().to_lowercase(), id.trim().to_string());
            }
        }
        self
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::blocking::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
    }

    fn user_id_for(&self, owner: &str) -> Option<&String> {
        if owner.is_empty() {
            return None;
        }
        self.user_map.get(&owner.trim().to_lowercase())
    }

    /// Build the property payload for a database row
    fn build_properties(&self, item: &ActionItem) -> Value {
        let status_name = match item.status {
            ItemStatus::Done => STATUS_DONE,
            ItemStatus::Todo => STATUS_TODO,
        };

        let mut props = json!({
            PROP_NAME: { "title": [{ "type": "text", "text": { "content": item.text } }] },
            PROP_STATUS: { "select": { "name": status_name } },
            PROP_PRIORITY: { "select": { "name": item.priority.as_str() } },
            PROP_EXTERNAL_ID: {
                "rich_text": [{ "type": "text", "text": { "content": item.external_id.as_str() } }]
            },
        });

        if let Some(context) = &item.context {
            props[PROP_CONTEXT] =
                json!({ "rich_text": [{ "type": "text", "text": { "content": context } }] });
        }
        if let Some(doc_name) = &item.provenance.doc_name {
            props[PROP_SOURCE_DOC] =
                json!({ "rich_text": [{ "type": "text", "text": { "content": doc_name } }] });
        }
        if let Some(due) = item.due_date {
            props[PROP_DUE] = json!({ "date": { "start": due.format("%Y-%m-%d").to_string() } });
        }
        if let Some(user_id) = self.user_id_for(&item.owner) {
            props[PROP_ASSIGNEE] = json!({ "people": [{ "id": user_id }] });
        }

        props
    }
}

impl Workspace for NotionWorkspace {
    type Error = SyncError;

    fn find_by_external_id(&self, id: &ExternalId) -> Result<Option<String>, Self::Error> {
        let url = format!("{}/databases/{}/query", self.api_base, self.database_id);
        let payload = json!({
            "filter": {
                "property": PROP_EXTERNAL_ID,
                "rich_text": { "equals": id.as_str() }
            }
        });

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&payload)
            .send()
            .map_err(|e| SyncError::Workspace(format!("query failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SyncError::Workspace(format!(
                "query failed: HTTP {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .map_err(|e| SyncError::Workspace(format!("query response: {}", e)))?;

        Ok(body["results"]
            .as_array()
            .and_then(|results| results.first())
            .and_then(|page| page["id"].as_str())
            .map(String::from))
    }

    fn create(&self, item: &ActionItem) -> Result<String, Self::Error> {
        let url = format!("{}/pages", self.api_base);
        let payload = json!({
            "parent": { "database_id": self.database_id },
            "properties": self.build_properties(item),
        });

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&payload)
            .send()
            .map_err(|e| SyncError::Workspace(format!("create failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(SyncError::Workspace(format!(
                "create failed: HTTP {} {}",
                status, text
            )));
        }

        let body: Value = response
            .json()
            .map_err(|e| SyncError::Workspace(format!("create response: {}", e)))?;

        body["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| SyncError::Workspace("create response missing page id".to_string()))
    }

    fn update(&self, remote_id: &str, item: &ActionItem) -> Result<(), Self::Error> {
        let url = format!("{}/pages/{}", self.api_base, remote_id);
        let payload = json!({ "properties": self.build_properties(item) });

        let response = self
            .request(reqwest::Method::PATCH, &url)
            .json(&payload)
            .send()
            .map_err(|e| SyncError::Workspace(format!("update failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(SyncError::Workspace(format!(
                "update failed: HTTP {} {}",
                status, text
            )));
        }

        Ok(())
    }
}
