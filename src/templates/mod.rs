//! Template catalog access.
//!
//! Templates and their field definitions live in a hosted PostgREST store and
//! are read-only here. Every read degrades to the built-in samples when the
//! store is unconfigured or unreachable, so drafting keeps working offline.

pub mod fill;
mod fixtures;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::chat::types::DocumentType;
pub use fill::{FieldValue, TemplateFormData};

const STORE_TIMEOUT_SECS: u64 = 10;

/// A parameterized document body with `{{placeholder}}` markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub content: String,
    pub document_type: DocumentType,
    pub created_at: DateTime<Utc>,
}

/// One fillable slot of a template, in form order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateField {
    pub id: String,
    pub template_id: String,
    pub field_name: String,
    pub display_name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Select,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Select => "select",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

/// Read-side client for the template store.
pub struct TemplateStore {
    client: reqwest::Client,
    base_url: Option<String>,
    anon_key: Option<String>,
}

impl TemplateStore {
    pub fn new(base_url: Option<String>, anon_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(STORE_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.filter(|s| !s.is_empty()),
            anon_key: anon_key.filter(|s| !s.is_empty()),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(
            dotenv::var("SUPABASE_URL").ok(),
            dotenv::var("SUPABASE_ANON_KEY").ok(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.anon_key.is_some()
    }

    async fn fetch<T: DeserializeOwned>(&self, table: &str, query: &str) -> Result<Vec<T>> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| anyhow!("template store not configured"))?;
        let key = self.anon_key.as_deref().unwrap_or_default();
        let url = format!("{}/rest/v1/{}?{}", base.trim_end_matches('/'), table, query);

        let resp = self
            .client
            .get(&url)
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key))
            .send()
            .await
            .context("Template store request failed")?
            .error_for_status()
            .context("Template store returned an error")?;

        resp.json::<Vec<T>>()
            .await
            .context("Failed to parse template store response")
    }

    /// All templates, ordered by name.
    pub async fn list(&self) -> Vec<Template> {
        if !self.is_configured() {
            warn!("template store not configured, using built-in samples");
            return sorted_by_name(fixtures::templates());
        }
        match self.fetch::<Template>("templates", "select=*&order=name.asc").await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "template store unavailable, using built-in samples");
                sorted_by_name(fixtures::templates())
            }
        }
    }

    /// Templates for one document type, ordered by name.
    pub async fn list_by_type(&self, document_type: DocumentType) -> Vec<Template> {
        if !self.is_configured() {
            warn!("template store not configured, using built-in samples");
            return sorted_by_name(sample_by_type(document_type));
        }
        let query = format!(
            "select=*&document_type=eq.{}&order=name.asc",
            document_type.as_str()
        );
        match self.fetch::<Template>("templates", &query).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "template store unavailable, using built-in samples");
                sorted_by_name(sample_by_type(document_type))
            }
        }
    }

    /// Look up a single template. An id unknown to both the store and the
    /// samples is an error, not a fallback.
    pub async fn get_by_id(&self, id: &str) -> Result<Template, TemplateError> {
        if self.is_configured() {
            let query = format!("select=*&id=eq.{}", id);
            match self.fetch::<Template>("templates", &query).await {
                Ok(mut rows) if !rows.is_empty() => return Ok(rows.remove(0)),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "template store unavailable, checking built-in samples"),
            }
        }
        fixtures::templates()
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Field definitions for a template, ascending by `order`. Unknown ids
    /// yield an empty list. Ties keep their stored order.
    pub async fn fields(&self, template_id: &str) -> Vec<TemplateField> {
        let mut rows = if self.is_configured() {
            let query = format!("select=*&template_id=eq.{}&order=order.asc", template_id);
            match self.fetch::<TemplateField>("template_fields", &query).await {
                Ok(rows) => rows,
                Err(e) => {
                    warn!(error = %e, "template store unavailable, using built-in samples");
                    fixtures::fields(template_id)
                }
            }
        } else {
            fixtures::fields(template_id)
        };
        rows.sort_by_key(|f| f.order);
        rows
    }
}

fn sorted_by_name(mut templates: Vec<Template>) -> Vec<Template> {
    templates.sort_by(|a, b| a.name.cmp(&b.name));
    templates
}

fn sample_by_type(document_type: DocumentType) -> Vec<Template> {
    fixtures::templates()
        .into_iter()
        .filter(|t| t.document_type == document_type)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_store() -> TemplateStore {
        TemplateStore::new(None, None).unwrap()
    }

    #[tokio::test]
    async fn test_offline_list_serves_samples_sorted_by_name() {
        let store = offline_store();
        assert!(!store.is_configured());

        let templates = store.list().await;
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].name, "Договор аренды помещения");
        assert_eq!(templates[1].name, "Договор купли-продажи");
    }

    #[tokio::test]
    async fn test_offline_list_by_type_filters() {
        let store = offline_store();
        let leases = store.list_by_type(DocumentType::Lease).await;
        assert_eq!(leases.len(), 1);
        assert_eq!(leases[0].id, "2");

        let employment = store.list_by_type(DocumentType::Employment).await;
        assert!(employment.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_finds_sample() {
        let store = offline_store();
        let template = store.get_by_id("1").await.unwrap();
        assert_eq!(template.name, "Договор купли-продажи");
        assert_eq!(template.document_type, DocumentType::PurchaseSale);
        assert!(template.content.contains("{{seller_name}}"));
    }

    #[tokio::test]
    async fn test_get_by_id_unknown_is_not_found() {
        let store = offline_store();
        let err = store.get_by_id("nonexistent-id").await.unwrap_err();
        assert_eq!(err, TemplateError::NotFound("nonexistent-id".to_string()));
    }

    #[tokio::test]
    async fn test_fields_come_back_in_form_order() {
        let store = offline_store();
        let fields = store.fields("1").await;
        assert_eq!(fields.len(), 11);
        assert_eq!(fields[0].field_name, "city");
        assert!(fields.windows(2).all(|w| w[0].order <= w[1].order));

        let fields = store.fields("2").await;
        assert_eq!(fields.len(), 5);
        assert!(fields.iter().all(|f| f.required));
    }

    #[tokio::test]
    async fn test_fields_unknown_template_is_empty() {
        let store = offline_store();
        assert!(store.fields("nope").await.is_empty());
    }

    #[test]
    fn test_missing_fields_error_lists_names() {
        let err = TemplateError::MissingFields(vec!["city".to_string(), "price".to_string()]);
        assert_eq!(err.to_string(), "missing required fields: city, price");
    }
}
