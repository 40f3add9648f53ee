//! Document materialization: turning a ready conversation or a filled
//! template into a downloadable artifact reference. Rendering itself is
//! delegated; this module produces the reference and, for templates, the
//! filled body.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::chat::types::{DocumentStatus, DocumentType};
use crate::templates::{fill, TemplateError, TemplateFormData, TemplateStore};

/// Simulated renderer latency, matching the production service's typical
/// turnaround.
const GENERATION_DELAY_MS: u64 = 2_000;
const TEMPLATE_GENERATION_DELAY_MS: u64 = 1_500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("document is not ready for generation")]
    NotReady,
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// A filled template document: where to fetch it plus the rendered text.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub reference: String,
    pub body: String,
}

/// Materialize the conversation-driven document. Readiness is a hard
/// precondition: no artifact exists for a conversation that is not `Ready`,
/// and an already completed document must be restarted, not regenerated.
pub async fn generate(
    document_type: Option<DocumentType>,
    status: DocumentStatus,
) -> Result<String, GenerateError> {
    let Some(document_type) = document_type else {
        return Err(GenerateError::NotReady);
    };
    if status != DocumentStatus::Ready {
        return Err(GenerateError::NotReady);
    }

    tokio::time::sleep(Duration::from_millis(GENERATION_DELAY_MS)).await;

    let reference = format!(
        "/documents/{}_{}.pdf",
        document_type.as_str(),
        Utc::now().timestamp_millis()
    );
    info!(
        document_type = document_type.as_str(),
        reference = %reference,
        "document generated from conversation"
    );
    Ok(reference)
}

/// Fill a stored template and materialize it. The template must exist and
/// every required field must carry a non-blank value.
pub async fn generate_from_template(
    store: &TemplateStore,
    template_id: &str,
    data: &TemplateFormData,
) -> Result<GeneratedDocument, GenerateError> {
    let template = store.get_by_id(template_id).await?;
    let fields = store.fields(template_id).await;

    let missing = fill::missing_required(&fields, data);
    if !missing.is_empty() {
        return Err(TemplateError::MissingFields(missing).into());
    }

    let body = fill::fill(&template.content, data);
    tokio::time::sleep(Duration::from_millis(TEMPLATE_GENERATION_DELAY_MS)).await;

    let reference = format!(
        "/documents/template_{}_{}.pdf",
        template.document_type.as_str(),
        Utc::now().timestamp_millis()
    );
    info!(
        template_id = %template.id,
        document_type = template.document_type.as_str(),
        reference = %reference,
        "document generated from template"
    );
    Ok(GeneratedDocument { reference, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{FieldValue, TemplateStore};

    fn offline_store() -> TemplateStore {
        TemplateStore::new(None, None).unwrap()
    }

    fn lease_data() -> TemplateFormData {
        [
            ("city", "Алматы"),
            ("date", "10.01.2025"),
            ("lessor_name", "Ахметов А.А."),
            ("lessee_name", "Серикова Д.Н."),
            ("property_description", "офис 45 кв.м по адресу ул. Абая, 10"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), FieldValue::from(v)))
        .collect()
    }

    #[tokio::test]
    async fn test_generate_rejects_unready_conversations() {
        assert_eq!(
            generate(None, DocumentStatus::NotStarted).await,
            Err(GenerateError::NotReady)
        );
        assert_eq!(
            generate(Some(DocumentType::Lease), DocumentStatus::InProgress).await,
            Err(GenerateError::NotReady)
        );
        assert_eq!(
            generate(Some(DocumentType::Lease), DocumentStatus::Completed).await,
            Err(GenerateError::NotReady)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_produces_typed_reference() {
        let reference = generate(Some(DocumentType::PurchaseSale), DocumentStatus::Ready)
            .await
            .unwrap();
        assert!(reference.starts_with("/documents/purchase_sale_"));
        assert!(reference.ends_with(".pdf"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_template_generation_fills_known_fields_only() {
        let doc = generate_from_template(&offline_store(), "2", &lease_data())
            .await
            .unwrap();
        assert!(doc.reference.starts_with("/documents/template_lease_"));
        assert!(doc.body.contains("г. Алматы"));
        assert!(doc.body.contains("Ахметов А.А."));
        // Placeholders without a defined field stay verbatim.
        assert!(doc.body.contains("{{monthly_rent}}"));
    }

    #[tokio::test]
    async fn test_template_generation_requires_all_fields() {
        let mut data = lease_data();
        data.remove("lessor_name");
        let err = generate_from_template(&offline_store(), "2", &data)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GenerateError::Template(TemplateError::MissingFields(vec!["lessor_name".to_string()]))
        );
    }

    #[tokio::test]
    async fn test_template_generation_unknown_id_fails() {
        let err = generate_from_template(&offline_store(), "nonexistent-id", &lease_data())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GenerateError::Template(TemplateError::NotFound("nonexistent-id".to_string()))
        );
    }
}
