//! Scripted responder used when no completion credentials are configured.
//! It mirrors the live pipeline's detection and readiness handling so the
//! conversation still progresses toward a generated document.

use super::types::{ChatMode, DocumentStatus, DocumentType, Reference};
use crate::i18n::{self, Lang};

/// Compose the scripted assistant reply from the already-resolved exchange
/// fields. Greetings get a greeting back; a detected type drives the document
/// flow forward; anything else asks the user to name a document type.
pub fn scripted_response(
    lang: Lang,
    mode: ChatMode,
    latest_user_message: &str,
    document_type: Option<DocumentType>,
    status: DocumentStatus,
    references: &[Reference],
) -> String {
    match mode {
        ChatMode::Consultation => {
            if references.is_empty() {
                i18n::t(lang, "mockConsultDefault")
            } else {
                i18n::t(lang, "mockConsultReference")
            }
        }
        ChatMode::Document => match document_type {
            Some(ty) if status >= DocumentStatus::Ready => {
                i18n::t_with(lang, "mockReadyResponse", &[("type", ty.label(lang))])
            }
            Some(ty) => i18n::t_with(lang, "mockTypeDetected", &[("type", ty.label(lang))]),
            None if is_greeting(latest_user_message) => i18n::t(lang, "mockGreeting"),
            None => i18n::t(lang, "mockAskType"),
        },
    }
}

fn is_greeting(text: &str) -> bool {
    let lowered = text.to_lowercase();
    ["привет", "здравствуй", "добрый", "сәлем", "қайырлы"]
        .iter()
        .any(|g| lowered.contains(g))
}
