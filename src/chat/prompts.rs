//! System prompts sent ahead of the transcript on every completion call.

use super::types::{ChatMode, DocumentType};

pub const DOCUMENT_SYSTEM_PROMPT: &str = "You are a legal assistant specializing in Kazakhstan law. \
Your purpose is to help users create legal documents. Provide clear explanations and ask relevant \
questions to gather the information the document needs. Always respond in the same language the \
user is using (Kazakh or Russian). Base all advice and documents on current Kazakhstan legislation. \
When appropriate, mention that ready-made templates are available for faster document creation.";

pub const CONSULTATION_SYSTEM_PROMPT: &str = "You are a legal consultant specializing in Kazakhstan \
law. Answer the user's questions about legislation clearly and concisely, citing the relevant code \
or article where possible. Always respond in the same language the user is using (Kazakh or \
Russian). This is general legal information, not formal legal advice.";

/// Assemble the system prompt for one exchange. In document mode the detected
/// type, once known, is pinned into the prompt so the model keeps drafting the
/// same document.
pub fn system_prompt(mode: ChatMode, document_type: Option<DocumentType>) -> String {
    match mode {
        ChatMode::Consultation => CONSULTATION_SYSTEM_PROMPT.to_string(),
        ChatMode::Document => match document_type {
            Some(ty) => format!("{} The user is creating a {} document.", DOCUMENT_SYSTEM_PROMPT, ty.as_str()),
            None => DOCUMENT_SYSTEM_PROMPT.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_prompt_pins_known_type() {
        let prompt = system_prompt(ChatMode::Document, Some(DocumentType::Lease));
        assert!(prompt.contains("creating a lease document"));
    }

    #[test]
    fn test_consultation_prompt_ignores_type() {
        let prompt = system_prompt(ChatMode::Consultation, Some(DocumentType::Lease));
        assert_eq!(prompt, CONSULTATION_SYSTEM_PROMPT);
    }
}
