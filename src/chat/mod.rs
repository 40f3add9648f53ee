//! Conversation pipeline: per-user sessions, the completion exchange, and the
//! document-progress bookkeeping layered on top of it.
//!
//! Each Discord user gets one isolated session per mode. A session owns its
//! transcript and never blocks other sessions; within a session only one
//! message may be in flight at a time.

pub mod detect;
pub mod fallback;
pub mod prompts;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::i18n::{self, Lang};
use crate::llm::{self, CompletionClient};
use types::{ChatMode, DocumentStatus, DocumentType, Message, Reference};

/// Rejections surfaced to the caller before any transcript mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("message is empty")]
    Empty,
    #[error("a previous message is still being processed")]
    Busy,
}

/// What one completed exchange hands back to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub document_type: Option<DocumentType>,
    pub status: DocumentStatus,
    pub references: Vec<Reference>,
    /// True only on the exchange that moved the conversation into `Ready`,
    /// so the caller can surface the generate hint exactly once.
    pub became_ready: bool,
}

/// One conversation: transcript plus derived document progress.
pub struct ChatSession {
    mode: ChatMode,
    messages: Vec<Message>,
    document_type: Option<DocumentType>,
    status: DocumentStatus,
    processing: bool,
}

impl ChatSession {
    /// Seed a fresh session with the localized greeting; a transcript is
    /// never empty.
    fn new(mode: ChatMode, lang: Lang) -> Self {
        let greeting = match mode {
            ChatMode::Document => i18n::t(lang, "welcomeMessage"),
            ChatMode::Consultation => i18n::t(lang, "consultationWelcomeMessage"),
        };
        Self {
            mode,
            messages: vec![Message::assistant(greeting)],
            document_type: None,
            status: DocumentStatus::NotStarted,
            processing: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn document_type(&self) -> Option<DocumentType> {
        self.document_type
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    /// Append the assistant reply and fold the resolved exchange fields in.
    /// The detected type is sticky (first detection wins) and status never
    /// moves backward.
    fn apply(&mut self, response: String, document_type: Option<DocumentType>, status: DocumentStatus) {
        self.messages.push(Message::assistant(response));
        if self.mode == ChatMode::Document {
            if self.document_type.is_none() {
                self.document_type = document_type;
            }
            self.status = self.status.max(status);
        }
    }

    fn wire_transcript(&self) -> Vec<llm::Message> {
        self.messages
            .iter()
            .map(|m| llm::Message {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect()
    }
}

/// Resolve the exchange fields shared by the live and scripted paths: the
/// (sticky) document type, the derived status, and any consultation
/// references. `message_count` counts the transcript including the reply
/// about to be appended.
fn resolve_fields(
    mode: ChatMode,
    latest_user_message: &str,
    current_type: Option<DocumentType>,
    message_count: usize,
    threshold: usize,
) -> (Option<DocumentType>, DocumentStatus, Vec<Reference>) {
    match mode {
        ChatMode::Document => {
            let ty = current_type.or_else(|| detect::detect_document_type(latest_user_message));
            let status = detect::derive_status(message_count, ty, threshold);
            (ty, status, Vec::new())
        }
        ChatMode::Consultation => (
            None,
            DocumentStatus::NotStarted,
            detect::find_references(latest_user_message),
        ),
    }
}

type SessionKey = (u64, ChatMode);

/// The conversation engine. Sessions are created lazily on first contact and
/// live for the process lifetime unless reset.
pub struct ChatEngine {
    llm: Arc<CompletionClient>,
    sessions: RwLock<HashMap<SessionKey, Arc<Mutex<ChatSession>>>>,
}

impl ChatEngine {
    pub fn new(llm: Arc<CompletionClient>) -> Self {
        Self {
            llm,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    async fn session(&self, user: u64, mode: ChatMode, lang: Lang) -> Arc<Mutex<ChatSession>> {
        if let Some(session) = self.sessions.read().await.get(&(user, mode)) {
            return session.clone();
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry((user, mode))
            .or_insert_with(|| Arc::new(Mutex::new(ChatSession::new(mode, lang))))
            .clone()
    }

    /// Run one exchange: validate, record the user message, obtain a reply
    /// (live, scripted, or apology), and fold the outcome back in. Completion
    /// failures never escape as errors; the transcript always gains exactly
    /// one assistant message.
    pub async fn send_message(
        &self,
        user: u64,
        mode: ChatMode,
        lang: Lang,
        content: &str,
        threshold: usize,
    ) -> Result<ChatReply, ChatError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ChatError::Empty);
        }

        let session = self.session(user, mode, lang).await;

        // Stage 1: validate and record under the lock, then release it so
        // other sessions are not held up by the network call.
        let (wire, current_type, current_status, count_with_reply) = {
            let mut s = session.lock().await;
            if s.processing {
                return Err(ChatError::Busy);
            }
            s.messages.push(Message::user(content));
            s.processing = true;
            (
                s.wire_transcript(),
                s.document_type(),
                s.status(),
                s.messages().len() + 1,
            )
        };

        // Stage 2: obtain the assistant reply.
        let (response, document_type, status, references) = if !self.llm.is_configured() {
            debug!(user, mode = mode.as_str(), "no completion credentials, using scripted responder");
            let (ty, status, references) =
                resolve_fields(mode, content, current_type, count_with_reply, threshold);
            let text = fallback::scripted_response(lang, mode, content, ty, status, &references);
            (text, ty, status, references)
        } else {
            let mut request = vec![llm::Message {
                role: "system".to_string(),
                content: prompts::system_prompt(mode, current_type),
            }];
            request.extend(wire);
            match self.llm.chat(&request).await {
                Ok(text) if !text.trim().is_empty() => {
                    let (ty, status, references) =
                        resolve_fields(mode, content, current_type, count_with_reply, threshold);
                    (text, ty, status, references)
                }
                Ok(_) => {
                    warn!(user, mode = mode.as_str(), "empty completion, appending apology");
                    (i18n::t(lang, "errorMessage"), current_type, current_status, Vec::new())
                }
                Err(e) => {
                    warn!(user, mode = mode.as_str(), error = %e, "completion failed, appending apology");
                    (i18n::t(lang, "errorMessage"), current_type, current_status, Vec::new())
                }
            }
        };

        // Stage 3: fold the outcome back into the session.
        let mut s = session.lock().await;
        let was_ready = s.status() >= DocumentStatus::Ready;
        s.apply(response.clone(), document_type, status);
        s.processing = false;
        let reply = ChatReply {
            response,
            document_type: s.document_type(),
            status: s.status(),
            references,
            became_ready: !was_ready && s.status() == DocumentStatus::Ready,
        };
        debug!(
            user,
            mode = mode.as_str(),
            status = reply.status.as_str(),
            messages = s.messages().len(),
            "exchange complete"
        );
        Ok(reply)
    }

    /// Discard a session and start over from the greeting. Rejected while a
    /// message is still in flight.
    pub async fn reset(&self, user: u64, mode: ChatMode, lang: Lang) -> Result<(), ChatError> {
        let session = self.session(user, mode, lang).await;
        let mut s = session.lock().await;
        if s.processing {
            return Err(ChatError::Busy);
        }
        *s = ChatSession::new(mode, lang);
        Ok(())
    }

    /// Current document progress for the user's document conversation.
    pub async fn document_state(&self, user: u64) -> (Option<DocumentType>, DocumentStatus) {
        match self.sessions.read().await.get(&(user, ChatMode::Document)) {
            Some(session) => {
                let s = session.lock().await;
                (s.document_type(), s.status())
            }
            None => (None, DocumentStatus::NotStarted),
        }
    }

    /// Full transcript copy, newest last. Empty if the session does not exist.
    pub async fn transcript(&self, user: u64, mode: ChatMode) -> Vec<Message> {
        match self.sessions.read().await.get(&(user, mode)) {
            Some(session) => session.lock().await.messages().to_vec(),
            None => Vec::new(),
        }
    }

    /// Conversation-driven generation succeeded: the document is done.
    pub async fn mark_completed(&self, user: u64) {
        if let Some(session) = self.sessions.read().await.get(&(user, ChatMode::Document)) {
            let mut s = session.lock().await;
            s.status = DocumentStatus::Completed;
        }
    }

    /// Template-driven generation succeeded: note it in the document
    /// conversation and mark the document done.
    pub async fn record_template_generation(&self, user: u64, lang: Lang) {
        let session = self.session(user, ChatMode::Document, lang).await;
        let mut s = session.lock().await;
        s.messages
            .push(Message::assistant(i18n::t(lang, "templateDocumentGenerated")));
        s.status = DocumentStatus::Completed;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::types::Role;
    use super::*;

    fn offline_engine() -> ChatEngine {
        let client = CompletionClient::new("https://api.openai.com/v1", "gpt-4", None, Duration::from_secs(5))
            .unwrap();
        ChatEngine::new(Arc::new(client))
    }

    fn unreachable_engine() -> ChatEngine {
        let client = CompletionClient::new(
            "http://127.0.0.1:9/v1",
            "gpt-4",
            Some("test-key".to_string()),
            Duration::from_secs(2),
        )
        .unwrap();
        ChatEngine::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_empty_and_whitespace_messages_rejected() {
        let engine = offline_engine();
        assert_eq!(
            engine.send_message(1, ChatMode::Document, Lang::Ru, "", 5).await,
            Err(ChatError::Empty)
        );
        assert_eq!(
            engine.send_message(1, ChatMode::Document, Lang::Ru, "   ", 5).await,
            Err(ChatError::Empty)
        );
        // Nothing was recorded.
        assert!(engine.transcript(1, ChatMode::Document).await.is_empty());
    }

    #[tokio::test]
    async fn test_scripted_exchange_appends_exactly_one_reply() {
        let engine = offline_engine();
        let reply = engine
            .send_message(1, ChatMode::Document, Lang::Ru, "Помогите с документом", 5)
            .await
            .unwrap();
        assert!(!reply.response.is_empty());

        let transcript = engine.transcript(1, ChatMode::Document).await;
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0].role, Role::Assistant);
        assert_eq!(transcript[1].role, Role::User);
        assert_eq!(transcript[2].role, Role::Assistant);
        assert_eq!(transcript[2].content, reply.response);
    }

    #[tokio::test]
    async fn test_detection_and_readiness_scenario() {
        let engine = offline_engine();

        let reply = engine
            .send_message(7, ChatMode::Document, Lang::Ru, "Хочу составить договор купли-продажи", 5)
            .await
            .unwrap();
        assert_eq!(reply.document_type, Some(DocumentType::PurchaseSale));
        assert_eq!(reply.status, DocumentStatus::InProgress);
        assert!(!reply.became_ready);

        let reply = engine
            .send_message(7, ChatMode::Document, Lang::Ru, "Продаю квартиру в Алматы за 25 млн тенге", 5)
            .await
            .unwrap();
        assert_eq!(reply.status, DocumentStatus::Ready);
        assert!(reply.became_ready);

        // Another message keeps it ready but the transition flag fires once.
        let reply = engine
            .send_message(7, ChatMode::Document, Lang::Ru, "Покупатель — мой сосед", 5)
            .await
            .unwrap();
        assert_eq!(reply.status, DocumentStatus::Ready);
        assert!(!reply.became_ready);
    }

    #[tokio::test]
    async fn test_detected_type_is_sticky() {
        let engine = offline_engine();
        engine
            .send_message(2, ChatMode::Document, Lang::Ru, "договор купли-продажи", 5)
            .await
            .unwrap();
        let reply = engine
            .send_message(2, ChatMode::Document, Lang::Ru, "или лучше аренды?", 5)
            .await
            .unwrap();
        assert_eq!(reply.document_type, Some(DocumentType::PurchaseSale));
    }

    #[tokio::test]
    async fn test_busy_session_rejects_second_message() {
        let engine = offline_engine();
        let session = engine.session(3, ChatMode::Document, Lang::Ru).await;
        session.lock().await.processing = true;

        assert_eq!(
            engine.send_message(3, ChatMode::Document, Lang::Ru, "еще одно", 5).await,
            Err(ChatError::Busy)
        );
        assert_eq!(engine.reset(3, ChatMode::Document, Lang::Ru).await, Err(ChatError::Busy));

        session.lock().await.processing = false;
        assert!(engine
            .send_message(3, ChatMode::Document, Lang::Ru, "еще одно", 5)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_reset_returns_to_greeting() {
        let engine = offline_engine();
        engine
            .send_message(4, ChatMode::Document, Lang::Ru, "договор аренды", 5)
            .await
            .unwrap();
        engine.reset(4, ChatMode::Document, Lang::Ru).await.unwrap();

        let transcript = engine.transcript(4, ChatMode::Document).await;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role, Role::Assistant);
        assert_eq!(engine.document_state(4).await, (None, DocumentStatus::NotStarted));
    }

    #[tokio::test]
    async fn test_consultation_returns_references_without_document_progress() {
        let engine = offline_engine();
        let reply = engine
            .send_message(5, ChatMode::Consultation, Lang::Ru, "Как расторгнуть договор купли-продажи?", 5)
            .await
            .unwrap();
        assert_eq!(reply.references.len(), 1);
        assert_eq!(reply.document_type, None);

        // The document conversation is a separate session and stays untouched.
        assert_eq!(engine.document_state(5).await, (None, DocumentStatus::NotStarted));
    }

    #[tokio::test]
    async fn test_failed_completion_appends_apology_and_keeps_state() {
        let engine = unreachable_engine();
        let reply = engine
            .send_message(6, ChatMode::Document, Lang::Ru, "договор купли-продажи", 5)
            .await
            .unwrap();
        assert_eq!(reply.response, i18n::t(Lang::Ru, "errorMessage"));
        assert_eq!(reply.document_type, None);
        assert_eq!(reply.status, DocumentStatus::NotStarted);

        let transcript = engine.transcript(6, ChatMode::Document).await;
        assert_eq!(transcript.len(), 3);
    }

    #[tokio::test]
    async fn test_mark_completed_is_terminal() {
        let engine = offline_engine();
        engine
            .send_message(8, ChatMode::Document, Lang::Ru, "договор подряда на ремонт", 5)
            .await
            .unwrap();
        engine.mark_completed(8).await;
        let (_, status) = engine.document_state(8).await;
        assert_eq!(status, DocumentStatus::Completed);

        // Later exchanges cannot move the status back.
        engine
            .send_message(8, ChatMode::Document, Lang::Ru, "спасибо", 5)
            .await
            .unwrap();
        let (_, status) = engine.document_state(8).await;
        assert_eq!(status, DocumentStatus::Completed);
    }

    #[tokio::test]
    async fn test_record_template_generation_notes_and_completes() {
        let engine = offline_engine();
        engine.record_template_generation(9, Lang::Ru).await;

        let transcript = engine.transcript(9, ChatMode::Document).await;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].content, i18n::t(Lang::Ru, "templateDocumentGenerated"));
        let (_, status) = engine.document_state(9).await;
        assert_eq!(status, DocumentStatus::Completed);
    }
}
