use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::i18n::Lang;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single transcript entry. Entries are immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Operating mode of a conversation. Consultation answers questions and never
/// drives document progress; document mode collects drafting requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatMode {
    Consultation,
    Document,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Consultation => "consultation",
            ChatMode::Document => "document",
        }
    }
}

/// Legal document categories the assistant can draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    PurchaseSale,
    Lease,
    Services,
    ContractWork,
    Employment,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::PurchaseSale,
        DocumentType::Lease,
        DocumentType::Services,
        DocumentType::ContractWork,
        DocumentType::Employment,
    ];

    /// Stable machine code, also used in artifact file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::PurchaseSale => "purchase_sale",
            DocumentType::Lease => "lease",
            DocumentType::Services => "services",
            DocumentType::ContractWork => "contract_work",
            DocumentType::Employment => "employment",
        }
    }

    pub fn parse(code: &str) -> Option<DocumentType> {
        DocumentType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == code.trim().to_lowercase())
    }

    pub fn label(&self, lang: Lang) -> &'static str {
        match (self, lang) {
            (DocumentType::PurchaseSale, Lang::Ru) => "Договор купли-продажи",
            (DocumentType::PurchaseSale, Lang::Kk) => "Сатып алу-сату шарты",
            (DocumentType::Lease, Lang::Ru) => "Договор аренды",
            (DocumentType::Lease, Lang::Kk) => "Жалдау шарты",
            (DocumentType::Services, Lang::Ru) => "Договор оказания услуг",
            (DocumentType::Services, Lang::Kk) => "Қызмет көрсету шарты",
            (DocumentType::ContractWork, Lang::Ru) => "Договор подряда",
            (DocumentType::ContractWork, Lang::Kk) => "Мердігерлік шарты",
            (DocumentType::Employment, Lang::Ru) => "Трудовой договор",
            (DocumentType::Employment, Lang::Kk) => "Еңбек шарты",
        }
    }
}

/// Progress of a document conversation. Variant order matters: status only
/// ever moves toward `Completed`, so merging uses `Ord::max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    NotStarted,
    InProgress,
    Ready,
    Completed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::NotStarted => "not_started",
            DocumentStatus::InProgress => "in_progress",
            DocumentStatus::Ready => "ready",
            DocumentStatus::Completed => "completed",
        }
    }

    pub fn label(&self, lang: Lang) -> &'static str {
        match (self, lang) {
            (DocumentStatus::NotStarted, Lang::Ru) => "не начат",
            (DocumentStatus::NotStarted, Lang::Kk) => "басталмаған",
            (DocumentStatus::InProgress, Lang::Ru) => "в процессе",
            (DocumentStatus::InProgress, Lang::Kk) => "жүріп жатыр",
            (DocumentStatus::Ready, Lang::Ru) => "готов к формированию",
            (DocumentStatus::Ready, Lang::Kk) => "қалыптастыруға дайын",
            (DocumentStatus::Completed, Lang::Ru) => "сформирован",
            (DocumentStatus::Completed, Lang::Kk) => "қалыптастырылған",
        }
    }
}

/// A short excerpt from the built-in legal reference set, attached to
/// consultation replies when the question matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order_is_monotonic() {
        assert!(DocumentStatus::NotStarted < DocumentStatus::InProgress);
        assert!(DocumentStatus::InProgress < DocumentStatus::Ready);
        assert!(DocumentStatus::Ready < DocumentStatus::Completed);
    }

    #[test]
    fn test_status_merge_never_regresses() {
        let merged = DocumentStatus::Ready.max(DocumentStatus::InProgress);
        assert_eq!(merged, DocumentStatus::Ready);
    }

    #[test]
    fn test_document_type_codes_round_trip() {
        for ty in DocumentType::ALL {
            assert_eq!(DocumentType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(DocumentType::parse("divorce"), None);
    }

    #[test]
    fn test_document_type_serializes_snake_case() {
        let json = serde_json::to_string(&DocumentType::PurchaseSale).unwrap();
        assert_eq!(json, "\"purchase_sale\"");
    }

    #[test]
    fn test_message_constructors_set_role() {
        let m = Message::user("привет");
        assert_eq!(m.role, Role::User);
        let m = Message::assistant("здравствуйте");
        assert_eq!(m.role, Role::Assistant);
    }
}
