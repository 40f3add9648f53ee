//! Keyword scans over user messages: document-type detection for document
//! mode and reference lookup for consultation mode. Both tables are fixed and
//! ordered; the first substring hit wins, so for a given message the result
//! is always the same.

use super::types::{DocumentStatus, DocumentType, Reference};

/// Transcript length (both roles, greeting included) at which a conversation
/// with a known document type becomes ready for generation.
pub const READINESS_THRESHOLD: usize = 5;

/// Keyword stems mapped to document types, scanned in declaration order
/// against the lowercased message. Stems cover the common case forms, e.g.
/// «купл» matches both «купля-продажа» and «договор купли-продажи». The
/// generic «работ» sits after «работы» so work-performed phrasing resolves to
/// contract work before employment.
const DOCUMENT_KEYWORDS: &[(&str, DocumentType)] = &[
    ("купл", DocumentType::PurchaseSale),
    ("прода", DocumentType::PurchaseSale),
    ("покуп", DocumentType::PurchaseSale),
    ("аренд", DocumentType::Lease),
    ("съем", DocumentType::Lease),
    ("услуг", DocumentType::Services),
    ("подряд", DocumentType::ContractWork),
    ("работы", DocumentType::ContractWork),
    ("труд", DocumentType::Employment),
    ("найм", DocumentType::Employment),
    ("работ", DocumentType::Employment),
];

/// Built-in legal reference set for consultation mode. Keywords here are
/// distinct strings from the detection table above; the two scans never share
/// entries.
struct KnowledgeEntry {
    keywords: &'static [&'static str],
    title: &'static str,
    content: &'static str,
}

const KNOWLEDGE_BASE: &[KnowledgeEntry] = &[
    KnowledgeEntry {
        keywords: &["купли-продажи", "купля-продажа", "статья 406"],
        title: "Договор купли-продажи",
        content: "Договор купли-продажи регулируется Гражданским кодексом РК. Согласно статье 406 ГК РК, по договору купли-продажи одна сторона (продавец) обязуется передать имущество (товар) в собственность другой стороне (покупателю), а покупатель обязуется принять это имущество и уплатить за него определенную денежную сумму (цену).",
    },
    KnowledgeEntry {
        keywords: &["аренды", "аренду", "имущественный найм"],
        title: "Договор аренды",
        content: "Договор аренды регулируется главой 29 Гражданского кодекса РК. По договору имущественного найма (аренды) наймодатель обязуется предоставить нанимателю имущество за плату во временное владение и пользование.",
    },
    KnowledgeEntry {
        keywords: &["трудово", "работодател", "увольнен"],
        title: "Трудовой договор",
        content: "Трудовой договор регулируется Трудовым кодексом РК. Согласно статье 33 ТК РК, трудовой договор заключается в письменной форме не менее чем в двух экземплярах и подписывается сторонами.",
    },
];

/// Detect a document type from a single user message. Case-insensitive,
/// first matching table entry wins.
pub fn detect_document_type(text: &str) -> Option<DocumentType> {
    let lowered = text.to_lowercase();
    DOCUMENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, ty)| *ty)
}

/// Find reference excerpts for a consultation question. At most one entry
/// matches; an unmatched question yields no references.
pub fn find_references(text: &str) -> Vec<Reference> {
    let lowered = text.to_lowercase();
    KNOWLEDGE_BASE
        .iter()
        .find(|entry| entry.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|entry| {
            vec![Reference {
                title: entry.title.to_string(),
                content: entry.content.to_string(),
            }]
        })
        .unwrap_or_default()
}

/// Derive document progress from the transcript length and whether a type is
/// known. The count includes the seeded greeting and both roles.
pub fn derive_status(
    message_count: usize,
    document_type: Option<DocumentType>,
    threshold: usize,
) -> DocumentStatus {
    if message_count >= threshold && document_type.is_some() {
        DocumentStatus::Ready
    } else if message_count > 1 {
        DocumentStatus::InProgress
    } else {
        DocumentStatus::NotStarted
    }
}
