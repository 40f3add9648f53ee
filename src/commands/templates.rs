use std::collections::BTreeMap;

use crate::chat::types::DocumentType;
use crate::commands::send_chunked;
use crate::docgen::{self, GenerateError};
use crate::i18n;
use crate::state::Context;
use crate::templates::{FieldValue, Template, TemplateError, TemplateFormData};

/// List available document templates
#[poise::command(slash_command, guild_only)]
pub async fn templates(
    ctx: Context<'_>,
    #[description = "Filter by document type"]
    #[autocomplete = "autocomplete_document_type"]
    document_type: Option<String>,
) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();
    let lang = ctx.data().accounts.locale(user).await;

    let filter = match document_type.as_deref() {
        Some(code) => match DocumentType::parse(code) {
            Some(ty) => Some(ty),
            None => {
                let codes: Vec<&str> = DocumentType::ALL.iter().map(|t| t.as_str()).collect();
                ctx.say(format!("Unknown type `{}`. Valid: `{}`", code, codes.join("`, `")))
                    .await?;
                return Ok(());
            }
        },
        None => None,
    };

    ctx.defer().await?;
    let list = match filter {
        Some(ty) => ctx.data().templates.list_by_type(ty).await,
        None => ctx.data().templates.list().await,
    };

    if list.is_empty() {
        ctx.say(i18n::t(lang, "noTemplates")).await?;
        return Ok(());
    }

    // Group by document type, one block per type label.
    let mut by_type: BTreeMap<&str, Vec<&Template>> = BTreeMap::new();
    for template in &list {
        by_type.entry(template.document_type.label(lang)).or_default().push(template);
    }

    let mut output = format!("**{}**\n\n", i18n::t(lang, "templatesHeader"));
    for (label, group) in &by_type {
        output.push_str(&format!("**{}**\n", label));
        for template in group {
            output.push_str(&format!(
                "  - {} — `{}`\n    {}\n",
                template.name, template.id, template.description
            ));
        }
        output.push('\n');
    }

    send_chunked(&ctx, &output).await
}

/// Show a template's fillable fields
#[poise::command(slash_command, guild_only)]
pub async fn fields(
    ctx: Context<'_>,
    #[description = "Template id (see /zanger templates)"] template_id: String,
) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();
    let lang = ctx.data().accounts.locale(user).await;

    ctx.defer().await?;
    let template = match ctx.data().templates.get_by_id(&template_id).await {
        Ok(template) => template,
        Err(TemplateError::NotFound(_)) => {
            ctx.say(i18n::t_with(lang, "templateNotFound", &[("id", &template_id)]))
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let fields = ctx.data().templates.fields(&template_id).await;

    let mut output = format!("**{}**\n{}\n\n", template.name, template.description);
    output.push_str(&format!("**{}**:\n", i18n::t(lang, "fieldsHeader")));
    for field in &fields {
        let required = if field.required { "*" } else { "" };
        output.push_str(&format!(
            "- `{}`{} — {} ({})\n",
            field.field_name,
            required,
            field.display_name,
            field.field_type.as_str()
        ));
    }
    if let Some(first) = fields.first() {
        output.push_str(&format!(
            "\n`/zanger fill template_id:{} values:{}=…; …`\n",
            template.id, first.field_name
        ));
    }

    send_chunked(&ctx, &output).await
}

/// Fill a template and generate the document (sign-in required)
#[poise::command(slash_command, guild_only)]
pub async fn fill(
    ctx: Context<'_>,
    #[description = "Template id (see /zanger templates)"] template_id: String,
    #[description = "Field values: name=value; name=value; …"] values: String,
) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();
    let lang = ctx.data().accounts.locale(user).await;

    if ctx.data().accounts.require_identity(user).await.is_err() {
        ctx.say(i18n::t(lang, "signInRequired")).await?;
        return Ok(());
    }

    ctx.defer().await?;
    let data = parse_form_values(&values);

    match docgen::generate_from_template(ctx.data().templates.as_ref(), &template_id, &data).await {
        Ok(document) => {
            ctx.data().chat.record_template_generation(user, lang).await;
            let mut output = format!(
                "{} `{}`\n\n```\n{}\n```",
                i18n::t(lang, "templateDocumentGenerated"),
                document.reference,
                truncate_chars(&document.body, 600)
            );
            if document.body.chars().count() > 600 {
                output.push('…');
            }
            send_chunked(&ctx, &output).await?;
        }
        Err(GenerateError::Template(TemplateError::NotFound(id))) => {
            ctx.say(i18n::t_with(lang, "templateNotFound", &[("id", &id)])).await?;
        }
        Err(GenerateError::Template(TemplateError::MissingFields(missing))) => {
            ctx.say(i18n::t_with(lang, "missingFields", &[("fields", &missing.join(", "))]))
                .await?;
        }
        Err(GenerateError::NotReady) => {
            ctx.say(i18n::t(lang, "templateGenerationError")).await?;
        }
    }
    Ok(())
}

/// Parse `name=value; name=value` input into form data. Segments without `=`
/// are skipped; a repeated name keeps the last value.
pub(crate) fn parse_form_values(raw: &str) -> TemplateFormData {
    let mut data = TemplateFormData::new();
    for segment in raw.split(';') {
        let Some((name, value)) = segment.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        data.insert(name.to_string(), FieldValue::from(value.trim()));
    }
    data
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

async fn autocomplete_document_type(_ctx: Context<'_>, partial: &str) -> Vec<String> {
    let partial = partial.to_lowercase();
    DocumentType::ALL
        .iter()
        .map(|ty| ty.as_str().to_string())
        .filter(|code| code.contains(&partial))
        .take(25)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_values_pairs() {
        let data = parse_form_values("city=Алматы; date=10.01.2025");
        assert_eq!(data.get("city"), Some(&FieldValue::from("Алматы")));
        assert_eq!(data.get("date"), Some(&FieldValue::from("10.01.2025")));
    }

    #[test]
    fn test_parse_form_values_skips_malformed_segments() {
        let data = parse_form_values("city=Алматы; oops; =ghost; price=100");
        assert_eq!(data.len(), 2);
        assert!(data.contains_key("city"));
        assert!(data.contains_key("price"));
    }

    #[test]
    fn test_parse_form_values_keeps_equals_inside_value() {
        let data = parse_form_values("payment_terms=50%=аванс, 50%=при передаче");
        assert_eq!(
            data.get("payment_terms"),
            Some(&FieldValue::from("50%=аванс, 50%=при передаче"))
        );
    }

    #[test]
    fn test_parse_form_values_last_duplicate_wins() {
        let data = parse_form_values("city=Алматы; city=Астана");
        assert_eq!(data.get("city"), Some(&FieldValue::from("Астана")));
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("привет", 3), "при");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
