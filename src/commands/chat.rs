use tracing::info;

use crate::chat::types::ChatMode;
use crate::chat::ChatError;
use crate::commands::send_chunked;
use crate::i18n;
use crate::state::Context;

/// Chat with the assistant to draft a legal document
#[poise::command(slash_command, guild_only)]
pub async fn chat(
    ctx: Context<'_>,
    #[description = "Your message"] message: String,
) -> Result<(), anyhow::Error> {
    exchange(ctx, ChatMode::Document, message).await
}

/// Ask a general question about Kazakhstan legislation
#[poise::command(slash_command, guild_only)]
pub async fn consult(
    ctx: Context<'_>,
    #[description = "Your question"] question: String,
) -> Result<(), anyhow::Error> {
    exchange(ctx, ChatMode::Consultation, question).await
}

async fn exchange(ctx: Context<'_>, mode: ChatMode, content: String) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();
    let lang = ctx.data().accounts.locale(user).await;
    let threshold = ctx.data().tuning.read().await.readiness_threshold;

    // Defer so the completion round-trip doesn't hit the interaction deadline.
    ctx.defer().await?;

    info!(
        user = %ctx.author().name,
        mode = mode.as_str(),
        "chat message received"
    );

    let reply = match ctx
        .data()
        .chat
        .send_message(user, mode, lang, &content, threshold)
        .await
    {
        Ok(reply) => reply,
        Err(ChatError::Busy) => {
            ctx.say(i18n::t(lang, "busy")).await?;
            return Ok(());
        }
        Err(ChatError::Empty) => {
            ctx.say(i18n::t(lang, "emptyMessage")).await?;
            return Ok(());
        }
    };

    let mut full = reply.response.clone();
    for reference in &reply.references {
        full.push_str(&format!("\n\n> **{}**\n> {}", reference.title, reference.content));
    }
    if reply.became_ready {
        full.push_str(&format!("\n\n_{}_", i18n::t(lang, "documentReady")));
    }

    send_chunked(&ctx, &full).await
}

/// Show the progress of your document conversation
#[poise::command(slash_command, guild_only)]
pub async fn status(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();
    let lang = ctx.data().accounts.locale(user).await;
    let (document_type, status) = ctx.data().chat.document_state(user).await;

    let type_label = match document_type {
        Some(ty) => ty.label(lang).to_string(),
        None => i18n::t(lang, "statusNoType"),
    };

    ctx.say(format!(
        "**{}**: {}\n**{}**: {}",
        i18n::t(lang, "statusTypeLabel"),
        type_label,
        i18n::t(lang, "statusStateLabel"),
        status.label(lang)
    ))
    .await?;
    Ok(())
}

/// Start a conversation over
#[poise::command(slash_command, guild_only)]
pub async fn reset(
    ctx: Context<'_>,
    #[description = "Which conversation: chat | consult (default chat)"] conversation: Option<String>,
) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();
    let lang = ctx.data().accounts.locale(user).await;
    let mode = match conversation.as_deref() {
        Some("consult") => ChatMode::Consultation,
        _ => ChatMode::Document,
    };

    match ctx.data().chat.reset(user, mode, lang).await {
        Ok(()) => ctx.say(i18n::t(lang, "resetDone")).await?,
        Err(_) => ctx.say(i18n::t(lang, "busy")).await?,
    };
    Ok(())
}
