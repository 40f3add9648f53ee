use tracing::{info, warn};

use crate::docgen::{self, GenerateError};
use crate::i18n;
use crate::state::Context;

/// Generate the drafted document (sign-in required)
#[poise::command(slash_command, guild_only)]
pub async fn generate(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();
    let lang = ctx.data().accounts.locale(user).await;

    // The identity gate lives here, not in the pipeline: chatting is open,
    // materializing is not.
    if ctx.data().accounts.require_identity(user).await.is_err() {
        ctx.say(i18n::t(lang, "signInRequired")).await?;
        return Ok(());
    }

    ctx.defer().await?;

    let (document_type, status) = ctx.data().chat.document_state(user).await;
    match docgen::generate(document_type, status).await {
        Ok(reference) => {
            ctx.data().chat.mark_completed(user).await;
            info!(user = %ctx.author().name, reference = %reference, "conversation document generated");
            ctx.say(format!("{} `{}`", i18n::t(lang, "documentGenerated"), reference))
                .await?;
        }
        Err(GenerateError::NotReady) => {
            ctx.say(i18n::t(lang, "documentNotReady")).await?;
        }
        Err(e) => {
            warn!(user = %ctx.author().name, error = %e, "document generation failed");
            ctx.say(i18n::t(lang, "documentGenerationError")).await?;
        }
    }
    Ok(())
}
