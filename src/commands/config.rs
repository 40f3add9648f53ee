use crate::state::Context;

/// Tune assistant parameters (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn config(
    ctx: Context<'_>,
    #[description = "readiness_threshold"] param: Option<String>,
    #[description = "New value"] value: Option<u32>,
) -> Result<(), anyhow::Error> {
    let user_id = ctx.author().id.get();
    if !ctx.data().is_admin(user_id) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    match (param.as_deref(), value) {
        // Show current config
        (None, _) => {
            let tuning = ctx.data().tuning.read().await;
            ctx.say(format!(
                "**Assistant configuration:**\n`readiness_threshold`: {}",
                tuning.readiness_threshold
            ))
            .await?;
        }
        // Set a parameter
        (Some(key), Some(val)) => match key {
            "readiness_threshold" => {
                // Below 3 the greeting plus one exchange would already
                // qualify, so clamp to keep at least one real exchange.
                let val = (val as usize).max(3);
                ctx.data().tuning.write().await.readiness_threshold = val;
                ctx.say(format!("`readiness_threshold` set to {}", val)).await?;
            }
            _ => {
                ctx.say(format!("Unknown param `{}`. Valid: `readiness_threshold`", key))
                    .await?;
            }
        },
        (Some(_), None) => {
            ctx.say("Provide both `param` and `value`. Example: `/zanger config readiness_threshold 7`")
                .await?;
        }
    }

    Ok(())
}
