use chrono::DateTime;
use tracing::info;

use crate::billing::product_by_price_id;
use crate::i18n::{self, Lang};
use crate::state::Context;

/// Link your email to enable document generation
#[poise::command(slash_command, guild_only)]
pub async fn link(
    ctx: Context<'_>,
    #[description = "Email address"] email: String,
    #[description = "Phone number (optional)"] phone: Option<String>,
) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();
    let lang = ctx.data().accounts.locale(user).await;

    match ctx.data().accounts.link(user, &email, phone).await {
        Ok(identity) => {
            ctx.say(i18n::t_with(lang, "linked", &[("email", &identity.email)]))
                .await?;
        }
        Err(_) => {
            ctx.say(i18n::t(lang, "invalidEmail")).await?;
        }
    }
    Ok(())
}

/// Remove your linked identity
#[poise::command(slash_command, guild_only)]
pub async fn unlink(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();
    let lang = ctx.data().accounts.locale(user).await;

    let key = if ctx.data().accounts.unlink(user).await {
        "unlinked"
    } else {
        "notLinked"
    };
    ctx.say(i18n::t(lang, key)).await?;
    Ok(())
}

/// Show the identity linked to your account
#[poise::command(slash_command, guild_only)]
pub async fn whoami(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();
    let lang = ctx.data().accounts.locale(user).await;

    match ctx.data().accounts.identity(user).await {
        Some(identity) => {
            let mut line = i18n::t_with(lang, "linked", &[("email", &identity.email)]);
            if let Some(phone) = &identity.phone {
                line.push_str(&format!(" ({})", phone));
            }
            ctx.say(line).await?;
        }
        None => {
            ctx.say(i18n::t(lang, "notLinked")).await?;
        }
    }
    Ok(())
}

/// Show your subscription plan
#[poise::command(slash_command, guild_only)]
pub async fn plan(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();
    let lang = ctx.data().accounts.locale(user).await;

    let Some(identity) = ctx.data().accounts.identity(user).await else {
        ctx.say(i18n::t(lang, "signInRequired")).await?;
        return Ok(());
    };

    ctx.defer().await?;
    match ctx.data().billing.subscription(&identity.email).await {
        Some(subscription) if subscription.is_active() => {
            let plan = subscription
                .price_id
                .as_deref()
                .and_then(product_by_price_id)
                .map(|p| p.name)
                .or(subscription.price_id.as_deref())
                .unwrap_or("?");
            let mut output = format!(
                "**{}**: {}\n**{}**: {}",
                i18n::t(lang, "planName"),
                plan,
                i18n::t(lang, "planStatus"),
                subscription.subscription_status
            );
            if let Some(end) = subscription
                .current_period_end
                .and_then(|ts| DateTime::from_timestamp(ts, 0))
            {
                output.push_str(&format!(
                    "\n**{}**: {}",
                    i18n::t(lang, "planUntil"),
                    end.format("%d.%m.%Y")
                ));
            }
            ctx.say(output).await?;
        }
        _ => {
            ctx.say(i18n::t(lang, "noSubscription")).await?;
        }
    }
    Ok(())
}

/// Choose the interface language
#[poise::command(slash_command, guild_only)]
pub async fn language(
    ctx: Context<'_>,
    #[description = "ru | kk"] locale: String,
) -> Result<(), anyhow::Error> {
    let user = ctx.author().id.get();

    match Lang::from_code(&locale) {
        Some(lang) => {
            ctx.data().accounts.set_locale(user, lang).await;
            info!(user = %ctx.author().name, locale = lang.as_str(), "locale changed");
            ctx.say(i18n::t(lang, "languageSet")).await?;
        }
        None => {
            ctx.say("`ru` | `kk`").await?;
        }
    }
    Ok(())
}
