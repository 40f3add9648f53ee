mod account;
mod chat;
mod config;
mod generate;
mod templates;

use crate::state::Context;

/// Zanger - Kazakhstan legal document assistant
#[poise::command(
    slash_command,
    subcommands(
        "chat::chat",
        "chat::consult",
        "chat::status",
        "chat::reset",
        "generate::generate",
        "templates::templates",
        "templates::fields",
        "templates::fill",
        "account::link",
        "account::unlink",
        "account::whoami",
        "account::plan",
        "account::language",
        "config::config"
    )
)]
pub async fn zanger(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// Send a message in Discord-safe chunks (max 1990 bytes, split on char
/// boundaries since replies are mostly Cyrillic). Uses ctx.say() for all
/// chunks — poise routes follow-ups through the interaction webhook, which
/// doesn't require Send Messages channel permission.
pub(crate) async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    let mut remaining = text;
    while !remaining.is_empty() {
        let mut chunk_len = remaining.len().min(1990);
        while !remaining.is_char_boundary(chunk_len) {
            chunk_len -= 1;
        }
        let split_at = if chunk_len < remaining.len() {
            remaining[..chunk_len]
                .rfind('\n')
                .or_else(|| remaining[..chunk_len].rfind(' '))
                .map(|i| i + 1)
                .unwrap_or(chunk_len)
        } else {
            chunk_len
        };
        let chunk = &remaining[..split_at];
        remaining = &remaining[split_at..];

        ctx.say(chunk).await?;
    }
    Ok(())
}
