mod account;
mod billing;
mod chat;
mod commands;
mod docgen;
mod i18n;
mod llm;
mod state;
mod templates;

use std::collections::HashSet;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tokio::sync::RwLock;
use tracing::{error, info, Level};

use account::AccountStore;
use billing::BillingClient;
use chat::ChatEngine;
use llm::CompletionClient;
use state::{AppState, ChatTuning};
use templates::TemplateStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let token = dotenv::var("DISCORD_TOKEN").expect("DISCORD_TOKEN required");
    let guild_id: Option<serenity::GuildId> = dotenv::var("DISCORD_GUILD_ID")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(serenity::GuildId::new);

    // Init account storage
    let data_dir = std::path::PathBuf::from("./data");
    let accounts = Arc::new(AccountStore::load(&data_dir)?);
    info!("Account store initialized at {:?}", data_dir);

    // Init collaborator clients
    let llm_client = Arc::new(CompletionClient::from_env()?);
    if llm_client.is_configured() {
        info!("Completion client configured");
    } else {
        info!("No completion credentials, scripted responder active");
    }

    let templates = Arc::new(TemplateStore::from_env()?);
    if !templates.is_configured() {
        info!("No template store credentials, built-in samples active");
    }

    let billing = Arc::new(BillingClient::from_env()?);

    // Parse admin user IDs from env
    let admin_ids: HashSet<u64> = dotenv::var("ADMIN_USER_IDS")
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse::<u64>().ok())
        .collect();
    if !admin_ids.is_empty() {
        info!(count = admin_ids.len(), "Admin users configured");
    }

    let tuning = Arc::new(RwLock::new(ChatTuning::default()));

    // Init conversation engine
    let chat_engine = Arc::new(ChatEngine::new(llm_client));

    let app_state = AppState {
        chat: chat_engine,
        templates,
        billing,
        accounts,
        admin_ids,
        tuning,
    };

    let intents =
        serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MESSAGES;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::zanger()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                info!("Registering {} top-level command(s):", commands.len());
                for cmd in commands {
                    info!("  /{} ({} subcommands)", cmd.name, cmd.subcommands.len());
                    for sub in &cmd.subcommands {
                        info!("    /{} {}", cmd.name, sub.name);
                    }
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        gid,
                    )
                    .await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(
                        ctx,
                        &framework.options().commands,
                    )
                    .await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting Zanger Discord bot...");

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    Ok(())
}
