use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::account::AccountStore;
use crate::billing::BillingClient;
use crate::chat::detect::READINESS_THRESHOLD;
use crate::chat::ChatEngine;
use crate::templates::TemplateStore;

/// Configurable pipeline parameters (admins can modify at runtime).
pub struct ChatTuning {
    pub readiness_threshold: usize,
}

impl Default for ChatTuning {
    fn default() -> Self {
        Self {
            readiness_threshold: READINESS_THRESHOLD,
        }
    }
}

pub struct AppState {
    pub chat: Arc<ChatEngine>,
    pub templates: Arc<TemplateStore>,
    pub billing: Arc<BillingClient>,
    pub accounts: Arc<AccountStore>,
    pub admin_ids: HashSet<u64>,
    pub tuning: Arc<RwLock<ChatTuning>>,
}

impl AppState {
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
