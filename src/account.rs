//! Linked identities and per-user preferences.
//!
//! Generation requires a linked identity; chat and browsing do not. Profiles
//! are held in memory and persisted as a JSON file under the data directory
//! so links survive restarts. Persistence is best-effort: losing a write must
//! never fail the command that triggered it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::i18n::Lang;

/// A linked identity. Presence of an email is what gates generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub locale: Lang,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("sign-in required")]
    NotLinked,
    #[error("invalid email address")]
    InvalidEmail,
}

pub struct AccountStore {
    path: PathBuf,
    profiles: RwLock<HashMap<u64, Profile>>,
}

impl AccountStore {
    pub fn load(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;
        let path = data_dir.join("accounts.json");

        let profiles = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable profile file");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            path,
            profiles: RwLock::new(profiles),
        })
    }

    pub async fn identity(&self, user: u64) -> Option<Identity> {
        self.profiles.read().await.get(&user).and_then(|p| p.identity.clone())
    }

    /// Gate for generation call sites.
    pub async fn require_identity(&self, user: u64) -> Result<Identity, AccountError> {
        self.identity(user).await.ok_or(AccountError::NotLinked)
    }

    /// Link an identity. The only shape check is the one the sign-up form
    /// performed: the address must contain `@`.
    pub async fn link(&self, user: u64, email: &str, phone: Option<String>) -> Result<Identity, AccountError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AccountError::InvalidEmail);
        }
        let identity = Identity {
            email: email.to_string(),
            phone: phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
        };

        let mut profiles = self.profiles.write().await;
        profiles.entry(user).or_default().identity = Some(identity.clone());
        self.persist(&profiles);
        info!(user, email = %identity.email, "identity linked");
        Ok(identity)
    }

    /// Remove the linked identity; returns whether one was present.
    pub async fn unlink(&self, user: u64) -> bool {
        let mut profiles = self.profiles.write().await;
        let had = profiles.get_mut(&user).and_then(|p| p.identity.take()).is_some();
        if had {
            self.persist(&profiles);
            info!(user, "identity unlinked");
        }
        had
    }

    pub async fn locale(&self, user: u64) -> Lang {
        self.profiles
            .read()
            .await
            .get(&user)
            .map(|p| p.locale)
            .unwrap_or_default()
    }

    pub async fn set_locale(&self, user: u64, locale: Lang) {
        let mut profiles = self.profiles.write().await;
        profiles.entry(user).or_default().locale = locale;
        self.persist(&profiles);
    }

    fn persist(&self, profiles: &HashMap<u64, Profile>) {
        match serde_json::to_string_pretty(profiles) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    warn!(error = %e, path = %self.path.display(), "failed to persist profiles");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize profiles"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_link_requires_at_sign() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::load(dir.path()).unwrap();

        assert_eq!(store.link(1, "not-an-email", None).await, Err(AccountError::InvalidEmail));
        assert_eq!(store.link(1, "   ", None).await, Err(AccountError::InvalidEmail));
        assert!(store.link(1, "ana@example.kz", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_require_identity_gates_until_linked() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::load(dir.path()).unwrap();

        assert_eq!(store.require_identity(2).await, Err(AccountError::NotLinked));
        store.link(2, "b@c.kz", Some("+7 701 000 00 00".to_string())).await.unwrap();
        let identity = store.require_identity(2).await.unwrap();
        assert_eq!(identity.email, "b@c.kz");
        assert_eq!(identity.phone.as_deref(), Some("+7 701 000 00 00"));
    }

    #[tokio::test]
    async fn test_unlink_reports_presence() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::load(dir.path()).unwrap();

        assert!(!store.unlink(3).await);
        store.link(3, "x@y.kz", None).await.unwrap();
        assert!(store.unlink(3).await);
        assert_eq!(store.identity(3).await, None);
    }

    #[tokio::test]
    async fn test_profiles_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = AccountStore::load(dir.path()).unwrap();
            store.link(4, "keep@me.kz", None).await.unwrap();
            store.set_locale(4, Lang::Kk).await;
        }
        let store = AccountStore::load(dir.path()).unwrap();
        assert_eq!(store.identity(4).await.unwrap().email, "keep@me.kz");
        assert_eq!(store.locale(4).await, Lang::Kk);
    }

    #[tokio::test]
    async fn test_locale_defaults_to_russian() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::load(dir.path()).unwrap();
        assert_eq!(store.locale(99).await, Lang::Ru);
    }

    #[tokio::test]
    async fn test_corrupt_profile_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("accounts.json"), "{not json").unwrap();
        let store = AccountStore::load(dir.path()).unwrap();
        assert_eq!(store.identity(1).await, None);
    }
}
