//! Subscription status display. Checkout and webhooks happen elsewhere; this
//! client only reads the billing view, and any failure degrades to "no
//! subscription" rather than an error.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const BILLING_TIMEOUT_SECS: u64 = 10;

/// One row of the billing collaborator's subscription view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub price_id: Option<String>,
    pub subscription_status: String,
    /// Unix seconds of the next billing date, when known.
    #[serde(default)]
    pub current_period_end: Option<i64>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.subscription_status == "active"
    }
}

/// A purchasable plan, keyed by its billing price id.
#[derive(Debug, Clone, Copy)]
pub struct Product {
    pub price_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mode: &'static str,
}

/// Static catalog, mirroring the billing dashboard configuration.
pub const PRODUCTS: &[Product] = &[Product {
    price_id: "price_1RT566QLnd69H9mmQFvvCeoy",
    name: "Купле продажа",
    description: "Доступ к шаблонам договоров купли-продажи",
    mode: "subscription",
}];

pub fn product_by_price_id(price_id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.price_id == price_id)
}

/// Read client for the subscription view.
pub struct BillingClient {
    client: reqwest::Client,
    base_url: Option<String>,
    anon_key: Option<String>,
}

impl BillingClient {
    pub fn new(base_url: Option<String>, anon_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(BILLING_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.filter(|s| !s.is_empty()),
            anon_key: anon_key.filter(|s| !s.is_empty()),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(
            dotenv::var("SUPABASE_URL").ok(),
            dotenv::var("SUPABASE_ANON_KEY").ok(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.anon_key.is_some()
    }

    /// The subscription linked to an email, or `None`. Transient failures are
    /// logged and absorbed; a missing subscription and an unreachable billing
    /// service read the same to the caller.
    pub async fn subscription(&self, email: &str) -> Option<Subscription> {
        if !self.is_configured() {
            debug!("billing collaborator not configured");
            return None;
        }
        match self.fetch(email).await {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, "billing collaborator unavailable");
                None
            }
        }
    }

    async fn fetch(&self, email: &str) -> Result<Option<Subscription>> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| anyhow!("billing not configured"))?;
        let key = self.anon_key.as_deref().unwrap_or_default();
        let url = format!(
            "{}/rest/v1/stripe_user_subscriptions",
            base.trim_end_matches('/')
        );

        let filter = format!("eq.{}", email);
        let resp = self
            .client
            .get(&url)
            .query(&[("select", "*"), ("email", filter.as_str())])
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key))
            .send()
            .await
            .context("Billing request failed")?
            .error_for_status()
            .context("Billing service returned an error")?;

        let mut rows: Vec<Subscription> = resp
            .json()
            .await
            .context("Failed to parse billing response")?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_lookup_by_price_id() {
        let product = product_by_price_id("price_1RT566QLnd69H9mmQFvvCeoy").unwrap();
        assert_eq!(product.name, "Купле продажа");
        assert_eq!(product.mode, "subscription");
        assert!(product_by_price_id("price_unknown").is_none());
    }

    #[test]
    fn test_only_active_status_counts() {
        let sub = Subscription {
            price_id: None,
            subscription_status: "active".to_string(),
            current_period_end: None,
        };
        assert!(sub.is_active());
        let sub = Subscription {
            subscription_status: "past_due".to_string(),
            ..sub
        };
        assert!(!sub.is_active());
    }

    #[tokio::test]
    async fn test_unconfigured_client_reports_no_subscription() {
        let billing = BillingClient::new(None, None).unwrap();
        assert!(!billing.is_configured());
        assert!(billing.subscription("a@b.kz").await.is_none());
    }
}
