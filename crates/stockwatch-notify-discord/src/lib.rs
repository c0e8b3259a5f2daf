// # Discord Webhook Notifier
//
// This crate provides the Discord webhook notifier for stockwatch.
//
// ## Behavior
//
// - One POST per availability change, body `{"content": "<message>"}`
// - No retry, no batching
// - The webhook URL is given at construction; it is only required once a
//   message actually has to be sent
//
// ## Security
//
// A Discord webhook URL embeds its token. It never appears in logs, in
// error messages, or in Debug output.

use async_trait::async_trait;
use serde::Serialize;
use stockwatch_core::traits::Notifier;
use stockwatch_core::{Error, Result, Transition};

/// Environment variable conventionally holding the webhook URL
pub const WEBHOOK_URL_ENV: &str = "DISCORD_WEBHOOK_URL";

/// Webhook execute payload
#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Discord webhook notifier
pub struct DiscordNotifier {
    /// Webhook URL
    /// ⚠️ NEVER log this value
    webhook_url: Option<String>,

    /// HTTP client for webhook requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the webhook URL
impl std::fmt::Debug for DiscordNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordNotifier")
            .field(
                "webhook_url",
                &self.webhook_url.as_ref().map(|_| "<REDACTED>"),
            )
            .finish()
    }
}

impl DiscordNotifier {
    /// Create a notifier
    ///
    /// `None` is accepted so that runs without changes work without a
    /// webhook; [`Notifier::send`] then fails with a configuration error.
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
            client: reqwest::Client::new(),
        }
    }

    /// Whether a webhook URL is configured
    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Post a raw message to the webhook
    pub async fn post(&self, content: &str) -> Result<()> {
        let url = self.webhook_url.as_deref().ok_or_else(|| {
            Error::config(format!(
                "{} is not set; cannot send notification",
                WEBHOOK_URL_ENV
            ))
        })?;

        let response = self
            .client
            .post(url)
            .json(&WebhookMessage { content })
            .send()
            .await
            .map_err(|e| {
                Error::notifier(format!("Webhook request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::http(format!(
                "Discord webhook returned {}: {}",
                status, error_text
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, transition: &Transition) -> Result<()> {
        tracing::debug!("Sending Discord notification for {}", transition);
        self.post(&transition.message()).await
    }

    fn notifier_name(&self) -> &'static str {
        "discord"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_not_exposed_in_debug() {
        let notifier = DiscordNotifier::new(Some(
            "https://discord.com/api/webhooks/123/secret_token_abc".to_string(),
        ));

        let debug_str = format!("{:?}", notifier);
        assert!(!debug_str.contains("secret_token_abc"));
        assert!(!debug_str.contains("discord.com"));
        assert!(debug_str.contains("DiscordNotifier"));
        assert!(debug_str.contains("REDACTED"));
    }

    #[test]
    fn test_blank_url_is_unconfigured() {
        assert!(!DiscordNotifier::new(None).is_configured());
        assert!(!DiscordNotifier::new(Some("  ".to_string())).is_configured());
        assert!(DiscordNotifier::new(Some("https://example.invalid/hook".to_string())).is_configured());
    }

    #[test]
    fn test_payload_shape() {
        let json = serde_json::to_value(WebhookMessage { content: "hello" }).unwrap();
        assert_eq!(json, serde_json::json!({"content": "hello"}));
    }

    #[tokio::test]
    async fn test_unconfigured_send_is_config_error() {
        let err = DiscordNotifier::new(None).post("hello").await.unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains(WEBHOOK_URL_ENV));
    }
}
