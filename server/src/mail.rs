use tracing::{error, info};

/// Outbound transactional mail over a JSON HTTP API. Sends are fire-and-
/// forget: a delivery failure is logged and never fails the request that
/// triggered it.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: Option<MailConfig>,
}

#[derive(Clone)]
struct MailConfig {
    api_url: String,
    api_key: String,
    from: String,
}

impl Mailer {
    pub fn from_env() -> Self {
        let config = match (std::env::var("MAIL_API_URL"), std::env::var("MAIL_API_KEY")) {
            (Ok(api_url), Ok(api_key)) => Some(MailConfig {
                api_url,
                api_key,
                from: std::env::var("MAIL_FROM")
                    .unwrap_or_else(|_| "hello@quill.example".to_string()),
            }),
            _ => {
                info!("Outbound mail disabled; MAIL_API_URL / MAIL_API_KEY not set");
                None
            }
        };

        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// A mailer that drops everything. Used by tests.
    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            config: None,
        }
    }

    /// Send the welcome email in the background.
    pub fn spawn_welcome(&self, to: String, username: String) {
        let mailer = self.clone();
        tokio::spawn(async move {
            if let Err(err) = mailer.send_welcome(&to, &username).await {
                error!("Failed to send welcome email to {}: {:?}", to, err);
            }
        });
    }

    async fn send_welcome(&self, to: &str, username: &str) -> color_eyre::Result<()> {
        let Some(config) = &self.config else {
            return Ok(());
        };

        let message = serde_json::json!({
            "to": to,
            "from": config.from,
            "subject": "Welcome to Quill!",
            "text": "Congrats on signing up!",
            "html": format!("Welcome, {username}! Make your <strong>first</strong> post today!"),
        });

        self.client
            .post(&config.api_url)
            .bearer_auth(&config.api_key)
            .json(&message)
            .send()
            .await?
            .error_for_status()?;

        info!("Sent welcome email to {}", to);
        Ok(())
    }
}
