// Failure emails through the SendGrid v3 mail API.
// https://sendgrid.com/docs/API_Reference/api_v3.html

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::core::addon::{EmailMessage, Notifier, NotifyError};

pub struct SendGridNotifier {
    client: Client,
    api_key: String,
    url: String,
    /// The `from` address on every email.
    sender: String,
}

impl SendGridNotifier {
    pub fn new(api_key: String, url: String, sender: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            url,
            sender,
        }
    }

    fn mail_payload(&self, message: &EmailMessage) -> Value {
        json!({
            "personalizations": [
                {
                    "to": [{ "email": message.to }],
                    "subject": message.subject,
                }
            ],
            "from": { "email": self.sender },
            "content": [
                {
                    "type": message.content_type,
                    "value": message.body,
                }
            ],
        })
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.mail_payload(message))
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(NotifyError::Delivery(format!("SendGrid returned {} - {}", status, text)));
        }

        tracing::info!(to = %message.to, "Failure email sent");
        Ok(())
    }
}
