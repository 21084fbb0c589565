//! Alert text composition and push delivery.

use async_trait::async_trait;
use engine::{AlertComposer, AlertMessage, Crossing, EngineError, MoneyMinor, PushSender, QuotaAlert};

/// Deterministic alert text, no external service involved.
pub struct TemplateAlertComposer;

#[async_trait]
impl AlertComposer for TemplateAlertComposer {
    async fn compose(
        &self,
        alert: &QuotaAlert,
        receipt_count: usize,
    ) -> Result<AlertMessage, EngineError> {
        let spend = MoneyMinor::new(alert.current_spend_minor);
        let quota = MoneyMinor::new(alert.quota_minor);
        let message = match alert.crossing {
            Crossing::Exceeded => format!(
                "You have exceeded your {} budget of {}. This month's spend is {} across {} receipts.",
                alert.category, quota, spend, receipt_count
            ),
            Crossing::Warning => format!(
                "You have used over 80% of your {} budget of {}. This month's spend is {} across {} receipts.",
                alert.category, quota, spend, receipt_count
            ),
        };
        Ok(AlertMessage {
            title: "Spending Alert".to_string(),
            message,
        })
    }
}

/// Push delivery over a webhook endpoint.
pub struct HttpPushSender {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPushSender {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl PushSender for HttpPushSender {
    async fn send(&self, user_email: &str, title: &str, body: &str) -> Result<(), EngineError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "user_email": user_email,
                "title": title,
                "body": body,
            }))
            .send()
            .await
            .map_err(|err| EngineError::Transport(err.to_string()))?;
        response
            .error_for_status()
            .map_err(|err| EngineError::Transport(err.to_string()))?;
        Ok(())
    }
}

/// Used when no push endpoint is configured.
pub struct NoopPushSender;

#[async_trait]
impl PushSender for NoopPushSender {
    async fn send(&self, user_email: &str, title: &str, _body: &str) -> Result<(), EngineError> {
        tracing::debug!(user = %user_email, title, "push delivery disabled, dropping");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Category;

    #[tokio::test]
    async fn exceeded_template_names_the_numbers() {
        let alert = QuotaAlert {
            category: Category::Food,
            crossing: Crossing::Exceeded,
            current_spend_minor: 110_00,
            quota_minor: 100_00,
        };
        let msg = TemplateAlertComposer.compose(&alert, 3).await.unwrap();
        assert_eq!(msg.title, "Spending Alert");
        assert!(msg.message.contains("exceeded"));
        assert!(msg.message.contains("₹110.00"));
        assert!(msg.message.contains("₹100.00"));
        assert!(msg.message.contains("3 receipts"));
    }

    #[tokio::test]
    async fn warning_template_mentions_eighty_percent() {
        let alert = QuotaAlert {
            category: Category::Travel,
            crossing: Crossing::Warning,
            current_spend_minor: 85_00,
            quota_minor: 100_00,
        };
        let msg = TemplateAlertComposer.compose(&alert, 1).await.unwrap();
        assert!(msg.message.contains("80%"));
    }
}
