//! Email notification service client

use reqwest::Method;
use tracing::info;

use crate::config::ClientConfig;
use crate::http::ApiClient;
use crate::session::Session;
use hm_core::notification::EmailNotification;
use hm_core::Result;

#[derive(Clone)]
pub struct NotificationClient {
    api: ApiClient,
}

impl NotificationClient {
    pub fn new(config: &ClientConfig, session: Session) -> Self {
        Self {
            api: ApiClient::new(&config.notification_service_url, session),
        }
    }

    pub async fn send_email(&self, notification: &EmailNotification) -> Result<()> {
        notification.validate()?;
        let request = self
            .api
            .request(Method::POST, "/send-email")
            .json(notification);
        self.api.send(request, "send notification").await?;
        info!(
            "Notification '{}' sent to {} recipient(s)",
            notification.subject,
            notification.recipients.len()
        );
        Ok(())
    }
}
