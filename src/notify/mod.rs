pub mod templates;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::db::{self, DbPool};
use crate::workflow::validation::normalize_sms_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    SubmissionReceived,
    DocumentsRequested,
    Approved,
    Rejected,
}

impl NotificationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SubmissionReceived => "SUBMISSION_RECEIVED",
            Self::DocumentsRequested => "DOCUMENTS_REQUESTED",
            Self::Approved => "APPLICATION_APPROVED",
            Self::Rejected => "APPLICATION_REJECTED",
        }
    }

    pub const fn template(self) -> &'static str {
        match self {
            Self::SubmissionReceived => "submission_received",
            Self::DocumentsRequested => "documents_requested",
            Self::Approved => "application_approved",
            Self::Rejected => "application_rejected",
        }
    }

    pub fn sms_text(self, tracking_code: &str) -> String {
        match self {
            Self::SubmissionReceived => format!(
                "GCX: Your supplier application {tracking_code} has been received. Use this code to track it."
            ),
            Self::DocumentsRequested => format!(
                "GCX: Additional documents are required for application {tracking_code}. Check your email for the secure upload link."
            ),
            Self::Approved => format!(
                "GCX: Congratulations! Your application {tracking_code} has been approved. Check your email for login details."
            ),
            Self::Rejected => format!(
                "GCX: Your application {tracking_code} status has been updated. Check your email for details."
            ),
        }
    }
}

/// One queued notification: rendered and dispatched over email and SMS by
/// the worker, never on the request path.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub application_id: i32,
    pub tracking_code: String,
    pub business_name: String,
    pub email: String,
    pub telephone: String,
    /// Template context as a JSON object.
    pub context: serde_json::Value,
}

/// Cloneable queue handle injected through `AppState`. Sends are
/// best-effort: a full or closed queue drops the notification with a
/// warning and never fails the caller.
#[derive(Clone)]
pub struct NotifyHandle {
    tx: mpsc::Sender<Notification>,
}

impl NotifyHandle {
    pub fn enqueue(&self, notification: Notification) {
        let kind = notification.kind.as_str();
        let application_id = notification.application_id;
        if let Err(e) = self.tx.try_send(notification) {
            tracing::warn!(
                "dropping {kind} notification for application {application_id}: {e}"
            );
        }
    }
}

pub fn channel(capacity: usize) -> (NotifyHandle, mpsc::Receiver<Notification>) {
    let (tx, rx) = mpsc::channel(capacity);
    (NotifyHandle { tx }, rx)
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("notification API rejected the message: {0}")]
    Api(String),
}

/// Client for the external notification HTTP API.
pub struct Notifier {
    client: reqwest::Client,
    base_url: String,
    from_name: String,
}

impl Notifier {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.notification_timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.notification_api_url.trim_end_matches('/').to_string(),
            from_name: config.email_from_name.clone(),
        }
    }

    pub async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, NotifyError> {
        let payload = json!({
            "to": to,
            "subject": subject,
            "body": body,
            "isHtml": false,
            "fromName": self.from_name,
        });
        self.post(&format!("{}/api/email", self.base_url), &payload).await
    }

    pub async fn send_sms(&self, number: &str, message: &str) -> Result<String, NotifyError> {
        let payload = json!({
            "number": number,
            "message": message,
        });
        self.post(&format!("{}/api/sms", self.base_url), &payload).await
    }

    async fn post(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<String, NotifyError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;

        let result: serde_json::Value = response.json().await?;
        if result.get("success").and_then(|v| v.as_bool()).unwrap_or(false) {
            Ok(result
                .get("message_id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string())
        } else {
            let message = result
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error")
                .to_string();
            Err(NotifyError::Api(message))
        }
    }
}

/// Drain the queue, one notification at a time. Every failure is logged
/// and recorded on the notification log; nothing is retried.
pub fn spawn_worker(
    pool: DbPool,
    config: Arc<Config>,
    mut rx: mpsc::Receiver<Notification>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let notifier = Notifier::new(&config);
        while let Some(notification) = rx.recv().await {
            deliver(&pool, &notifier, &notification).await;
        }
    })
}

async fn deliver(pool: &DbPool, notifier: &Notifier, notification: &Notification) {
    let kind = notification.kind.as_str();

    let context = match tera::Context::from_value(notification.context.clone()) {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!("invalid context for {kind} notification: {e}");
            return;
        }
    };
    let (subject, body) = match templates::render(notification.kind.template(), &context) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::warn!("failed to render {kind} notification: {e}");
            return;
        }
    };

    send_and_log(
        pool,
        notification,
        "EMAIL",
        &notification.email,
        &subject,
        &body,
        notifier.send_email(&notification.email, &subject, &body),
    )
    .await;

    if !notification.telephone.is_empty() {
        let number = normalize_sms_number(&notification.telephone);
        let message = notification.kind.sms_text(&notification.tracking_code);
        send_and_log(
            pool,
            notification,
            "SMS",
            &number,
            "",
            &message,
            notifier.send_sms(&number, &message),
        )
        .await;
    }
}

async fn send_and_log(
    pool: &DbPool,
    notification: &Notification,
    channel: &str,
    recipient: &str,
    subject: &str,
    body: &str,
    send: impl std::future::Future<Output = Result<String, NotifyError>>,
) {
    let kind = notification.kind.as_str();

    let log_id = match db::notifications::insert_pending(
        pool.as_ref(),
        kind,
        channel,
        recipient,
        &notification.business_name,
        subject,
        body,
        Some(notification.application_id),
    )
    .await
    {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!("failed to record {channel} notification log: {e}");
            None
        }
    };

    match send.await {
        Ok(external_id) => {
            tracing::info!("{channel} {kind} notification sent to {recipient}");
            if let Some(id) = log_id {
                if let Err(e) =
                    db::notifications::mark_sent(pool.as_ref(), id, &external_id).await
                {
                    tracing::warn!("failed to update notification log {id}: {e}");
                }
            }
        }
        Err(e) => {
            tracing::warn!("{channel} {kind} notification to {recipient} failed: {e}");
            if let Some(id) = log_id {
                if let Err(e) =
                    db::notifications::mark_failed(pool.as_ref(), id, &e.to_string()).await
                {
                    tracing::warn!("failed to update notification log {id}: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sms_text_references_the_tracking_code() {
        for kind in [
            NotificationKind::SubmissionReceived,
            NotificationKind::DocumentsRequested,
            NotificationKind::Approved,
            NotificationKind::Rejected,
        ] {
            let text = kind.sms_text("GCX-2025-000001");
            assert!(text.contains("GCX-2025-000001"), "{kind:?} sms misses code");
            assert!(text.starts_with("GCX:"));
        }
    }

    #[tokio::test]
    async fn enqueue_on_a_full_queue_drops_instead_of_blocking() {
        let (handle, mut rx) = channel(1);
        let notification = Notification {
            kind: NotificationKind::SubmissionReceived,
            application_id: 1,
            tracking_code: "GCX-2025-000001".to_string(),
            business_name: "Kumasi Grains Ltd".to_string(),
            email: "owner@kumasigrains.gh".to_string(),
            telephone: String::new(),
            context: serde_json::json!({}),
        };

        handle.enqueue(notification.clone());
        handle.enqueue(notification.clone());

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err(), "second enqueue should have been dropped");
    }
}
