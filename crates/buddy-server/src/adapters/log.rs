//! Tracing Notification Sink
//!
//! Used when no webhook is configured: notifications end up in the server log.

use async_trait::async_trait;

use buddy::{BuddyVitals, DomainError, NotificationSink, VitalsNotification};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn notify(
        &self,
        vitals: &BuddyVitals,
        notification: &VitalsNotification,
    ) -> Result<(), DomainError> {
        tracing::info!(
            buddy_id = %vitals.id,
            user_id = %vitals.user_id,
            kind = %notification.kind,
            "🔔 {}",
            notification.message
        );
        Ok(())
    }
}
