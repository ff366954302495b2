//! Notification Sink Port
//!
//! Abstract interface for delivering low-vitals alerts to the buddy's owner.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, BuddyVitals, VitalsNotification};

/// Destination for notifications raised by the vitals engine
///
/// Delivery is best effort: callers log failures and carry on.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification about `vitals`
    async fn notify(
        &self,
        vitals: &BuddyVitals,
        notification: &VitalsNotification,
    ) -> Result<(), DomainError>;
}
