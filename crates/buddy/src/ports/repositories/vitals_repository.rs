//! Vitals Repository Port
//!
//! Abstract interface for BuddyVitals persistence operations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, BuddyVitals};

/// Repository interface for BuddyVitals records
///
/// A store should hold at most one live record per user. When legacy data
/// violates that, [`remove_duplicates`](VitalsRepository::remove_duplicates)
/// restores it.
#[async_trait]
pub trait VitalsRepository: Send + Sync {
    /// Find a buddy by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BuddyVitals>, DomainError>;

    /// Find the user's most recently updated buddy
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<BuddyVitals>, DomainError>;

    /// Find all buddies
    async fn find_all(&self) -> Result<Vec<BuddyVitals>, DomainError>;

    /// Save a buddy (insert or update, keyed by ID)
    async fn save(&self, vitals: &BuddyVitals) -> Result<BuddyVitals, DomainError>;

    /// Delete every buddy of the user except the most recently updated one
    ///
    /// Returns the number of deleted records.
    async fn remove_duplicates(&self, user_id: Uuid) -> Result<usize, DomainError>;
}
