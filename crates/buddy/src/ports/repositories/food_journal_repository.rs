//! Food Journal Repository Port
//!
//! Abstract interface for the per-buddy food journal.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, FoodEntry};

/// Repository interface for FoodEntry records
#[async_trait]
pub trait FoodJournalRepository: Send + Sync {
    /// Append a meal to the journal
    async fn add(&self, entry: &FoodEntry) -> Result<FoodEntry, DomainError>;

    /// Most recent meals first
    async fn list(&self, buddy_id: Uuid, limit: usize) -> Result<Vec<FoodEntry>, DomainError>;

    /// Remove all meals of a buddy, returning how many were removed
    async fn clear(&self, buddy_id: Uuid) -> Result<usize, DomainError>;
}
