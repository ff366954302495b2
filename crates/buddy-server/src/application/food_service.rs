//! Food Application Service (Use Case)
//!
//! Photo feeding and the food journal.

use std::sync::Arc;
use uuid::Uuid;

use buddy::{
    BuddyVitals, DomainError, FoodClassifier, FoodEntry, FoodJournalRepository, VitalsRepository,
};

use super::VitalsService;

/// Largest page the journal returns
pub const MAX_JOURNAL_PAGE: usize = 100;

/// Application service for meals
pub struct FoodService<R: VitalsRepository, J: FoodJournalRepository> {
    vitals: Arc<VitalsService<R>>,
    journal: Arc<J>,
    classifier: Option<Arc<dyn FoodClassifier>>,
}

impl<R: VitalsRepository, J: FoodJournalRepository> FoodService<R, J> {
    pub fn new(
        vitals: Arc<VitalsService<R>>,
        journal: Arc<J>,
        classifier: Option<Arc<dyn FoodClassifier>>,
    ) -> Self {
        Self {
            vitals,
            journal,
            classifier,
        }
    }

    /// Classify a photo, feed the buddy accordingly and journal the meal
    ///
    /// A classifier failure leaves the buddy unfed.
    pub async fn feed_photo(
        &self,
        buddy_id: Uuid,
        image: &[u8],
        image_url: Option<String>,
    ) -> Result<(BuddyVitals, FoodEntry), DomainError> {
        let classifier = self.classifier.as_ref().ok_or_else(|| {
            DomainError::ExternalService("food classifier is not configured".to_string())
        })?;
        if image.is_empty() {
            return Err(DomainError::Validation("image must not be empty".to_string()));
        }

        // Fail fast before paying for a classification
        self.vitals.get(buddy_id).await?;

        let analysis = classifier.classify(image).await?;
        let (vitals, hp_gain) = self.vitals.feed(buddy_id, analysis.is_healthy).await?;

        let entry = FoodEntry::from_analysis(
            buddy_id,
            &analysis,
            image_url,
            hp_gain,
            vitals.last_fed.unwrap_or_else(|| self.vitals.now()),
        );

        let entry = match self.journal.add(&entry).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("⚠️  Failed to journal meal for {}: {}", buddy_id, e);
                entry
            }
        };

        tracing::info!(
            "📸 {} ate {} ({:.0}% sure, {})",
            vitals.name,
            entry.name,
            entry.confidence * 100.0,
            if entry.is_healthy { "healthy" } else { "unhealthy" }
        );
        Ok((vitals, entry))
    }

    /// Newest meals first
    pub async fn journal(&self, buddy_id: Uuid, limit: usize) -> Result<Vec<FoodEntry>, DomainError> {
        self.vitals.get(buddy_id).await?;
        self.journal
            .list(buddy_id, limit.clamp(1, MAX_JOURNAL_PAGE))
            .await
    }

    pub async fn clear_journal(&self, buddy_id: Uuid) -> Result<usize, DomainError> {
        self.vitals.get(buddy_id).await?;
        let removed = self.journal.clear(buddy_id).await?;
        tracing::info!("🗑️  Cleared {} journal entries for {}", removed, buddy_id);
        Ok(removed)
    }
}
