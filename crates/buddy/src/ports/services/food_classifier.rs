//! Food Classifier Port
//!
//! Abstract interface for recognizing food in a photo.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, FoodAnalysis};

/// Service interface for food image classification
#[async_trait]
pub trait FoodClassifier: Send + Sync {
    /// Classify raw image bytes (JPEG/PNG)
    async fn classify(&self, image: &[u8]) -> Result<FoodAnalysis, DomainError>;
}
