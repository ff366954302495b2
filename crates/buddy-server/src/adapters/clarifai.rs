//! Clarifai Food Classifier
//!
//! Uses Clarifai's food-item-recognition model. Returned concepts are scored
//! with the keyword based HealthScorer.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use buddy::{DomainError, FoodAnalysis, FoodClassifier, HealthScorer};

const API_BASE: &str = "https://api.clarifai.com/v2";
const USER_ID: &str = "clarifai";
const APP_ID: &str = "main";
const MODEL_ID: &str = "food-item-recognition";
const MODEL_VERSION_ID: &str = "1d5fd481e0cf4826aa72ec3ff049e044";

/// Food classifier backed by the Clarifai HTTP API
pub struct ClarifaiClassifier {
    client: Client,
    pat: String,
    endpoint: String,
    scorer: HealthScorer,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    user_app_id: UserAppId<'a>,
    inputs: Vec<Input>,
}

#[derive(Serialize)]
struct UserAppId<'a> {
    user_id: &'a str,
    app_id: &'a str,
}

#[derive(Serialize)]
struct Input {
    data: InputData,
}

#[derive(Serialize)]
struct InputData {
    image: Image,
}

#[derive(Serialize)]
struct Image {
    base64: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    outputs: Vec<Output>,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct Output {
    #[serde(default)]
    data: Option<OutputData>,
}

#[derive(Debug, Deserialize)]
struct OutputData {
    #[serde(default)]
    concepts: Vec<Concept>,
}

#[derive(Debug, Deserialize)]
struct Concept {
    name: String,
    #[serde(default)]
    value: f32,
}

impl ClarifaiClassifier {
    pub fn new(pat: String) -> Self {
        Self {
            client: Client::new(),
            pat,
            endpoint: format!(
                "{}/models/{}/versions/{}/outputs",
                API_BASE, MODEL_ID, MODEL_VERSION_ID
            ),
            scorer: HealthScorer::default(),
        }
    }

    fn analyze(&self, response: PredictResponse) -> FoodAnalysis {
        let concepts = response
            .outputs
            .into_iter()
            .next()
            .and_then(|o| o.data)
            .map(|d| d.concepts)
            .unwrap_or_default();

        let confidence = concepts.first().map(|c| c.value).unwrap_or(0.0);
        let labels = concepts.into_iter().map(|c| c.name).collect();
        self.scorer.analyze(labels, confidence)
    }
}

#[async_trait]
impl FoodClassifier for ClarifaiClassifier {
    async fn classify(&self, image: &[u8]) -> Result<FoodAnalysis, DomainError> {
        let request = PredictRequest {
            user_app_id: UserAppId {
                user_id: USER_ID,
                app_id: APP_ID,
            },
            inputs: vec![Input {
                data: InputData {
                    image: Image {
                        base64: STANDARD.encode(image),
                    },
                },
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .header("Authorization", format!("Key {}", self.pat))
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Clarifai request failed: {e}")))?;

        let status = response.status();
        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Clarifai response invalid: {e}")))?;

        if !status.is_success() {
            let description = body
                .status
                .map(|s| s.description)
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "API request failed".to_string());
            return Err(DomainError::ExternalService(format!(
                "Clarifai API error ({}): {}",
                status.as_u16(),
                description
            )));
        }

        let analysis = self.analyze(body);
        tracing::debug!(
            "🥗 Clarifai labels: {:?} (healthy: {}, confidence: {:.2})",
            analysis.labels,
            analysis.is_healthy,
            analysis.confidence
        );
        Ok(analysis)
    }
}
