//! HTTP client for the plan generation service.

use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::plan::{Exercise, Movement, StandaloneCombo, TrainingPlan};
use crate::settings::{ApiSettings, TrainingParams};

use super::ApiError;

pub const TRAINING_PATH: &str = "/user/api/training/make";
pub const COMBO_PATH: &str = "/user/api/combo/make";
pub const MOVEMENTS_PATH: &str = "/user/api/movement";
pub const EXERCISES_PATH: &str = "/user/api/exercise";

const NO_QUERY: [(&str, &str); 0] = [];

#[derive(Serialize)]
struct ComboQuery {
    movements: u32,
}

pub struct TrainingClient {
    http: Client,
    base_url: String,
}

impl TrainingClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests a freshly generated training plan.
    pub async fn generate_training(
        &self,
        params: &TrainingParams,
    ) -> Result<TrainingPlan, ApiError> {
        params
            .validate()
            .map_err(|err| ApiError::InvalidRequest(err.to_string()))?;

        let plan: TrainingPlan = self.get(TRAINING_PATH, params).await?;
        info!(
            "Received training plan with {} sections ({})",
            plan.sections.len(),
            plan.duration
        );
        Ok(plan)
    }

    /// Requests a standalone combo, wrapped as a single-section plan.
    pub async fn generate_combo(&self, movements: u32) -> Result<TrainingPlan, ApiError> {
        if movements == 0 {
            return Err(ApiError::InvalidRequest(
                "movements must be a positive integer".into(),
            ));
        }

        let combo: StandaloneCombo = self.get(COMBO_PATH, &ComboQuery { movements }).await?;
        info!("Received combo with {} movements", combo.movements.len());
        Ok(TrainingPlan::from_combo(combo))
    }

    pub async fn movements(&self) -> Result<Vec<Movement>, ApiError> {
        self.get(MOVEMENTS_PATH, &NO_QUERY).await
    }

    pub async fn exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        self.get(EXERCISES_PATH, &NO_QUERY).await
    }

    async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let unavailable = |reason: String| ApiError::Unavailable {
            endpoint: path.to_string(),
            reason,
        };

        let response = self
            .http
            .get(&url)
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| unavailable(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| unavailable(err.to_string()))?;

        if !status.is_success() {
            return Err(unavailable(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        decode_payload(path, &body)
    }
}

pub fn decode_payload<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::InvalidPayload {
        endpoint: endpoint.to_string(),
        source,
    })
}
