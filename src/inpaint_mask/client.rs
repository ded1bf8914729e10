use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::InpaintError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InpaintRequest {
    pub image_url: String,
    pub mask_url: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub negative_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InpaintResponse {
    pub success: bool,
    #[serde(default)]
    pub output_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl InpaintResponse {
    /// The generated image URL, or the reason there is none.
    pub fn into_output_url(self) -> Result<String, InpaintError> {
        match (self.success, self.output_url) {
            (true, Some(url)) => Ok(url),
            (true, None) => Err(InpaintError::Rejected("response has no outputUrl".to_string())),
            (false, _) => Err(InpaintError::Rejected(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

/// Sends masks to the inpainting endpoint. The mask is expected to be uploaded
/// already; only its URL travels in the request.
#[derive(Debug, Clone)]
pub struct InpaintClient {
    endpoint: String,
    http: reqwest::Client,
}

impl InpaintClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_endpoint(endpoint: Option<&str>) -> Result<Self, InpaintError> {
        endpoint.map(Self::new).ok_or(InpaintError::NoEndpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn submit(&self, request: &InpaintRequest) -> Result<String, InpaintError> {
        info!("submitting inpaint request to {}", self.endpoint);
        let response: InpaintResponse = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?
            .json()
            .await?;
        response.into_output_url().inspect_err(|e| warn!("{e}"))
    }
}
