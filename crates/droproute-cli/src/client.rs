//! HTTP client for the droproute planning server.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// Plan request body, mirroring the server's `/v1/routes/plan` schema.
#[derive(Debug, Serialize)]
struct PlanRequest<'a> {
    points: &'a [[f64; 2]],
    use_two_opt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    street_waypoints: Option<&'a str>,
}

/// HTTP client for the planning server.
pub struct RouteServerClient {
    client: Client,
    base_url: String,
}

impl RouteServerClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the planning server (e.g., "http://localhost:4000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Request a plan for `points` and return the raw response body.
    pub async fn plan(
        &self,
        points: &[[f64; 2]],
        use_two_opt: bool,
        profile: Option<&str>,
        street_waypoints: Option<&str>,
    ) -> Result<Value> {
        let request = PlanRequest {
            points,
            use_two_opt,
            profile,
            street_waypoints,
        };
        let response = self
            .client
            .post(format!("{}/v1/routes/plan", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed to reach the planning server")?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("Failed to decode the plan response")?;
        if !status.is_success() {
            return Err(anyhow!("Plan request failed ({}): {}", status, body));
        }
        Ok(body)
    }

    /// Upload a GeoJSON document of obstacle footprints.
    pub async fn upload_footprints(&self, document: &Value) -> Result<Value> {
        let response = self
            .client
            .post(format!("{}/v1/footprints", self.base_url))
            .json(document)
            .send()
            .await
            .context("Failed to reach the planning server")?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("Failed to decode the upload response")?;
        if !status.is_success() {
            return Err(anyhow!("Footprint upload failed ({}): {}", status, body));
        }
        Ok(body)
    }

    /// List stored footprints.
    pub async fn list_footprints(&self) -> Result<Value> {
        let response = self
            .client
            .get(format!("{}/v1/footprints", self.base_url))
            .send()
            .await
            .context("Failed to reach the planning server")?;
        response
            .error_for_status()
            .context("Footprint listing failed")?
            .json()
            .await
            .context("Failed to decode the footprint listing")
    }

    /// Remove every stored footprint.
    pub async fn clear_footprints(&self) -> Result<Value> {
        let response = self
            .client
            .delete(format!("{}/v1/footprints", self.base_url))
            .send()
            .await
            .context("Failed to reach the planning server")?;
        response
            .error_for_status()
            .context("Footprint clearing failed")?
            .json()
            .await
            .context("Failed to decode the clear response")
    }
}
