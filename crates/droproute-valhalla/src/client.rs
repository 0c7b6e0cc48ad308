//! Valhalla HTTP API client.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use droproute_core::error::ProviderError;
use droproute_core::matrix::CostMatrix;
use droproute_core::models::{Point, RouteLeg};
use droproute_core::provider::RouteProvider;

use crate::polyline::decode_polyline6;

/// HTTP client for a Valhalla routing engine.
pub struct ValhallaClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct MatrixRequest<'a> {
    sources: &'a [Point],
    targets: &'a [Point],
    costing: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    costing_options: Option<Value>,
}

#[derive(Debug, Serialize)]
struct RouteRequest<'a> {
    locations: &'a [Point],
    costing: &'a str,
    directions_options: DirectionsOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    costing_options: Option<Value>,
}

#[derive(Debug, Serialize)]
struct DirectionsOptions {
    units: &'static str,
}

impl ValhallaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    /// Fetch the all-pairs travel-time matrix over `points`.
    pub async fn sources_to_targets(&self, points: &[Point], profile: &str) -> Result<CostMatrix> {
        let url = format!("{}/sources_to_targets", self.base_url);
        let request = MatrixRequest {
            sources: points,
            targets: points,
            costing: profile,
            costing_options: costing_options(profile),
        };

        tracing::debug!("Requesting {0}x{0} travel-time matrix", points.len());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send matrix request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Matrix request failed: {} {}",
                status,
                body
            ));
        }

        let payload: Value = response
            .json()
            .await
            .context("Failed to parse matrix response")?;

        Ok(matrix_from_payload(&payload, points.len())?)
    }

    /// Fetch road-following geometry through `locations` in order.
    pub async fn route(&self, locations: &[Point], profile: &str) -> Result<RouteLeg> {
        let url = format!("{}/route", self.base_url);
        let request = RouteRequest {
            locations,
            costing: profile,
            directions_options: DirectionsOptions {
                units: "kilometers",
            },
            costing_options: costing_options(profile),
        };

        tracing::debug!("Requesting route through {} locations", locations.len());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send route request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Route request failed: {} {}", status, body));
        }

        let payload: Value = response
            .json()
            .await
            .context("Failed to parse route response")?;

        Ok(leg_from_payload(&payload)?)
    }
}

impl RouteProvider for ValhallaClient {
    fn cost_matrix(
        &self,
        points: &[Point],
        profile: &str,
    ) -> impl Future<Output = Result<CostMatrix, ProviderError>> + Send {
        async move {
            self.sources_to_targets(points, profile)
                .await
                .map_err(into_provider_error)
        }
    }

    fn route_leg(
        &self,
        from: Point,
        to: Point,
        profile: &str,
    ) -> impl Future<Output = Result<RouteLeg, ProviderError>> + Send {
        async move {
            let locations = [from, to];
            self.route(&locations, profile)
                .await
                .map_err(into_provider_error)
        }
    }
}

/// Pedestrian costing boosts footways so delivery walking routes prefer
/// them; other profiles take Valhalla's defaults.
fn costing_options(profile: &str) -> Option<Value> {
    if profile == "pedestrian" {
        Some(serde_json::json!({ "pedestrian": { "footway_factor": 1.0 } }))
    } else {
        None
    }
}

/// Pull the time matrix out of a sources_to_targets payload.
///
/// Unreachable pairs come back with a null time; those become infinite
/// costs. A row or column count that disagrees with the request is
/// rejected outright.
fn matrix_from_payload(payload: &Value, expected: usize) -> Result<CostMatrix, ProviderError> {
    let rows = payload
        .get("sources_to_targets")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::malformed("matrix response missing sources_to_targets"))?;

    if rows.len() != expected {
        return Err(ProviderError::Dimension {
            expected,
            got: rows.len(),
        });
    }

    let mut cells: Vec<Vec<f64>> = Vec::with_capacity(rows.len());
    for row in rows {
        let row = row
            .as_array()
            .ok_or_else(|| ProviderError::malformed("matrix row is not an array"))?;
        if row.len() != expected {
            return Err(ProviderError::Dimension {
                expected,
                got: row.len(),
            });
        }
        let costs = row
            .iter()
            .map(|cell| {
                cell.get("time")
                    .and_then(Value::as_f64)
                    .filter(|time| time.is_finite() && *time >= 0.0)
                    .unwrap_or(f64::INFINITY)
            })
            .collect();
        cells.push(costs);
    }

    CostMatrix::from_rows(cells)
        .ok_or_else(|| ProviderError::malformed("matrix response is not square"))
}

/// Assemble a leg from a /route payload: leg shapes decoded and
/// concatenated, summary length converted from kilometers to meters.
fn leg_from_payload(payload: &Value) -> Result<RouteLeg, ProviderError> {
    let trip = payload
        .get("trip")
        .ok_or_else(|| ProviderError::malformed("route response missing trip"))?;

    let legs = trip
        .get("legs")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::malformed("route response missing legs"))?;

    let mut path: Vec<Point> = Vec::new();
    for leg in legs {
        let Some(shape) = leg.get("shape").and_then(Value::as_str) else {
            continue;
        };
        let decoded = decode_polyline6(shape)
            .map_err(|err| ProviderError::malformed(format!("leg shape: {err}")))?;
        path.extend(decoded);
    }

    if path.len() < 2 {
        return Err(ProviderError::malformed(
            "route response produced no usable geometry",
        ));
    }

    let summary = trip.get("summary");
    let distance_m = summary
        .and_then(|s| s.get("length"))
        .and_then(Value::as_f64)
        .map(|km| km * 1000.0)
        .unwrap_or(0.0);
    let time_s = summary
        .and_then(|s| s.get("time"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    Ok(RouteLeg {
        path,
        distance_m,
        time_s,
    })
}

/// Recover a typed provider error from an anyhow chain; anything else is a
/// transport-level failure.
fn into_provider_error(err: anyhow::Error) -> ProviderError {
    match err.downcast::<ProviderError>() {
        Ok(provider_err) => provider_err,
        Err(other) => ProviderError::request(format!("{other:#}")),
    }
}
