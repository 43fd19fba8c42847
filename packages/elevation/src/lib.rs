#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batched ground-elevation lookups.
//!
//! Coordinates are partitioned into fixed-size batches to respect the
//! elevation service's URL-length limit. Each batch is attempted up to
//! three times with a per-attempt timeout and a short pause between
//! attempts. A batch that exhausts its attempts degrades to 0.0 for
//! every coordinate it covers — it never aborts the lookup or affects
//! any other batch. The output is always aligned 1:1 with the input,
//! in input order.

use std::time::{Duration, Instant};

use futures::future::join_all;
use thiserror::Error;

/// Coordinates per batch request (URL-length limit of the service).
pub const BATCH_SIZE: usize = 50;

/// Attempts per batch before degrading to the 0.0 fallback.
const MAX_ATTEMPTS: u32 = 3;

/// Per-attempt request timeout.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause between retry attempts.
const RETRY_PAUSE: Duration = Duration::from_secs(1);

/// Public Open-Elevation instance.
pub const DEFAULT_BASE_URL: &str = "https://api.open-elevation.com";

/// Errors from a single batch lookup. Never escapes [`ElevationClient::lookup`];
/// a failed batch degrades to 0.0 fallback values instead.
#[derive(Debug, Error)]
pub enum ElevationError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not in the expected shape.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// The caller-supplied deadline passed before the batch was fetched.
    #[error("deadline exceeded before batch could be fetched")]
    DeadlineExceeded,
}

/// HTTP client for a batched elevation lookup service.
pub struct ElevationClient {
    client: reqwest::Client,
    base_url: String,
}

impl ElevationClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ElevationError::Http`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ElevationError> {
        let client = reqwest::Client::builder()
            .timeout(ATTEMPT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Looks up ground elevation (m) for `(latitude, longitude)` pairs.
    ///
    /// The result has exactly the same length and order as the input
    /// regardless of partial failures. Batches run concurrently and are
    /// written back by batch offset. When `deadline` passes, batches not
    /// yet fetched degrade to 0.0 and the lookup returns promptly.
    pub async fn lookup(&self, coords: &[(f64, f64)], deadline: Option<Instant>) -> Vec<f64> {
        if coords.is_empty() {
            return Vec::new();
        }

        let batches = coords.chunks(BATCH_SIZE).enumerate().map(|(i, chunk)| {
            let offset = i * BATCH_SIZE;
            async move { (offset, self.fetch_batch(chunk, deadline).await) }
        });

        let results = join_all(batches).await;
        assemble(coords.len(), results)
    }

    /// Fetches one batch with the fixed retry policy.
    async fn fetch_batch(
        &self,
        coords: &[(f64, f64)],
        deadline: Option<Instant>,
    ) -> Result<Vec<f64>, ElevationError> {
        let mut last_error = ElevationError::Parse {
            message: "no attempt made".to_string(),
        };

        for attempt in 1..=MAX_ATTEMPTS {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(ElevationError::DeadlineExceeded);
            }

            match self.try_fetch(coords).await {
                Ok(values) => return Ok(values),
                Err(e) => {
                    log::warn!(
                        "Elevation batch of {} failed (attempt {attempt}/{MAX_ATTEMPTS}): {e}",
                        coords.len()
                    );
                    last_error = e;
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(RETRY_PAUSE).await;
                    }
                }
            }
        }

        Err(last_error)
    }

    /// Single request/parse attempt for one batch.
    async fn try_fetch(&self, coords: &[(f64, f64)]) -> Result<Vec<f64>, ElevationError> {
        let url = format!("{}/api/v1/lookup", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("locations", locations_param(coords))])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        parse_elevations(&body, coords.len())
    }
}

/// Formats coordinates as the pipe-delimited `locations` parameter:
/// `"lat,lon|lat,lon|..."`.
fn locations_param(coords: &[(f64, f64)]) -> String {
    coords
        .iter()
        .map(|(lat, lon)| format!("{lat},{lon}"))
        .collect::<Vec<_>>()
        .join("|")
}

/// Parses the service response into one elevation per input coordinate.
///
/// Missing or null per-point elevations map to 0.0. A response with
/// fewer results than requested is padded with 0.0 so alignment with
/// the input is preserved.
fn parse_elevations(
    body: &serde_json::Value,
    expected: usize,
) -> Result<Vec<f64>, ElevationError> {
    let results = body["results"]
        .as_array()
        .ok_or_else(|| ElevationError::Parse {
            message: "missing results array".to_string(),
        })?;

    let mut elevations: Vec<f64> = results
        .iter()
        .take(expected)
        .map(|entry| entry["elevation"].as_f64().unwrap_or(0.0))
        .collect();
    elevations.resize(expected, 0.0);
    Ok(elevations)
}

/// Stitches batch results back into one input-aligned array.
///
/// Failed batches contribute 0.0 for every coordinate they cover.
fn assemble(
    total: usize,
    results: Vec<(usize, Result<Vec<f64>, ElevationError>)>,
) -> Vec<f64> {
    let mut out = vec![0.0; total];
    for (offset, result) in results {
        match result {
            Ok(values) => {
                out[offset..offset + values.len()].copy_from_slice(&values);
            }
            Err(e) => {
                log::warn!("Elevation batch at offset {offset} degraded to 0.0: {e}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_locations_parameter() {
        let param = locations_param(&[(28.6139, 77.209), (28.62, 77.21)]);
        assert_eq!(param, "28.6139,77.209|28.62,77.21");
    }

    #[test]
    fn parses_elevations_with_nulls_and_padding() {
        let body = serde_json::json!({
            "results": [
                { "latitude": 28.6, "longitude": 77.2, "elevation": 216.0 },
                { "latitude": 28.7, "longitude": 77.3, "elevation": null },
                { "latitude": 28.8, "longitude": 77.4 }
            ]
        });
        // Short response padded to the requested length.
        let values = parse_elevations(&body, 4).unwrap();
        assert_eq!(values, vec![216.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_malformed_body() {
        let body = serde_json::json!({ "error": "boom" });
        assert!(parse_elevations(&body, 1).is_err());
    }

    #[test]
    fn batches_of_120_split_as_50_50_20() {
        let coords = vec![(0.0, 0.0); 120];
        let sizes: Vec<usize> = coords.chunks(BATCH_SIZE).map(<[(f64, f64)]>::len).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
    }

    #[test]
    fn failed_middle_batch_degrades_without_affecting_others() {
        // 120 coordinates in three batches; the middle batch fails.
        let results = vec![
            (0, Ok(vec![10.0; 50])),
            (
                50,
                Err(ElevationError::Parse {
                    message: "unreachable".to_string(),
                }),
            ),
            (100, Ok(vec![30.0; 20])),
        ];
        let out = assemble(120, results);
        assert_eq!(out.len(), 120);
        assert!(out[..50].iter().all(|&v| (v - 10.0).abs() < f64::EPSILON));
        assert!(out[50..100].iter().all(|&v| v.abs() < f64::EPSILON));
        assert!(out[100..].iter().all(|&v| (v - 30.0).abs() < f64::EPSILON));
    }

    #[tokio::test]
    async fn unreachable_service_exhausts_retries_and_degrades() {
        // Connection refused on every attempt: each batch burns all three
        // attempts (two pauses) and degrades to 0.0, and the output stays
        // aligned with the input.
        let client = ElevationClient::new("http://127.0.0.1:1").unwrap();
        let coords = vec![(28.6, 77.2); 120];

        let started = Instant::now();
        let out = client.lookup(&coords, None).await;

        assert_eq!(out.len(), 120);
        assert!(out.iter().all(|&v| v.abs() < f64::EPSILON));
        // Batches run concurrently, so the retry pauses of the slowest
        // batch dominate: two pauses at minimum.
        assert!(started.elapsed() >= 2 * RETRY_PAUSE);
    }

    #[tokio::test]
    async fn expired_deadline_degrades_every_batch() {
        let client = ElevationClient::new("http://127.0.0.1:1").unwrap();
        let coords = vec![(28.6, 77.2); 60];
        let out = client
            .lookup(&coords, Some(Instant::now() - Duration::from_secs(1)))
            .await;
        assert_eq!(out.len(), 60);
        assert!(out.iter().all(|&v| v.abs() < f64::EPSILON));
    }
}
