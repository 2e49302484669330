//! INE tempus API client.
//!
//! Network failures are retried with exponential backoff; a structurally
//! unexpected payload is not, since retrying cannot fix it.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{build_url, BACKOFF_BASE_SECS, FETCH_TIMEOUT_SECS, MAX_RETRIES};
use crate::error::{PipelineError, Result};

/// One series as returned by the DATOS_TABLA endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IneSeries {
    #[serde(rename = "COD")]
    pub code: String,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Data", default)]
    pub data: Vec<IneDataPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IneDataPoint {
    #[serde(rename = "Fecha")]
    pub epoch_millis: Option<i64>,
    #[serde(rename = "Anyo")]
    pub year: i32,
    #[serde(rename = "FK_Periodo")]
    pub period_id: u32,
    #[serde(rename = "Valor")]
    pub value: Option<f64>,
    #[serde(rename = "Secreto")]
    pub is_secret: bool,
}

pub struct IneClient {
    http: reqwest::Client,
}

impl IneClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http })
    }

    /// Fetch one table for the year range, retrying transient failures.
    pub async fn fetch_table(
        &self,
        table_id: u32,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<IneSeries>> {
        let url = build_url(table_id, start_year, end_year);

        let mut attempt = 1;
        let payload = loop {
            info!(table_id, %url, attempt, "fetching table");
            match self.get_json(&url).await {
                Ok(payload) => break payload,
                Err(err) if attempt < MAX_RETRIES => {
                    let wait = BACKOFF_BASE_SECS.powi(attempt as i32);
                    warn!(table_id, attempt, %err, wait_secs = wait, "fetch failed, retrying");
                    tokio::time::sleep(Duration::from_secs_f64(wait)).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(PipelineError::Api {
                        message: format!(
                            "table {table_id} failed after {MAX_RETRIES} attempts: {err}"
                        ),
                    });
                }
            }
        };

        decode_series(table_id, payload)
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Check the payload shape before deserializing: an empty list is a
/// legitimate "no data for this range" answer, anything that is not a
/// list of series with a Data array is an API error.
fn decode_series(table_id: u32, payload: serde_json::Value) -> Result<Vec<IneSeries>> {
    let items = payload.as_array().ok_or_else(|| PipelineError::Api {
        message: format!("unexpected response shape for table {table_id}: not a list"),
    })?;

    if items.is_empty() {
        warn!(table_id, "table returned zero series for the requested range");
        return Ok(Vec::new());
    }

    if items[0].get("Data").is_none() {
        return Err(PipelineError::Api {
            message: format!("unexpected response shape for table {table_id}: first series has no Data"),
        });
    }

    Ok(serde_json::from_value(payload)?)
}
