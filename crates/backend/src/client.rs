use std::time::Duration;

use eyre::{Result, WrapErr, eyre};
use reqwest::{
    Client, Method, Response, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use slotwise_core::errors::{ScheduleError, ScheduleResult};
use tracing::{debug, error};

/// HTTP client for the scheduling backend.
///
/// Every request carries the JSON content type and, when configured, a
/// bearer token. Non-success statuses are mapped onto [`ScheduleError`] so a
/// backend-side conflict is never mistaken for a transport failure.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, api_token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = api_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .wrap_err("Backend API token is not a valid header value")?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .wrap_err("Failed to build backend HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T, Q>(&self, path: &str, query: &Q) -> ScheduleResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to reach backend at {}", url))?;
        let response = check_status(response).await?;

        let data = response
            .json::<T>()
            .await
            .wrap_err_with(|| format!("Invalid response body from {}", url))?;
        Ok(data)
    }

    pub(crate) async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> ScheduleResult<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to reach backend at {}", url))?;
        check_status(response).await?;

        Ok(())
    }
}

async fn check_status(response: Response) -> ScheduleResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!("Backend error ({}): {}", status, body);

    Err(match status {
        StatusCode::NOT_FOUND => ScheduleError::NotFound(body),
        StatusCode::CONFLICT => ScheduleError::Conflict(body),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ScheduleError::InvalidFormat(body)
        }
        _ => ScheduleError::Transport(eyre!("Backend returned {}: {}", status, body)),
    })
}
