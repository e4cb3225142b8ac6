use crate::api::{ApiError, CourseApi};
use crate::config::Config;
use crate::models::{Course, CourseFilter, CourseId, CoursePayload};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Thin JSON wrapper over the course service REST endpoints.
#[derive(Clone)]
pub struct CourseClient {
    client: reqwest::Client,
    base_url: String,
}

impl CourseClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_timeout(config.api_base_url.clone(), config.request_timeout)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(CONNECT_TIMEOUT))
            .default_headers(Self::build_headers())
            .build()
            .map_err(|e| ApiError::request(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("course-catalog"));
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and returns the body of a success response.
    async fn execute(&self, request: RequestBuilder, method: &Method, url: &str) -> Result<String, ApiError> {
        tracing::info!(%method, %url, "Sending request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::from(e);
                match &err {
                    ApiError::Network { message } => {
                        tracing::error!(%method, %url, %message, "No response received")
                    }
                    other => tracing::error!(%method, %url, error = %other, "Request could not be sent"),
                }
                return Err(err);
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let err = ApiError::from(e);
            tracing::error!(%method, %url, %status, error = %err, "Failed to read response body");
            err
        })?;

        if !status.is_success() {
            tracing::error!(%method, %url, %status, %body, "Server returned an error status");
            return Err(ApiError::Server { status, body });
        }

        tracing::debug!(%method, %url, %status, "Request succeeded");
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, method: Method, url: String) -> Result<T, ApiError> {
        let body = self.execute(request, &method, &url).await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(%method, %url, error = %e, "Failed to parse JSON response");
            ApiError::request(format!(
                "invalid response body from {}: {} (first 200 chars: {})",
                url,
                e,
                body.chars().take(200).collect::<String>()
            ))
        })
    }
}

#[async_trait]
impl CourseApi for CourseClient {
    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, ApiError> {
        let url = self.url("/courses/");
        let request = self.client.get(&url).query(&filter.query_pairs());
        self.send_json(request, Method::GET, url).await
    }

    async fn get_course(&self, id: CourseId) -> Result<Course, ApiError> {
        let url = self.url(&format!("/courses/{}/", id));
        let request = self.client.get(&url);
        self.send_json(request, Method::GET, url).await
    }

    async fn create_course(&self, payload: &CoursePayload) -> Result<Course, ApiError> {
        let url = self.url("/courses/");
        let request = self.client.post(&url).json(payload);
        self.send_json(request, Method::POST, url).await
    }

    async fn update_course(&self, id: CourseId, payload: &CoursePayload) -> Result<Course, ApiError> {
        let url = self.url(&format!("/courses/{}/", id));
        let request = self.client.put(&url).json(payload);
        self.send_json(request, Method::PUT, url).await
    }

    async fn delete_course(&self, id: CourseId) -> Result<(), ApiError> {
        let url = self.url(&format!("/courses/{}/", id));
        let request = self.client.delete(&url);
        self.execute(request, &Method::DELETE, &url).await.map(|_| ())
    }
}
