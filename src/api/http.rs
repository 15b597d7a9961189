//! reqwest-based adapter for the Floranet REST API.
//!
//! # Security Note - Logging
//!
//! The bearer token is attached with `bearer_auth`, which marks the header
//! value as sensitive so it is redacted from reqwest's own debug output.
//! Request logging in this module only records the method and URL.

use std::time::Duration;

use reqwest::header;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretBox};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::config::Config;
use crate::controller::ListQuery;
use crate::error::{FloranetError, Result};
use crate::followups::deserialize_followups;
use crate::types::{Followup, Priority, RecordId};

use super::page::unwrap_data;
use super::{
    ApiError, Mutation, Page, RecordPatch, Resource, ResourceBackend, parse_list_envelope,
    parse_record_envelope,
};

/// HTTP client for every Floranet endpoint
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    token: Option<SecretBox<String>>,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpBackend {
    /// Create a backend from configuration.
    ///
    /// No timeout is set unless `request_timeout` is configured; the HTTP
    /// client default applies otherwise.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.api_base_url()?;
        let mut builder = Client::builder();
        if let Some(seconds) = config.request_timeout {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            token: config.api_token().map(|t| SecretBox::new(Box::new(t))),
        })
    }

    /// Create a backend for a base URL with default client settings
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: parse_base_url(base_url)?,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretBox::new(Box::new(token.into())));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Static URL of an uploaded file
    pub fn storage_url(&self, path: &str) -> Result<Url> {
        storage_url(&self.base_url, path)
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        endpoint(&self.base_url, segments)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "floranet request");
        let request = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request and return its JSON body (`Null` for empty bodies).
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let error = error_from_body(status, response.text().await);
            tracing::debug!(%status, message = %error.message, "floranet request failed");
            return Err(error.into());
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn patch_field<R: Resource>(
        &self,
        id: &RecordId,
        segment: &str,
        body: Value,
        mutation: &Mutation<R>,
    ) -> Result<Option<RecordPatch<R>>> {
        let id = id.to_string();
        let url = self.endpoint(&[R::PATH, &id, segment])?;
        let response = self.send(self.request(Method::PATCH, url).json(&body)).await?;
        Ok(patch_from_response(mutation, response))
    }
}

impl<R: Resource> ResourceBackend<R> for HttpBackend {
    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<R>> {
        let mut url = self.endpoint(&[R::PATH])?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.to_query_pairs() {
                pairs.append_pair(&key, &value);
            }
        }
        let body = self.send(self.request(Method::GET, url)).await?;
        parse_list_envelope(body, R::ENVELOPE)
    }

    async fn fetch_record(&self, id: &RecordId) -> Result<R> {
        let id_str = id.to_string();
        let url = self.endpoint(&[R::PATH, &id_str])?;
        match self.send(self.request(Method::GET, url)).await {
            Ok(body) => parse_record_envelope(body),
            Err(FloranetError::Api {
                status: Some(404), ..
            }) => Err(FloranetError::RecordNotFound(id_str)),
            Err(e) => Err(e),
        }
    }

    async fn mutate(
        &self,
        id: &RecordId,
        mutation: &Mutation<R>,
    ) -> Result<Option<RecordPatch<R>>> {
        match mutation {
            Mutation::Status(status) => {
                self.patch_field(id, "status", json!({ "status": status }), mutation)
                    .await
            }
            Mutation::Priority(priority) => {
                self.patch_field(id, "priority", json!({ "priority": priority }), mutation)
                    .await
            }
            Mutation::Remarks(remarks) => {
                self.patch_field(id, "remarks", json!({ "remarks": remarks }), mutation)
                    .await
            }
            Mutation::AppendFollowup(content) => {
                self.patch_field(id, "followups", json!({ "content": content }), mutation)
                    .await
            }
            Mutation::UploadFootage(upload) => {
                let id = id.to_string();
                let url = self.endpoint(&[R::PATH, &id, "footage"])?;
                let mut form = Form::new().part(
                    "file",
                    Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone()),
                );
                if let Some(description) = &upload.description {
                    form = form.text("description", description.clone());
                }
                self.send(self.request(Method::POST, url).multipart(form))
                    .await?;
                Ok(None)
            }
            Mutation::DeleteFootage(footage_id) => {
                let id = id.to_string();
                let footage_id = footage_id.to_string();
                let url = self.endpoint(&[R::PATH, &id, "footage", &footage_id])?;
                self.send(self.request(Method::DELETE, url)).await?;
                Ok(None)
            }
        }
    }
}

/// Parse and validate a configured base URL
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(FloranetError::Config(format!(
            "api_base_url must be an http(s) URL, got '{}'",
            raw
        )));
    }
    Ok(url)
}

/// Append path segments to the base URL, percent-encoding each one
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.path_segments_mut()
        .map_err(|_| FloranetError::Config(format!("'{}' cannot be used as a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `{base}/storage/{path}` for a file path as stored by the backend
pub fn storage_url(base: &Url, path: &str) -> Result<Url> {
    let path = path.trim().trim_start_matches('/');
    let path = path.strip_prefix("storage/").unwrap_or(path);
    if path.is_empty() {
        return Err(FloranetError::Validation("storage path cannot be empty".to_string()));
    }

    let mut segments = vec!["storage"];
    segments.extend(path.split('/').filter(|s| !s.is_empty()));
    endpoint(base, &segments)
}

#[derive(serde::Deserialize)]
struct FollowupsField {
    #[serde(deserialize_with = "deserialize_followups")]
    followups: Vec<Followup>,
}

/// Build the API error for a non-2xx response, keeping the status when the
/// body itself could not be read.
fn error_from_body<E: std::fmt::Display>(
    status: reqwest::StatusCode,
    body: std::result::Result<String, E>,
) -> ApiError {
    match body {
        Ok(body) => ApiError::from_body(status, &body),
        Err(e) => {
            tracing::debug!(%status, error = %e, "could not read error response body");
            ApiError::from_body(status, "")
        }
    }
}

/// Read `field` from a successful response. A value that does not parse as
/// the field's type counts as absent so the caller refetches instead.
fn read_field<T: DeserializeOwned>(body: &Value, field: &str) -> Option<T> {
    let value = body.get(field)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!(field, %value, error = %e, "ignoring unusable field in patch response");
            None
        }
    }
}

/// Extract the field a patch endpoint is documented to return.
///
/// Responses may be the bare record, the record wrapped in `data`, or just
/// the changed field. A response without a usable field yields `None`.
pub(crate) fn patch_from_response<R: Resource>(
    mutation: &Mutation<R>,
    body: Value,
) -> Option<RecordPatch<R>> {
    let body = unwrap_data(body);

    match mutation {
        Mutation::Status(_) => read_field::<R::Status>(&body, "status").map(RecordPatch::Status),
        Mutation::Priority(_) => read_field::<Priority>(&body, "priority").map(RecordPatch::Priority),
        Mutation::Remarks(_) => {
            read_field::<Option<String>>(&body, "remarks").map(RecordPatch::Remarks)
        }
        Mutation::AppendFollowup(_) => {
            body.get("followups")?;
            match serde_json::from_value::<FollowupsField>(body) {
                Ok(field) => Some(RecordPatch::Followups(field.followups)),
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring unusable followups in patch response");
                    None
                }
            }
        }
        Mutation::UploadFootage(_) | Mutation::DeleteFootage(_) => None,
    }
}
