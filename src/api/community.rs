//! Community post endpoints.
//!
//! Every response uses the `{ success, data, message }` envelope; an
//! unsuccessful envelope is an error even when the HTTP status is 2xx.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::Result;
use crate::types::{Comment, CommunityPost, RecordId};

use super::{ApiResponse, CommunityBackend, HttpBackend};

const POSTS_PATH: &str = "community-posts";

impl HttpBackend {
    async fn send_envelope<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<ApiResponse<T>> {
        let url = self.endpoint(segments)?;
        let mut request = self.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let value = self.send(request).await?;
        if value.is_null() {
            return Ok(ApiResponse {
                success: true,
                data: None,
                message: None,
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl CommunityBackend for HttpBackend {
    async fn list_posts(&self, archived: bool) -> Result<Vec<CommunityPost>> {
        let mut url = self.endpoint(&[POSTS_PATH])?;
        url.query_pairs_mut()
            .append_pair("archived", if archived { "1" } else { "0" });
        let value = self.send(self.request(Method::GET, url)).await?;
        let response: ApiResponse<Vec<CommunityPost>> = serde_json::from_value(value)?;
        response.into_data()
    }

    async fn create_post(&self, content: &str) -> Result<CommunityPost> {
        self.send_envelope(Method::POST, &[POSTS_PATH], Some(json!({ "content": content })))
            .await?
            .into_data()
    }

    async fn delete_post(&self, id: &RecordId) -> Result<()> {
        let id = id.to_string();
        self.send_envelope::<Value>(Method::DELETE, &[POSTS_PATH, &id], None)
            .await?
            .into_unit()
    }

    async fn like_post(&self, id: &RecordId) -> Result<CommunityPost> {
        let id = id.to_string();
        self.send_envelope(Method::POST, &[POSTS_PATH, &id, "like"], None)
            .await?
            .into_data()
    }

    async fn comment_on_post(&self, id: &RecordId, content: &str) -> Result<Comment> {
        let id = id.to_string();
        self.send_envelope(
            Method::POST,
            &[POSTS_PATH, &id, "comments"],
            Some(json!({ "content": content })),
        )
        .await?
        .into_data()
    }

    async fn archive_post(&self, id: &RecordId) -> Result<()> {
        let id = id.to_string();
        self.send_envelope::<Value>(Method::POST, &[POSTS_PATH, &id, "archive"], None)
            .await?
            .into_unit()
    }

    async fn unarchive_post(&self, id: &RecordId) -> Result<()> {
        let id = id.to_string();
        self.send_envelope::<Value>(Method::POST, &[POSTS_PATH, &id, "unarchive"], None)
            .await?
            .into_unit()
    }
}
