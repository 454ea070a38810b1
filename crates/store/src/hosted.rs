//! Supabase REST client: PostgREST for the `projects` table, Storage for
//! uploaded images.
//!
//! Requests carry the project's anon key (`apikey`) plus the caller's own
//! access token, so the provider's row-level rules apply to every call. The
//! explicit `user_id` filters mirror those rules.

use std::time::Duration;

use async_trait::async_trait;
use fixio_core::account::Session;
use fixio_core::project::{CreateProject, NewProjectRow, Project, UpdateProject};
use fixio_core::types::DbId;
use serde::de::DeserializeOwned;

use crate::{ImageStore, ProjectStore, StoreError, IMAGE_BUCKET};

/// Ask PostgREST to echo the affected rows.
const RETURN_REPRESENTATION: &str = "return=representation";

/// HTTP client for a Supabase project.
#[derive(Debug, Clone)]
pub struct HostedStore {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl HostedStore {
    /// * `base_url` - project URL, e.g. `https://xyz.supabase.co`.
    /// * `anon_key` - the project's public anon key.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Same as [`HostedStore::new`] with a per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        })
    }

    /// Public URL of an object in the image bucket.
    pub fn public_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{IMAGE_BUCKET}/{object_path}",
            self.base_url
        )
    }

    fn projects_url(&self) -> String {
        format!("{}/rest/v1/projects", self.base_url)
    }

    /// Start a request authenticated as the session's user.
    fn authed(
        &self,
        method: reqwest::Method,
        url: String,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
    }

    /// PostgREST filters selecting one of the session owner's rows.
    fn row_filter(session: &Session, id: DbId) -> [(&'static str, String); 2] {
        [
            ("id", format!("eq.{id}")),
            ("user_id", format!("eq.{}", session.user_id())),
        ]
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, otherwise capture the
    /// status and body text in a [`StoreError::Api`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Hosted store request failed");
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ProjectStore for HostedStore {
    async fn list(&self, session: &Session) -> Result<Vec<Project>, StoreError> {
        let response = self
            .authed(reqwest::Method::GET, self.projects_url(), session)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", session.user_id())),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn get(&self, session: &Session, id: DbId) -> Result<Option<Project>, StoreError> {
        let response = self
            .authed(reqwest::Method::GET, self.projects_url(), session)
            .query(&[("select", "*")])
            .query(&Self::row_filter(session, id))
            .send()
            .await?;
        let rows: Vec<Project> = Self::parse_response(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn create(&self, session: &Session, input: CreateProject) -> Result<Project, StoreError> {
        let row = NewProjectRow::new(session.user_id(), input);
        let response = self
            .authed(reqwest::Method::POST, self.projects_url(), session)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[row])
            .send()
            .await?;
        let rows: Vec<Project> = Self::parse_response(response).await?;
        rows.into_iter().next().ok_or(StoreError::MissingRow)
    }

    async fn update(
        &self,
        session: &Session,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        let response = self
            .authed(reqwest::Method::PATCH, self.projects_url(), session)
            .query(&Self::row_filter(session, id))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(input)
            .send()
            .await?;
        let rows: Vec<Project> = Self::parse_response(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, session: &Session, id: DbId) -> Result<bool, StoreError> {
        let response = self
            .authed(reqwest::Method::DELETE, self.projects_url(), session)
            .query(&Self::row_filter(session, id))
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = Self::parse_response(response).await?;
        Ok(!rows.is_empty())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let response = self
            .client
            .get(format!("{}/rest/v1/", self.base_url))
            .header("apikey", &self.anon_key)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ImageStore for HostedStore {
    async fn upload(
        &self,
        session: &Session,
        object_path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let url = format!(
            "{}/storage/v1/object/{IMAGE_BUCKET}/{object_path}",
            self.base_url
        );
        let response = self
            .authed(reqwest::Method::POST, url, session)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        tracing::debug!(object_path, "Uploaded project image");
        Ok(self.public_url(object_path))
    }
}
