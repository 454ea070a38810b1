//! Persistence bridge for project records and uploaded images.
//!
//! Storage is owned by a hosted provider; this crate only forwards calls to
//! it. [`ProjectStore`] and [`ImageStore`] are the seams the API layer
//! depends on:
//!
//! - [`hosted::HostedStore`] -- Supabase REST (PostgREST rows, Storage objects).
//! - [`memory::MemoryStore`] -- in-process rows for local development and tests.
//!
//! Every call takes the caller's [`Session`]; rows are scoped to its owner.
//! There is no conflict detection: the last write wins.

pub mod hosted;
pub mod memory;

use async_trait::async_trait;
use fixio_core::account::Session;
use fixio_core::project::{CreateProject, Project, UpdateProject};
use fixio_core::types::DbId;

pub use hosted::HostedStore;
pub use memory::MemoryStore;

/// Bucket holding uploaded project images.
pub const IMAGE_BUCKET: &str = "project-images";

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The hosted store returned a non-2xx status code.
    #[error("Store API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The store answered 2xx but without the row we asked it to return.
    #[error("Store returned no row")]
    MissingRow,
}

/// CRUD access to the `projects` table, scoped to the session's owner.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// The owner's projects, most recently created first.
    async fn list(&self, session: &Session) -> Result<Vec<Project>, StoreError>;

    async fn get(&self, session: &Session, id: DbId) -> Result<Option<Project>, StoreError>;

    /// Insert a new project (planning status, zero progress).
    async fn create(&self, session: &Session, input: CreateProject) -> Result<Project, StoreError>;

    /// Apply a partial update. Returns `None` if the row does not exist.
    async fn update(
        &self,
        session: &Session,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, StoreError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, session: &Session, id: DbId) -> Result<bool, StoreError>;

    /// Reachability check used by the health endpoint.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Object storage for uploaded images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` and return the object's public URL.
    async fn upload(
        &self,
        session: &Session,
        object_path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError>;
}

/// Object path for the `index`-th image of an upload batch:
/// `"{owner}/{millis}_{index}.{ext}"`. The extension is taken from the
/// original file name, `bin` when it has none.
pub fn image_object_path(owner: DbId, millis: i64, index: usize, file_name: &str) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("bin")
        .to_ascii_lowercase();
    format!("{owner}/{millis}_{index}.{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_keeps_extension() {
        let owner = DbId::nil();
        assert_eq!(
            image_object_path(owner, 1700000000000, 2, "Schutting.JPG"),
            "00000000-0000-0000-0000-000000000000/1700000000000_2.jpg"
        );
    }

    #[test]
    fn object_path_without_extension_uses_bin() {
        let path = image_object_path(DbId::nil(), 1, 0, "foto");
        assert!(path.ends_with("/1_0.bin"));
        let odd = image_object_path(DbId::nil(), 1, 0, "foto.");
        assert!(odd.ends_with("/1_0.bin"));
        let traversal = image_object_path(DbId::nil(), 1, 0, "a.png/../../x");
        assert!(traversal.ends_with("/1_0.bin"));
    }
}
