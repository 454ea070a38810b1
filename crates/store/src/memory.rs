//! In-process store for local development (`STORE_BACKEND=memory`) and
//! tests. Rows are scoped to their owner the same way the hosted provider's
//! row-level rules scope them.

use std::collections::HashMap;

use async_trait::async_trait;
use fixio_core::account::Session;
use fixio_core::project::{CreateProject, NewProjectRow, Project, UpdateProject};
use fixio_core::types::DbId;
use tokio::sync::RwLock;

use crate::{ImageStore, ProjectStore, StoreError, IMAGE_BUCKET};

/// An uploaded object kept in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: RwLock<Vec<Project>>,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Public URL handed out for an uploaded object.
    pub fn public_url(object_path: &str) -> String {
        format!("memory://{IMAGE_BUCKET}/{object_path}")
    }

    /// Look up an uploaded object by path.
    pub async fn object(&self, object_path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(object_path).cloned()
    }

    /// Number of uploaded objects across all owners.
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Insert a fully-formed row, bypassing ownership. Test fixture helper.
    pub async fn insert(&self, project: Project) {
        self.projects.write().await.push(project);
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list(&self, session: &Session) -> Result<Vec<Project>, StoreError> {
        let mut rows: Vec<Project> = self
            .projects
            .read()
            .await
            .iter()
            .filter(|p| p.user_id == session.user_id())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get(&self, session: &Session, id: DbId) -> Result<Option<Project>, StoreError> {
        Ok(self
            .projects
            .read()
            .await
            .iter()
            .find(|p| p.id == id && p.user_id == session.user_id())
            .cloned())
    }

    async fn create(&self, session: &Session, input: CreateProject) -> Result<Project, StoreError> {
        let row = NewProjectRow::new(session.user_id(), input);
        let project = Project {
            id: DbId::new_v4(),
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            estimated_duration: row.estimated_duration,
            status: row.status,
            progress: row.progress,
            next_task: Some(row.next_task),
            image_urls: row.image_urls,
            ai_steps: Vec::new(),
            ai_materials: Vec::new(),
            ai_time_estimate: None,
            notes: None,
            created_at: chrono::Utc::now(),
        };
        self.projects.write().await.push(project.clone());
        Ok(project)
    }

    async fn update(
        &self,
        session: &Session,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        let mut projects = self.projects.write().await;
        let Some(project) = projects
            .iter_mut()
            .find(|p| p.id == id && p.user_id == session.user_id())
        else {
            return Ok(None);
        };
        project.apply(input);
        Ok(Some(project.clone()))
    }

    async fn delete(&self, session: &Session, id: DbId) -> Result<bool, StoreError> {
        let mut projects = self.projects.write().await;
        let before = projects.len();
        projects.retain(|p| !(p.id == id && p.user_id == session.user_id()));
        Ok(projects.len() < before)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn upload(
        &self,
        _session: &Session,
        object_path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        self.objects.write().await.insert(
            object_path.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(Self::public_url(object_path))
    }
}

#[cfg(test)]
mod tests {
    use fixio_core::account::{Account, AudienceCategory, DEFAULT_SUBSCRIPTION_PLAN};
    use fixio_core::project::ProjectStatus;

    use super::*;

    fn session() -> Session {
        Session {
            account: Account {
                id: DbId::new_v4(),
                email: Some("klusser@example.com".into()),
                name: None,
                audience: AudienceCategory::Hobbyist,
                subscription_plan: DEFAULT_SUBSCRIPTION_PLAN.into(),
            },
            access_token: "token".into(),
        }
    }

    fn create_input(name: &str) -> CreateProject {
        CreateProject {
            name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn rows_are_scoped_to_their_owner() {
        let store = MemoryStore::new();
        let alice = session();
        let bob = session();

        let project = store.create(&alice, create_input("Keuken")).await.unwrap();

        assert_eq!(store.list(&alice).await.unwrap().len(), 1);
        assert!(store.list(&bob).await.unwrap().is_empty());
        assert!(store.get(&bob, project.id).await.unwrap().is_none());
        assert!(!store.delete(&bob, project.id).await.unwrap());
        assert!(store
            .update(&bob, project.id, &UpdateProject::status(ProjectStatus::Active))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        let owner = session();
        store.create(&owner, create_input("Eerste")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.create(&owner, create_input("Tweede")).await.unwrap();

        let names: Vec<_> = store
            .list(&owner)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Tweede", "Eerste"]);
    }

    #[tokio::test]
    async fn update_then_delete() {
        let store = MemoryStore::new();
        let owner = session();
        let project = store.create(&owner, create_input("Dak")).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Planning);

        let updated = store
            .update(&owner, project.id, &UpdateProject::status(ProjectStatus::Paused))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::Paused);

        assert!(store.delete(&owner, project.id).await.unwrap());
        assert!(store.get(&owner, project.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upload_keeps_bytes_and_returns_url() {
        let store = MemoryStore::new();
        let url = store
            .upload(&session(), "u/1_0.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(url, "memory://project-images/u/1_0.png");
        let object = store.object("u/1_0.png").await.unwrap();
        assert_eq!(object.bytes, vec![1, 2, 3]);
        assert_eq!(object.content_type, "image/png");
    }
}
