//! Project entity model and DTOs.
//!
//! Field names match the hosted `projects` table so rows can be exchanged
//! with the store without a mapping layer.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{null_as_default, DbId, Timestamp};
use crate::wizard::AiPlan;

/// Upper bound for `progress` (a percentage).
pub const MAX_PROGRESS: i32 = 100;

/// Next task assigned to every freshly created project.
pub const INITIAL_NEXT_TASK: &str = "Project starten";

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    Paused,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Active => "active",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Completed => "completed",
        }
    }

    /// Dutch label shown on project cards.
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::Active => "Actief",
            ProjectStatus::Paused => "Gepauzeerd",
            ProjectStatus::Completed => "Voltooid",
        }
    }
}

/// A row from the `projects` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub estimated_duration: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub next_task: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_steps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_materials: Vec<String>,
    #[serde(default)]
    pub ai_time_estimate: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

impl Project {
    /// Apply a partial update in place. Used by stores that hold rows locally.
    pub fn apply(&mut self, update: &UpdateProject) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(estimated_duration) = &update.estimated_duration {
            self.estimated_duration = Some(estimated_duration.clone());
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(progress) = update.progress {
            self.progress = progress;
        }
        if let Some(next_task) = &update.next_task {
            self.next_task = Some(next_task.clone());
        }
        if let Some(image_urls) = &update.image_urls {
            self.image_urls = image_urls.clone();
        }
        if let Some(ai_steps) = &update.ai_steps {
            self.ai_steps = ai_steps.clone();
        }
        if let Some(ai_materials) = &update.ai_materials {
            self.ai_materials = ai_materials.clone();
        }
        if let Some(ai_time_estimate) = &update.ai_time_estimate {
            self.ai_time_estimate = Some(ai_time_estimate.clone());
        }
        if let Some(notes) = &update.notes {
            self.notes = Some(notes.clone());
        }
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_duration: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl CreateProject {
    /// Validate and trim user input.
    pub fn normalized(self) -> Result<Self, CoreError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::Validation("Projectnaam is verplicht.".to_string()));
        }
        Ok(Self {
            name,
            description: self.description.trim().to_string(),
            estimated_duration: self
                .estimated_duration
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            image_urls: self.image_urls,
        })
    }
}

/// Row inserted into the store for a new project.
#[derive(Debug, Clone, Serialize)]
pub struct NewProjectRow {
    pub user_id: DbId,
    pub name: String,
    pub description: String,
    pub estimated_duration: Option<String>,
    pub status: ProjectStatus,
    pub progress: i32,
    pub next_task: String,
    pub image_urls: Vec<String>,
}

impl NewProjectRow {
    /// Build the initial row for `owner`: planning status, zero progress.
    pub fn new(owner: DbId, input: CreateProject) -> Self {
        Self {
            user_id: owner,
            name: input.name,
            description: input.description,
            estimated_duration: input.estimated_duration,
            status: ProjectStatus::Planning,
            progress: 0,
            next_task: INITIAL_NEXT_TASK.to_string(),
            image_urls: input.image_urls,
        }
    }
}

/// DTO for updating an existing project. All fields are optional and only
/// the ones present are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_materials: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_time_estimate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateProject {
    /// Update that stores a generated plan on the project.
    pub fn from_plan(plan: &AiPlan) -> Self {
        Self {
            ai_steps: Some(plan.steps.clone()),
            ai_materials: Some(plan.materials.clone()),
            ai_time_estimate: Some(plan.time_estimate.clone()),
            ..Self::default()
        }
    }

    /// Update that only changes the lifecycle status.
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Check the invariants the store does not enforce itself.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(progress) = self.progress {
            validate_progress(progress)?;
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Projectnaam mag niet leeg zijn.".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Validate and trim the name so stored rows match what `apply` produces.
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        self.validate()?;
        if let Some(name) = self.name.as_mut() {
            *name = name.trim().to_string();
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Progress is a percentage: `0..=100`.
pub fn validate_progress(progress: i32) -> Result<(), CoreError> {
    if !(0..=MAX_PROGRESS).contains(&progress) {
        return Err(CoreError::Validation(format!(
            "Progress must be between 0 and {MAX_PROGRESS} (got {progress})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sample_project() -> Project {
        serde_json::from_value(serde_json::json!({
            "id": "7f1c9a1e-3b2d-4c55-9a0e-0d6f1b2a3c4d",
            "user_id": "0b0c1d2e-3f40-4152-8364-75869708a9b0",
            "name": "Schutting bouwen",
            "description": "Nieuwe houten schutting plaatsen",
            "status": "active",
            "progress": 40,
            "image_urls": null,
            "ai_steps": null,
            "ai_materials": ["Houten palen"],
            "ai_time_estimate": null,
            "notes": null,
            "created_at": "2026-05-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn null_list_columns_become_empty() {
        let project = sample_project();
        assert!(project.image_urls.is_empty());
        assert!(project.ai_steps.is_empty());
        assert_eq!(project.ai_materials, vec!["Houten palen"]);
        assert_eq!(project.status, ProjectStatus::Active);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let parsed = serde_json::from_str::<ProjectStatus>(r#""archived""#);
        assert!(parsed.is_err());
    }

    #[test]
    fn progress_bounds() {
        assert!(validate_progress(0).is_ok());
        assert!(validate_progress(100).is_ok());
        assert_matches!(validate_progress(-1), Err(CoreError::Validation(_)));
        assert_matches!(validate_progress(101), Err(CoreError::Validation(_)));
    }

    #[test]
    fn update_rejects_blank_name() {
        let update = UpdateProject {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert_matches!(update.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn update_name_is_trimmed() {
        let update = UpdateProject {
            name: Some("  Badkamer XL ".into()),
            progress: Some(55),
            ..Default::default()
        }
        .normalized()
        .unwrap();
        assert_eq!(update.name.as_deref(), Some("Badkamer XL"));
        assert_eq!(update.progress, Some(55));

        let blank = UpdateProject {
            name: Some(" ".into()),
            ..Default::default()
        };
        assert_matches!(blank.normalized(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn create_requires_name_and_trims() {
        let err = CreateProject {
            name: "  ".into(),
            ..Default::default()
        }
        .normalized()
        .unwrap_err();
        assert!(err.to_string().contains("Projectnaam is verplicht"));

        let ok = CreateProject {
            name: "  Keuken  ".into(),
            description: " Nieuw blad ".into(),
            estimated_duration: Some("   ".into()),
            image_urls: vec![],
        }
        .normalized()
        .unwrap();
        assert_eq!(ok.name, "Keuken");
        assert_eq!(ok.description, "Nieuw blad");
        assert_eq!(ok.estimated_duration, None);
    }

    #[test]
    fn new_rows_start_in_planning() {
        let row = NewProjectRow::new(DbId::nil(), CreateProject {
            name: "Zolder isoleren".into(),
            ..Default::default()
        });
        assert_eq!(row.status, ProjectStatus::Planning);
        assert_eq!(row.progress, 0);
        assert_eq!(row.next_task, INITIAL_NEXT_TASK);
    }

    #[test]
    fn plan_update_only_touches_ai_fields() {
        let plan = AiPlan {
            steps: vec!["Meet de lengte".into()],
            materials: vec!["Houten palen".into()],
            time_estimate: "1 dag".into(),
        };
        let update = UpdateProject::from_plan(&plan);
        let json = serde_json::to_value(&update).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);

        let mut project = sample_project();
        project.apply(&update);
        assert_eq!(project.ai_steps, vec!["Meet de lengte"]);
        assert_eq!(project.ai_time_estimate.as_deref(), Some("1 dag"));
        assert_eq!(project.name, "Schutting bouwen");
    }
}
