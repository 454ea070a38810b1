//! Handlers for the `/projects` resource.
//!
//! Every call runs as the signed-in user; the store only ever sees that
//! user's rows, so another user's project reads as not found.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use fixio_core::chat::ChatTurn;
use fixio_core::error::CoreError;
use fixio_core::project::{CreateProject, Project, ProjectStatus, UpdateProject};
use fixio_core::prompt::ProjectContext;
use fixio_core::types::{null_as_default, DbId};
use fixio_store::image_object_path;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handlers::ai::{non_empty, ProjectChatResponse};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

async fn find_project(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Project> {
    state
        .projects
        .get(&auth.session, id)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn apply_update(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    input: &UpdateProject,
) -> AppResult<Project> {
    state
        .projects
        .update(&auth.session, id, input)
        .await?
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let input = input.normalized()?;
    let project = state.projects.create(&auth.session, input).await?;
    tracing::info!(project_id = %project.id, user_id = %auth.user_id(), "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = state.projects.list(&auth.session).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = find_project(&state, &auth, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let input = input.normalized()?;
    if input.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }
    let project = apply_update(&state, &auth, id, &input).await?;
    Ok(Json(DataResponse { data: project }))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ProjectStatus,
}

/// PATCH /api/v1/projects/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<StatusUpdate>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = apply_update(&state, &auth, id, &UpdateProject::status(input.status)).await?;
    tracing::info!(project_id = %id, status = project.status.as_str(), "Project status changed");
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if state.projects.delete(&auth.session, id).await? {
        tracing::info!(project_id = %id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// One file part of an upload request, read fully before anything is stored.
struct ImagePart {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_image_parts(multipart: &mut Multipart) -> AppResult<Vec<ImagePart>> {
    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest(format!(
                "'{file_name}' is not an image ({content_type})"
            )));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        parts.push(ImagePart {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    if parts.is_empty() {
        return Err(AppError::BadRequest("No image files in request".into()));
    }
    Ok(parts)
}

/// POST /api/v1/projects/{id}/images
///
/// Accepts one or more image file fields. Each is stored under the owner's
/// folder and its public URL appended to the project's `image_urls`. The
/// whole request is checked before the first object is written.
pub async fn upload_images(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = find_project(&state, &auth, id).await?;
    let parts = read_image_parts(&mut multipart).await?;

    let stamp = chrono::Utc::now().timestamp_millis();
    let mut image_urls = project.image_urls;
    let mut stored: Vec<String> = Vec::with_capacity(parts.len());
    for (index, part) in parts.into_iter().enumerate() {
        let object_path = image_object_path(auth.user_id(), stamp, index, &part.file_name);
        let url = match state
            .images
            .upload(&auth.session, &object_path, &part.content_type, part.bytes)
            .await
        {
            Ok(url) => url,
            Err(err) => {
                if !stored.is_empty() {
                    tracing::warn!(
                        project_id = %id,
                        orphaned = ?stored,
                        "Image upload aborted, earlier objects are unreferenced"
                    );
                }
                return Err(err.into());
            }
        };
        stored.push(object_path);
        image_urls.push(url);
    }

    let uploaded = stored.len();
    let update = UpdateProject {
        image_urls: Some(image_urls),
        ..Default::default()
    };
    let project = match apply_update(&state, &auth, id, &update).await {
        Ok(project) => project,
        Err(err) => {
            tracing::warn!(
                project_id = %id,
                orphaned = ?stored,
                "Project update failed after image upload"
            );
            return Err(err);
        }
    };
    tracing::info!(project_id = %id, uploaded, "Project images uploaded");
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/generate
///
/// Runs the wizard on the stored project and writes the plan back.
pub async fn generate_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = find_project(&state, &auth, id).await?;
    if project.description.is_empty() {
        return Err(AppError::BadRequest("Missing name or description".into()));
    }

    let plan = state
        .gateway
        .project_wizard(&project.name, &project.description, &project.image_urls)
        .await?;
    let project = apply_update(&state, &auth, id, &UpdateProject::from_plan(&plan)).await?;
    tracing::info!(project_id = %id, steps = project.ai_steps.len(), "Project plan stored");
    Ok(Json(DataResponse { data: project }))
}

#[derive(Debug, Deserialize)]
pub struct StoredProjectChatRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// POST /api/v1/projects/{id}/chat
pub async fn chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<StoredProjectChatRequest>,
) -> AppResult<Json<ProjectChatResponse>> {
    let Some(prompt) = non_empty(input.prompt) else {
        return Err(AppError::BadRequest("Missing prompt".into()));
    };
    let project = find_project(&state, &auth, id).await?;

    let answer = state
        .gateway
        .project_chat(&ProjectContext::from(&project), &input.history, &prompt)
        .await?;
    Ok(Json(ProjectChatResponse { answer }))
}
