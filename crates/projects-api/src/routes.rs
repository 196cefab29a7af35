use chrono::Utc;
use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Request, RequestExt, Response};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use projects_core::{FieldPath, Project, ProjectId, ProjectStore};

use crate::errors::ApiError;
use crate::ids::generate_project_id;
use crate::response;

/// A matched route. Routing is pure dispatch: no side effects, and anything
/// unmatched falls through to a 404.
#[derive(Debug, PartialEq, Eq)]
pub enum Route {
    Health,
    ListProjects,
    GetProject(String),
    CreateProject,
    UpdateProject(String),
    DeleteProject(String),
}

impl Route {
    /// Resolve method + path to a route.
    ///
    /// `explicit_id` is the id bound by the entry point (API Gateway path
    /// parameter, or the legacy `projectId` query parameter); when absent,
    /// the trailing segment of `/project/{id}` is used. A trailing segment
    /// with further slashes does not match.
    pub fn resolve(method: &str, path: &str, explicit_id: Option<&str>) -> Option<Route> {
        match (method, path) {
            ("GET", "/health") => return Some(Route::Health),
            ("GET", "/projects") => return Some(Route::ListProjects),
            ("POST", "/project") => return Some(Route::CreateProject),
            _ => {}
        }

        if path != "/project" && !path.starts_with("/project/") {
            return None;
        }

        let id = explicit_id.map(str::to_owned).or_else(|| {
            let rest = path.strip_prefix("/project/")?;
            (!rest.is_empty() && !rest.contains('/')).then(|| rest.to_owned())
        })?;

        match method {
            "GET" => Some(Route::GetProject(id)),
            "PUT" => Some(Route::UpdateProject(id)),
            "DELETE" => Some(Route::DeleteProject(id)),
            _ => None,
        }
    }
}

/// Body shape for update requests.
#[derive(Deserialize)]
struct UpdateRequest {
    #[serde(rename = "updateKey")]
    update_key: String,
    #[serde(rename = "updateValue")]
    update_value: Value,
}

/// Top-level request handler: resolve the route, run the operation, and
/// render any error as a failure envelope. Nothing escapes as a fault.
pub(crate) async fn function_handler(
    store: &ProjectStore,
    event: Request,
) -> Result<Response<Body>, Error> {
    let method = event.method().as_str().to_owned();
    let path = event.uri().path().to_owned();
    tracing::info!(%method, %path, "incoming request");

    let path_params = event.path_parameters();
    let query_params = event.query_string_parameters();
    let explicit_id = path_params
        .first("id")
        .or_else(|| query_params.first("projectId"));

    let result = match Route::resolve(&method, &path, explicit_id) {
        Some(Route::Health) => health(),
        Some(Route::ListProjects) => get_all_projects(store).await,
        Some(Route::GetProject(id)) => get_project_by_id(store, id).await,
        Some(Route::CreateProject) => create_project(store, event.body()).await,
        Some(Route::UpdateProject(id)) => update_project(store, id, event.body()).await,
        Some(Route::DeleteProject(id)) => delete_project(store, id).await,
        None => return Ok(response::empty(StatusCode::NOT_FOUND)),
    };

    Ok(result.unwrap_or_else(ApiError::into_response))
}

/// GET /health
fn health() -> Result<Response<Body>, ApiError> {
    Ok(response::success::<Value>(
        StatusCode::OK,
        "Server is Healthy",
        None,
    ))
}

/// GET /projects
///
/// Drains the whole table. An empty table is still a 200.
async fn get_all_projects(store: &ProjectStore) -> Result<Response<Body>, ApiError> {
    let projects = store.list_projects().await?;

    let message = if projects.is_empty() {
        "No projects found.".to_owned()
    } else {
        format!("Successfully fetched {} records.", projects.len())
    };

    Ok(response::success(StatusCode::OK, message, Some(projects)))
}

/// GET /project/{id}
async fn get_project_by_id(store: &ProjectStore, id: String) -> Result<Response<Body>, ApiError> {
    let id = ProjectId::new(id).map_err(|e| ApiError::InvalidProjectId(e.to_string()))?;

    match store.get_project(&id).await? {
        Some(project) => Ok(response::success(
            StatusCode::OK,
            "Successfully fetched the project.",
            Some(project),
        )),
        None => Err(ApiError::NotFound(format!("no project with id {id}"))),
    }
}

/// POST /project
///
/// The body must be a JSON object. The stored record is the caller's fields
/// stamped with a generated id and creation timestamp.
async fn create_project(store: &ProjectStore, body: &Body) -> Result<Response<Body>, ApiError> {
    let fields: Map<String, Value> =
        serde_json::from_slice(body.as_ref()).map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    let project = new_project(fields);
    store.put_project(&project).await?;

    Ok(response::success(
        StatusCode::CREATED,
        "Successfully created a new project",
        Some(project),
    ))
}

/// PUT /project/{id}
///
/// Sets exactly one field to one value. Updating an absent record is a 404,
/// never an implicit create.
async fn update_project(
    store: &ProjectStore,
    id: String,
    body: &Body,
) -> Result<Response<Body>, ApiError> {
    let id = ProjectId::new(id).map_err(|e| ApiError::InvalidProjectId(e.to_string()))?;

    let request: UpdateRequest =
        serde_json::from_slice(body.as_ref()).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    let field = FieldPath::new(request.update_key)
        .map_err(|e| ApiError::InvalidFieldPath(e.to_string()))?;

    let updated = store.update_field(&id, &field, &request.update_value).await?;

    Ok(response::success(
        StatusCode::OK,
        "Successfully updated project.",
        Some(updated),
    ))
}

/// DELETE /project/{id}
///
/// Idempotent: deleting an id that no longer exists still succeeds.
async fn delete_project(store: &ProjectStore, id: String) -> Result<Response<Body>, ApiError> {
    let id = ProjectId::new(id).map_err(|e| ApiError::InvalidProjectId(e.to_string()))?;

    store.delete_project(&id).await?;

    Ok(response::success(
        StatusCode::OK,
        "Successfully deleted project.",
        Some(json!({ "id": id.to_string(), "deleted": true })),
    ))
}

/// Assemble a new record: fresh id, current timestamp, caller fields.
fn new_project(fields: Map<String, Value>) -> Project {
    Project::new(
        generate_project_id(),
        Utc::now().timestamp_millis(),
        fields,
    )
}
