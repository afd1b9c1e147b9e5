//! Task API endpoints
//!
//! CRUD over the file-backed task store. Every route needs a bearer token.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use hm_core::task::{Task, TaskDraft, TaskQuery, TaskService};
use hm_core::Error;

use super::{authenticate, bad_request, internal_error, not_found, MessageResponse, RouteError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct CreateTaskResponse {
    task_id: String,
    message: String,
}

fn task_error(error: Error) -> RouteError {
    match error {
        Error::TaskNotFound(id) => not_found(format!("Task '{}' not found", id)),
        Error::InvalidInput(message) => bad_request(message),
        other => internal_error(other),
    }
}

fn read_draft(body: Result<Json<TaskDraft>, JsonRejection>) -> Result<TaskDraft, RouteError> {
    let Json(draft) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    if draft.title.trim().is_empty() {
        return Err(bad_request("Title cannot be empty"));
    }
    Ok(draft)
}

/// GET /tasks
async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<Task>>, RouteError> {
    authenticate(&state, &headers).await?;
    let tasks = state.task_store().list(&query).await.map_err(task_error)?;
    Ok(Json(tasks))
}

/// POST /tasks
async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<TaskDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateTaskResponse>), RouteError> {
    let user = authenticate(&state, &headers).await?;
    let mut draft = read_draft(body)?;
    if draft.owner.is_none() {
        draft.owner = Some(user.id);
    }

    let task = state.task_store().insert(draft).await.map_err(task_error)?;
    info!("Created task {} '{}'", task.id, task.title);
    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse {
            task_id: task.id,
            message: "Task created successfully".to_string(),
        }),
    ))
}

/// GET /tasks/{id}
async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Task>, RouteError> {
    authenticate(&state, &headers).await?;
    state
        .task_store()
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| not_found(format!("Task '{}' not found", id)))
}

/// PUT /tasks/{id}
async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<TaskDraft>, JsonRejection>,
) -> Result<Json<Task>, RouteError> {
    authenticate(&state, &headers).await?;
    let mut draft = read_draft(body)?;
    if draft.owner.is_none() {
        draft.owner = state.task_store().get(&id).await.and_then(|task| task.owner);
    }

    let task = state
        .task_store()
        .replace(&id, draft)
        .await
        .map_err(task_error)?;
    info!("Updated task {} (status {})", task.id, task.status);
    Ok(Json(task))
}

/// DELETE /tasks/{id}
async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, RouteError> {
    authenticate(&state, &headers).await?;
    state.task_store().delete(&id).await.map_err(task_error)?;
    info!("Deleted task {}", id);
    Ok(MessageResponse::new("Task deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::routes::testing::{build_app, call, register};

    fn task_body(title: &str, category: &str) -> Value {
        json!({
            "title": title,
            "description": "",
            "due_date": "2024-05-01",
            "start_time": "09:00",
            "end_time": "10:00",
            "category": category,
            "status": "pending",
            "participants": [],
            "recurring": false,
        })
    }

    #[tokio::test]
    async fn task_routes_require_token() {
        let (app, _state, _temp_dir) = build_app().await;
        let (status, payload) = call(&app, "GET", "/tasks", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(payload["error"].is_string());

        let (status, _) = call(
            &app,
            "POST",
            "/tasks",
            None,
            Some(task_body("Dishes", "Kitchen")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_defaults_owner_to_caller() {
        let (app, _state, _temp_dir) = build_app().await;
        let (token, user_id) = register(&app, "ann").await;

        let (status, created) = call(
            &app,
            "POST",
            "/tasks",
            Some(&token),
            Some(task_body("Dishes", "Kitchen")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let task_id = created["task_id"].as_str().unwrap();

        let (status, task) = call(
            &app,
            "GET",
            &format!("/tasks/{}", task_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(task["user"], user_id.as_str());
        assert_eq!(task["category"], "Kitchen");
        assert_eq!(task["start_time"], "09:00");
    }

    #[tokio::test]
    async fn create_rejects_empty_title() {
        let (app, _state, _temp_dir) = build_app().await;
        let (token, _) = register(&app, "ann").await;

        let (status, payload) = call(
            &app,
            "POST",
            "/tasks",
            Some(&token),
            Some(task_body("   ", "Kitchen")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "Title cannot be empty");
    }

    #[tokio::test]
    async fn list_applies_query_filters() {
        let (app, _state, _temp_dir) = build_app().await;
        let (token, user_id) = register(&app, "ann").await;

        let mut mine = task_body("Weed beds", "Garden");
        mine["participants"] = json!([user_id]);
        for body in [task_body("Dishes", "Kitchen"), mine] {
            call(&app, "POST", "/tasks", Some(&token), Some(body)).await;
        }

        let (_, all) = call(&app, "GET", "/tasks", Some(&token), None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (_, garden) = call(&app, "GET", "/tasks?category=Garden", Some(&token), None).await;
        assert_eq!(garden.as_array().unwrap().len(), 1);
        assert_eq!(garden[0]["title"], "Weed beds");

        let (_, assigned) = call(
            &app,
            "GET",
            &format!("/tasks?user={}", user_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(assigned.as_array().unwrap().len(), 1);

        let (_, due) = call(&app, "GET", "/tasks?due_date=2024-04-30", Some(&token), None).await;
        assert!(due.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_filters_by_priority() {
        let (app, _state, _temp_dir) = build_app().await;
        let (token, _) = register(&app, "ann").await;

        let mut urgent = task_body("Fix leak", "Bathroom");
        urgent["priority"] = json!("high");
        for body in [task_body("Dishes", "Kitchen"), urgent] {
            call(&app, "POST", "/tasks", Some(&token), Some(body)).await;
        }

        let (status, high) = call(&app, "GET", "/tasks?priority=high", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(high.as_array().unwrap().len(), 1);
        assert_eq!(high[0]["title"], "Fix leak");

        let (_, low) = call(&app, "GET", "/tasks?priority=low", Some(&token), None).await;
        assert_eq!(low.as_array().unwrap().len(), 1);
        assert_eq!(low[0]["priority"], "low");
    }

    #[tokio::test]
    async fn update_and_delete_unknown_task_are_not_found() {
        let (app, _state, _temp_dir) = build_app().await;
        let (token, _) = register(&app, "ann").await;

        let (status, _) = call(
            &app,
            "PUT",
            "/tasks/missing",
            Some(&token),
            Some(task_body("Dishes", "Kitchen")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, "DELETE", "/tasks/missing", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_returns_record_and_delete_removes_it() {
        let (app, _state, _temp_dir) = build_app().await;
        let (token, user_id) = register(&app, "ann").await;

        let (_, created) = call(
            &app,
            "POST",
            "/tasks",
            Some(&token),
            Some(task_body("Dishes", "Kitchen")),
        )
        .await;
        let path = format!("/tasks/{}", created["task_id"].as_str().unwrap());

        let mut body = task_body("Dishes", "Kitchen");
        body["status"] = json!("completed");
        let (status, updated) = call(&app, "PUT", &path, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "completed");
        assert_eq!(updated["user"], user_id.as_str());

        let (status, payload) = call(&app, "DELETE", &path, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["message"], "Task deleted successfully");

        let (status, _) = call(&app, "GET", &path, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
