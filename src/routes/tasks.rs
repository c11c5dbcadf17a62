use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{
        ApiResponse, CreateTaskInput, ListResponse, TaskFilters, TaskListQuery, TaskPatch,
        TaskResponse, UpdateTaskInput,
    },
    state::AppState,
    usecases::TaskDraft,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Creates a task assigned to any existing user.
///
/// The caller does not have to be the assignee.
///
/// ## Request Body:
/// - `title`: 1 to 120 characters (required).
/// - `description`, `status`, `dueDate` (RFC 3339), `priority` (optional).
/// - `assigneeUserId`: UUID of an existing user (required).
///
/// ## Responses:
/// - `201 Created`: `{success, message, data: Task}`.
/// - `400 Bad Request`: Invalid payload or unknown assignee.
/// - `401 Unauthorized`: Missing or invalid bearer token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    payload: web::Json<CreateTaskInput>,
    _caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let input = payload.into_inner();

    state
        .user_validation
        .validate_user_exists(input.assignee_user_id)
        .await
        .map_err(AppError::into_client_error)?;

    let assignee_user = state
        .users
        .find_by_id(input.assignee_user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("User not found".into()))?;

    let task = state
        .create_task
        .execute(TaskDraft {
            title: input.title,
            description: input.description,
            status: input.status,
            due_date: input.due_date,
            priority: input.priority,
            assignee_user,
        })
        .await
        .map_err(AppError::into_client_error)?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        TaskResponse::from(task),
        "Task created successfully",
    )))
}

/// Lists live tasks.
///
/// ## Query Parameters:
/// - `userId` (optional): Assignee to filter by. Defaults to the caller.
/// - `status` (optional): `true` or `false`.
///
/// ## Responses:
/// - `200 OK`: `{success, data: [Task], total}`.
/// - `400 Bad Request`: Unparseable query string.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `500 Internal Server Error`: Storage failure.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    query: web::Query<TaskListQuery>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let filters = TaskFilters {
        user_id: Some(query.user_id.unwrap_or(caller.id)),
        status: query.status,
    };

    let tasks = state.tasks.find_with_filters(&filters).await?;
    let tasks: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();

    Ok(HttpResponse::Ok().json(ListResponse::from(tasks)))
}

/// Applies a partial update to a task the caller is assigned to.
///
/// ## Path Parameters:
/// - `id`: The UUID of the task.
///
/// ## Request Body:
/// Any subset of the create fields. A new `assigneeUserId` must name an existing user.
///
/// ## Responses:
/// - `200 OK`: `{success, message, data: Task}`.
/// - `400 Bad Request`: Invalid payload, malformed id or unknown new assignee.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `403 Forbidden`: The caller is not the task's assignee. The task is left untouched.
/// - `404 Not Found`: No live task with this id.
#[patch("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    payload: web::Json<UpdateTaskInput>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let task_id = task_id.into_inner();
    let input = payload.into_inner();

    state.task_validation.validate_task_exists(task_id).await?;
    authorize_assignee(&state, task_id, &caller, "modify").await?;

    if let Some(assignee_id) = input.assignee_user_id {
        state
            .user_validation
            .validate_user_exists(assignee_id)
            .await
            .map_err(AppError::into_client_error)?;
    }

    let patch = TaskPatch {
        title: input.title,
        description: input.description,
        status: input.status,
        due_date: input.due_date,
        priority: input.priority,
        assignee_user_id: input.assignee_user_id,
    };

    let task = state
        .tasks
        .update(task_id, patch)
        .await
        .map_err(AppError::into_client_error)?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    log::info!("task {} updated by user {}", task.id, caller.id);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        TaskResponse::from(task),
        "Task updated successfully",
    )))
}

/// Soft-deletes a task the caller is assigned to.
///
/// ## Responses:
/// - `200 OK`: `{success, message}`.
/// - `400 Bad Request`: Malformed id.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `403 Forbidden`: The caller is not the task's assignee.
/// - `404 Not Found`: No live task with this id.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    state.task_validation.validate_task_exists(task_id).await?;
    authorize_assignee(&state, task_id, &caller, "delete").await?;

    state.tasks.delete(task_id).await?;

    log::info!("task {} deleted by user {}", task_id, caller.id);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Task deleted successfully")))
}

/// Loads the task and checks the caller is its assignee.
async fn authorize_assignee(
    state: &AppState,
    task_id: Uuid,
    caller: &AuthenticatedUser,
    action: &str,
) -> Result<(), AppError> {
    let task = state
        .tasks
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if task.assignee_user.id != caller.id {
        log::warn!(
            "user {} refused to {} task {} assigned to {}",
            caller.id,
            action,
            task_id,
            task.assignee_user.id
        );
        return Err(AppError::Forbidden(format!(
            "You do not have permission to {} this task",
            action
        )));
    }
    Ok(())
}
