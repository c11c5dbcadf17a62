use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::{User, UserResponse};

/// A task with its assignee resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// Between 1 and 120 characters.
    pub title: String,
    pub description: Option<String>,
    /// Completion flag; `None` when never set.
    pub status: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    /// Free-form priority label.
    pub priority: Option<String>,
    /// The user this task is bound to. Always present.
    pub assignee_user: User,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Values for a task insert.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<String>,
    pub assignee_user_id: Uuid,
}

/// Partial update for a task; `None` leaves the column alone.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<String>,
    pub assignee_user_id: Option<Uuid>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.assignee_user_id.is_none()
    }
}

/// Equality filters for listing tasks. An absent field does not filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilters {
    /// Assignee id.
    pub user_id: Option<Uuid>,
    pub status: Option<bool>,
}

impl TaskFilters {
    /// The predicate shared by every task adapter.
    pub fn matches(&self, task: &Task) -> bool {
        self.user_id.map_or(true, |id| task.assignee_user.id == id)
            && self.status.map_or(true, |status| task.status == Some(status))
    }
}

/// Payload for `POST /tasks`.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<String>,
    pub assignee_user_id: Uuid,
}

/// Payload for `PATCH /tasks/{id}`.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    #[validate(length(min = 1, max = 120))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<String>,
    pub assignee_user_id: Option<Uuid>,
}

/// Query string of `GET /tasks`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub user_id: Option<Uuid>,
    pub status: Option<bool>,
}

/// Client-facing view of a task; the assignee is rendered without its hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<String>,
    pub assignee_user: UserResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            priority: task.priority,
            assignee_user: task.assignee_user.into(),
            created_at: task.created_at,
            updated_at: task.updated_at,
            deleted_at: task.deleted_at,
        }
    }
}
