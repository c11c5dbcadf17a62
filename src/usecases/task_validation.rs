use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::repository::TaskRepository;

/// Read-only preconditions on tasks.
#[derive(Clone)]
pub struct TaskRepositoryValidation {
    tasks: Arc<dyn TaskRepository>,
}

impl TaskRepositoryValidation {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    pub async fn validate_task_exists(&self, task_id: Uuid) -> AppResult<()> {
        match self.tasks.find_by_id(task_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Task not found".into())),
        }
    }

    /// Existence first, then ownership.
    pub async fn validate_task_assignee(&self, task_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        if task.assignee_user.id != user_id {
            return Err(AppError::Forbidden(
                "User is not the assignee of the task".into(),
            ));
        }
        Ok(())
    }
}
