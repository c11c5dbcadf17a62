use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::AppResult;
use crate::models::{NewTask, Task, User};
use crate::repository::TaskRepository;

use super::UserRepositoryValidation;

/// Task fields plus the resolved assignee.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<String>,
    pub assignee_user: User,
}

#[derive(Clone)]
pub struct CreateTaskUseCase {
    user_validation: UserRepositoryValidation,
    tasks: Arc<dyn TaskRepository>,
}

impl CreateTaskUseCase {
    pub fn new(user_validation: UserRepositoryValidation, tasks: Arc<dyn TaskRepository>) -> Self {
        Self {
            user_validation,
            tasks,
        }
    }

    /// Fails with `NotFound` before any write when the assignee does not exist.
    pub async fn execute(&self, draft: TaskDraft) -> AppResult<Task> {
        self.user_validation
            .validate_user_exists(draft.assignee_user.id)
            .await?;

        let task = self
            .tasks
            .create(NewTask {
                title: draft.title,
                description: draft.description,
                status: draft.status,
                due_date: draft.due_date,
                priority: draft.priority,
                assignee_user_id: draft.assignee_user.id,
            })
            .await?;

        log::info!("task {} created for user {}", task.id, task.assignee_user.id);
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::usecases::fixtures::Fixture;
    use uuid::Uuid;

    fn draft(assignee: User) -> TaskDraft {
        TaskDraft {
            title: "Buy milk".to_string(),
            description: Some("2 litres".to_string()),
            status: None,
            due_date: None,
            priority: Some("high".to_string()),
            assignee_user: assignee,
        }
    }

    #[actix_rt::test]
    async fn test_creates_task_for_assignee() {
        let fx = Fixture::new();
        let ana = fx.user("a@x.com").await;

        let task = fx.create_task.execute(draft(ana.clone())).await.unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.assignee_user.id, ana.id);
        assert_eq!(task.priority.as_deref(), Some("high"));
        assert!(task.deleted_at.is_none());
    }

    #[actix_rt::test]
    async fn test_unknown_assignee_writes_nothing() {
        let fx = Fixture::new();
        let mut ghost = fx.user("a@x.com").await;
        ghost.id = Uuid::new_v4();

        let result = fx.create_task.execute(draft(ghost)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(fx.tasks.find_all().await.unwrap().is_empty());
    }
}
