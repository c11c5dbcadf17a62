//! PostgreSQL adapters built on `sqlx`.
//!
//! Task reads join `users` so the assignee comes back resolved. Writes use a CTE
//! around the `INSERT`/`UPDATE` so the joined row is returned in one round trip.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{TaskRepository, UserRepository};
use crate::error::{AppError, AppResult};
use crate::models::{NewTask, NewUser, Task, TaskFilters, TaskPatch, User, UserPatch};

/// Columns selected for a task and its assignee, expecting `t` and `u` aliases.
const TASK_COLUMNS: &str = "t.id, t.title, t.description, t.status, t.due_date, t.priority, \
     t.created_at, t.updated_at, t.deleted_at, \
     u.id AS assignee_id, u.name AS assignee_name, u.email AS assignee_email, \
     u.password AS assignee_password, u.is_active AS assignee_is_active, \
     u.created_at AS assignee_created_at, u.updated_at AS assignee_updated_at, \
     u.deleted_at AS assignee_deleted_at";

/// Flat row produced by the task/user join.
#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    status: Option<bool>,
    due_date: Option<DateTime<Utc>>,
    priority: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    assignee_id: Uuid,
    assignee_name: String,
    assignee_email: String,
    assignee_password: String,
    assignee_is_active: bool,
    assignee_created_at: DateTime<Utc>,
    assignee_updated_at: DateTime<Utc>,
    assignee_deleted_at: Option<DateTime<Utc>>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            due_date: row.due_date,
            priority: row.priority,
            assignee_user: User {
                id: row.assignee_id,
                name: row.assignee_name,
                email: row.assignee_email,
                password: row.assignee_password,
                is_active: row.assignee_is_active,
                created_at: row.assignee_created_at,
                updated_at: row.assignee_updated_at,
                deleted_at: row.assignee_deleted_at,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, password, is_active, created_at, updated_at, deleted_at",
        )
        .bind(Uuid::new_v4())
        .bind(user.name)
        .bind(user.email)
        .bind(user.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, is_active, created_at, updated_at, deleted_at
             FROM users WHERE deleted_at IS NULL ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, is_active, created_at, updated_at, deleted_at
             FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, is_active, created_at, updated_at, deleted_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, is_active, created_at, updated_at, deleted_at
             FROM users WHERE email = $1 AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> AppResult<Option<User>> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 password = COALESCE($4, password),
                 updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, name, email, password, is_active, created_at, updated_at, deleted_at",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.password)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by_id(&self, id: Uuid, include_deleted: bool) -> AppResult<Option<Task>> {
        let mut sql = format!(
            "SELECT {} FROM tasks t JOIN users u ON u.id = t.assignee_user_id WHERE t.id = $1",
            TASK_COLUMNS
        );
        if !include_deleted {
            sql.push_str(" AND t.deleted_at IS NULL");
        }

        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Task::from))
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, task: NewTask) -> AppResult<Task> {
        let sql = format!(
            "WITH t AS (
                 INSERT INTO tasks (id, title, description, status, due_date, priority, assignee_user_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING *
             )
             SELECT {} FROM t JOIN users u ON u.id = t.assignee_user_id",
            TASK_COLUMNS
        );

        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(task.title)
            .bind(task.description)
            .bind(task.status)
            .bind(task.due_date)
            .bind(task.priority)
            .bind(task.assignee_user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn find_all(&self) -> AppResult<Vec<Task>> {
        self.find_with_filters(&TaskFilters::default()).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>> {
        self.fetch_one_by_id(id, false).await
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Task>> {
        self.fetch_one_by_id(id, true).await
    }

    async fn find_with_filters(&self, filters: &TaskFilters) -> AppResult<Vec<Task>> {
        // Conditions for assignee and status are appended only when present.
        let mut sql = format!(
            "SELECT {} FROM tasks t JOIN users u ON u.id = t.assignee_user_id \
             WHERE t.deleted_at IS NULL",
            TASK_COLUMNS
        );
        let mut param_count = 1;

        if filters.user_id.is_some() {
            sql.push_str(&format!(" AND t.assignee_user_id = ${}", param_count));
            param_count += 1;
        }
        if filters.status.is_some() {
            sql.push_str(&format!(" AND t.status = ${}", param_count));
        }
        sql.push_str(" ORDER BY t.created_at");

        let mut query = sqlx::query_as::<_, TaskRow>(&sql);
        if let Some(user_id) = filters.user_id {
            query = query.bind(user_id);
        }
        if let Some(status) = filters.status {
            query = query.bind(status);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> AppResult<Option<Task>> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let sql = format!(
            "WITH t AS (
                 UPDATE tasks
                 SET title = COALESCE($2, title),
                     description = COALESCE($3, description),
                     status = COALESCE($4, status),
                     due_date = COALESCE($5, due_date),
                     priority = COALESCE($6, priority),
                     assignee_user_id = COALESCE($7, assignee_user_id),
                     updated_at = NOW()
                 WHERE id = $1 AND deleted_at IS NULL
                 RETURNING *
             )
             SELECT {} FROM t JOIN users u ON u.id = t.assignee_user_id",
            TASK_COLUMNS
        );

        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.status)
            .bind(patch.due_date)
            .bind(patch.priority)
            .bind(patch.assignee_user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Task::from))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Task not found".into()));
        }

        Ok(())
    }
}
