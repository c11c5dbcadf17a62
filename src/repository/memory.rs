//! In-process adapters backed by a shared [`MemoryStore`].
//!
//! They reproduce the constraints the database enforces: unique email among live users
//! and an existing user behind every task assignee.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{TaskRepository, UserRepository};
use crate::error::{AppError, AppResult};
use crate::models::{NewTask, NewUser, Task, TaskFilters, TaskPatch, User, UserPatch};

/// Stored form of a task: the assignee is kept as a foreign key.
#[derive(Debug, Clone)]
struct TaskRecord {
    id: Uuid,
    title: String,
    description: Option<String>,
    status: Option<bool>,
    due_date: Option<DateTime<Utc>>,
    priority: Option<String>,
    assignee_user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Rows of both tables, in insertion order.
///
/// Locks are always taken users first, then tasks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    tasks: RwLock<Vec<TaskRecord>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn users(&self) -> AppResult<RwLockReadGuard<'_, Vec<User>>> {
        self.users.read().map_err(|_| poisoned())
    }

    fn users_mut(&self) -> AppResult<RwLockWriteGuard<'_, Vec<User>>> {
        self.users.write().map_err(|_| poisoned())
    }

    fn tasks(&self) -> AppResult<RwLockReadGuard<'_, Vec<TaskRecord>>> {
        self.tasks.read().map_err(|_| poisoned())
    }

    fn tasks_mut(&self) -> AppResult<RwLockWriteGuard<'_, Vec<TaskRecord>>> {
        self.tasks.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> AppError {
    AppError::InternalServerError("memory store lock poisoned".into())
}

/// Joins a record with its assignee. Users are never removed, so the lookup only
/// fails if the store was tampered with.
fn resolve(record: &TaskRecord, users: &[User]) -> AppResult<Task> {
    let assignee = users
        .iter()
        .find(|user| user.id == record.assignee_user_id)
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("dangling task assignee".into()))?;

    Ok(Task {
        id: record.id,
        title: record.title.clone(),
        description: record.description.clone(),
        status: record.status,
        due_date: record.due_date,
        priority: record.priority.clone(),
        assignee_user: assignee,
        created_at: record.created_at,
        updated_at: record.updated_at,
        deleted_at: record.deleted_at,
    })
}

fn email_taken(users: &[User], email: &str, except: Option<Uuid>) -> bool {
    users
        .iter()
        .any(|u| u.deleted_at.is_none() && u.email == email && Some(u.id) != except)
}

#[derive(Clone)]
pub struct InMemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Flips `is_active`. Nothing in the HTTP surface exposes this; the database is
    /// edited directly for the PostgreSQL adapter.
    pub fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<User>> {
        let mut users = self.store.users_mut()?;
        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            user.is_active = active;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.store.users_mut()?;
        if email_taken(&users, &user.email, None) {
            return Err(AppError::Conflict(
                "User already exists with the provided email".into(),
            ));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password: user.password,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let users = self.store.users()?;
        Ok(users.iter().filter(|u| u.deleted_at.is_none()).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.store.users()?;
        Ok(users
            .iter()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.store.users()?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.store.users()?;
        Ok(users
            .iter()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> AppResult<Option<User>> {
        let mut users = self.store.users_mut()?;
        if let Some(email) = &patch.email {
            if email_taken(&users, email, Some(id)) {
                return Err(AppError::Conflict(
                    "User already exists with the provided email".into(),
                ));
            }
        }

        let Some(user) = users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
        else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(user.clone()));
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password) = patch.password {
            user.password = password;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut users = self.store.users_mut()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let now = Utc::now();
        user.deleted_at = Some(now);
        user.updated_at = now;
        Ok(())
    }
}

#[derive(Clone)]
pub struct InMemoryTaskRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryTaskRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    fn select<P>(&self, predicate: P) -> AppResult<Vec<Task>>
    where
        P: Fn(&TaskRecord) -> bool,
    {
        let users = self.store.users()?;
        let tasks = self.store.tasks()?;
        tasks
            .iter()
            .filter(|record| predicate(*record))
            .map(|record| resolve(record, &users))
            .collect()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: NewTask) -> AppResult<Task> {
        let users = self.store.users()?;
        if !users.iter().any(|u| u.id == task.assignee_user_id) {
            return Err(AppError::NotFound("User not found".into()));
        }

        let now = Utc::now();
        let record = TaskRecord {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            priority: task.priority,
            assignee_user_id: task.assignee_user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let created = resolve(&record, &users)?;
        self.store.tasks_mut()?.push(record);
        Ok(created)
    }

    async fn find_all(&self) -> AppResult<Vec<Task>> {
        self.find_with_filters(&TaskFilters::default()).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>> {
        Ok(self
            .select(|r| r.id == id && r.deleted_at.is_none())?
            .into_iter()
            .next())
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Task>> {
        Ok(self.select(|r| r.id == id)?.into_iter().next())
    }

    async fn find_with_filters(&self, filters: &TaskFilters) -> AppResult<Vec<Task>> {
        let live = self.select(|r| r.deleted_at.is_none())?;
        Ok(live.into_iter().filter(|task| filters.matches(task)).collect())
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> AppResult<Option<Task>> {
        let users = self.store.users()?;
        if let Some(assignee) = patch.assignee_user_id {
            if !users.iter().any(|u| u.id == assignee) {
                return Err(AppError::NotFound("User not found".into()));
            }
        }

        let mut tasks = self.store.tasks_mut()?;
        let Some(record) = tasks
            .iter_mut()
            .find(|r| r.id == id && r.deleted_at.is_none())
        else {
            return Ok(None);
        };

        if !patch.is_empty() {
            if let Some(title) = patch.title {
                record.title = title;
            }
            if let Some(description) = patch.description {
                record.description = Some(description);
            }
            if let Some(status) = patch.status {
                record.status = Some(status);
            }
            if let Some(due_date) = patch.due_date {
                record.due_date = Some(due_date);
            }
            if let Some(priority) = patch.priority {
                record.priority = Some(priority);
            }
            if let Some(assignee) = patch.assignee_user_id {
                record.assignee_user_id = assignee;
            }
            record.updated_at = Utc::now();
        }

        resolve(record, &users).map(Some)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tasks = self.store.tasks_mut()?;
        let record = tasks
            .iter_mut()
            .find(|r| r.id == id && r.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        let now = Utc::now();
        record.deleted_at = Some(now);
        record.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn repos() -> (InMemoryUserRepository, InMemoryTaskRepository) {
        let store = MemoryStore::new();
        (
            InMemoryUserRepository::new(store.clone()),
            InMemoryTaskRepository::new(store),
        )
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "$2b$04$hash".to_string(),
        }
    }

    fn new_task(title: &str, assignee: Uuid, status: Option<bool>) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            status,
            due_date: None,
            priority: None,
            assignee_user_id: assignee,
        }
    }

    #[actix_rt::test]
    async fn test_unique_email_among_live_users() {
        let (users, _) = repos();
        let ana = users.create(new_user("a@x.com")).await.unwrap();

        let duplicate = users.create(new_user("a@x.com")).await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));

        users.delete(ana.id).await.unwrap();
        assert!(users.create(new_user("a@x.com")).await.is_ok());
    }

    #[actix_rt::test]
    async fn test_soft_deleted_user_keeps_row() {
        let (users, _) = repos();
        let ana = users.create(new_user("a@x.com")).await.unwrap();
        users.delete(ana.id).await.unwrap();

        assert!(users.find_by_id(ana.id).await.unwrap().is_none());
        assert!(users.find_by_email("a@x.com").await.unwrap().is_none());
        assert!(users.find_all().await.unwrap().is_empty());

        let audit = users.find_by_id_with_deleted(ana.id).await.unwrap().unwrap();
        assert!(audit.deleted_at.is_some());
        assert!(matches!(users.delete(ana.id).await, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_empty_user_patch_is_noop() {
        let (users, _) = repos();
        let ana = users.create(new_user("a@x.com")).await.unwrap();

        let unchanged = users.update(ana.id, UserPatch::default()).await.unwrap();
        assert_eq!(unchanged, Some(ana.clone()));

        let renamed = users
            .update(
                ana.id,
                UserPatch {
                    name: Some("Ana Maria".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Ana Maria");
        assert_eq!(renamed.email, ana.email);

        assert!(users
            .update(Uuid::new_v4(), UserPatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[actix_rt::test]
    async fn test_task_requires_existing_assignee() {
        let (_, tasks) = repos();
        let result = tasks.create(new_task("Orphan", Uuid::new_v4(), None)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(tasks.find_all().await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_filters_and_soft_delete() {
        let (users, tasks) = repos();
        let ana = users.create(new_user("a@x.com")).await.unwrap();
        let bob = users.create(new_user("b@x.com")).await.unwrap();

        let first = tasks.create(new_task("One", ana.id, Some(true))).await.unwrap();
        tasks.create(new_task("Two", ana.id, Some(false))).await.unwrap();
        tasks.create(new_task("Three", bob.id, None)).await.unwrap();

        assert_eq!(first.assignee_user, ana);
        assert_eq!(
            tasks.find_with_filters(&TaskFilters::default()).await.unwrap(),
            tasks.find_all().await.unwrap()
        );

        let anas = tasks
            .find_with_filters(&TaskFilters {
                user_id: Some(ana.id),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(anas.len(), 2);

        let done = tasks
            .find_with_filters(&TaskFilters {
                user_id: Some(ana.id),
                status: Some(true),
            })
            .await
            .unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "One");

        tasks.delete(first.id).await.unwrap();
        assert_eq!(tasks.find_all().await.unwrap().len(), 2);
        assert!(tasks.find_by_id(first.id).await.unwrap().is_none());
        assert!(tasks
            .find_by_id_with_deleted(first.id)
            .await
            .unwrap()
            .is_some());
        assert!(tasks
            .update(first.id, TaskPatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[actix_rt::test]
    async fn test_empty_task_patch_is_noop() {
        let (users, tasks) = repos();
        let ana = users.create(new_user("a@x.com")).await.unwrap();
        let task = tasks.create(new_task("One", ana.id, Some(false))).await.unwrap();

        let unchanged = tasks
            .update(task.id, TaskPatch::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged, task);
        assert_eq!(unchanged.updated_at, task.updated_at);
        assert_eq!(tasks.find_by_id(task.id).await.unwrap(), Some(task));
    }

    #[actix_rt::test]
    async fn test_task_update_moves_assignee() {
        let (users, tasks) = repos();
        let ana = users.create(new_user("a@x.com")).await.unwrap();
        let bob = users.create(new_user("b@x.com")).await.unwrap();
        let task = tasks.create(new_task("One", ana.id, None)).await.unwrap();

        let moved = tasks
            .update(
                task.id,
                TaskPatch {
                    assignee_user_id: Some(bob.id),
                    status: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.assignee_user.id, bob.id);
        assert_eq!(moved.status, Some(true));
        assert_eq!(moved.title, "One");

        let dangling = tasks
            .update(
                task.id,
                TaskPatch {
                    assignee_user_id: Some(Uuid::new_v4()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(dangling, Err(AppError::NotFound(_))));
    }
}
