pub mod response;
pub mod task;
pub mod user;

pub use response::{ApiResponse, ListResponse};
pub use task::{
    CreateTaskInput, NewTask, Task, TaskFilters, TaskListQuery, TaskPatch, TaskResponse,
    UpdateTaskInput,
};
pub use user::{CreateUserInput, NewUser, UpdateUserInput, User, UserPatch, UserResponse};
