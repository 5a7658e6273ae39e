pub mod activity;
pub mod comment;
pub mod config;
pub mod project;
pub mod sprint;
pub mod task;
pub mod timestamp;
pub mod user;

pub use activity::ActivityLog;
pub use comment::{Comment, NewComment};
pub use config::{ApiConfig, Config, UiConfig};
pub use project::{NewProject, Project, ProjectUpdate};
pub use sprint::{NewSprint, Sprint, SprintStatus, SprintUpdate};
pub use task::{
    NewTask, Priority, Task, TaskAssign, TaskFilter, TaskMove, TaskStatus, TaskType, TaskUpdate,
};
pub use user::User;

/// Server-assigned record identifier.
pub type Id = i64;
