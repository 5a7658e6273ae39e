//! Typed tracker API client

use crate::error::Result;
use crate::transport::{ApiRequest, HttpTransport, Transport};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use taskboard_core::models::{
    ActivityLog, ApiConfig, Comment, Id, NewComment, NewProject, NewSprint, NewTask, Project,
    ProjectUpdate, Sprint, SprintUpdate, Task, TaskAssign, TaskFilter, TaskMove, TaskStatus,
    TaskUpdate, User,
};

/// Tracker client. Cheap to clone; clones share one transport.
pub struct TrackerClient<T: Transport = HttpTransport> {
    transport: Arc<T>,
}

impl<T: Transport> Clone for TrackerClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl TrackerClient<HttpTransport> {
    /// Create a client for the API at `config.base_url`
    pub fn connect(config: &ApiConfig) -> Result<Self> {
        let transport =
            HttpTransport::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(transport))
    }
}

fn to_body<B: Serialize>(body: &B) -> Result<Value> {
    Ok(serde_json::to_value(body)?)
}

impl<T: Transport> TrackerClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and return the raw response body
    pub async fn call(&self, request: ApiRequest) -> Result<Value> {
        tracing::debug!(method = %request.method, path = %request.path, "api request");
        let result = self.transport.send(request.clone()).await;
        if let Err(e) = &result {
            tracing::debug!(method = %request.method, path = %request.path, error = %e, "api request failed");
        }
        result
    }

    async fn call_typed<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        let value = self.call(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    // Project methods

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.call_typed(ApiRequest::get("/api/projects")).await
    }

    pub async fn get_project(&self, id: Id) -> Result<Project> {
        self.call_typed(ApiRequest::get(format!("/api/projects/{}", id)))
            .await
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Project> {
        self.call_typed(ApiRequest::post("/api/projects", to_body(project)?))
            .await
    }

    pub async fn update_project(&self, id: Id, update: &ProjectUpdate) -> Result<Project> {
        self.call_typed(ApiRequest::put(
            format!("/api/projects/{}", id),
            to_body(update)?,
        ))
        .await
    }

    pub async fn delete_project(&self, id: Id) -> Result<()> {
        self.call(ApiRequest::delete(format!("/api/projects/{}", id)))
            .await?;
        Ok(())
    }

    // Sprint methods

    pub async fn list_sprints(&self, project_id: Option<Id>) -> Result<Vec<Sprint>> {
        let query = project_id.map(|id| ("project_id", id.to_string()));
        self.call_typed(ApiRequest::get("/api/sprints").query(query))
            .await
    }

    pub async fn get_sprint(&self, id: Id) -> Result<Sprint> {
        self.call_typed(ApiRequest::get(format!("/api/sprints/{}", id)))
            .await
    }

    pub async fn create_sprint(&self, sprint: &NewSprint) -> Result<Sprint> {
        self.call_typed(ApiRequest::post("/api/sprints", to_body(sprint)?))
            .await
    }

    pub async fn update_sprint(&self, id: Id, update: &SprintUpdate) -> Result<Sprint> {
        self.call_typed(ApiRequest::put(
            format!("/api/sprints/{}", id),
            to_body(update)?,
        ))
        .await
    }

    pub async fn start_sprint(&self, id: Id) -> Result<Sprint> {
        self.call_typed(ApiRequest::action(format!("/api/sprints/{}/start", id)))
            .await
    }

    pub async fn complete_sprint(&self, id: Id) -> Result<Sprint> {
        self.call_typed(ApiRequest::action(format!("/api/sprints/{}/complete", id)))
            .await
    }

    // Task methods

    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.call_typed(ApiRequest::get("/api/tasks").query(filter.query_pairs()))
            .await
    }

    pub async fn get_task(&self, id: Id) -> Result<Task> {
        self.call_typed(ApiRequest::get(format!("/api/tasks/{}", id)))
            .await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task> {
        self.call_typed(ApiRequest::post("/api/tasks", to_body(task)?))
            .await
    }

    pub async fn update_task(&self, id: Id, update: &TaskUpdate) -> Result<Task> {
        self.call_typed(ApiRequest::put(
            format!("/api/tasks/{}", id),
            to_body(update)?,
        ))
        .await
    }

    pub async fn delete_task(&self, id: Id) -> Result<()> {
        self.call(ApiRequest::delete(format!("/api/tasks/{}", id)))
            .await?;
        Ok(())
    }

    /// Partial update of status and/or sprint
    pub async fn move_task(&self, id: Id, mv: &TaskMove) -> Result<Task> {
        self.call_typed(ApiRequest::put(
            format!("/api/tasks/{}/move", id),
            to_body(mv)?,
        ))
        .await
    }

    pub async fn set_task_status(&self, id: Id, status: TaskStatus) -> Result<Task> {
        self.move_task(id, &TaskMove::to_status(status)).await
    }

    pub async fn assign_task(&self, id: Id, user_id: Id) -> Result<Task> {
        self.call_typed(ApiRequest::put(
            format!("/api/tasks/{}/assign", id),
            to_body(&TaskAssign { user_id })?,
        ))
        .await
    }

    pub async fn list_comments(&self, task_id: Id) -> Result<Vec<Comment>> {
        self.call_typed(ApiRequest::get(format!("/api/tasks/{}/comments", task_id)))
            .await
    }

    pub async fn add_comment(&self, comment: &NewComment) -> Result<Comment> {
        self.call_typed(ApiRequest::post(
            format!("/api/tasks/{}/comments", comment.task_id),
            to_body(comment)?,
        ))
        .await
    }

    pub async fn list_activity(&self, task_id: Id) -> Result<Vec<ActivityLog>> {
        self.call_typed(ApiRequest::get(format!("/api/tasks/{}/activity", task_id)))
            .await
    }

    // User methods

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.call_typed(ApiRequest::get("/api/users")).await
    }

    pub async fn get_user(&self, id: Id) -> Result<User> {
        self.call_typed(ApiRequest::get(format!("/api/users/{}", id)))
            .await
    }
}
