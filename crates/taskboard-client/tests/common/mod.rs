//! In-memory transport that records requests and answers from a closure

#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use taskboard_client::{ApiRequest, Error, Method, Result, TrackerClient, Transport};

type Responder = Box<dyn Fn(&ApiRequest) -> Result<Value> + Send + Sync>;

pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    responder: Responder,
    hold_reads: bool,
}

impl RecordingTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            responder: Box::new(responder),
            hold_reads: false,
        }
    }

    /// GET requests are recorded but never answered
    pub fn holding_reads(mut self) -> Self {
        self.hold_reads = true;
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.is_write())
            .collect()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        if self.hold_reads && request.method == Method::Get {
            std::future::pending::<()>().await;
        }
        (self.responder)(&request)
    }
}

pub fn client<F>(responder: F) -> TrackerClient<RecordingTransport>
where
    F: Fn(&ApiRequest) -> Result<Value> + Send + Sync + 'static,
{
    TrackerClient::new(RecordingTransport::new(responder))
}

pub fn task_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "project_id": 1,
        "sprint_id": null,
        "title": format!("Task {}", id),
        "description": null,
        "task_type": "task",
        "status": status,
        "priority": "medium",
        "story_points": null,
        "assigned_to": null,
        "created_by": 1,
        "created_at": "2024-05-01T09:30:00",
        "updated_at": "2024-05-01T09:30:00",
        "due_date": null,
    })
}

pub fn project_json(id: i64, key: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Project {}", key),
        "key": key,
        "description": null,
        "created_at": "2024-05-01T09:30:00",
        "updated_at": "2024-05-01T09:30:00",
    })
}

pub fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.com", username),
        "full_name": username,
        "avatar_url": null,
        "created_at": "2024-05-01T09:30:00",
    })
}

pub fn sprint_json(id: i64, project_id: i64) -> Value {
    json!({
        "id": id,
        "project_id": project_id,
        "name": format!("Sprint {}", id),
        "goal": null,
        "start_date": "2024-05-01T00:00:00",
        "end_date": "2024-05-14T00:00:00",
        "status": "planned",
        "created_at": "2024-04-30T12:00:00",
    })
}

pub fn server_error() -> Error {
    Error::Api {
        status: 500,
        message: "Internal Server Error".to_string(),
    }
}
