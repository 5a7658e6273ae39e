//! Task activity log entries (read-only, written by the server)

use super::{Id, timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityLog {
    pub id: Id,
    pub task_id: Id,
    pub user_id: Id,
    /// `created`, `updated`, `moved`, `assigned` or `commented`
    pub action: String,
    #[serde(default)]
    pub field_changed: Option<String>,
    #[serde(default)]
    pub old_value: Option<String>,
    #[serde(default)]
    pub new_value: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    /// One-line human summary, e.g. `moved status: todo → done`
    pub fn summary(&self) -> String {
        match &self.field_changed {
            Some(field) => format!(
                "{} {}: {} → {}",
                self.action,
                field,
                self.old_value.as_deref().unwrap_or("none"),
                self.new_value.as_deref().unwrap_or("none"),
            ),
            None => self.action.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let mut entry: ActivityLog = serde_json::from_value(serde_json::json!({
            "id": 1,
            "task_id": 2,
            "user_id": 1,
            "action": "moved",
            "field_changed": "status",
            "old_value": "todo",
            "new_value": "done",
            "created_at": "2024-05-01T09:30:00",
        }))
        .unwrap();
        assert_eq!(entry.summary(), "moved status: todo → done");

        entry.field_changed = None;
        entry.action = "created".to_string();
        assert_eq!(entry.summary(), "created");
    }
}
