//! Sprint data model

use super::{Id, timestamp};
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sprint {
    pub id: Id,
    pub project_id: Id,
    pub name: String,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(with = "timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub status: SprintStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintStatus {
    #[default]
    Planned,
    Active,
    Completed,
}

/// Body of `POST /api/sprints`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSprint {
    pub project_id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(with = "timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_date: DateTime<Utc>,
    pub status: SprintStatus,
}

/// Body of `PUT /api/sprints/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SprintUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SprintStatus>,
}

impl Sprint {
    /// Whole days until the end date, truncated; negative once a full day has passed
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.end_date - now).num_days()
    }

    pub fn is_active(&self) -> bool {
        self.status == SprintStatus::Active
    }
}

impl SprintStatus {
    pub const ALL: [Self; 3] = [Self::Planned, Self::Active, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            SprintStatus::Planned => "planned",
            SprintStatus::Active => "active",
            SprintStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SprintStatus::Planned => "Planned",
            SprintStatus::Active => "Active",
            SprintStatus::Completed => "Completed",
        }
    }
}

impl FromStr for SprintStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::UnknownVariant {
                kind: "sprint status",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_sprint(end_in: Duration, status: SprintStatus) -> (Sprint, DateTime<Utc>) {
        let now = Utc::now();
        let sprint = Sprint {
            id: 1,
            project_id: 1,
            name: "Sprint 1".to_string(),
            goal: None,
            start_date: now - Duration::days(7),
            end_date: now + end_in,
            status,
            created_at: now,
        };
        (sprint, now)
    }

    #[test]
    fn test_status_defaults_to_planned() {
        let sprint: Sprint = serde_json::from_value(serde_json::json!({
            "id": 1,
            "project_id": 2,
            "name": "Sprint 1",
            "start_date": "2024-05-01T00:00:00",
            "end_date": "2024-05-14T00:00:00",
            "created_at": "2024-04-30T12:00:00",
        }))
        .unwrap();
        assert_eq!(sprint.status, SprintStatus::Planned);
        assert!(!sprint.is_active());
    }

    #[test]
    fn test_days_remaining_counts_whole_days() {
        let (sprint, now) = make_sprint(Duration::hours(36), SprintStatus::Active);
        assert_eq!(sprint.days_remaining(now), 1);

        let (sprint, now) = make_sprint(Duration::hours(12), SprintStatus::Active);
        assert_eq!(sprint.days_remaining(now), 0);

        let (sprint, now) = make_sprint(Duration::days(-3), SprintStatus::Completed);
        assert!(sprint.days_remaining(now) < 0);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "active".parse::<SprintStatus>().unwrap(),
            SprintStatus::Active
        );
        assert!("paused".parse::<SprintStatus>().is_err());
    }
}
