//! Generic table rows: column descriptors, search and status filtering
//!
//! Rows are any serializable record. Filtering looks at the record's JSON
//! object form, so the same code serves tasks, sprints and projects.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

type Formatter = Box<dyn Fn(&Value) -> String + Send + Sync>;

pub struct Column {
    /// Field of the row object this column reads
    pub id: &'static str,
    pub label: &'static str,
    pub align: Align,
    pub min_width: u16,
    format: Option<Formatter>,
}

impl Column {
    pub fn new(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            align: Align::Left,
            min_width: label.len() as u16,
            format: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn min_width(mut self, width: u16) -> Self {
        self.min_width = width;
        self
    }

    /// Custom cell renderer, given the field value (`Null` when absent)
    pub fn format<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.format = Some(Box::new(f));
        self
    }

    pub fn render(&self, row: &Value) -> String {
        let value = row.get(self.id).unwrap_or(&Value::Null);
        match &self.format {
            Some(f) => f(value),
            None => value_text(value).unwrap_or_default(),
        }
    }
}

/// Text form of a field; `None` for null
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    pub search: String,
    /// Exact match against the row's `status` field
    pub status: Option<String>,
}

impl TableFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.status.is_none()
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.matches_search(row) && self.matches_status(row)
    }

    fn matches_search(&self, row: &Value) -> bool {
        let term = self.search.to_lowercase();
        if term.is_empty() {
            return true;
        }
        match row {
            Value::Object(fields) => fields
                .values()
                .filter_map(value_text)
                .any(|text| text.to_lowercase().contains(&term)),
            other => value_text(other).is_some_and(|text| text.to_lowercase().contains(&term)),
        }
    }

    fn matches_status(&self, row: &Value) -> bool {
        match &self.status {
            None => true,
            Some(wanted) => row.get("status").and_then(Value::as_str) == Some(wanted.as_str()),
        }
    }

    /// Visible subset of `rows`, in their original order
    pub fn apply<'a, T: Serialize>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter()
            .filter(|row| {
                serde_json::to_value(row)
                    .map(|value| self.matches(&value))
                    .unwrap_or(false)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::tests::task;
    use crate::models::{Task, TaskStatus, TaskType};

    fn tasks() -> Vec<Task> {
        let mut login = task(1, TaskStatus::Todo, TaskType::Bug);
        login.title = "Fix LOGIN crash".to_string();
        let mut docs = task(2, TaskStatus::Done, TaskType::Task);
        docs.title = "Write docs".to_string();
        docs.description = Some("Login flow walkthrough".to_string());
        let mut api = task(3, TaskStatus::InProgress, TaskType::Story);
        api.title = "API pagination".to_string();
        vec![login, docs, api]
    }

    fn ids(rows: &[&Task]) -> Vec<i64> {
        rows.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let rows = tasks();
        assert_eq!(TableFilter::default().apply(&rows).len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_over_any_field() {
        let rows = tasks();
        let filter = TableFilter {
            search: "login".to_string(),
            status: None,
        };
        assert_eq!(ids(&filter.apply(&rows)), vec![1, 2]);

        let filter = TableFilter {
            search: "PAGINATION".to_string(),
            status: None,
        };
        assert_eq!(ids(&filter.apply(&rows)), vec![3]);
    }

    #[test]
    fn test_search_and_status_commute() {
        let rows = tasks();
        let both = TableFilter {
            search: "login".to_string(),
            status: Some("done".to_string()),
        };
        let search_only = TableFilter {
            search: "login".to_string(),
            status: None,
        };
        let status_only = TableFilter {
            search: String::new(),
            status: Some("done".to_string()),
        };

        let search_then_status: Vec<i64> = search_only
            .apply(&rows)
            .into_iter()
            .filter(|t| t.status == TaskStatus::Done)
            .map(|t| t.id)
            .collect();
        let status_then_search: Vec<i64> = status_only
            .apply(&rows)
            .into_iter()
            .filter(|t| search_only.matches(&serde_json::to_value(t).unwrap()))
            .map(|t| t.id)
            .collect();

        assert_eq!(ids(&both.apply(&rows)), vec![2]);
        assert_eq!(search_then_status, status_then_search);
    }

    #[test]
    fn test_null_fields_never_match() {
        let rows = tasks();
        let filter = TableFilter {
            search: "null".to_string(),
            status: None,
        };
        assert!(filter.apply(&rows).is_empty());
    }

    #[test]
    fn test_column_render() {
        let row = serde_json::json!({"title": "Write docs", "story_points": null, "priority": "high"});

        let points = Column::new("story_points", "Points")
            .align(Align::Right)
            .format(|v| value_text(v).unwrap_or_else(|| "-".to_string()));
        assert_eq!(points.render(&row), "-");
        assert_eq!(points.align, Align::Right);

        let title = Column::new("title", "Task").min_width(20);
        assert_eq!(title.render(&row), "Write docs");
        assert_eq!(title.min_width, 20);

        assert_eq!(Column::new("missing", "Missing").render(&row), "");
    }
}
