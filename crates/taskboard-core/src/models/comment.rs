//! Task comments

use super::{Id, timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: Id,
    pub task_id: Id,
    pub user_id: Id,
    pub content: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/tasks/{id}/comments`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewComment {
    pub task_id: Id,
    pub user_id: Id,
    pub content: String,
}

impl NewComment {
    pub fn new(task_id: Id, user_id: Id, content: &str) -> crate::Result<Self> {
        let content = content.trim();
        if content.is_empty() {
            return Err(crate::Error::Validation(
                "Comment cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            task_id,
            user_id,
            content: content.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_comment_trims() {
        let comment = NewComment::new(4, 1, "  looks good  ").unwrap();
        assert_eq!(comment.content, "looks good");
        assert_eq!(comment.task_id, 4);
    }

    #[test]
    fn test_blank_comment_rejected() {
        assert!(NewComment::new(4, 1, " \n ").is_err());
    }
}
