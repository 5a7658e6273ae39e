//! User data model

use super::{Id, timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Two-letter initials used in place of an avatar image
    pub fn initials(&self) -> String {
        let initials: String = self
            .full_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect();

        if initials.is_empty() {
            self.username.chars().take(2).collect::<String>().to_uppercase()
        } else {
            initials
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(full_name: &str, username: &str) -> User {
        User {
            id: 1,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            full_name: full_name.to_string(),
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(user("John Doe", "jdoe").initials(), "JD");
        assert_eq!(user("ada lovelace byron", "ada").initials(), "AL");
        assert_eq!(user("   ", "jdoe").initials(), "JD");
    }
}
