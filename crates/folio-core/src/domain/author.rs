use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author entity - a contributor linked to posts through `post_authors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub bio: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// A validated author registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
}
