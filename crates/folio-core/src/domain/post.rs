use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - the primary content record.
///
/// `id` is assigned by storage and `published_at` is fixed at creation;
/// neither changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub body: String,
    pub published_at: DateTime<Utc>,
}

/// A fully validated post ready to be written together with its author links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub summary: Option<String>,
    pub body: String,
    /// Distinct, existing author ids. Never empty.
    pub author_ids: Vec<i64>,
}

/// Validated partial update. `None` leaves a field untouched; for `summary`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub summary: Option<Option<String>>,
    pub body: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.summary.is_none() && self.body.is_none()
    }

    /// Apply the changes to an in-memory copy of a post.
    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(summary) = self.summary {
            post.summary = summary;
        }
        if let Some(body) = self.body {
            post.body = body;
        }
    }
}
