//! Data Transfer Objects - request bodies accepted by the API.
//!
//! Fields are `Option`s and raw JSON values; missing or blank values are
//! reported by domain validation, not by deserialization.

use serde::{Deserialize, Deserializer, Serialize};

/// Request to create a post together with its authors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub summary: Option<String>,
    pub author_ids: Option<Vec<serde_json::Value>>,
}

/// Partial post update. Unknown keys are ignored; an explicit `null` is kept
/// apart from an absent key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub summary: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub body: Option<Option<String>>,
}

/// Request to register an author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAuthorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub bio: Option<String>,
}

/// Marks a key as present, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
