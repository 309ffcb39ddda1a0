//! Structural validation of incoming payloads.
//!
//! Nothing here touches storage. Referential checks (do the authors exist?)
//! live in the services, after these rules pass.

use serde_json::Value;

use crate::domain::{NewAuthor, NewPost, PostChanges};
use crate::error::DomainError;
use crate::filter::parse_positive;

/// Parse an id taken from a path segment.
pub fn parse_id(raw: &str, entity: &str) -> Result<i64, DomainError> {
    parse_positive(raw)
        .ok_or_else(|| DomainError::InvalidParameter(format!("Invalid {entity} id.")))
}

/// Unvalidated post creation payload.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: Option<String>,
    pub body: Option<String>,
    pub summary: Option<String>,
    /// Raw JSON values; each must be an integer >= 1 or a string holding one.
    pub author_ids: Option<Vec<Value>>,
}

impl PostDraft {
    /// Check required fields and author id shapes, in that order.
    pub fn validate(self) -> Result<NewPost, DomainError> {
        let title = required_text(self.title, "\"title\" is required.")?;
        let body = required_text(self.body, "\"body\" is required.")?;

        let raw_ids = match self.author_ids {
            Some(ids) if !ids.is_empty() => ids,
            _ => return Err(rule("\"author_ids\" must be a non-empty array.")),
        };

        let mut author_ids = Vec::with_capacity(raw_ids.len());
        for raw in &raw_ids {
            let id = author_id_from_json(raw)
                .ok_or_else(|| rule("Each author_id must be a valid integer."))?;
            if author_ids.contains(&id) {
                return Err(DomainError::Validation(format!(
                    "Author with id {id} is listed more than once."
                )));
            }
            author_ids.push(id);
        }

        Ok(NewPost {
            title,
            summary: optional_text(self.summary),
            body,
            author_ids,
        })
    }
}

/// Unvalidated partial update. Keys outside title/summary/body never reach
/// this type.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<Option<String>>,
    pub summary: Option<Option<String>>,
    pub body: Option<Option<String>>,
}

impl PostPatch {
    pub fn validate(self) -> Result<PostChanges, DomainError> {
        if self.title.is_none() && self.summary.is_none() && self.body.is_none() {
            return Err(rule("No valid fields to update."));
        }

        let title = self
            .title
            .map(|value| required_text(value, "\"title\" cannot be empty."))
            .transpose()?;
        let body = self
            .body
            .map(|value| required_text(value, "\"body\" cannot be empty."))
            .transpose()?;

        Ok(PostChanges {
            title,
            summary: self.summary.map(optional_text),
            body,
        })
    }
}

/// Unvalidated author registration.
#[derive(Debug, Clone, Default)]
pub struct AuthorDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub bio: Option<String>,
}

impl AuthorDraft {
    pub fn validate(self) -> Result<NewAuthor, DomainError> {
        let name = required_text(self.name, "\"name\" is required.")?;
        let email = required_text(self.email, "\"email\" is required.")?;
        let password_hash = self
            .password_hash
            .filter(|hash| !hash.is_empty())
            .ok_or_else(|| rule("\"password_hash\" is required."))?;

        Ok(NewAuthor {
            name,
            email,
            password_hash,
            bio: optional_text(self.bio),
        })
    }
}

fn rule(message: &str) -> DomainError {
    DomainError::Validation(message.to_string())
}

fn required_text(value: Option<String>, message: &str) -> Result<String, DomainError> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| rule(message))
}

/// Trim optional text; blank becomes absent.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn author_id_from_json(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }?;

    (id >= 1).then_some(id)
}
