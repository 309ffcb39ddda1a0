use std::sync::Arc;

use crate::domain::{Author, Post};
use crate::error::DomainError;
use crate::ports::{AuthorRepository, PostRepository};
use crate::validation::{AuthorDraft, parse_id};

#[derive(Clone)]
pub struct AuthorService {
    authors: Arc<dyn AuthorRepository>,
    posts: Arc<dyn PostRepository>,
}

impl AuthorService {
    pub fn new(authors: Arc<dyn AuthorRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { authors, posts }
    }

    pub async fn list(&self) -> Result<Vec<Author>, DomainError> {
        Ok(self.authors.list().await?)
    }

    pub async fn get(&self, raw_id: &str) -> Result<Author, DomainError> {
        let id = parse_id(raw_id, "author")?;
        self.authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Author", id))
    }

    /// Register an author. Duplicate emails surface as `DomainError::Conflict`.
    pub async fn create(&self, draft: AuthorDraft) -> Result<Author, DomainError> {
        let new_author = draft.validate()?;
        let author = self.authors.create(new_author).await?;
        tracing::info!(author_id = author.id, "Author created");
        Ok(author)
    }

    pub async fn posts(&self, raw_id: &str) -> Result<Vec<Post>, DomainError> {
        let author = self.get(raw_id).await?;
        Ok(self.posts.find_by_author(author.id).await?)
    }
}
