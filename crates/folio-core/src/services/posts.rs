use std::sync::Arc;

use crate::domain::{Author, Page, Post};
use crate::error::{DomainError, RepoError};
use crate::filter::PostFilter;
use crate::ports::{AuthorRepository, PostRepository};
use crate::validation::{PostDraft, PostPatch, parse_id};

/// Post use-cases: listing, the transactional create, update and delete.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    authors: Arc<dyn AuthorRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, authors: Arc<dyn AuthorRepository>) -> Self {
        Self { posts, authors }
    }

    /// Read one page of posts. `filter` must come from
    /// [`PostFilter::from_params`]; it is not checked again here.
    pub async fn list(&self, filter: &PostFilter) -> Result<Page<Post>, DomainError> {
        tracing::debug!(
            page = filter.page,
            per_page = filter.per_page,
            sort = ?filter.sort,
            order = ?filter.order,
            "Listing posts"
        );
        Ok(self.posts.list(filter).await?)
    }

    pub async fn get(&self, raw_id: &str) -> Result<Post, DomainError> {
        let id = parse_id(raw_id, "post")?;
        self.existing(id).await
    }

    /// Validate structurally, then check every author exists, then write the
    /// post and its author links atomically.
    pub async fn create(&self, draft: PostDraft) -> Result<Post, DomainError> {
        let new_post = draft.validate()?;

        for &author_id in &new_post.author_ids {
            if self.authors.find_by_id(author_id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "Author with id {author_id} does not exist."
                )));
            }
        }

        let author_count = new_post.author_ids.len();
        let post = self.posts.create_with_authors(new_post).await?;
        tracing::info!(post_id = post.id, authors = author_count, "Post created");

        Ok(post)
    }

    pub async fn update(&self, raw_id: &str, patch: PostPatch) -> Result<Post, DomainError> {
        let id = parse_id(raw_id, "post")?;
        self.existing(id).await?;

        let changes = patch.validate()?;
        let updated = self
            .posts
            .update(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;
        tracing::info!(post_id = id, "Post updated");

        Ok(updated)
    }

    pub async fn delete(&self, raw_id: &str) -> Result<(), DomainError> {
        let id = parse_id(raw_id, "post")?;
        match self.posts.delete(id).await {
            Ok(()) => {
                tracing::info!(post_id = id, "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(DomainError::not_found("Post", id)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn authors(&self, raw_id: &str) -> Result<Vec<Author>, DomainError> {
        let id = parse_id(raw_id, "post")?;
        self.existing(id).await?;
        Ok(self.posts.authors_of(id).await?)
    }

    async fn existing(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }
}
