use std::sync::Arc;

use crate::domain::{Post, Tag};
use crate::error::DomainError;
use crate::ports::{PostRepository, TagRepository};
use crate::validation::parse_id;

#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagRepository>,
    posts: Arc<dyn PostRepository>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { tags, posts }
    }

    pub async fn list(&self) -> Result<Vec<Tag>, DomainError> {
        Ok(self.tags.list().await?)
    }

    pub async fn tags_of_post(&self, raw_post_id: &str) -> Result<Vec<Tag>, DomainError> {
        let post_id = parse_id(raw_post_id, "post")?;
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }
        Ok(self.tags.tags_of(post_id).await?)
    }

    pub async fn posts_with_tag(&self, raw_tag_id: &str) -> Result<Vec<Post>, DomainError> {
        let tag_id = parse_id(raw_tag_id, "tag")?;
        if self.tags.find_by_id(tag_id).await?.is_none() {
            return Err(DomainError::not_found("Tag", tag_id));
        }
        Ok(self.tags.posts_with(tag_id).await?)
    }
}
