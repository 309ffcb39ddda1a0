use async_trait::async_trait;

use crate::domain::{Author, NewAuthor, NewPost, Page, Post, PostChanges, Tag};
use crate::error::RepoError;
use crate::filter::PostFilter;

/// Generic repository trait for lookups and removal by primary key.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Returns `RepoError::NotFound` when no row matched.
    ///
    /// Only posts are deleted over HTTP. Author and tag removal exists for
    /// storage maintenance and drops the entity's association rows with it.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Count the posts matching `filter`, then fetch the requested page.
    ///
    /// The two reads are separate statements, so under concurrent writes the
    /// total and the page may reflect slightly different snapshots.
    async fn list(&self, filter: &PostFilter) -> Result<Page<Post>, RepoError>;

    /// Insert a post and one author link per id in a single transaction.
    ///
    /// Either everything is written or nothing is; a failure is returned as
    /// the error that caused it.
    async fn create_with_authors(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Apply a partial update. `Ok(None)` when the post does not exist.
    async fn update(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, RepoError>;

    /// Posts linked to an author, newest first.
    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError>;

    /// Authors linked to a post, ordered by name.
    async fn authors_of(&self, post_id: i64) -> Result<Vec<Author>, RepoError>;
}

/// Author repository.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, i64> {
    /// All authors, ordered by id.
    async fn list(&self) -> Result<Vec<Author>, RepoError>;

    /// Insert a new author. A duplicate email yields `RepoError::Constraint`.
    async fn create(&self, author: NewAuthor) -> Result<Author, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, i64> {
    /// All tags, ordered by name.
    async fn list(&self) -> Result<Vec<Tag>, RepoError>;

    /// Tags attached to a post, ordered by name.
    async fn tags_of(&self, post_id: i64) -> Result<Vec<Tag>, RepoError>;

    /// Posts carrying a tag, newest first.
    async fn posts_with(&self, tag_id: i64) -> Result<Vec<Post>, RepoError>;
}
