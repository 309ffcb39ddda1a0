//! In-memory implementation of every repository port.
//!
//! Data is lost on process restart. Ids come from per-table counters and are
//! never handed out twice, mirroring database sequences.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use folio_core::domain::{Author, NewAuthor, NewPost, Page, Pagination, Post, PostChanges, Tag};
use folio_core::error::RepoError;
use folio_core::filter::{PostFilter, SortColumn, SortOrder};
use folio_core::ports::{AuthorRepository, BaseRepository, PostRepository, TagRepository};

#[derive(Default)]
struct Tables {
    posts: BTreeMap<i64, Post>,
    authors: BTreeMap<i64, Author>,
    tags: BTreeMap<i64, Tag>,
    /// (post_id, author_id)
    post_authors: BTreeSet<(i64, i64)>,
    /// (post_id, tag_id)
    post_tags: BTreeSet<(i64, i64)>,
    last_post_id: i64,
    last_author_id: i64,
    last_tag_id: i64,
}

impl Tables {
    fn matches(&self, filter: &PostFilter, post: &Post) -> bool {
        if let Some(author_id) = filter.author_id {
            if !self.post_authors.contains(&(post.id, author_id)) {
                return false;
            }
        }
        if filter.from.is_some_and(|from| post.published_at < from) {
            return false;
        }
        if filter.to.is_some_and(|to| post.published_at > to) {
            return false;
        }
        if let Some(needle) = &filter.q {
            let needle = needle.to_lowercase();
            let in_title = post.title.to_lowercase().contains(&needle);
            let in_summary = post
                .summary
                .as_deref()
                .is_some_and(|summary| summary.to_lowercase().contains(&needle));
            if !in_title && !in_summary {
                return false;
            }
        }
        true
    }

    fn posts_newest_first<'a>(&'a self, ids: impl Iterator<Item = &'a i64>) -> Vec<Post> {
        let mut posts: Vec<Post> = ids.filter_map(|id| self.posts.get(id)).cloned().collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts
    }
}

fn compare(sort: SortColumn, a: &Post, b: &Post) -> Ordering {
    let primary = match sort {
        SortColumn::PublishedAt => a.published_at.cmp(&b.published_at),
        SortColumn::Title => a.title.cmp(&b.title),
    };
    primary.then(a.id.cmp(&b.id))
}

/// Process-local store implementing the post, author and tag repositories.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag. Tags have no HTTP write path, so this is how they get seeded.
    pub async fn add_tag(&self, name: &str) -> Tag {
        let mut tables = self.tables.write().await;
        tables.last_tag_id += 1;
        let tag = Tag {
            id: tables.last_tag_id,
            name: name.to_string(),
        };
        tables.tags.insert(tag.id, tag.clone());
        tag
    }

    /// Attach an existing tag to an existing post.
    pub async fn tag_post(&self, post_id: i64, tag_id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post_id) || !tables.tags.contains_key(&tag_id) {
            return Err(RepoError::Constraint(
                "post_tags references a missing row".to_string(),
            ));
        }
        tables.post_tags.insert((post_id, tag_id));
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn backdate(&self, post_id: i64, at: chrono::DateTime<Utc>) {
        if let Some(post) = self.tables.write().await.posts.get_mut(&post_id) {
            post.published_at = at;
        }
    }

    #[cfg(test)]
    pub(crate) async fn counts(&self) -> (usize, usize) {
        let tables = self.tables.read().await;
        (tables.posts.len(), tables.post_authors.len())
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.post_authors.retain(|(post_id, _)| *post_id != id);
        tables.post_tags.retain(|(post_id, _)| *post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list(&self, filter: &PostFilter) -> Result<Page<Post>, RepoError> {
        let tables = self.tables.read().await;

        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| tables.matches(filter, post))
            .collect();
        matching.sort_by(|a, b| {
            let ordering = compare(filter.sort, a, b);
            match filter.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(usize::try_from(filter.offset()).unwrap_or(usize::MAX))
            .take(filter.per_page as usize)
            .cloned()
            .collect();

        Ok(Page {
            data,
            pagination: Pagination::new(filter.page, filter.per_page, total),
        })
    }

    async fn create_with_authors(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        // Checked before anything is written, so a failure leaves no trace.
        if let Some(missing) = new_post
            .author_ids
            .iter()
            .find(|id| !tables.authors.contains_key(id))
        {
            return Err(RepoError::Constraint(format!(
                "post_authors references missing author {missing}"
            )));
        }

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            title: new_post.title,
            summary: new_post.summary,
            body: new_post.body,
            published_at: Utc::now(),
        };
        tables.posts.insert(post.id, post.clone());
        for author_id in new_post.author_ids {
            tables.post_authors.insert((post.id, author_id));
        }

        Ok(post)
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(&id).map(|post| {
            changes.apply_to(post);
            post.clone()
        }))
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let ids = tables
            .post_authors
            .iter()
            .filter(|(_, linked)| *linked == author_id)
            .map(|(post_id, _)| post_id);
        Ok(tables.posts_newest_first(ids))
    }

    async fn authors_of(&self, post_id: i64) -> Result<Vec<Author>, RepoError> {
        let tables = self.tables.read().await;
        let mut authors: Vec<Author> = tables
            .post_authors
            .range((post_id, i64::MIN)..=(post_id, i64::MAX))
            .filter_map(|(_, author_id)| tables.authors.get(author_id))
            .cloned()
            .collect();
        authors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(authors)
    }
}

#[async_trait]
impl BaseRepository<Author, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Author>, RepoError> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.authors.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.post_authors.retain(|(_, author_id)| *author_id != id);
        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Author>, RepoError> {
        Ok(self.tables.read().await.authors.values().cloned().collect())
    }

    async fn create(&self, new_author: NewAuthor) -> Result<Author, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .authors
            .values()
            .any(|author| author.email == new_author.email)
        {
            return Err(RepoError::Constraint(
                "duplicate key value violates unique constraint \"authors_email_key\"".to_string(),
            ));
        }

        tables.last_author_id += 1;
        let author = Author {
            id: tables.last_author_id,
            name: new_author.name,
            email: new_author.email,
            password_hash: new_author.password_hash,
            bio: new_author.bio,
            joined_at: Utc::now(),
        };
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }
}

#[async_trait]
impl BaseRepository<Tag, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.tags.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.post_tags.retain(|(_, tag_id)| *tag_id != id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let mut tags: Vec<Tag> = self.tables.read().await.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn tags_of(&self, post_id: i64) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .post_tags
            .range((post_id, i64::MIN)..=(post_id, i64::MAX))
            .filter_map(|(_, tag_id)| tables.tags.get(tag_id))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn posts_with(&self, tag_id: i64) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let ids = tables
            .post_tags
            .iter()
            .filter(|(_, linked)| *linked == tag_id)
            .map(|(post_id, _)| post_id);
        Ok(tables.posts_newest_first(ids))
    }
}
