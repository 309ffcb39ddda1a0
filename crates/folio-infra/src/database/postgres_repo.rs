//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionError, TransactionTrait,
};

use folio_core::domain::{Author, NewAuthor, NewPost, Page, Pagination, Post, PostChanges, Tag};
use folio_core::error::RepoError;
use folio_core::filter::PostFilter;
use folio_core::ports::{AuthorRepository, PostRepository, TagRepository};

use super::entity::author::{self, Entity as AuthorEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_author::{self, Entity as PostAuthorEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};
use super::query::filtered_posts;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, filter: &PostFilter) -> Result<Page<Post>, RepoError> {
        let paginator =
            filtered_posts(filter).paginate(self.conn(), u64::from(filter.per_page));

        // Count and page are separate reads; see `PostRepository::list`.
        let total = paginator.num_items().await.map_err(map_db_err)?;
        let rows = paginator
            .fetch_page(u64::from(filter.page.saturating_sub(1)))
            .await
            .map_err(map_db_err)?;

        tracing::debug!(total, returned = rows.len(), "Post page fetched");

        Ok(Page {
            data: rows.into_iter().map(Into::into).collect(),
            pagination: Pagination::new(filter.page, filter.per_page, total),
        })
    }

    async fn create_with_authors(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let result = self
            .conn()
            .transaction::<_, Post, DbErr>(|txn| {
                Box::pin(async move {
                    let created = post::ActiveModel {
                        title: Set(new_post.title),
                        summary: Set(new_post.summary),
                        body: Set(new_post.body),
                        published_at: Set(Utc::now().into()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    let links = new_post
                        .author_ids
                        .iter()
                        .map(|&author_id| post_author::ActiveModel {
                            post_id: Set(created.id),
                            author_id: Set(author_id),
                        });
                    PostAuthorEntity::insert_many(links)
                        .exec_without_returning(txn)
                        .await?;

                    Ok(created.into())
                })
            })
            .await;

        // Rollback has already happened; hand back the error that caused it.
        result.map_err(|err| match err {
            TransactionError::Connection(err) | TransactionError::Transaction(err) => {
                tracing::warn!(error = %err, "Post creation rolled back");
                map_db_err(err)
            }
        })
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, RepoError> {
        if changes.is_empty() {
            let current = PostEntity::find_by_id(id)
                .one(self.conn())
                .await
                .map_err(map_db_err)?;
            return Ok(current.map(Into::into));
        }

        let mut model = post::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(summary) = changes.summary {
            model.summary = Set(summary);
        }
        if let Some(body) = changes.body {
            model.body = Set(body);
        }

        match model.update(self.conn()).await {
            Ok(updated) => Ok(Some(updated.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(map_db_err(err)),
        }
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .inner_join(PostAuthorEntity)
            .filter(post_author::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::PublishedAt)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn authors_of(&self, post_id: i64) -> Result<Vec<Author>, RepoError> {
        let result = AuthorEntity::find()
            .inner_join(PostAuthorEntity)
            .filter(post_author::Column::PostId.eq(post_id))
            .order_by_asc(author::Column::Name)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn list(&self) -> Result<Vec<Author>, RepoError> {
        let result = AuthorEntity::find()
            .order_by_asc(author::Column::Id)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_author: NewAuthor) -> Result<Author, RepoError> {
        let created = author::ActiveModel {
            name: Set(new_author.name),
            email: Set(new_author.email),
            password_hash: Set(new_author.password_hash),
            bio: Set(new_author.bio),
            joined_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.conn())
        .await
        .map_err(map_db_err)?;

        Ok(created.into())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn tags_of(&self, post_id: i64) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Name)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn posts_with(&self, tag_id: i64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::TagId.eq(tag_id))
            .order_by_desc(post::Column::PublishedAt)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
