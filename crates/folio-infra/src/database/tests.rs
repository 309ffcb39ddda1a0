#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use chrono::Utc;
    use folio_core::domain::{NewPost, Post, PostChanges};
    use folio_core::error::RepoError;
    use folio_core::filter::PostFilter;
    use folio_core::ports::{AuthorRepository, BaseRepository, PostRepository};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};

    use crate::database::entity::{author, post};
    use crate::database::postgres_repo::{PostgresAuthorRepository, PostgresPostRepository};

    fn post_model(id: i64, title: &str) -> post::Model {
        post::Model {
            id,
            title: title.to_owned(),
            summary: Some("Summary".to_owned()),
            body: "Body".to_owned(),
            published_at: Utc::now().into(),
        }
    }

    /// Statements recorded by the mock, rendered for substring checks.
    fn transaction_log(repo: PostgresPostRepository) -> String {
        let db = Arc::try_unwrap(repo.db)
            .ok()
            .expect("repository should hold the only connection handle");
        format!("{:?}", db.into_transaction_log())
    }

    fn author_model(id: i64, name: &str, bio: Option<&str>) -> author::Model {
        author::Model {
            id,
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "hash".to_owned(),
            bio: bio.map(str::to_owned),
            joined_at: Utc::now().into(),
        }
    }

    fn count_row(total: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(total)))])
    }

    fn new_post(author_ids: Vec<i64>) -> NewPost {
        NewPost {
            title: "Hello".to_owned(),
            summary: None,
            body: "World".to_owned(),
            author_ids,
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(1, "Test Post")]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(1).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, 1);
    }

    #[tokio::test]
    async fn test_list_counts_then_fetches_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(45)]])
            .append_query_results([vec![post_model(41, "a"), post_model(42, "b")]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let filter = PostFilter {
            page: 3,
            per_page: 20,
            ..Default::default()
        };
        let page = repo.list(&filter).await.unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.pagination.total, 45);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.page, 3);

        let log = transaction_log(repo);
        assert!(log.contains("num_items"), "{log}");
        assert!(log.contains("LIMIT"), "{log}");
        assert!(log.contains("OFFSET"), "{log}");
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty_with_true_total() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(3)]])
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let filter = PostFilter {
            page: 9999,
            ..Default::default()
        };
        let page = repo.list(&filter).await.unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn test_create_writes_post_and_links_in_one_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(10, "Hello")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let created = repo.create_with_authors(new_post(vec![1, 2])).await.unwrap();
        assert_eq!(created.id, 10);

        let log = transaction_log(repo);
        assert!(log.contains("BEGIN"), "{log}");
        assert!(log.contains("post_authors"), "{log}");
        assert!(log.contains("COMMIT"), "{log}");
        assert!(!log.contains("ROLLBACK"), "{log}");
    }

    #[tokio::test]
    async fn test_create_rolls_back_and_returns_original_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(11, "Hello")]])
            .append_exec_errors([DbErr::Custom("association insert failed".to_owned())])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let err = repo
            .create_with_authors(new_post(vec![1, 99]))
            .await
            .unwrap_err();
        match err {
            RepoError::Query(msg) => assert!(msg.contains("association insert failed"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }

        let log = transaction_log(repo);
        assert!(log.contains("ROLLBACK"), "{log}");
        assert!(!log.contains("COMMIT"), "{log}");
    }

    #[tokio::test]
    async fn test_update_missing_post_returns_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let changes = PostChanges {
            title: Some("New".to_owned()),
            ..Default::default()
        };
        assert_eq!(repo.update(5, changes).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_without_match_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let err = BaseRepository::<Post, i64>::delete(&repo, 404).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn test_authors_of_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                author_model(1, "Ada", None),
                author_model(2, "Grace", Some("Compilers")),
            ]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let authors = repo.authors_of(10).await.unwrap();
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].name, "Ada");

        let log = transaction_log(repo);
        assert!(log.contains("INNER JOIN"), "{log}");
    }

    #[tokio::test]
    async fn test_repositories_share_one_pool_handle() {
        let conn = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![post_model(3, "Shared")]])
                .append_query_results([vec![author_model(1, "Ada", None)]])
                .into_connection(),
        );
        let posts = PostgresPostRepository::shared(conn.clone());
        let authors = PostgresAuthorRepository::shared(conn.clone());
        assert_eq!(Arc::strong_count(&conn), 3);

        let post: Option<Post> = posts.find_by_id(3).await.unwrap();
        assert_eq!(post.unwrap().title, "Shared");
        assert_eq!(AuthorRepository::list(&authors).await.unwrap()[0].name, "Ada");
    }
}
