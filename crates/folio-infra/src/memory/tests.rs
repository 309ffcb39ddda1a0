use std::collections::HashMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;

use folio_core::domain::{Author, Post, Tag};
use folio_core::error::{DomainError, RepoError};
use folio_core::filter::PostFilter;
use folio_core::ports::BaseRepository;
use folio_core::services::{AuthorService, PostService, TagService};
use folio_core::validation::{AuthorDraft, PostDraft, PostPatch};

use super::InMemoryStore;

struct Fixture {
    store: Arc<InMemoryStore>,
    posts: PostService,
    authors: AuthorService,
    tags: TagService,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    Fixture {
        posts: PostService::new(store.clone(), store.clone()),
        authors: AuthorService::new(store.clone(), store.clone()),
        tags: TagService::new(store.clone(), store.clone()),
        store,
    }
}

impl Fixture {
    async fn author(&self, name: &str) -> Author {
        self.authors
            .create(AuthorDraft {
                name: Some(name.to_owned()),
                email: Some(format!("{}@example.com", name.to_lowercase())),
                password_hash: Some("$argon2id$stub".to_owned()),
                bio: None,
            })
            .await
            .unwrap()
    }

    async fn post(&self, title: &str, summary: Option<&str>, author_ids: &[i64]) -> Post {
        self.posts
            .create(PostDraft {
                title: Some(title.to_owned()),
                body: Some(format!("{title} body")),
                summary: summary.map(str::to_owned),
                author_ids: Some(author_ids.iter().map(|id| json!(id)).collect()),
            })
            .await
            .unwrap()
    }
}

fn filter(pairs: &[(&str, &str)]) -> PostFilter {
    let params: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    PostFilter::from_params(&params).unwrap()
}

fn titles(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.title.as_str()).collect()
}

#[tokio::test]
async fn create_links_every_author() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    let grace = fx.author("Grace").await;

    let post = fx.post("Two hands", None, &[ada.id, grace.id]).await;

    let authors = fx.posts.authors(&post.id.to_string()).await.unwrap();
    let names: Vec<_> = authors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Ada", "Grace"]);
}

#[tokio::test]
async fn empty_author_ids_persists_nothing() {
    let fx = fixture();

    let err = fx
        .posts
        .create(PostDraft {
            title: Some("Orphan".into()),
            body: Some("Body".into()),
            summary: None,
            author_ids: Some(vec![]),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(fx.store.counts().await, (0, 0));
}

#[tokio::test]
async fn missing_author_among_several_persists_nothing() {
    let fx = fixture();
    let ada = fx.author("Ada").await;

    let err = fx
        .posts
        .create(PostDraft {
            title: Some("Partial".into()),
            body: Some("Body".into()),
            summary: None,
            author_ids: Some(vec![json!(ada.id), json!(999)]),
        })
        .await
        .unwrap_err();

    match err {
        DomainError::Validation(msg) => assert_eq!(msg, "Author with id 999 does not exist."),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fx.store.counts().await, (0, 0));
}

#[tokio::test]
async fn list_filters_by_author() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    let grace = fx.author("Grace").await;
    fx.post("Ada alone", None, &[ada.id]).await;
    fx.post("Together", None, &[ada.id, grace.id]).await;
    fx.post("Grace alone", None, &[grace.id]).await;

    let author = grace.id.to_string();
    let page = fx
        .posts
        .list(&filter(&[("author_id", author.as_str()), ("sort", "title"), ("order", "asc")]))
        .await
        .unwrap();

    assert_eq!(titles(&page.data), ["Grace alone", "Together"]);
    assert_eq!(page.pagination.total, 2);
}

#[tokio::test]
async fn date_window_is_inclusive_of_whole_days() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    let early = fx.post("Early", None, &[ada.id]).await;
    let edge = fx.post("Edge", None, &[ada.id]).await;
    let late = fx.post("Late", None, &[ada.id]).await;

    let at = |d, h, m| Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap();
    fx.store.backdate(early.id, at(9, 23, 59)).await;
    fx.store.backdate(edge.id, at(10, 0, 0)).await;
    fx.store.backdate(late.id, at(12, 23, 59)).await;

    let page = fx
        .posts
        .list(&filter(&[("from", "2024-03-10"), ("to", "2024-03-12")]))
        .await
        .unwrap();

    assert_eq!(titles(&page.data), ["Late", "Edge"]);
}

#[tokio::test]
async fn text_search_is_case_insensitive_over_title_and_summary() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    fx.post("Rust Ownership", None, &[ada.id]).await;
    fx.post("Borrowing", Some("more RUST notes"), &[ada.id]).await;
    fx.post("Gardening", Some("tomatoes"), &[ada.id]).await;

    let page = fx
        .posts
        .list(&filter(&[("q", "rust"), ("sort", "title"), ("order", "asc")]))
        .await
        .unwrap();

    assert_eq!(titles(&page.data), ["Borrowing", "Rust Ownership"]);
}

#[tokio::test]
async fn text_search_treats_percent_literally() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    fx.post("100% coverage", None, &[ada.id]).await;
    fx.post("Full coverage", None, &[ada.id]).await;

    let page = fx.posts.list(&filter(&[("q", "%")])).await.unwrap();

    assert_eq!(titles(&page.data), ["100% coverage"]);
}

#[tokio::test]
async fn title_sort_ascending_is_ordered() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    for title in ["Mango", "apple", "Banana", "Cherry"] {
        fx.post(title, None, &[ada.id]).await;
    }

    let page = fx
        .posts
        .list(&filter(&[("sort", "title"), ("order", "asc")]))
        .await
        .unwrap();

    let got = titles(&page.data);
    assert!(got.windows(2).all(|pair| pair[0] <= pair[1]), "{got:?}");
}

#[tokio::test]
async fn pages_partition_the_result_set() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    for n in 0..5 {
        fx.post(&format!("Post {n}"), None, &[ada.id]).await;
    }

    let first = fx
        .posts
        .list(&filter(&[("per_page", "2"), ("page", "1")]))
        .await
        .unwrap();
    let last = fx
        .posts
        .list(&filter(&[("per_page", "2"), ("page", "3")]))
        .await
        .unwrap();

    assert_eq!(first.data.len(), 2);
    assert_eq!(last.data.len(), 1);
    assert_eq!(first.pagination.total_pages, 3);
}

#[tokio::test]
async fn page_past_end_keeps_the_true_total() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    for n in 0..3 {
        fx.post(&format!("Post {n}"), None, &[ada.id]).await;
    }

    let page = fx.posts.list(&filter(&[("page", "9999")])).await.unwrap();

    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.page, 9999);
}

#[tokio::test]
async fn patch_changes_only_supplied_fields() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    let post = fx.post("Draft", Some("short"), &[ada.id]).await;
    let id = post.id.to_string();

    let updated = fx
        .posts
        .update(
            &id,
            PostPatch {
                title: Some(Some("Final".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.body, post.body);
    assert_eq!(updated.summary.as_deref(), Some("short"));
    assert_eq!(updated.published_at, post.published_at);

    let cleared = fx
        .posts
        .update(
            &id,
            PostPatch {
                summary: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.summary, None);
    assert_eq!(cleared.title, "Final");
}

#[tokio::test]
async fn patch_on_missing_post_is_not_found_before_validation() {
    let fx = fixture();

    let err = fx.posts.update("42", PostPatch::default()).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound { id: 42, .. }));
}

#[tokio::test]
async fn delete_removes_post_and_links_without_reusing_ids() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    let first = fx.post("First", None, &[ada.id]).await;
    let id = first.id.to_string();

    fx.posts.delete(&id).await.unwrap();

    assert!(matches!(
        fx.posts.get(&id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        fx.posts.delete(&id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert_eq!(fx.store.counts().await, (0, 0));

    let second = fx.post("Second", None, &[ada.id]).await;
    assert!(second.id > first.id);
}

#[tokio::test]
async fn author_posts_and_duplicate_email() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    fx.post("Mine", None, &[ada.id]).await;

    let posts = fx.authors.posts(&ada.id.to_string()).await.unwrap();
    assert_eq!(titles(&posts), ["Mine"]);

    let err = fx
        .authors
        .create(AuthorDraft {
            name: Some("Impostor".into()),
            email: Some("ada@example.com".into()),
            password_hash: Some("hash".into()),
            bio: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(msg) if msg.contains("email")));
}

#[tokio::test]
async fn tags_link_posts_both_ways() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    let post = fx.post("Tagged", None, &[ada.id]).await;
    let rust = fx.store.add_tag("rust").await;
    let async_tag = fx.store.add_tag("async").await;
    fx.store.tag_post(post.id, rust.id).await.unwrap();
    fx.store.tag_post(post.id, async_tag.id).await.unwrap();

    let tags = fx.tags.tags_of_post(&post.id.to_string()).await.unwrap();
    let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["async", "rust"]);

    let posts = fx.tags.posts_with_tag(&rust.id.to_string()).await.unwrap();
    assert_eq!(titles(&posts), ["Tagged"]);

    assert!(fx.store.tag_post(post.id, 999).await.is_err());
    assert!(matches!(
        fx.tags.posts_with_tag("999").await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
}

#[tokio::test]
async fn removing_an_author_or_tag_drops_its_links() {
    let fx = fixture();
    let ada = fx.author("Ada").await;
    let grace = fx.author("Grace").await;
    let post = fx.post("Shared", None, &[ada.id, grace.id]).await;
    let tag = fx.store.add_tag("rust").await;
    fx.store.tag_post(post.id, tag.id).await.unwrap();

    BaseRepository::<Author, i64>::delete(fx.store.as_ref(), grace.id)
        .await
        .unwrap();
    BaseRepository::<Tag, i64>::delete(fx.store.as_ref(), tag.id)
        .await
        .unwrap();

    let post_id = post.id.to_string();
    let authors = fx.posts.authors(&post_id).await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].id, ada.id);
    assert!(fx.tags.tags_of_post(&post_id).await.unwrap().is_empty());

    let again = BaseRepository::<Tag, i64>::delete(fx.store.as_ref(), tag.id).await;
    assert!(matches!(again, Err(RepoError::NotFound)));
}
