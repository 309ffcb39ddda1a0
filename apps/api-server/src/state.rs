//! Application state - shared across all handlers.

use std::sync::Arc;

use folio_core::ports::{AuthorRepository, PostRepository, TagRepository};
use folio_core::{AuthorService, PostService, TagService};
use folio_infra::InMemoryStore;
use folio_infra::database::DatabaseConfig;

#[cfg(feature = "postgres")]
use folio_infra::database::{
    DatabaseConnections, PostgresAuthorRepository, PostgresPostRepository, PostgresTagRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub authors: AuthorService,
    pub tags: TagService,
}

struct Repositories {
    posts: Arc<dyn PostRepository>,
    authors: Arc<dyn AuthorRepository>,
    tags: Arc<dyn TagRepository>,
}

impl Repositories {
    fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            posts: store.clone(),
            authors: store.clone(),
            tags: store,
        }
    }
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// no database is configured or reachable.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let repos = match db_config {
            Some(config) => match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let conn = Arc::new(connections.main);
                    Repositories {
                        posts: Arc::new(PostgresPostRepository::shared(conn.clone())),
                        authors: Arc::new(PostgresAuthorRepository::shared(conn.clone())),
                        tags: Arc::new(PostgresTagRepository::shared(conn)),
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Repositories::in_memory(Arc::new(InMemoryStore::new()))
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repositories::in_memory(Arc::new(InMemoryStore::new()))
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory store");
            Repositories::in_memory(Arc::new(InMemoryStore::new()))
        };

        tracing::info!("Application state initialized");
        Self::from_repositories(repos)
    }

    /// State backed by a caller-supplied in-memory store.
    #[cfg(test)]
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self::from_repositories(Repositories::in_memory(store))
    }

    fn from_repositories(repos: Repositories) -> Self {
        Self {
            posts: PostService::new(repos.posts.clone(), repos.authors.clone()),
            authors: AuthorService::new(repos.authors, repos.posts.clone()),
            tags: TagService::new(repos.tags, repos.posts),
        }
    }
}
