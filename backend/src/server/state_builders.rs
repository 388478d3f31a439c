//! Builders for HTTP state over the configured storage backend.

use std::sync::Arc;

use tracing::warn;

use blog_backend::domain::{AccountService, CommentService, PostService};
use blog_backend::inbound::http::state::{HttpState, HttpStatePorts};
use blog_backend::outbound::memory::InMemoryBlogStore;
use blog_backend::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselCredentialStore, DieselPostRepository,
};
use blog_backend::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

fn diesel_state(pool: &DbPool, config: &ServerConfig) -> HttpState {
    let credentials = Arc::new(DieselCredentialStore::new(pool.clone()));
    let posts_repo = Arc::new(DieselPostRepository::new(pool.clone()));
    let comments_repo = Arc::new(DieselCommentRepository::new(pool.clone()));

    let accounts = Arc::new(AccountService::new(
        credentials,
        Arc::new(Argon2PasswordHasher::new()),
        Arc::clone(&config.tokens),
    ));
    let posts = Arc::new(PostService::new(
        Arc::clone(&posts_repo),
        Arc::clone(&posts_repo),
    ));
    let comments = Arc::new(CommentService::new(
        posts_repo,
        Arc::clone(&comments_repo),
        comments_repo,
    ));

    HttpState::new(HttpStatePorts {
        accounts,
        posts: posts.clone(),
        posts_query: posts,
        comments: comments.clone(),
        comments_query: comments,
        tokens: Arc::clone(&config.tokens),
    })
}

/// Build HTTP state backed by PostgreSQL when a pool is configured, otherwise
/// by a process-local in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => diesel_state(pool, config),
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            HttpState::from_store(
                Arc::new(InMemoryBlogStore::new()),
                Arc::new(Argon2PasswordHasher::new()),
                Arc::clone(&config.tokens),
            )
        }
    }
}
