//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, CommentCommand, CommentQuery, CommentReader, CommentWriter, CredentialStore,
    PasswordHasher, PostCommand, PostQuery, PostReader, PostWriter, SessionTokens,
};
use crate::domain::{AccountService, CommentService, PostService};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
    pub comments: Arc<dyn CommentCommand>,
    pub comments_query: Arc<dyn CommentQuery>,
    pub tokens: Arc<dyn SessionTokens>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
    pub comments: Arc<dyn CommentCommand>,
    pub comments_query: Arc<dyn CommentQuery>,
    /// Validates bearer tokens for the identity extractor.
    pub tokens: Arc<dyn SessionTokens>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            posts,
            posts_query,
            comments,
            comments_query,
            tokens,
        } = ports;
        Self {
            accounts,
            posts,
            posts_query,
            comments,
            comments_query,
            tokens,
        }
    }

    /// Wire the blog services over a single store implementing every driven
    /// port, such as the in-memory adapter.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use chrono::TimeDelta;
    /// use blog_backend::inbound::http::state::HttpState;
    /// use blog_backend::outbound::memory::InMemoryBlogStore;
    /// use blog_backend::outbound::security::{Argon2PasswordHasher, JwtSessionTokens};
    ///
    /// let tokens = JwtSessionTokens::new(
    ///     b"0123456789abcdef0123456789abcdef",
    ///     TimeDelta::hours(1),
    ///     Arc::new(mockable::DefaultClock),
    /// );
    /// let state = HttpState::from_store(
    ///     Arc::new(InMemoryBlogStore::new()),
    ///     Arc::new(Argon2PasswordHasher::new()),
    ///     Arc::new(tokens),
    /// );
    /// let _posts = state.posts_query.clone();
    /// ```
    pub fn from_store<S>(
        store: Arc<S>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn SessionTokens>,
    ) -> Self
    where
        S: CredentialStore + PostReader + PostWriter + CommentReader + CommentWriter + 'static,
    {
        let accounts = Arc::new(AccountService::new(
            Arc::clone(&store),
            hasher,
            Arc::clone(&tokens),
        ));
        let posts = Arc::new(PostService::new(Arc::clone(&store), Arc::clone(&store)));
        let comments = Arc::new(CommentService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            store,
        ));
        Self::new(HttpStatePorts {
            accounts,
            posts: posts.clone(),
            posts_query: posts,
            comments: comments.clone(),
            comments_query: comments,
            tokens,
        })
    }
}
