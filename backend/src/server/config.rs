//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use blog_backend::domain::ports::SessionTokens;
use blog_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: Arc<dyn SessionTokens>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration with the token signer every state
    /// needs; storage defaults to in-memory.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: Arc<dyn SessionTokens>) -> Self {
        Self {
            bind_addr,
            tokens,
            db_pool: None,
        }
    }

    /// Attach a database connection pool so the Diesel adapters back the
    /// services instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
