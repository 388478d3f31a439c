//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters.
//! Driven ports (stores, hasher, token signer) are implemented by outbound
//! adapters and injected into the services.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod comment_command;
mod comment_repository;
mod credential_store;
mod owned_mutation;
mod password_hasher;
mod post_command;
mod post_repository;
mod session_tokens;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use comment_command::{MockCommentCommand, MockCommentQuery};
pub use comment_command::{CommentCommand, CommentQuery};
#[cfg(test)]
pub use comment_repository::{MockCommentReader, MockCommentWriter};
pub use comment_repository::{
    CommentCreation, CommentReader, CommentRepositoryError, CommentWriter,
};
#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{CredentialStore, CredentialStoreError};
pub use owned_mutation::OwnedMutation;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_command::{MockPostCommand, MockPostQuery};
pub use post_command::{PostCommand, PostQuery};
#[cfg(test)]
pub use post_repository::{MockPostReader, MockPostWriter};
pub use post_repository::{PostReader, PostRepositoryError, PostWriter};
#[cfg(test)]
pub use session_tokens::MockSessionTokens;
pub use session_tokens::{SessionTokens, TokenIssueError};
