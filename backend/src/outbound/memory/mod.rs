//! In-process store implementing every driven persistence port.
//!
//! Backs database-less runs and HTTP tests. A single mutex guards all tables,
//! so each port call observes and commits one consistent state, including the
//! paired comment and counter writes.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    CommentCreation, CommentReader, CommentRepositoryError, CommentWriter, CredentialStore,
    CredentialStoreError, OwnedMutation, PostReader, PostRepositoryError, PostWriter,
};
use crate::domain::{
    Comment, CommentBody, CommentDraft, CommentId, EmailAddress, NewUserAccount, PageRequest,
    Post, PostDraft, PostId, UserAccount, UserId,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, UserAccount>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    next_user: i64,
    next_post: i64,
    next_comment: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl Tables {
    fn owned_post(&mut self, id: PostId, owner: UserId) -> OwnedMutation<&mut Post> {
        match self.posts.get_mut(&id.get()) {
            None => OwnedMutation::NotFound,
            Some(post) if post.owner != owner => OwnedMutation::NotAllowed,
            Some(post) => OwnedMutation::Applied(post),
        }
    }

    fn owned_comment(&self, id: CommentId, owner: UserId) -> OwnedMutation<PostId> {
        match self.comments.get(&id.get()) {
            None => OwnedMutation::NotFound,
            Some(comment) if comment.owner != owner => OwnedMutation::NotAllowed,
            Some(comment) => OwnedMutation::Applied(comment.post_id),
        }
    }
}

fn paged<'a>(posts: impl Iterator<Item = &'a Post>, page: PageRequest) -> Vec<Post> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    posts.skip(offset).take(limit).cloned().collect()
}

/// Mutex-guarded tables for users, posts and comments.
///
/// Ids are assigned sequentially from 1. Listings are newest first, which for
/// sequential ids is descending id order.
#[derive(Debug, Default)]
pub struct InMemoryBlogStore {
    tables: Mutex<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(
        &self,
        poisoned: impl FnOnce(&'static str) -> E,
    ) -> Result<MutexGuard<'_, Tables>, E> {
        self.tables
            .lock()
            .map_err(|_| poisoned("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl CredentialStore for InMemoryBlogStore {
    async fn save(&self, account: &NewUserAccount) -> Result<UserId, CredentialStoreError> {
        let mut tables = self.lock(CredentialStoreError::query)?;
        if tables.users.values().any(|user| user.email == account.email) {
            return Err(CredentialStoreError::duplicate_email());
        }
        let id = UserId::new(next_id(&mut tables.next_user))
            .map_err(|err| CredentialStoreError::query(err.to_string()))?;
        tables.users.insert(
            id.get(),
            UserAccount {
                id,
                username: account.username.clone(),
                email: account.email.clone(),
                password_hash: account.password_hash.clone(),
            },
        );
        Ok(id)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, CredentialStoreError> {
        let tables = self.lock(CredentialStoreError::query)?;
        Ok(tables.users.values().find(|user| &user.email == email).cloned())
    }
}

#[async_trait]
impl PostReader for InMemoryBlogStore {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let tables = self.lock(PostRepositoryError::query)?;
        Ok(tables.posts.get(&id.get()).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Post>, PostRepositoryError> {
        let tables = self.lock(PostRepositoryError::query)?;
        Ok(paged(tables.posts.values().rev(), page))
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let tables = self.lock(PostRepositoryError::query)?;
        Ok(paged(
            tables.posts.values().rev().filter(|post| post.owner == owner),
            page,
        ))
    }
}

#[async_trait]
impl PostWriter for InMemoryBlogStore {
    async fn create(&self, owner: UserId, draft: &PostDraft) -> Result<Post, PostRepositoryError> {
        let mut tables = self.lock(PostRepositoryError::query)?;
        let id = PostId::new(next_id(&mut tables.next_post))
            .map_err(|err| PostRepositoryError::query(err.to_string()))?;
        let post = Post {
            id,
            title: draft.title().to_owned(),
            content: draft.content().to_owned(),
            owner,
            comment_count: 0,
        };
        tables.posts.insert(id.get(), post.clone());
        Ok(post)
    }

    async fn update_owned(
        &self,
        id: PostId,
        owner: UserId,
        draft: &PostDraft,
    ) -> Result<OwnedMutation<Post>, PostRepositoryError> {
        let mut tables = self.lock(PostRepositoryError::query)?;
        Ok(tables.owned_post(id, owner).map(|post| {
            post.title = draft.title().to_owned();
            post.content = draft.content().to_owned();
            post.clone()
        }))
    }

    async fn delete_owned(
        &self,
        id: PostId,
        owner: UserId,
    ) -> Result<OwnedMutation<()>, PostRepositoryError> {
        let mut tables = self.lock(PostRepositoryError::query)?;
        let outcome = tables.owned_post(id, owner).map(|_| ());
        if outcome == OwnedMutation::Applied(()) {
            tables.posts.remove(&id.get());
            tables.comments.retain(|_, comment| comment.post_id != id);
        }
        Ok(outcome)
    }
}

#[async_trait]
impl CommentReader for InMemoryBlogStore {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let tables = self.lock(CommentRepositoryError::query)?;
        Ok(tables.comments.get(&id.get()).cloned())
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let tables = self.lock(CommentRepositoryError::query)?;
        Ok(tables
            .comments
            .values()
            .rev()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let tables = self.lock(CommentRepositoryError::query)?;
        Ok(tables
            .comments
            .values()
            .rev()
            .filter(|comment| comment.owner == owner)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentWriter for InMemoryBlogStore {
    async fn create_counted(
        &self,
        owner: UserId,
        draft: &CommentDraft,
    ) -> Result<CommentCreation, CommentRepositoryError> {
        let mut guard = self.lock(CommentRepositoryError::query)?;
        let tables = &mut *guard;
        let Some(post) = tables.posts.get_mut(&draft.post_id.get()) else {
            return Ok(CommentCreation::MissingPost);
        };
        let id = CommentId::new(next_id(&mut tables.next_comment))
            .map_err(|err| CommentRepositoryError::query(err.to_string()))?;
        post.comment_count += 1;

        let comment = Comment {
            id,
            post_id: draft.post_id,
            owner,
            content: draft.body.as_ref().to_owned(),
        };
        tables.comments.insert(id.get(), comment.clone());
        Ok(CommentCreation::Created(comment))
    }

    async fn update_owned(
        &self,
        id: CommentId,
        owner: UserId,
        body: &CommentBody,
    ) -> Result<OwnedMutation<Comment>, CommentRepositoryError> {
        let mut tables = self.lock(CommentRepositoryError::query)?;
        let outcome = tables.owned_comment(id, owner);
        Ok(match outcome {
            OwnedMutation::Applied(_) => match tables.comments.get_mut(&id.get()) {
                Some(comment) => {
                    comment.content = body.as_ref().to_owned();
                    OwnedMutation::Applied(comment.clone())
                }
                None => OwnedMutation::NotFound,
            },
            OwnedMutation::NotFound => OwnedMutation::NotFound,
            OwnedMutation::NotAllowed => OwnedMutation::NotAllowed,
        })
    }

    async fn delete_counted(
        &self,
        id: CommentId,
        owner: UserId,
    ) -> Result<OwnedMutation<()>, CommentRepositoryError> {
        let mut tables = self.lock(CommentRepositoryError::query)?;
        let outcome = tables.owned_comment(id, owner);
        if let OwnedMutation::Applied(post_id) = outcome {
            tables.comments.remove(&id.get());
            if let Some(post) = tables.posts.get_mut(&post_id.get()) {
                post.comment_count = post.comment_count.saturating_sub(1);
            }
        }
        Ok(outcome.map(|_| ()))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
