//! PostgreSQL-backed post reader and writer.
//!
//! Owner-scoped mutations run inside a transaction: the scoped statement
//! first, then on a miss an unscoped existence read to tell a missing post
//! from a foreign one.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{OwnedMutation, PostReader, PostRepositoryError, PostWriter};
use crate::domain::{PageRequest, Post, PostDraft, PostId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPostRow, PostChanges, PostRow};
use super::pool::DbPool;
use super::schema::{comments, posts};

/// Diesel-backed implementation of [`PostReader`] and [`PostWriter`].
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, AsyncPgConnection>, PostRepositoryError> {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, PostRepositoryError::connection))
    }

    async fn load_page(
        &self,
        owner: Option<i64>,
        page: PageRequest,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let offset = i64::try_from(page.offset())
            .map_err(|_| PostRepositoryError::query("page offset out of range"))?;
        let mut query = posts::table.select(PostRow::as_select()).into_boxed();
        if let Some(owner) = owner {
            query = query.filter(posts::user_id.eq(owner));
        }
        let mut conn = self.connection().await?;
        let rows: Vec<PostRow> = query
            .order((posts::created_at.desc(), posts::id.desc()))
            .limit(i64::from(page.limit()))
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(row_to_post).collect()
    }
}

fn map_error(error: diesel::result::Error) -> PostRepositoryError {
    map_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

fn row_to_post(row: PostRow) -> Result<Post, PostRepositoryError> {
    let corrupt = |what: &str| {
        PostRepositoryError::query(format!("stored post {} has invalid {what}", row.id))
    };
    Ok(Post {
        id: PostId::new(row.id).map_err(|_| corrupt("id"))?,
        owner: UserId::new(row.user_id).map_err(|_| corrupt("owner"))?,
        comment_count: u64::try_from(row.comments_count).map_err(|_| corrupt("comment count"))?,
        title: row.title,
        content: row.content,
    })
}

fn resolve<T, R>(
    outcome: OwnedMutation<R>,
    convert: impl FnOnce(R) -> Result<T, PostRepositoryError>,
) -> Result<OwnedMutation<T>, PostRepositoryError> {
    match outcome {
        OwnedMutation::Applied(row) => convert(row).map(OwnedMutation::Applied),
        OwnedMutation::NotFound => Ok(OwnedMutation::NotFound),
        OwnedMutation::NotAllowed => Ok(OwnedMutation::NotAllowed),
    }
}

/// Classify a scoped miss by checking whether the post exists at all.
async fn classify_miss<T>(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<OwnedMutation<T>, diesel::result::Error> {
    let exists = posts::table
        .filter(posts::id.eq(id))
        .select(posts::id)
        .first::<i64>(conn)
        .await
        .optional()?;
    Ok(match exists {
        Some(_) => OwnedMutation::NotAllowed,
        None => OwnedMutation::NotFound,
    })
}

#[async_trait]
impl PostReader for DieselPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.connection().await?;
        let row = posts::table
            .filter(posts::id.eq(id.get()))
            .select(PostRow::as_select())
            .first::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_post).transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Post>, PostRepositoryError> {
        self.load_page(None, page).await
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        self.load_page(Some(owner.get()), page).await
    }
}

#[async_trait]
impl PostWriter for DieselPostRepository {
    async fn create(&self, owner: UserId, draft: &PostDraft) -> Result<Post, PostRepositoryError> {
        let mut conn = self.connection().await?;
        let row = NewPostRow {
            user_id: owner.get(),
            title: draft.title(),
            content: draft.content(),
        };
        let stored: PostRow = diesel::insert_into(posts::table)
            .values(&row)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;
        row_to_post(stored)
    }

    async fn update_owned(
        &self,
        id: PostId,
        owner: UserId,
        draft: &PostDraft,
    ) -> Result<OwnedMutation<Post>, PostRepositoryError> {
        let mut conn = self.connection().await?;
        let changes = PostChanges {
            title: draft.title(),
            content: draft.content(),
            updated_at: Utc::now(),
        };
        let (id, owner) = (id.get(), owner.get());

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let updated = diesel::update(
                        posts::table.filter(posts::id.eq(id).and(posts::user_id.eq(owner))),
                    )
                    .set(&changes)
                    .returning(PostRow::as_returning())
                    .get_result::<PostRow>(conn)
                    .await
                    .optional()?;
                    match updated {
                        Some(row) => Ok(OwnedMutation::Applied(row)),
                        None => classify_miss(conn, id).await,
                    }
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;

        resolve(outcome, row_to_post)
    }

    async fn delete_owned(
        &self,
        id: PostId,
        owner: UserId,
    ) -> Result<OwnedMutation<()>, PostRepositoryError> {
        let mut conn = self.connection().await?;
        let (id, owner) = (id.get(), owner.get());

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let stored_owner = posts::table
                        .filter(posts::id.eq(id))
                        .select(posts::user_id)
                        .for_update()
                        .first::<i64>(conn)
                        .await
                        .optional()?;
                    match stored_owner {
                        None => return Ok(OwnedMutation::NotFound),
                        Some(stored) if stored != owner => return Ok(OwnedMutation::NotAllowed),
                        Some(_) => {}
                    }

                    let removed_comments =
                        diesel::delete(comments::table.filter(comments::post_id.eq(id)))
                            .execute(conn)
                            .await?;
                    diesel::delete(posts::table.filter(posts::id.eq(id)))
                        .execute(conn)
                        .await?;
                    debug!(post_id = id, removed_comments, "post and comments deleted");
                    Ok(OwnedMutation::Applied(()))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;

        Ok(outcome)
    }
}
