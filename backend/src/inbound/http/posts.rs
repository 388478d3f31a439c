//! Post HTTP handlers.
//!
//! ```text
//! GET    /api/v1/posts?limit=&offset=&ownerId=
//! GET    /api/v1/posts/{id}
//! POST   /api/v1/posts
//! PUT    /api/v1/posts/{id}
//! DELETE /api/v1/posts/{id}
//! ```
//!
//! Reads are anonymous. Writes take an [`AuthenticatedUser`]; ownership is
//! enforced by the post service, not here.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{PageRequest, Post, PostDraft, PostId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::IdResponse;
use crate::inbound::http::identity::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, post_validation_error, user_id_error};

/// Title and body for a new or edited post.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[schema(example = "Hello there")]
    pub title: String,
    #[schema(example = "First post body")]
    pub content: String,
}

/// Post representation returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub owner_id: i64,
    pub comment_count: u64,
}

impl From<Post> for PostResponse {
    fn from(value: Post) -> Self {
        Self {
            id: value.id.get(),
            title: value.title,
            content: value.content,
            owner_id: value.owner.get(),
            comment_count: value.comment_count,
        }
    }
}

/// Paging window and optional author filter for the post listing.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListPostsQuery {
    /// Page size, 1 to 100; defaults to 20.
    pub limit: Option<u32>,
    /// Number of posts to skip; defaults to 0.
    pub offset: Option<u64>,
    /// Only list posts written by this user.
    pub owner_id: Option<i64>,
}

fn post_id(raw: i64) -> ApiResult<PostId> {
    PostId::new(raw).map_err(post_validation_error)
}

fn post_draft(payload: PostRequest) -> ApiResult<PostDraft> {
    PostDraft::new(&payload.title, &payload.content).map_err(post_validation_error)
}

/// List posts newest first, optionally only those by one author.
///
/// An author without posts, known or not, yields an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Posts", body = [PostResponse]),
        (status = 400, description = "Invalid paging", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    query: web::Query<ListPostsQuery>,
) -> ApiResult<web::Json<Vec<PostResponse>>> {
    let ListPostsQuery {
        limit,
        offset,
        owner_id,
    } = query.into_inner();
    let page = PageRequest::new(limit, offset).map_err(post_validation_error)?;

    let posts = match owner_id {
        Some(raw) => {
            let owner =
                UserId::new(raw).map_err(|err| user_id_error(FieldName::new("ownerId"), err))?;
            state.posts_query.list_by_owner(owner, page).await?
        }
        None => state.posts_query.list(page).await?,
    };
    Ok(web::Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Fetch one post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = post_id(path.into_inner())?;
    let post = state.posts_query.get(id).await?;
    Ok(web::Json(PostResponse::from(post)))
}

/// Publish a post owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost",
    security(("BearerToken" = []))
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let draft = post_draft(payload.into_inner())?;
    let post = state.posts.create(user.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// Edit a post the caller owns.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post identifier")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Owned by another user", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "updatePost",
    security(("BearerToken" = []))
)]
#[put("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<PostRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = post_id(path.into_inner())?;
    let draft = post_draft(payload.into_inner())?;
    let post = state.posts.update(user.user_id(), id, draft).await?;
    Ok(web::Json(PostResponse::from(post)))
}

/// Delete a post the caller owns, together with its comments.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post deleted", body = IdResponse),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Owned by another user", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deletePost",
    security(("BearerToken" = []))
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<IdResponse>> {
    let id = post_id(path.into_inner())?;
    state.posts.delete(user.user_id(), id).await?;
    Ok(web::Json(IdResponse { id: id.get() }))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
