//! Comment HTTP handlers.
//!
//! ```text
//! GET    /api/v1/posts/{id}/comments
//! GET    /api/v1/users/{id}/comments
//! GET    /api/v1/comments/{id}
//! POST   /api/v1/comments
//! PUT    /api/v1/comments/{id}
//! DELETE /api/v1/comments/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Comment, CommentBody, CommentDraft, CommentId, PostId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::IdResponse;
use crate::inbound::http::identity::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, comment_validation_error, post_validation_error, user_id_error,
};

/// New comment on an existing post.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[schema(example = 1)]
    pub post_id: i64,
    #[schema(example = "nice")]
    pub content: String,
}

/// Replacement text for a comment.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Comment representation returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub owner_id: i64,
    pub content: String,
}

impl From<Comment> for CommentResponse {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id.get(),
            post_id: value.post_id.get(),
            owner_id: value.owner.get(),
            content: value.content,
        }
    }
}

fn comment_id(raw: i64) -> ApiResult<CommentId> {
    CommentId::new(raw).map_err(comment_validation_error)
}

/// List the comments of a post, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = i64, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Comments", body = [CommentResponse]),
        (status = 404, description = "Post not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/posts/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    let post_id = PostId::new(path.into_inner()).map_err(post_validation_error)?;
    let comments = state.comments_query.list_for_post(post_id).await?;
    Ok(web::Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

/// List every comment one user has written, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/comments",
    params(("id" = i64, Path, description = "Author's user identifier")),
    responses(
        (status = 200, description = "Comments", body = [CommentResponse]),
        (status = 400, description = "Invalid user id", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listUserComments"
)]
#[get("/users/{id}/comments")]
pub async fn list_user_comments(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    let owner =
        UserId::new(path.into_inner()).map_err(|err| user_id_error(FieldName::new("id"), err))?;
    let comments = state.comments_query.list_by_owner(owner).await?;
    Ok(web::Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

/// Fetch one comment.
#[utoipa::path(
    get,
    path = "/api/v1/comments/{id}",
    params(("id" = i64, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment", body = CommentResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "getComment"
)]
#[get("/comments/{id}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CommentResponse>> {
    let id = comment_id(path.into_inner())?;
    let comment = state.comments_query.get(id).await?;
    Ok(web::Json(CommentResponse::from(comment)))
}

/// Comment on an existing post; the post's comment count goes up by one.
#[utoipa::path(
    post,
    path = "/api/v1/comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Post not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "createComment",
    security(("BearerToken" = []))
)]
#[post("/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateCommentRequest>,
) -> ApiResult<HttpResponse> {
    let CreateCommentRequest { post_id, content } = payload.into_inner();
    let draft = CommentDraft::new(post_id, &content).map_err(comment_validation_error)?;
    let comment = state.comments.create(user.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// Edit a comment the caller owns.
#[utoipa::path(
    put,
    path = "/api/v1/comments/{id}",
    params(("id" = i64, Path, description = "Comment identifier")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Owned by another user", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "updateComment",
    security(("BearerToken" = []))
)]
#[put("/comments/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<UpdateCommentRequest>,
) -> ApiResult<web::Json<CommentResponse>> {
    let id = comment_id(path.into_inner())?;
    let body = CommentBody::new(&payload.content).map_err(comment_validation_error)?;
    let comment = state.comments.update(user.user_id(), id, body).await?;
    Ok(web::Json(CommentResponse::from(comment)))
}

/// Delete a comment the caller owns; the post's comment count goes down by one.
#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    params(("id" = i64, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment deleted", body = IdResponse),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Owned by another user", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment",
    security(("BearerToken" = []))
)]
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<IdResponse>> {
    let id = comment_id(path.into_inner())?;
    state.comments.delete(user.user_id(), id).await?;
    Ok(web::Json(IdResponse { id: id.get() }))
}

#[cfg(test)]
#[path = "comments_tests.rs"]
mod tests;
