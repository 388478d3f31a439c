//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every handler's `#[utoipa::path]` annotation, the
//! request/response bodies, the domain error wrappers from
//! [`crate::inbound::http::schemas`], and the bearer token security scheme.
//! Swagger UI serves it in debug builds and `openapi-dump` prints it.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::{LoginRequest, RegisterRequest, TokenResponse};
use crate::inbound::http::comments::{
    CommentResponse, CreateCommentRequest, UpdateCommentRequest,
};
use crate::inbound::http::dto::IdResponse;
use crate::inbound::http::posts::{PostRequest, PostResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Name of the bearer scheme referenced by `security(...)` on handlers.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Register the HS256 bearer token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog backend API",
        description = "Accounts, posts and comments with owner-only mutation."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::list_user_comments,
        crate::inbound::http::comments::get_comment,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        IdResponse,
        RegisterRequest,
        LoginRequest,
        TokenResponse,
        PostRequest,
        PostResponse,
        CreateCommentRequest,
        UpdateCommentRequest,
        CommentResponse,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "posts", description = "Blog posts"),
        (name = "comments", description = "Comments on posts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn post_response_uses_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let post = schemas.get("PostResponse").expect("PostResponse schema");

        assert_object_schema_has_field(post, "ownerId");
        assert_object_schema_has_field(post, "commentCount");
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }

    #[test]
    fn every_blog_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/auth/register",
            "/api/v1/auth/login",
            "/api/v1/posts",
            "/api/v1/posts/{id}",
            "/api/v1/posts/{id}/comments",
            "/api/v1/comments",
            "/api/v1/comments/{id}",
            "/api/v1/users/{id}/comments",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn post_listing_documents_owner_filter() {
        let doc = ApiDoc::openapi();
        let listing = doc
            .paths
            .paths
            .get("/api/v1/posts")
            .and_then(|item| item.get.as_ref())
            .expect("GET /api/v1/posts");
        let names: Vec<&str> = listing
            .parameters
            .iter()
            .flatten()
            .map(|param| param.name.as_str())
            .collect();
        assert!(names.contains(&"ownerId"), "parameters: {names:?}");
    }
}
