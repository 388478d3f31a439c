//! Route table for the `/api/v1` scope.

use actix_web::web;

use crate::inbound::http::auth::{login, register};
use crate::inbound::http::comments::{
    create_comment, delete_comment, get_comment, list_comments, list_user_comments,
    update_comment,
};
use crate::inbound::http::posts::{create_post, delete_post, get_post, list_posts, update_post};
use crate::inbound::http::validation::{FieldName, malformed_input_error};

/// Register every blog endpoint and the extractor configs that turn body,
/// query and path parse failures into `400 invalid_request` payloads.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use blog_backend::inbound::http::routes::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        malformed_input_error(FieldName::new("body"), err).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        malformed_input_error(FieldName::new("query"), err).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        malformed_input_error(FieldName::new("id"), err).into()
    }))
    .service(register)
    .service(login)
    .service(list_posts)
    .service(create_post)
    .service(get_post)
    .service(update_post)
    .service(delete_post)
    .service(list_comments)
    .service(list_user_comments)
    .service(create_comment)
    .service(get_comment)
    .service(update_comment)
    .service(delete_comment);
}
