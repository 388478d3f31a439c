//! Tests for the post service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockPostReader, MockPostWriter, OwnedMutation};

fn user(id: i64) -> UserId {
    UserId::new(id).expect("valid user id")
}

fn post_id(id: i64) -> PostId {
    PostId::new(id).expect("valid post id")
}

fn draft() -> PostDraft {
    PostDraft::new("Hello there", "First post body").expect("valid draft")
}

fn stored_post(id: i64, owner: i64) -> Post {
    Post {
        id: post_id(id),
        title: "Hello there".to_owned(),
        content: "First post body".to_owned(),
        owner: user(owner),
        comment_count: 0,
    }
}

fn service(reader: MockPostReader, writer: MockPostWriter) -> PostService<MockPostReader, MockPostWriter> {
    PostService::new(Arc::new(reader), Arc::new(writer))
}

#[tokio::test]
async fn create_records_caller_as_owner() {
    let mut writer = MockPostWriter::new();
    writer
        .expect_create()
        .withf(|owner, draft| owner.get() == 3 && draft.title() == "Hello there")
        .times(1)
        .return_once(|_, _| Ok(stored_post(1, 3)));

    let post = service(MockPostReader::new(), writer)
        .create(user(3), draft())
        .await
        .expect("create succeeds");

    assert_eq!(post.owner, user(3));
    assert_eq!(post.comment_count, 0);
}

#[tokio::test]
async fn update_returns_stored_post_for_owner() {
    let mut writer = MockPostWriter::new();
    writer
        .expect_update_owned()
        .withf(|id, owner, _| id.get() == 1 && owner.get() == 3)
        .return_once(|_, _, _| Ok(OwnedMutation::Applied(stored_post(1, 3))));

    let post = service(MockPostReader::new(), writer)
        .update(user(3), post_id(1), draft())
        .await
        .expect("update succeeds");

    assert_eq!(post.id, post_id(1));
}

#[rstest]
#[case(OwnedMutation::NotFound, ErrorCode::NotFound)]
#[case(OwnedMutation::NotAllowed, ErrorCode::Forbidden)]
#[tokio::test]
async fn update_rejections_map_to_error_codes(
    #[case] outcome: OwnedMutation<Post>,
    #[case] expected: ErrorCode,
) {
    let mut writer = MockPostWriter::new();
    writer
        .expect_update_owned()
        .return_once(move |_, _, _| Ok(outcome));

    let err = service(MockPostReader::new(), writer)
        .update(user(4), post_id(1), draft())
        .await
        .expect_err("update rejected");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[case(OwnedMutation::Applied(()), None)]
#[case(OwnedMutation::NotFound, Some(ErrorCode::NotFound))]
#[case(OwnedMutation::NotAllowed, Some(ErrorCode::Forbidden))]
#[tokio::test]
async fn delete_outcomes(#[case] outcome: OwnedMutation<()>, #[case] expected: Option<ErrorCode>) {
    let mut writer = MockPostWriter::new();
    writer
        .expect_delete_owned()
        .with(eq(post_id(9)), eq(user(3)))
        .return_once(move |_, _| Ok(outcome));

    let result = service(MockPostReader::new(), writer)
        .delete(user(3), post_id(9))
        .await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[tokio::test]
async fn get_missing_post_is_not_found() {
    let mut reader = MockPostReader::new();
    reader.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(reader, MockPostWriter::new())
        .get(post_id(5))
        .await
        .expect_err("missing post");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "post 5 not found");
}

#[tokio::test]
async fn list_passes_page_through() {
    let page = PageRequest::new(Some(2), Some(4)).expect("valid page");
    let mut reader = MockPostReader::new();
    reader
        .expect_list()
        .with(eq(page))
        .return_once(|_| Ok(vec![stored_post(2, 1), stored_post(1, 1)]));

    let posts = service(reader, MockPostWriter::new())
        .list(page)
        .await
        .expect("list succeeds");

    assert_eq!(posts.len(), 2);
}

#[tokio::test]
async fn list_by_owner_scopes_to_author() {
    let page = PageRequest::default();
    let mut reader = MockPostReader::new();
    reader
        .expect_list_by_owner()
        .with(eq(user(7)), eq(page))
        .times(1)
        .return_once(|_, _| Ok(vec![stored_post(3, 7)]));
    reader.expect_list().never();

    let posts = service(reader, MockPostWriter::new())
        .list_by_owner(user(7), page)
        .await
        .expect("list succeeds");

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].owner, user(7));
}

#[rstest]
#[case(PostRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(PostRepositoryError::query("broken"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_are_mapped(
    #[case] failure: PostRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut reader = MockPostReader::new();
    reader.expect_find_by_id().return_once(move |_| Err(failure));

    let err = service(reader, MockPostWriter::new())
        .get(post_id(1))
        .await
        .expect_err("repository failure");

    assert_eq!(err.code(), expected);
}
