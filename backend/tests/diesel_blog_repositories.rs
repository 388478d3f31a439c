//! Diesel post and comment repositories against embedded PostgreSQL.
//!
//! Each test runs in its own database cloned from a migrated template, so
//! identifiers and counters start fresh.

mod support;

use blog_backend::domain::ports::{
    CommentCreation, CommentReader, CommentWriter, CredentialStore, OwnedMutation, PostReader,
    PostWriter,
};
use blog_backend::domain::{
    CommentBody, CommentDraft, EmailAddress, NewUserAccount, PageRequest, Post, PostDraft, PostId,
    UserId, Username,
};
use blog_backend::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselCredentialStore, DieselPostRepository, PoolConfig,
};
use futures_util::future::join_all;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

use support::{
    format_postgres_error, handle_cluster_setup_failure, provision_template_database,
    shared_cluster,
};

const CONCURRENT_COMMENTS: usize = 12;

struct TestContext {
    runtime: Runtime,
    database_url: String,
    posts: DieselPostRepository,
    comments: DieselCommentRepository,
    alice: UserId,
    bob: UserId,
    _database: TemporaryDatabase,
}

impl TestContext {
    fn post(&self, owner: UserId, title: &str) -> Post {
        let draft = PostDraft::new(title, "Some body text").expect("valid post draft");
        self.runtime
            .block_on(self.posts.create(owner, &draft))
            .expect("create post")
    }

    fn comment(&self, owner: UserId, post_id: PostId) -> CommentCreation {
        let draft = CommentDraft::new(post_id.get(), "nice one").expect("valid comment draft");
        self.runtime
            .block_on(self.comments.create_counted(owner, &draft))
            .expect("create comment")
    }

    fn comment_count(&self, post_id: PostId) -> u64 {
        self.runtime
            .block_on(self.posts.find_by_id(post_id))
            .expect("load post")
            .expect("post exists")
            .comment_count
    }

    fn comment_rows(&self, post_id: i64) -> i64 {
        count_comment_rows(self.database_url.as_str(), post_id).expect("count comment rows")
    }
}

fn count_comment_rows(url: &str, post_id: i64) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one(
            "SELECT COUNT(*) FROM comments WHERE post_id = $1",
            &[&post_id],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

async fn seed_user(store: &DieselCredentialStore, name: &str) -> Result<UserId, String> {
    let account = NewUserAccount {
        username: Username::new(name).map_err(|err| err.to_string())?,
        email: EmailAddress::new(format!("{name}@example.com")).map_err(|err| err.to_string())?,
        password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_owned(),
    };
    store.save(&account).await.map_err(|err| err.to_string())
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_template_database(cluster)?;
    let database_url = database.url().to_owned();

    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(4)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    let users = DieselCredentialStore::new(pool.clone());
    let (alice, bob) = runtime.block_on(async {
        Ok::<_, String>((seed_user(&users, "alice").await?, seed_user(&users, "bob").await?))
    })?;

    Ok(TestContext {
        runtime,
        database_url,
        posts: DieselPostRepository::new(pool.clone()),
        comments: DieselCommentRepository::new(pool),
        alice,
        bob,
        _database: database,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn comment_count_follows_create_and_delete(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: comment_count_follows_create_and_delete skipped");
        return;
    };

    let post = ctx.post(ctx.alice, "Counted");
    assert_eq!(post.comment_count, 0);

    let CommentCreation::Created(first) = ctx.comment(ctx.bob, post.id) else {
        panic!("expected the comment to be created");
    };
    ctx.comment(ctx.alice, post.id);
    assert_eq!(ctx.comment_count(post.id), 2);

    let removed = ctx
        .runtime
        .block_on(ctx.comments.delete_counted(first.id, ctx.bob))
        .expect("delete comment");
    assert_eq!(removed, OwnedMutation::Applied(()));
    assert_eq!(ctx.comment_count(post.id), 1);
    assert_eq!(ctx.comment_rows(post.id.get()), 1);
}

#[rstest]
fn scoped_misses_distinguish_absent_from_foreign(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: scoped_misses_distinguish_absent_from_foreign skipped");
        return;
    };

    let post = ctx.post(ctx.alice, "Owned");
    let draft = PostDraft::new("Hijacked", "Not yours").expect("valid post draft");
    let absent = PostId::new(post.id.get() + 100).expect("positive id");

    let foreign = ctx
        .runtime
        .block_on(ctx.posts.update_owned(post.id, ctx.bob, &draft))
        .expect("update post");
    assert_eq!(foreign, OwnedMutation::NotAllowed);
    let missing = ctx
        .runtime
        .block_on(ctx.posts.delete_owned(absent, ctx.alice))
        .expect("delete post");
    assert_eq!(missing, OwnedMutation::NotFound);

    let CommentCreation::Created(comment) = ctx.comment(ctx.alice, post.id) else {
        panic!("expected the comment to be created");
    };
    let body = CommentBody::new("rewritten").expect("valid body");
    let foreign = ctx
        .runtime
        .block_on(ctx.comments.update_owned(comment.id, ctx.bob, &body))
        .expect("update comment");
    assert_eq!(foreign, OwnedMutation::NotAllowed);
    let foreign_delete = ctx
        .runtime
        .block_on(ctx.comments.delete_counted(comment.id, ctx.bob))
        .expect("delete comment");
    assert_eq!(foreign_delete, OwnedMutation::NotAllowed);
    assert_eq!(ctx.comment_count(post.id), 1);

    let unchanged = ctx
        .runtime
        .block_on(ctx.posts.find_by_id(post.id))
        .expect("load post")
        .expect("post exists");
    assert_eq!(unchanged.title, "Owned");
}

#[rstest]
fn comment_on_missing_post_writes_nothing(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: comment_on_missing_post_writes_nothing skipped");
        return;
    };

    let absent = PostId::new(4242).expect("positive id");
    assert_eq!(ctx.comment(ctx.alice, absent), CommentCreation::MissingPost);
    assert_eq!(ctx.comment_rows(absent.get()), 0);
}

#[rstest]
fn deleting_a_post_removes_its_comments(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: deleting_a_post_removes_its_comments skipped");
        return;
    };

    let post = ctx.post(ctx.alice, "Short lived");
    ctx.comment(ctx.alice, post.id);
    ctx.comment(ctx.bob, post.id);
    assert_eq!(ctx.comment_rows(post.id.get()), 2);

    let deleted = ctx
        .runtime
        .block_on(ctx.posts.delete_owned(post.id, ctx.alice))
        .expect("delete post");
    assert_eq!(deleted, OwnedMutation::Applied(()));
    assert_eq!(ctx.comment_rows(post.id.get()), 0);
    let bobs = ctx
        .runtime
        .block_on(ctx.comments.list_by_owner(ctx.bob))
        .expect("list comments");
    assert!(bobs.is_empty());
}

#[rstest]
fn concurrent_comments_keep_the_counter_exact(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_comments_keep_the_counter_exact skipped");
        return;
    };

    let post = ctx.post(ctx.alice, "Busy thread");
    let draft = CommentDraft::new(post.id.get(), "me too").expect("valid comment draft");
    let outcomes = ctx.runtime.block_on(async {
        let tasks = (0..CONCURRENT_COMMENTS).map(|n| {
            let comments = ctx.comments.clone();
            let draft = draft.clone();
            let owner = if n % 2 == 0 { ctx.alice } else { ctx.bob };
            tokio::spawn(async move { comments.create_counted(owner, &draft).await })
        });
        join_all(tasks).await
    });

    for outcome in outcomes {
        let creation = outcome.expect("task joined").expect("create comment");
        assert!(matches!(creation, CommentCreation::Created(_)));
    }
    let expected = u64::try_from(CONCURRENT_COMMENTS).expect("small count");
    assert_eq!(ctx.comment_count(post.id), expected);
    let rows = i64::try_from(CONCURRENT_COMMENTS).expect("small count");
    assert_eq!(ctx.comment_rows(post.id.get()), rows);
}

#[rstest]
fn owner_listings_are_scoped_and_newest_first(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: owner_listings_are_scoped_and_newest_first skipped");
        return;
    };

    let older = ctx.post(ctx.alice, "Older");
    let bobs_post = ctx.post(ctx.bob, "Bob writes");
    let newer = ctx.post(ctx.alice, "Newer");
    ctx.comment(ctx.bob, older.id);
    ctx.comment(ctx.alice, bobs_post.id);

    let page = PageRequest::new(None, None).expect("default page");
    let alices = ctx
        .runtime
        .block_on(ctx.posts.list_by_owner(ctx.alice, page))
        .expect("list posts");
    let ids: Vec<_> = alices.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    let bobs = ctx
        .runtime
        .block_on(ctx.comments.list_by_owner(ctx.bob))
        .expect("list comments");
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs.first().map(|comment| comment.post_id), Some(older.id));
}
