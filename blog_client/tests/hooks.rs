use blog_backend::api::{self, AppState};
use blog_backend::auth::{SessionService, UserProfile};
use blog_backend::bootstrap;
use blog_backend::config::{BlogConfig, BlogPaths};
use blog_client::models::{CreateCommentInput, CreatePostInput, UpdateBlogInfoInput};
use blog_client::{BlogClient, ClientError, QueryKey};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tokio::runtime::Runtime;

struct Harness {
    _dir: TempDir,
    _runtime: Runtime,
    base_url: String,
    token: String,
}

impl Harness {
    fn start() -> Self {
        let dir = tempdir().expect("tempdir");
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("runtime");

        let (base_url, token) = runtime.block_on(async {
            let paths = BlogPaths::from_base_dir(dir.path()).expect("paths");
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind");
            let port = listener.local_addr().expect("addr").port();
            let mut config = BlogConfig::new(port, paths);
            config.seed = false;

            let resources = bootstrap::initialize(&config).await.expect("bootstrap");
            let token = SessionService::new(resources.database.clone(), &config.session)
                .sign_in(UserProfile {
                    id: Some("author".into()),
                    first_name: Some("Ada".into()),
                    ..Default::default()
                })
                .expect("sign in")
                .token;

            let state = AppState::new(config, resources.database);
            tokio::spawn(async move {
                let _ = api::serve_with_listener(listener, state).await;
            });
            (format!("http://127.0.0.1:{port}"), token)
        });

        wait_for_health(&base_url);
        Self {
            _dir: dir,
            _runtime: runtime,
            base_url,
            token,
        }
    }

    fn anonymous(&self) -> BlogClient {
        BlogClient::new(self.base_url.clone()).expect("client")
    }

    fn author(&self) -> BlogClient {
        self.anonymous().with_token(self.token.clone())
    }
}

fn wait_for_health(base_url: &str) {
    let client = reqwest::blocking::Client::new();
    for _ in 0..50 {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send() {
            if resp.status().is_success() {
                return;
            }
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    panic!("server did not become healthy in time");
}

fn new_post(title: &str) -> CreatePostInput {
    CreatePostInput {
        title: title.into(),
        content: format!("{title} body"),
        image_url: None,
    }
}

#[test]
fn post_list_is_cached_until_a_post_is_created() {
    let harness = Harness::start();
    let client = harness.author();

    assert!(client.posts().expect("posts").is_empty());
    assert!(client.cache().contains(&QueryKey::PostList));

    // Written behind the client's back, so the cached list stays stale.
    harness.author().create_post(&new_post("Elsewhere")).expect("create");
    assert!(client.posts().expect("cached posts").is_empty());

    let created = client.create_post(&new_post("Mine")).expect("create");
    assert!(!client.cache().contains(&QueryKey::PostList));
    let titles: Vec<_> = client
        .posts()
        .expect("posts")
        .into_iter()
        .map(|post| post.title)
        .collect();
    assert_eq!(titles, vec!["Mine".to_string(), "Elsewhere".to_string()]);
    assert_eq!(created.likes, 0);
}

#[test]
fn liking_refreshes_the_list_and_the_post() {
    let harness = Harness::start();
    let client = harness.author();
    let post = client.create_post(&new_post("Likeable")).expect("create");

    client.posts().expect("posts");
    client.post(post.id).expect("post").expect("exists");
    assert!(client.cache().contains(&QueryKey::Post(post.id)));

    let liked = client.like_post(post.id).expect("like");
    assert_eq!(liked.likes, 1);
    assert!(!client.cache().contains(&QueryKey::PostList));
    assert!(!client.cache().contains(&QueryKey::Post(post.id)));

    let fresh = client.post(post.id).expect("post").expect("exists");
    assert_eq!(fresh.likes, 1);
    assert!(client.post(9_999).expect("missing post").is_none());
}

#[test]
fn comment_mutations_invalidate_only_their_post() {
    let harness = Harness::start();
    let client = harness.author();
    let first = client.create_post(&new_post("First")).expect("first");
    let second = client.create_post(&new_post("Second")).expect("second");

    client.comments(first.id).expect("comments");
    client.comments(second.id).expect("comments");

    let comment = client
        .create_comment(
            first.id,
            &CreateCommentInput {
                author_name: "Grace".into(),
                content: "Nice post".into(),
            },
        )
        .expect("comment");
    assert!(!client.cache().contains(&QueryKey::Comments(first.id)));
    assert!(client.cache().contains(&QueryKey::Comments(second.id)));

    let comments = client.comments(first.id).expect("comments");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author_name, "Grace");

    client.delete_comment(comment.id, first.id).expect("delete");
    assert!(client.comments(first.id).expect("comments").is_empty());
}

#[test]
fn anonymous_writes_are_rejected() {
    let harness = Harness::start();
    let client = harness.anonymous();

    let err = client.create_post(&new_post("Nope")).unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(client.current_user().expect("current user").is_none());

    let err = client
        .create_comment(
            1,
            &CreateCommentInput {
                author_name: "Ann".into(),
                content: "hi".into(),
            },
        )
        .unwrap_err();
    match err {
        ClientError::Status { status, .. } => assert_eq!(status, StatusCode::NOT_FOUND),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blog_info_update_and_logout() {
    let harness = Harness::start();
    let client = harness.author();

    let info = client.blog_info().expect("info");
    assert_eq!(info.intro, "And this is my blog.");

    let updated = client
        .update_blog_info(&UpdateBlogInfoInput {
            letterboxd: Some("https://letterboxd.com/ada".into()),
            ..Default::default()
        })
        .expect("update");
    assert_eq!(updated.letterboxd, "https://letterboxd.com/ada");
    assert!(!client.cache().contains(&QueryKey::BlogInfo));
    assert_eq!(client.blog_info().expect("info").intro, info.intro);

    let user = client.current_user().expect("user").expect("signed in");
    assert_eq!(user.id, "author");
    assert_eq!(user.first_name.as_deref(), Some("Ada"));

    client.logout().expect("logout");
    assert!(!client.cache().contains(&QueryKey::CurrentUser));
    assert!(client.current_user().expect("user").is_none());
}
