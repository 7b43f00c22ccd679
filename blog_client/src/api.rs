use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::cache::{QueryCache, QueryKey};
use crate::error::{ClientError, ClientResult};
use crate::models::{
    BlogInfo, Comment, CreateCommentInput, CreatePostInput, ErrorResponse, Post,
    SuccessResponse, UpdateBlogInfoInput, User,
};
use crate::routes::{self, build_url, Route};

/// Blocking client for the blog API. Reads are served from the query cache
/// when present; successful mutations invalidate the keys they affect.
#[derive(Clone)]
pub struct BlogClient {
    base_url: String,
    client: Client,
    token: Option<String>,
    cache: QueryCache,
}

impl BlogClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            base_url: base,
            client,
            token: None,
            cache: QueryCache::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> ClientResult<()> {
        self.base_url = sanitize_base_url(base_url.into())?;
        self.cache.clear();
        Ok(())
    }

    /// Attaches a session token to every subsequent request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
        self.cache.invalidate(&QueryKey::CurrentUser);
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn posts(&self) -> ClientResult<Vec<Post>> {
        self.query(QueryKey::PostList, || {
            self.fetch(&routes::POSTS_LIST, routes::POSTS_LIST.path)
        })
    }

    /// `Ok(None)` when the post does not exist.
    pub fn post(&self, id: i64) -> ClientResult<Option<Post>> {
        let key = QueryKey::Post(id);
        if let Some(post) = self.cache.get::<Post>(&key) {
            return Ok(Some(post));
        }
        let path = build_url(routes::POSTS_GET.path, &[("id", id.to_string())]);
        match self.fetch::<Post>(&routes::POSTS_GET, &path) {
            Ok(post) => {
                self.cache.put(key, &post);
                Ok(Some(post))
            }
            Err(err) if err.status() == Some(StatusCode::NOT_FOUND) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn create_post(&self, input: &CreatePostInput) -> ClientResult<Post> {
        let request = self.request(&routes::POSTS_CREATE, routes::POSTS_CREATE.path)?.json(input);
        let post: Post = self.send(request)?;
        self.cache.invalidate(&QueryKey::PostList);
        Ok(post)
    }

    pub fn like_post(&self, id: i64) -> ClientResult<Post> {
        let path = build_url(routes::POSTS_LIKE.path, &[("id", id.to_string())]);
        let post: Post = self.send(self.request(&routes::POSTS_LIKE, &path)?)?;
        self.cache
            .invalidate_all(&[QueryKey::PostList, QueryKey::Post(post.id)]);
        Ok(post)
    }

    pub fn comments(&self, post_id: i64) -> ClientResult<Vec<Comment>> {
        self.query(QueryKey::Comments(post_id), || {
            let path = build_url(routes::COMMENTS_LIST.path, &[("id", post_id.to_string())]);
            self.fetch(&routes::COMMENTS_LIST, &path)
        })
    }

    pub fn create_comment(&self, post_id: i64, input: &CreateCommentInput) -> ClientResult<Comment> {
        let path = build_url(routes::COMMENTS_CREATE.path, &[("id", post_id.to_string())]);
        let request = self.request(&routes::COMMENTS_CREATE, &path)?.json(input);
        let comment: Comment = self.send(request)?;
        self.cache.invalidate(&QueryKey::Comments(post_id));
        Ok(comment)
    }

    /// `post_id` names the comment list to refresh afterwards.
    pub fn delete_comment(&self, comment_id: i64, post_id: i64) -> ClientResult<()> {
        let path = build_url(routes::COMMENTS_DELETE.path, &[("id", comment_id.to_string())]);
        let _: SuccessResponse = self.send(self.request(&routes::COMMENTS_DELETE, &path)?)?;
        self.cache.invalidate(&QueryKey::Comments(post_id));
        Ok(())
    }

    pub fn blog_info(&self) -> ClientResult<BlogInfo> {
        self.query(QueryKey::BlogInfo, || {
            self.fetch(&routes::BLOG_INFO_GET, routes::BLOG_INFO_GET.path)
        })
    }

    pub fn update_blog_info(&self, input: &UpdateBlogInfoInput) -> ClientResult<BlogInfo> {
        let request = self
            .request(&routes::BLOG_INFO_UPDATE, routes::BLOG_INFO_UPDATE.path)?
            .json(input);
        let info: BlogInfo = self.send(request)?;
        self.cache.invalidate(&QueryKey::BlogInfo);
        Ok(info)
    }

    /// `Ok(None)` when no session is attached or it was rejected.
    pub fn current_user(&self) -> ClientResult<Option<User>> {
        if let Some(user) = self.cache.get::<User>(&QueryKey::CurrentUser) {
            return Ok(Some(user));
        }
        match self.fetch::<User>(&routes::AUTH_USER, routes::AUTH_USER.path) {
            Ok(user) => {
                self.cache.put(QueryKey::CurrentUser, &user);
                Ok(Some(user))
            }
            Err(err) if err.status() == Some(StatusCode::UNAUTHORIZED) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn logout(&self) -> ClientResult<()> {
        let _: SuccessResponse = self.send(self.request(&routes::LOGOUT, routes::LOGOUT.path)?)?;
        self.cache.invalidate(&QueryKey::CurrentUser);
        Ok(())
    }

    fn query<T, F>(&self, key: QueryKey, fetch: F) -> ClientResult<T>
    where
        T: DeserializeOwned + serde::Serialize,
        F: FnOnce() -> ClientResult<T>,
    {
        if let Some(hit) = self.cache.get::<T>(&key) {
            tracing::debug!(?key, "cache hit");
            return Ok(hit);
        }
        let value = fetch()?;
        self.cache.put(key, &value);
        Ok(value)
    }

    fn fetch<T: DeserializeOwned>(&self, route: &Route, path: &str) -> ClientResult<T> {
        self.send(self.request(route, path)?)
    }

    fn request(&self, route: &Route, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.url(path)?;
        let builder = self.client.request(route.method.clone(), url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send()?;
        Ok(check_status(response)?.json()?)
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
        url.set_path(path.trim_start_matches('/'));
        Ok(url)
    }
}

fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorResponse>()
        .map(|body| body.message)
        .unwrap_or_default();
    Err(ClientError::Status { status, message })
}

fn sanitize_base_url(mut base: String) -> ClientResult<String> {
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    // Remove trailing slash for consistency
    while base.ends_with('/') {
        base.pop();
    }
    Url::parse(&base).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
    Ok(base)
}
