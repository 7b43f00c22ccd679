use super::{ApiError, ApiResult, AppState, AuthUser};
use crate::blog::BlogError;
use crate::schema::{NewPost, Post};
use crate::utils::parse_id;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub(crate) async fn list_posts(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let posts = state.blog.list_posts()?;
    Ok(Json(posts))
}

pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Post> {
    let post = match parse_id(&id) {
        Some(id) => state.blog.get_post(id)?,
        None => None,
    };
    post.map(Json).ok_or_else(post_not_found)
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<NewPost>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let Json(input) = body?;
    let post = state.blog.create_post(input)?;
    tracing::debug!(post_id = post.id, author = %auth.user.id, "post published");
    Ok((StatusCode::CREATED, Json(post)))
}

pub(crate) async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Post> {
    let post = match parse_id(&id) {
        Some(id) => state.blog.like_post(id)?,
        None => None,
    };
    post.map(Json).ok_or_else(post_not_found)
}

fn post_not_found() -> ApiError {
    BlogError::NotFound("post").into()
}
