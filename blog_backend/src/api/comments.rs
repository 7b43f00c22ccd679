use super::{ApiError, ApiResult, AppState, AuthUser, SuccessResponse};
use crate::blog::BlogError;
use crate::schema::{Comment, NewComment};
use crate::utils::parse_id;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub(crate) async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Vec<Comment>> {
    let Some(post_id) = parse_id(&post_id) else {
        return Ok(Json(Vec::new()));
    };
    let comments = state.blog.list_comments(post_id)?;
    Ok(Json(comments))
}

pub(crate) async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    body: Result<Json<NewComment>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let Json(input) = body?;
    let Some(post_id) = parse_id(&post_id) else {
        return Err(BlogError::NotFound("post").into());
    };
    let comment = state.blog.create_comment(post_id, input)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<SuccessResponse> {
    if let Some(id) = parse_id(&id) {
        state.blog.delete_comment(id)?;
        tracing::debug!(comment_id = id, by = %auth.user.id, "comment removed by author");
    }
    Ok(SuccessResponse::ok())
}
