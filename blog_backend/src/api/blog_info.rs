use super::{ApiError, ApiResult, AppState, AuthUser};
use crate::schema::{BlogInfo, BlogInfoPatch};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

pub(crate) async fn get_blog_info(State(state): State<AppState>) -> ApiResult<BlogInfo> {
    let info = state.blog.get_blog_info()?;
    Ok(Json(info))
}

pub(crate) async fn update_blog_info(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<BlogInfoPatch>, JsonRejection>,
) -> Result<Json<BlogInfo>, ApiError> {
    let Json(patch) = body?;
    if patch.is_empty() {
        tracing::debug!(user_id = %auth.user.id, "blog info update with no fields, refreshing timestamp only");
    }
    let info = state.blog.update_blog_info(patch)?;
    Ok(Json(info))
}
