use super::{ApiError, ApiResult, AppState, SuccessResponse};
use crate::schema::User;
use axum::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use cookie::Cookie;

/// An authenticated author. Extracting it rejects the request with 401 when
/// no live session is attached.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers, &state.config.session.cookie_name) else {
            return Err(ApiError::Unauthorized);
        };
        match state.sessions.authenticate(&token)? {
            Some(user) => Ok(Self { user, token }),
            None => {
                tracing::debug!(path = %parts.uri.path(), "rejected stale or unknown session");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// Bearer token first, then the session cookie.
fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(|parsed| parsed.ok())
        .find(|c| c.name() == cookie_name && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

pub(crate) async fn current_user(auth: AuthUser) -> ApiResult<User> {
    Ok(Json(auth.user))
}

pub(crate) async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<SuccessResponse> {
    state.sessions.sign_out(&auth.token)?;
    Ok(SuccessResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(COOKIE, HeaderValue::from_static("blog_session=xyz"));
        assert_eq!(session_token(&headers, "blog_session").as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; blog_session=xyz"));
        assert_eq!(session_token(&headers, "blog_session").as_deref(), Some("xyz"));
        assert_eq!(session_token(&headers, "other"), None);
    }

    #[test]
    fn missing_or_empty_credentials_yield_nothing() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers, "blog_session"), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(session_token(&headers, "blog_session"), None);
    }
}
