//! Paths of the blog REST API, mirrored from the server's router.

use reqwest::Method;

#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub path: &'static str,
}

pub const BLOG_INFO_GET: Route = Route { method: Method::GET, path: "/api/blog-info" };
pub const BLOG_INFO_UPDATE: Route = Route { method: Method::PUT, path: "/api/blog-info" };
pub const POSTS_LIST: Route = Route { method: Method::GET, path: "/api/posts" };
pub const POSTS_GET: Route = Route { method: Method::GET, path: "/api/posts/:id" };
pub const POSTS_CREATE: Route = Route { method: Method::POST, path: "/api/posts" };
pub const POSTS_LIKE: Route = Route { method: Method::POST, path: "/api/posts/:id/like" };
pub const COMMENTS_LIST: Route = Route { method: Method::GET, path: "/api/posts/:id/comments" };
pub const COMMENTS_CREATE: Route = Route { method: Method::POST, path: "/api/posts/:id/comments" };
pub const COMMENTS_DELETE: Route = Route { method: Method::DELETE, path: "/api/comments/:id" };
pub const AUTH_USER: Route = Route { method: Method::GET, path: "/api/auth/user" };
pub const LOGOUT: Route = Route { method: Method::POST, path: "/api/logout" };

/// Substitutes `:name` placeholders in `path` with the given values.
pub fn build_url(path: &str, params: &[(&str, String)]) -> String {
    let mut url = path.to_string();
    for (key, value) in params {
        let placeholder = format!(":{key}");
        if url.contains(&placeholder) {
            url = url.replace(&placeholder, value);
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_fills_placeholders() {
        assert_eq!(
            build_url(POSTS_LIKE.path, &[("id", 7.to_string())]),
            "/api/posts/7/like"
        );
        assert_eq!(build_url(POSTS_LIST.path, &[("id", "1".into())]), "/api/posts");
    }
}
