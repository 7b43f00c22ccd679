use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub likes: i64,
    pub created_at: String,
}

/// Insert shape for `posts`; `id` is assigned by SQLite.
#[derive(Debug, Clone)]
pub struct NewPostRecord {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: i64,
    pub post_id: i64,
    pub author_name: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewCommentRecord {
    pub post_id: i64,
    pub author_name: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogInfoRecord {
    pub id: i64,
    pub intro: String,
    pub things_i_like: String,
    pub expect: String,
    pub letterboxd: String,
    pub updated_at: String,
}

/// Partial update for the blog_info singleton. `None` leaves a column as is.
#[derive(Debug, Clone, Default)]
pub struct BlogInfoChanges {
    pub intro: Option<String>,
    pub things_i_like: Option<String>,
    pub expect: Option<String>,
    pub letterboxd: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token_hash: String,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}
