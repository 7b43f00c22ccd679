//! Wire-level entities and the inbound payloads accepted by the API.

use crate::database::models::{
    BlogInfoChanges, BlogInfoRecord, CommentRecord, PostRecord, UserRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub likes: i64,
    pub created_at: String,
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            content: record.content,
            image_url: record.image_url,
            likes: record.likes,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_name: String,
    pub content: String,
    pub created_at: String,
}

impl From<CommentRecord> for Comment {
    fn from(record: CommentRecord) -> Self {
        Self {
            id: record.id,
            post_id: record.post_id,
            author_name: record.author_name,
            content: record.content,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogInfo {
    pub id: i64,
    pub intro: String,
    pub things_i_like: String,
    pub expect: String,
    pub letterboxd: String,
    pub updated_at: String,
}

impl From<BlogInfoRecord> for BlogInfo {
    fn from(record: BlogInfoRecord) -> Self {
        Self {
            id: record.id,
            intro: record.intro,
            things_i_like: record.things_i_like,
            expect: record.expect,
            letterboxd: record.letterboxd,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            profile_image_url: record.profile_image_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("invalid request body: {}", describe(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|err| format!("{} {}", err.field, err.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// A missing title reads as blank and is reported by [`NewPost::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    #[serde(default)]
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.title.trim().is_empty() {
            errors.push("title", "must not be empty");
        }
        errors.into_result()
    }
}

/// Comment body as posted by a visitor; the post id comes from the path.
/// Any string is accepted for both fields, including an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub author_name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogInfoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub things_i_like: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letterboxd: Option<String>,
}

impl BlogInfoPatch {
    pub fn is_empty(&self) -> bool {
        self.intro.is_none()
            && self.things_i_like.is_none()
            && self.expect.is_none()
            && self.letterboxd.is_none()
    }
}

impl From<BlogInfoPatch> for BlogInfoChanges {
    fn from(patch: BlogInfoPatch) -> Self {
        Self {
            intro: patch.intro,
            things_i_like: patch.things_i_like,
            expect: patch.expect,
            letterboxd: patch.letterboxd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> serde_json::Result<T> {
        serde_json::from_value(body)
    }

    #[test]
    fn missing_or_blank_title_fails_validation() {
        let post: NewPost = parse(json!({ "content": "World" })).expect("parses");
        let err = post.validate().unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "title");

        let post: NewPost = parse(json!({ "title": "   ", "content": "World" })).expect("parses");
        assert_eq!(post.validate().unwrap_err().errors[0].message, "must not be empty");
    }

    #[test]
    fn new_post_rejects_wrong_types_and_missing_content() {
        assert!(parse::<NewPost>(json!({ "title": 7, "content": "x" })).is_err());
        assert!(parse::<NewPost>(json!({ "title": "Hello" })).is_err());
    }

    #[test]
    fn new_post_accepts_null_image_and_empty_content() {
        let post: NewPost = parse(json!({ "title": "Hello", "content": "", "imageUrl": null }))
            .expect("parses");
        assert!(post.validate().is_ok());
        assert_eq!(post.image_url, None);
    }

    #[test]
    fn comment_accepts_empty_strings() {
        let comment: NewComment = parse(json!({ "authorName": "", "content": "" })).expect("parses");
        assert_eq!(comment.author_name, "");
        assert_eq!(comment.content, "");
    }

    #[test]
    fn comment_requires_both_fields_as_strings() {
        assert!(parse::<NewComment>(json!({ "authorName": "Visitor" })).is_err());
        assert!(parse::<NewComment>(json!({ "authorName": 1, "content": "x" })).is_err());
        assert!(parse::<NewComment>(json!(["nope"])).is_err());
    }

    #[test]
    fn comment_ignores_post_id_in_body() {
        let comment: NewComment = parse(json!({
            "authorName": "Visitor",
            "content": "Nice post",
            "postId": 99
        }))
        .expect("parses");
        assert_eq!(comment.author_name, "Visitor");
    }

    #[test]
    fn blog_info_patch_is_partial() {
        let patch: BlogInfoPatch = parse(json!({ "intro": "Hey", "unknown": 1 })).expect("parses");
        assert_eq!(patch.intro.as_deref(), Some("Hey"));
        assert!(patch.letterboxd.is_none());
        assert!(!patch.is_empty());

        assert!(parse::<BlogInfoPatch>(json!({ "expect": ["x"] })).is_err());
        assert!(parse::<BlogInfoPatch>(json!({})).expect("parses").is_empty());
    }

    #[test]
    fn post_serializes_camel_case() {
        let post = Post {
            id: 1,
            title: "t".into(),
            content: "c".into(),
            image_url: None,
            likes: 0,
            created_at: "2024-01-01T00:00:00.000000Z".into(),
        };
        let value = serde_json::to_value(&post).expect("json");
        assert!(value.get("imageUrl").is_some());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn validation_errors_display_lists_fields() {
        let mut errors = ValidationErrors::single("title", "is required");
        errors.push("content", "expected a string");
        assert_eq!(
            errors.to_string(),
            "invalid request body: title is required; content expected a string"
        );
    }
}
