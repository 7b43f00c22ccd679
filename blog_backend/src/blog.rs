use crate::database::models::{BlogInfoChanges, NewCommentRecord, NewPostRecord};
use crate::database::repositories::{BlogInfoRepository, CommentRepository, PostRepository};
use crate::database::Database;
use crate::schema::{
    BlogInfo, BlogInfoPatch, Comment, NewComment, NewPost, Post, ValidationErrors,
};
use crate::utils::now_utc_iso;

pub const WELCOME_TITLE: &str = "Welcome to my Blog";
pub const WELCOME_CONTENT: &str = "This is the first post on Shahaan's blog. Welcome!";
pub const WELCOME_IMAGE_URL: &str = "https://images.unsplash.com/photo-1542332205-4da5d4719604";

#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type BlogResult<T> = Result<T, BlogError>;

/// Domain operations over posts, comments and the blog info singleton.
#[derive(Clone)]
pub struct BlogService {
    database: Database,
}

impl BlogService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn list_posts(&self) -> BlogResult<Vec<Post>> {
        let posts = self
            .database
            .with_repositories(|repos| repos.posts().list())?;
        Ok(posts.into_iter().map(Post::from).collect())
    }

    pub fn get_post(&self, id: i64) -> BlogResult<Option<Post>> {
        let post = self
            .database
            .with_repositories(|repos| repos.posts().get(id))?;
        Ok(post.map(Post::from))
    }

    pub fn count_posts(&self) -> BlogResult<usize> {
        Ok(self
            .database
            .with_repositories(|repos| repos.posts().count())?)
    }

    pub fn create_post(&self, input: NewPost) -> BlogResult<Post> {
        input.validate()?;
        let record = NewPostRecord {
            title: input.title,
            content: input.content,
            image_url: input.image_url,
            created_at: now_utc_iso(),
        };
        let created = self
            .database
            .with_repositories(|repos| repos.posts().create(&record))?;
        tracing::info!(post_id = created.id, title = %created.title, "post created");
        Ok(Post::from(created))
    }

    /// Returns `None` when the post does not exist; nothing is written then.
    pub fn like_post(&self, id: i64) -> BlogResult<Option<Post>> {
        let liked = self
            .database
            .with_repositories(|repos| repos.posts().increment_likes(id))?;
        if let Some(post) = &liked {
            tracing::debug!(post_id = post.id, likes = post.likes, "post liked");
        }
        Ok(liked.map(Post::from))
    }

    pub fn list_comments(&self, post_id: i64) -> BlogResult<Vec<Comment>> {
        let comments = self
            .database
            .with_repositories(|repos| repos.comments().list_for_post(post_id))?;
        Ok(comments.into_iter().map(Comment::from).collect())
    }

    pub fn create_comment(&self, post_id: i64, input: NewComment) -> BlogResult<Comment> {
        let record = NewCommentRecord {
            post_id,
            author_name: input.author_name,
            content: input.content,
            created_at: now_utc_iso(),
        };
        let created = self.database.with_repositories(|repos| {
            if repos.posts().get(post_id)?.is_none() {
                return Ok(None);
            }
            repos.comments().create(&record).map(Some)
        })?;
        let Some(created) = created else {
            return Err(BlogError::NotFound("post"));
        };
        tracing::info!(comment_id = created.id, post_id, "comment created");
        Ok(Comment::from(created))
    }

    /// Removing an id that does not exist is not an error.
    pub fn delete_comment(&self, id: i64) -> BlogResult<()> {
        let removed = self
            .database
            .with_repositories(|repos| repos.comments().delete(id))?;
        tracing::info!(comment_id = id, removed, "comment delete requested");
        Ok(())
    }

    pub fn get_blog_info(&self) -> BlogResult<BlogInfo> {
        let info = self
            .database
            .with_repositories(|repos| repos.blog_info().get_or_create())?;
        Ok(BlogInfo::from(info))
    }

    pub fn update_blog_info(&self, patch: BlogInfoPatch) -> BlogResult<BlogInfo> {
        let changes: BlogInfoChanges = patch.into();
        let updated_at = now_utc_iso();
        let info = self
            .database
            .with_repositories(|repos| repos.blog_info().update(&changes, &updated_at))?;
        tracing::info!(updated_at = %info.updated_at, "blog info updated");
        Ok(BlogInfo::from(info))
    }

    /// Creates the welcome post when there are no posts yet. Returns the
    /// post when one was inserted.
    pub fn seed_welcome_post(&self) -> BlogResult<Option<Post>> {
        if self.count_posts()? > 0 {
            return Ok(None);
        }
        let post = self.create_post(NewPost {
            title: WELCOME_TITLE.to_string(),
            content: WELCOME_CONTENT.to_string(),
            image_url: Some(WELCOME_IMAGE_URL.to_string()),
        })?;
        Ok(Some(post))
    }
}
