mod blog_info;
mod comments;
mod posts;
mod sessions;
mod users;

use super::models::{
    BlogInfoChanges, BlogInfoRecord, CommentRecord, NewCommentRecord, NewPostRecord, PostRecord,
    SessionRecord, UserRecord,
};
use anyhow::Result;
use rusqlite::Connection;

pub trait PostRepository {
    fn create(&self, record: &NewPostRecord) -> Result<PostRecord>;
    fn get(&self, id: i64) -> Result<Option<PostRecord>>;
    /// Newest first.
    fn list(&self) -> Result<Vec<PostRecord>>;
    fn count(&self) -> Result<usize>;
    /// Reads the current count and writes it back plus one. Two concurrent
    /// callers may both observe the same starting value.
    fn increment_likes(&self, id: i64) -> Result<Option<PostRecord>>;
}

pub trait CommentRepository {
    fn create(&self, record: &NewCommentRecord) -> Result<CommentRecord>;
    fn get(&self, id: i64) -> Result<Option<CommentRecord>>;
    /// Newest first.
    fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentRecord>>;
    /// Returns whether a row was removed.
    fn delete(&self, id: i64) -> Result<bool>;
}

pub trait BlogInfoRepository {
    /// Returns the singleton row, inserting the defaults when the table is empty.
    fn get_or_create(&self) -> Result<BlogInfoRecord>;
    fn update(&self, changes: &BlogInfoChanges, updated_at: &str) -> Result<BlogInfoRecord>;
}

pub trait UserRepository {
    fn get(&self, id: &str) -> Result<Option<UserRecord>>;
    fn upsert(&self, record: &UserRecord) -> Result<()>;
}

pub trait SessionRepository {
    fn create(&self, record: &SessionRecord) -> Result<()>;
    /// Looks up a session that has not expired at `now`.
    fn find_active(&self, token_hash: &str, now: &str) -> Result<Option<SessionRecord>>;
    fn delete(&self, token_hash: &str) -> Result<bool>;
    fn purge_expired(&self, now: &str) -> Result<usize>;
}

pub struct SqliteRepositories<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRepositories<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn posts(&self) -> impl PostRepository + '_ {
        posts::SqlitePostRepository { conn: self.conn }
    }

    pub fn comments(&self) -> impl CommentRepository + '_ {
        comments::SqliteCommentRepository { conn: self.conn }
    }

    pub fn blog_info(&self) -> impl BlogInfoRepository + '_ {
        blog_info::SqliteBlogInfoRepository { conn: self.conn }
    }

    pub fn users(&self) -> impl UserRepository + '_ {
        users::SqliteUserRepository { conn: self.conn }
    }

    pub fn sessions(&self) -> impl SessionRepository + '_ {
        sessions::SqliteSessionRepository { conn: self.conn }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MIGRATIONS;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory db");
        conn.execute_batch(MIGRATIONS).expect("migrations");
        conn
    }

    fn new_post(title: &str, created_at: &str) -> NewPostRecord {
        NewPostRecord {
            title: title.into(),
            content: "body".into(),
            image_url: None,
            created_at: created_at.into(),
        }
    }

    #[test]
    fn post_repository_orders_newest_first() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        let posts = repos.posts();

        posts
            .create(&new_post("older", "2024-01-01T00:00:00.000000Z"))
            .expect("create older");
        let newer = posts
            .create(&new_post("newer", "2024-02-01T00:00:00.000000Z"))
            .expect("create newer");
        assert_eq!(newer.likes, 0);

        let listed = posts.list().expect("list");
        let titles: Vec<_> = listed.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "older"]);
        assert_eq!(posts.count().expect("count"), 2);
    }

    #[test]
    fn posts_with_equal_timestamps_fall_back_to_id_order() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        let posts = repos.posts();
        let stamp = "2024-01-01T00:00:00.000000Z";
        let first = posts.create(&new_post("first", stamp)).expect("first");
        let second = posts.create(&new_post("second", stamp)).expect("second");

        let listed = posts.list().expect("list");
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn increment_likes_on_missing_post_creates_nothing() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        assert!(repos.posts().increment_likes(42).expect("like").is_none());
        assert_eq!(repos.posts().count().expect("count"), 0);
    }

    #[test]
    fn increment_likes_accumulates() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        let post = repos
            .posts()
            .create(&new_post("liked", "2024-01-01T00:00:00.000000Z"))
            .expect("create");
        for _ in 0..3 {
            repos.posts().increment_likes(post.id).expect("like");
        }
        let fetched = repos.posts().get(post.id).expect("get").expect("exists");
        assert_eq!(fetched.likes, 3);
    }

    #[test]
    fn comment_repository_lists_by_post_and_deletes() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        let comments = repos.comments();

        let first = comments
            .create(&NewCommentRecord {
                post_id: 1,
                author_name: "ana".into(),
                content: "first".into(),
                created_at: "2024-01-01T00:00:00.000000Z".into(),
            })
            .expect("first comment");
        comments
            .create(&NewCommentRecord {
                post_id: 1,
                author_name: "ben".into(),
                content: "second".into(),
                created_at: "2024-01-02T00:00:00.000000Z".into(),
            })
            .expect("second comment");
        comments
            .create(&NewCommentRecord {
                post_id: 2,
                author_name: "cy".into(),
                content: "elsewhere".into(),
                created_at: "2024-01-03T00:00:00.000000Z".into(),
            })
            .expect("other post comment");

        let listed = comments.list_for_post(1).expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].content, "second");

        assert!(comments.delete(first.id).expect("delete"));
        assert!(!comments.delete(first.id).expect("second delete"));
        assert!(comments.get(first.id).expect("get").is_none());
    }

    #[test]
    fn blog_info_is_a_lazily_created_singleton() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        let info = repos.blog_info();

        let first = info.get_or_create().expect("create");
        let second = info.get_or_create().expect("read");
        assert_eq!(first.id, second.id);
        assert_eq!(first.letterboxd, blog_info::DEFAULT_LETTERBOXD);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM blog_info", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }

    #[test]
    fn blog_info_update_only_touches_given_columns() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        let info = repos.blog_info();
        let before = info.get_or_create().expect("create");

        let after = info
            .update(
                &BlogInfoChanges {
                    intro: Some("Hi there".into()),
                    ..Default::default()
                },
                "2030-01-01T00:00:00.000000Z",
            )
            .expect("update");

        assert_eq!(after.intro, "Hi there");
        assert_eq!(after.things_i_like, before.things_i_like);
        assert_eq!(after.expect, before.expect);
        assert_eq!(after.updated_at, "2030-01-01T00:00:00.000000Z");
    }

    #[test]
    fn sessions_expire_and_cascade_with_user() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        repos
            .users()
            .upsert(&UserRecord {
                id: "author".into(),
                email: Some("author@example.com".into()),
                first_name: None,
                last_name: None,
                profile_image_url: None,
                created_at: "2024-01-01T00:00:00.000000Z".into(),
                updated_at: "2024-01-01T00:00:00.000000Z".into(),
            })
            .expect("user");
        repos
            .sessions()
            .create(&SessionRecord {
                token_hash: "abc".into(),
                user_id: "author".into(),
                created_at: "2024-01-01T00:00:00.000000Z".into(),
                expires_at: "2024-01-02T00:00:00.000000Z".into(),
            })
            .expect("session");

        let sessions = repos.sessions();
        assert!(sessions
            .find_active("abc", "2024-01-01T12:00:00.000000Z")
            .expect("lookup")
            .is_some());
        assert!(sessions
            .find_active("abc", "2024-01-03T00:00:00.000000Z")
            .expect("lookup")
            .is_none());
        assert_eq!(
            sessions
                .purge_expired("2024-01-03T00:00:00.000000Z")
                .expect("purge"),
            1
        );
        assert!(!sessions.delete("abc").expect("delete"));
    }
}
