use crate::database::models::{NewPostRecord, PostRecord};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(super) struct SqlitePostRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

const SELECT_POST: &str = "SELECT id, title, content, image_url, likes, created_at FROM posts";

fn map_post(row: &Row<'_>) -> rusqlite::Result<PostRecord> {
    Ok(PostRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        image_url: row.get(3)?,
        likes: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl<'conn> super::PostRepository for SqlitePostRepository<'conn> {
    fn create(&self, record: &NewPostRecord) -> Result<PostRecord> {
        self.conn.execute(
            r#"
            INSERT INTO posts (title, content, image_url, likes, created_at)
            VALUES (?1, ?2, ?3, 0, ?4)
            "#,
            params![
                record.title,
                record.content,
                record.image_url,
                record.created_at
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get(id)?
            .context("post insert did not produce a readable row")
    }

    fn get(&self, id: i64) -> Result<Option<PostRecord>> {
        Ok(self
            .conn
            .query_row(&format!("{SELECT_POST} WHERE id = ?1"), params![id], map_post)
            .optional()?)
    }

    fn list(&self) -> Result<Vec<PostRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_POST} ORDER BY created_at DESC, id DESC"))?;
        let posts = stmt
            .query_map([], map_post)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn increment_likes(&self, id: i64) -> Result<Option<PostRecord>> {
        let Some(post) = self.get(id)? else {
            return Ok(None);
        };
        self.conn.execute(
            "UPDATE posts SET likes = ?1 WHERE id = ?2",
            params![post.likes + 1, id],
        )?;
        self.get(id)
    }
}
