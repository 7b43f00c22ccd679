use crate::database::models::{CommentRecord, NewCommentRecord};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(super) struct SqliteCommentRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

fn map_comment(row: &Row<'_>) -> rusqlite::Result<CommentRecord> {
    Ok(CommentRecord {
        id: row.get(0)?,
        post_id: row.get(1)?,
        author_name: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl<'conn> super::CommentRepository for SqliteCommentRepository<'conn> {
    fn create(&self, record: &NewCommentRecord) -> Result<CommentRecord> {
        self.conn.execute(
            r#"
            INSERT INTO comments (post_id, author_name, content, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.post_id,
                record.author_name,
                record.content,
                record.created_at
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get(id)?
            .context("comment insert did not produce a readable row")
    }

    fn get(&self, id: i64) -> Result<Option<CommentRecord>> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT id, post_id, author_name, content, created_at
                FROM comments
                WHERE id = ?1
                "#,
                params![id],
                map_comment,
            )
            .optional()?)
    }

    fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, post_id, author_name, content, created_at
            FROM comments
            WHERE post_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )?;
        let comments = stmt
            .query_map(params![post_id], map_comment)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}
