use crate::database::models::SessionRecord;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

pub(super) struct SqliteSessionRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> super::SessionRepository for SqliteSessionRepository<'conn> {
    fn create(&self, record: &SessionRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.token_hash,
                record.user_id,
                record.created_at,
                record.expires_at
            ],
        )?;
        Ok(())
    }

    fn find_active(&self, token_hash: &str, now: &str) -> Result<Option<SessionRecord>> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT s.token_hash, s.user_id, s.created_at, s.expires_at
                FROM sessions s
                INNER JOIN users u ON u.id = s.user_id
                WHERE s.token_hash = ?1 AND s.expires_at > ?2
                "#,
                params![token_hash, now],
                |row| {
                    Ok(SessionRecord {
                        token_hash: row.get(0)?,
                        user_id: row.get(1)?,
                        created_at: row.get(2)?,
                        expires_at: row.get(3)?,
                    })
                },
            )
            .optional()?)
    }

    fn delete(&self, token_hash: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?1",
            params![token_hash],
        )?;
        Ok(removed > 0)
    }

    fn purge_expired(&self, now: &str) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;
        Ok(removed)
    }
}
