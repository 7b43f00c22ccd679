use crate::database::models::UserRecord;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

pub(super) struct SqliteUserRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> super::UserRepository for SqliteUserRepository<'conn> {
    fn get(&self, id: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT id, email, first_name, last_name, profile_image_url, created_at, updated_at
                FROM users
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(UserRecord {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        first_name: row.get(2)?,
                        last_name: row.get(3)?,
                        profile_image_url: row.get(4)?,
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                },
            )
            .optional()?)
    }

    fn upsert(&self, record: &UserRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO users (id, email, first_name, last_name, profile_image_url, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                email = COALESCE(excluded.email, users.email),
                first_name = COALESCE(excluded.first_name, users.first_name),
                last_name = COALESCE(excluded.last_name, users.last_name),
                profile_image_url = COALESCE(excluded.profile_image_url, users.profile_image_url),
                updated_at = excluded.updated_at
            "#,
            params![
                record.id,
                record.email,
                record.first_name,
                record.last_name,
                record.profile_image_url,
                record.created_at,
                record.updated_at
            ],
        )?;
        Ok(())
    }
}
