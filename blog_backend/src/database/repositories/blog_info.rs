use crate::database::models::{BlogInfoChanges, BlogInfoRecord};
use crate::utils::now_utc_iso;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(crate) const DEFAULT_INTRO: &str = "And this is my blog.";
pub(crate) const DEFAULT_THINGS_I_LIKE: &str =
    "Football, Films, Badminton, Cats, Running, Writing, Working Out, Art, Culture";
pub(crate) const DEFAULT_EXPECT: &str = "Stuff about things I like, my thoughts on some topical news, film reviews, and random ramblings about whatever catches my attention. It's a digital garden of my interests.";
pub(crate) const DEFAULT_LETTERBOXD: &str = "https://letterboxd.com/meowpeeps";

pub(super) struct SqliteBlogInfoRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

fn map_info(row: &Row<'_>) -> rusqlite::Result<BlogInfoRecord> {
    Ok(BlogInfoRecord {
        id: row.get(0)?,
        intro: row.get(1)?,
        things_i_like: row.get(2)?,
        expect: row.get(3)?,
        letterboxd: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl SqliteBlogInfoRepository<'_> {
    fn current(&self) -> Result<Option<BlogInfoRecord>> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT id, intro, things_i_like, expect, letterboxd, updated_at
                FROM blog_info
                ORDER BY id ASC
                LIMIT 1
                "#,
                [],
                map_info,
            )
            .optional()?)
    }
}

impl<'conn> super::BlogInfoRepository for SqliteBlogInfoRepository<'conn> {
    fn get_or_create(&self) -> Result<BlogInfoRecord> {
        if let Some(info) = self.current()? {
            return Ok(info);
        }
        self.conn.execute(
            r#"
            INSERT INTO blog_info (intro, things_i_like, expect, letterboxd, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                DEFAULT_INTRO,
                DEFAULT_THINGS_I_LIKE,
                DEFAULT_EXPECT,
                DEFAULT_LETTERBOXD,
                now_utc_iso()
            ],
        )?;
        tracing::debug!("created default blog_info row");
        self.current()?
            .context("blog_info insert did not produce a readable row")
    }

    fn update(&self, changes: &BlogInfoChanges, updated_at: &str) -> Result<BlogInfoRecord> {
        let info = self.get_or_create()?;
        self.conn.execute(
            r#"
            UPDATE blog_info SET
                intro = COALESCE(?1, intro),
                things_i_like = COALESCE(?2, things_i_like),
                expect = COALESCE(?3, expect),
                letterboxd = COALESCE(?4, letterboxd),
                updated_at = ?5
            WHERE id = ?6
            "#,
            params![
                changes.intro,
                changes.things_i_like,
                changes.expect,
                changes.letterboxd,
                updated_at,
                info.id
            ],
        )?;
        self.current()?
            .context("blog_info row disappeared during update")
    }
}
