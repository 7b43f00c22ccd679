use anyhow::{anyhow, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_PORT: u16 = 5000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
pub const DEFAULT_SESSION_COOKIE: &str = "blog_session";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

#[derive(Debug, Clone)]
pub struct BlogConfig {
    pub api_port: u16,
    pub paths: BlogPaths,
    pub http: HttpConfig,
    pub session: SessionConfig,
    /// Insert the welcome post when the posts table is empty at startup.
    pub seed: bool,
}

impl BlogConfig {
    pub fn from_env() -> Result<Self> {
        let paths = match env::var("BLOG_DATA_DIR") {
            Ok(raw) if !raw.trim().is_empty() => BlogPaths::from_base_dir(raw.trim())?,
            _ => BlogPaths::discover()?,
        };
        let api_port = env::var("BLOG_API_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_API_PORT);
        let seed = env::var("BLOG_SEED")
            .ok()
            .map(|v| v != "0" && v.to_lowercase() != "false")
            .unwrap_or(true);
        Ok(Self {
            api_port,
            paths,
            http: HttpConfig::from_env(),
            session: SessionConfig::from_env(),
            seed,
        })
    }

    pub fn new(api_port: u16, paths: BlogPaths) -> Self {
        Self {
            api_port,
            paths,
            http: HttpConfig::default(),
            session: SessionConfig::default(),
            seed: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl HttpConfig {
    pub fn from_env() -> Self {
        let max_body_bytes = env::var("BLOG_MAX_BODY_BYTES")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);
        Self { max_body_bytes }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            ttl_hours: DEFAULT_SESSION_TTL_HOURS,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let cookie_name = env::var("BLOG_SESSION_COOKIE")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());
        let ttl_hours = env::var("BLOG_SESSION_TTL_HOURS")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|hours| *hours > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        Self {
            cookie_name,
            ttl_hours,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlogPaths {
    pub base: PathBuf,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl BlogPaths {
    pub fn discover() -> Result<Self> {
        let exe_path = std::env::current_exe()
            .map_err(|err| anyhow!("failed to resolve current executable: {err}"))?;
        let base = exe_path
            .parent()
            .ok_or_else(|| anyhow!("executable path missing parent"))?
            .to_path_buf();
        Self::from_base_dir(base)
    }

    pub fn from_base_dir<P: AsRef<Path>>(base: P) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        let data_dir = base.join("data");
        let db_path = data_dir.join("blog.db");
        let logs_dir = base.join("logs");

        Ok(Self {
            base,
            data_dir,
            db_path,
            logs_dir,
        })
    }
}
