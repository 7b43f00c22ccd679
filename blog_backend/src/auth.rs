//! Session handling for the author's gated endpoints.
//!
//! Identity issuance belongs to an external provider; this module only
//! stores sessions against known users and answers "is this token a live
//! session". Tokens are handed out once and stored as blake3 digests.

use crate::config::SessionConfig;
use crate::database::models::{SessionRecord, UserRecord};
use crate::database::repositories::{SessionRepository, UserRepository};
use crate::database::Database;
use crate::schema::User;
use crate::utils::{format_timestamp, now_utc_iso};
use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::RngCore;
use uuid::Uuid;

const TOKEN_BYTES: usize = 32;

/// Profile fields supplied by the identity provider when a user signs in.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user: User,
    pub expires_at: String,
}

#[derive(Clone)]
pub struct SessionService {
    database: Database,
    ttl: Duration,
}

impl SessionService {
    pub fn new(database: Database, config: &SessionConfig) -> Self {
        Self {
            database,
            ttl: Duration::hours(config.ttl_hours),
        }
    }

    /// Records the user and opens a fresh session for them.
    pub fn sign_in(&self, profile: UserProfile) -> Result<IssuedSession> {
        let now = now_utc_iso();
        let user = UserRecord {
            id: profile.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            profile_image_url: profile.profile_image_url,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        let token = generate_token();
        let expires_at = format_timestamp(Utc::now() + self.ttl);
        let session = SessionRecord {
            token_hash: hash_token(&token),
            user_id: user.id.clone(),
            created_at: now,
            expires_at: expires_at.clone(),
        };

        let stored = self.database.with_repositories(|repos| {
            repos.users().upsert(&user)?;
            repos.sessions().create(&session)?;
            repos
                .users()
                .get(&user.id)?
                .context("user missing right after upsert")
        })?;
        tracing::info!(user_id = %stored.id, %expires_at, "session issued");

        Ok(IssuedSession {
            token,
            user: User::from(stored),
            expires_at,
        })
    }

    /// Resolves a token to its user if the session exists, has not expired
    /// and the user is still known.
    pub fn authenticate(&self, token: &str) -> Result<Option<User>> {
        let token_hash = hash_token(token);
        let now = now_utc_iso();
        self.database.with_repositories(|repos| {
            let Some(session) = repos.sessions().find_active(&token_hash, &now)? else {
                return Ok(None);
            };
            Ok(repos.users().get(&session.user_id)?.map(User::from))
        })
    }

    /// Returns whether a session was removed.
    pub fn sign_out(&self, token: &str) -> Result<bool> {
        let token_hash = hash_token(token);
        let removed = self
            .database
            .with_repositories(|repos| repos.sessions().delete(&token_hash))?;
        tracing::info!(removed, "session revoked");
        Ok(removed)
    }

    pub fn purge_expired(&self) -> Result<usize> {
        let now = now_utc_iso();
        self.database
            .with_repositories(|repos| repos.sessions().purge_expired(&now))
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn hash_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}
