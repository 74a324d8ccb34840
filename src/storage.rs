use crate::error::StorageError;
use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Name of the credential record holding the bearer token.
pub const ACCESS_TOKEN: &str = "accessToken";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "strict",
            SameSite::Lax => "lax",
        }
    }
}

/// Attributes the token is stored with, mirroring a browser cookie.
#[derive(Debug, Clone)]
pub struct CookieOptions {
    pub path: String,
    pub max_age: Duration,
    pub same_site: SameSite,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self { path: "/".into(), max_age: Duration::days(1), same_site: SameSite::Strict }
    }
}

/// Where the credential token lives between runs.
///
/// `load` never fails: an unreadable store is the same as an empty one for the
/// session guard, the backend gets the final word through the 401 policy.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

// 9999-12-31T23:59:59Z, the last instant that round-trips through the text column.
const LATEST_EXPIRY_SECS: i64 = 253_402_300_799;

fn expiry(now: DateTime<Utc>, max_age: Duration) -> DateTime<Utc> {
    let latest = DateTime::from_timestamp(LATEST_EXPIRY_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC);
    now.checked_add_signed(max_age).map_or(latest, |at| at.min(latest))
}

/// SQLite-backed credential jar. Opens a connection per call.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    options: CookieOptions,
}

fn default_db_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "iagiliza", "ClinicDashboard")?;
    Some(proj.data_dir().join("credentials.sqlite"))
}

impl CredentialStore {
    /// Store in the platform data directory.
    pub fn open_default(options: CookieOptions) -> Result<Self, StorageError> {
        let path = default_db_path().ok_or(StorageError::NoDataDir)?;
        Self::open(path, options)
    }

    pub fn open(path: impl AsRef<Path>, options: CookieOptions) -> Result<Self, StorageError> {
        let store = Self { path: path.as_ref().to_path_buf(), options };
        store.init()?;
        Ok(store)
    }

    fn conn(&self) -> Result<Connection, StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Connection::open(&self.path)?)
    }

    fn init(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS credentials (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                path TEXT NOT NULL,
                same_site TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    pub fn set_at(&self, name: &str, value: &str, now: DateTime<Utc>) -> Result<(), StorageError> {
        let expires_at = expiry(now, self.options.max_age);
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO credentials (name, value, path, same_site, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(name) DO UPDATE SET
                value=excluded.value,
                path=excluded.path,
                same_site=excluded.same_site,
                expires_at=excluded.expires_at
            "#,
            params![name, value, self.options.path, self.options.same_site.as_str(), expires_at],
        )?;
        Ok(())
    }

    /// Value of a record that has not expired at `now`. Expired records are
    /// dropped on read.
    pub fn get_at(&self, name: &str, now: DateTime<Utc>) -> Result<Option<String>, StorageError> {
        let conn = self.conn()?;
        let row: Option<(String, DateTime<Utc>)> = conn
            .query_row(
                "SELECT value, expires_at FROM credentials WHERE name = ?1",
                params![name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        match row {
            Some((value, expires_at)) if expires_at > now => Ok(Some(value)),
            Some(_) => {
                conn.execute("DELETE FROM credentials WHERE name = ?1", params![name])?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn remove(&self, name: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM credentials WHERE name = ?1", params![name])?;
        Ok(())
    }
}

impl TokenStore for CredentialStore {
    fn load(&self) -> Option<String> {
        match self.get_at(ACCESS_TOKEN, Utc::now()) {
            Ok(token) => token,
            Err(e) => {
                log::warn!("could not read stored credentials: {e}");
                None
            }
        }
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        self.set_at(ACCESS_TOKEN, token, Utc::now())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.remove(ACCESS_TOKEN)
    }
}

/// Process-local store, for headless use and tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_string())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().map(|t| t.clone()).unwrap_or_default()
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
        Ok(())
    }
}
