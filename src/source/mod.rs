//! Data source adapter: where the users document comes from and how it is parsed.
//!
//! A [`DataSource`] only knows how to retrieve the raw document body. The
//! free functions [`fetch_all`] and [`fetch_detail`] turn that body into
//! records. Both operations re-read the whole document; there is no
//! per-user endpoint.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DetailError, FetchError};

/// One record of the bulk list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub joined_at: Option<String>,
    #[serde(default)]
    pub last_seen: Option<String>,
}

/// Extended view of a single user, with the detail fields guaranteed present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDetail {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub status: String,
    pub bio: String,
    pub joined_at: String,
    pub last_seen: String,
}

/// Absent detail fields read as empty text.
impl From<UserSummary> for UserDetail {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            avatar: u.avatar,
            status: u.status,
            bio: u.bio.unwrap_or_default(),
            joined_at: u.joined_at.unwrap_or_default(),
            last_seen: u.last_seen.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct UsersDocument {
    #[serde(default)]
    users: Vec<UserSummary>,
}

/// Anything that can hand back the raw users document.
pub trait DataSource: Send + Sync {
    fn fetch(&self) -> Result<String, FetchError>;

    /// Human-readable location, used in logs and the header.
    fn describe(&self) -> String;
}

/// Reads the document over HTTP(S).
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl DataSource for HttpSource {
    fn fetch(&self) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        resp.text().map_err(|e| FetchError::Transport(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the document from the local filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for FileSource {
    fn fetch(&self) -> Result<String, FetchError> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| FetchError::Transport(format!("{}: {}", self.path.display(), e)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Pick a source for a `--source` value: URLs go over HTTP, everything else is a file path.
pub fn source_from_location(location: &str) -> Result<Arc<dyn DataSource>, FetchError> {
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(Arc::new(HttpSource::new(location)?))
    } else {
        Ok(Arc::new(FileSource::new(location)))
    }
}

fn parse_document(body: &str) -> Result<Vec<UserSummary>, FetchError> {
    serde_json::from_str::<UsersDocument>(body)
        .map(|doc| doc.users)
        .map_err(|e| FetchError::Parse(e.to_string()))
}

/// Retrieve and parse the bulk list.
pub fn fetch_all(source: &dyn DataSource) -> Result<Vec<UserSummary>, FetchError> {
    let body = source.fetch()?;
    let users = parse_document(&body)?;
    tracing::debug!(count = users.len(), source = %source.describe(), "fetched users");
    Ok(users)
}

/// Retrieve the whole document again and pick out one user by id.
pub fn fetch_detail(source: &dyn DataSource, id: &str) -> Result<UserDetail, DetailError> {
    let users = parse_document(&source.fetch()?)?;
    let user = users
        .into_iter()
        .find(|u| u.id == id)
        .ok_or_else(|| DetailError::NotFound(id.to_string()))?;
    Ok(UserDetail::from(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inline(&'static str);

    impl DataSource for Inline {
        fn fetch(&self) -> Result<String, FetchError> {
            Ok(self.0.to_string())
        }
        fn describe(&self) -> String {
            "inline".into()
        }
    }

    const DOC: &str = r#"{"users":[
        {"id":"1","name":"Anna Lee","email":"anna@co.com","status":"Active",
         "bio":"Writes docs","joinedAt":"2023-01-02T10:00:00Z","lastSeen":"2024-05-01T08:30:00Z"},
        {"id":"2","name":"Bob","email":"bob@co.com","status":"Inactive"}
    ]}"#;

    #[test]
    fn parses_camel_case_fields_and_optional_ones() {
        let users = fetch_all(&Inline(DOC)).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].joined_at.as_deref(), Some("2023-01-02T10:00:00Z"));
        assert!(users[1].bio.is_none());
        assert!(users[1].avatar.is_none());
    }

    #[test]
    fn missing_users_key_is_an_empty_list() {
        assert!(fetch_all(&Inline("{}")).unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        assert!(matches!(fetch_all(&Inline("<html>")), Err(FetchError::Parse(_))));
    }

    #[test]
    fn detail_not_found_vs_sparse_record() {
        let d = fetch_detail(&Inline(DOC), "1").unwrap();
        assert_eq!(d.bio, "Writes docs");
        assert!(matches!(fetch_detail(&Inline(DOC), "9"), Err(DetailError::NotFound(_))));

        let sparse = fetch_detail(&Inline(DOC), "2").unwrap();
        assert_eq!(sparse.name, "Bob");
        assert_eq!(sparse.bio, "");
        assert_eq!(sparse.joined_at, "");
        assert_eq!(sparse.last_seen, "");
    }

    #[test]
    fn location_picks_source_kind() {
        let s = source_from_location("data/users.json").unwrap();
        assert_eq!(s.describe(), "data/users.json");
        let s = source_from_location("https://example.com/users.json").unwrap();
        assert_eq!(s.describe(), "https://example.com/users.json");
    }

    #[test]
    fn missing_file_is_a_transport_error() {
        let s = FileSource::new("/nonexistent/users.json");
        assert!(matches!(s.fetch(), Err(FetchError::Transport(_))));
    }
}
