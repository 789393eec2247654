//! Access to the remote notes endpoint.

use log::{info, warn};
use thiserror::Error;

use crate::note::{Note, SavedNote};

const NOTES_PATH: &str = "/api/notes";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not read response from {url}")]
    Read {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode note")]
    Encode(#[source] serde_json::Error),
}

/// Where notes are listed, fetched and saved.
pub trait NoteStore: Send + Sync {
    fn list(&self) -> Result<Vec<Note>, StoreError>;

    /// `Ok(None)` when no note has this id.
    fn get(&self, id: &str) -> Result<Option<Note>, StoreError>;

    /// Saves the note and returns the id the endpoint assigned to it.
    fn save(&self, note: &Note) -> Result<String, StoreError>;
}

/// `NoteStore` speaking JSON over HTTP to `{base_url}/api/notes`.
#[derive(Clone, Debug)]
pub struct HttpNoteStore {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpNoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notes_url(&self) -> String {
        format!("{}{}", self.base_url, NOTES_PATH)
    }

    fn note_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, NOTES_PATH, encode_path_segment(id))
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        url: &str,
        response: ureq::Response,
    ) -> Result<T, StoreError> {
        let body = response.into_string().map_err(|source| StoreError::Read {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| StoreError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl NoteStore for HttpNoteStore {
    fn list(&self) -> Result<Vec<Note>, StoreError> {
        let url = self.notes_url();
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|err| request_error(&url, err))?;
        let notes: Vec<Note> = Self::read_json(&url, response)?;
        info!("listed {} note(s) from {url}", notes.len());
        Ok(notes)
    }

    fn get(&self, id: &str) -> Result<Option<Note>, StoreError> {
        let url = self.note_url(id);
        match self.agent.get(&url).call() {
            Ok(response) => Self::read_json(&url, response).map(Some),
            Err(ureq::Error::Status(404, _)) => {
                info!("no note with id {id} at {url}");
                Ok(None)
            }
            Err(err) => Err(request_error(&url, err)),
        }
    }

    fn save(&self, note: &Note) -> Result<String, StoreError> {
        let url = self.notes_url();
        let body = serde_json::to_string(note).map_err(StoreError::Encode)?;
        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|err| request_error(&url, err))?;
        let saved: SavedNote = Self::read_json(&url, response)?;
        info!("saved note {} to {url}", saved.id);
        Ok(saved.id)
    }
}

fn request_error(url: &str, err: ureq::Error) -> StoreError {
    let error = match err {
        ureq::Error::Status(status, _) => StoreError::Status {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(transport) => StoreError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    };
    warn!("{error}");
    error
}

fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
