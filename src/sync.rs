//! Remote sync: backend wire types and the HTTP client.
//!
//! Every tag mutation becomes one JSON `POST` against the gallery backend.
//! The editor never applies a mutation optimistically; it hands the host a
//! [`SyncRequest`] and merges the reply later, keyed by the request's
//! [`Ticket`]. Requests are fire-and-forget: there is no retry, no timeout,
//! and no cancellation, so a lost reply leaves local state behind the server
//! until the page is reloaded.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::doc::{FaceId, TagId};
use crate::geom::Rect;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The request never produced a response (network, CORS, bad URL).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// The response body did not match the endpoint's reply shape.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// The reply kind does not answer the request it was paired with.
    #[error("reply does not match request")]
    Mismatch,
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTagRequest {
    pub src_filename: String,
    pub name: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Outcome of a create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CreateStatus {
    #[serde(rename = "ok", alias = "OK", alias = "Ok")]
    Ok,
    /// The backend could not resolve a face in the box; nothing was tagged.
    #[serde(rename = "pending", alias = "PENDING")]
    Pending,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateTagResponse {
    pub status: CreateStatus,
    #[serde(default)]
    pub face_id: Option<FaceId>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetagRequest {
    pub src_filename: String,
    pub face_id: FaceId,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetagResponse {
    pub new_face_id: FaceId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenameRequest {
    pub face_id: FaceId,
    pub name: String,
}

/// Rename reply. Some backends echo a face id; the editor ignores it because
/// a rename keeps the face identity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenameResponse {
    #[serde(default)]
    pub new_face_id: Option<FaceId>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UntagRequest {
    pub src_filename: String,
    pub face_id: FaceId,
    pub x: f64,
    pub y: f64,
}

/// Untag acknowledgement; any 2xx JSON body counts.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct UntagResponse {
    #[serde(default)]
    pub status: Option<String>,
}

// =============================================================================
// CALLS AND REPLIES
// =============================================================================

/// One backend call. Serializes as the bare request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiCall {
    Create(CreateTagRequest),
    Retag(RetagRequest),
    Rename(RenameRequest),
    Untag(UntagRequest),
}

impl ApiCall {
    /// Endpoint path, relative to the API base.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Create(_) => "/tag",
            Self::Retag(_) => "/retag",
            Self::Rename(_) => "/rename",
            Self::Untag(_) => "/untag",
        }
    }

    /// Parse a response body into the reply type for this call.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Decode`] if the body does not match.
    pub fn decode_reply(&self, body: &str) -> Result<ApiReply, SyncError> {
        let decode = |e: serde_json::Error| SyncError::Decode(e.to_string());
        Ok(match self {
            Self::Create(_) => ApiReply::Created(serde_json::from_str(body).map_err(decode)?),
            Self::Retag(_) => ApiReply::Retagged(serde_json::from_str(body).map_err(decode)?),
            Self::Rename(_) => ApiReply::Renamed(serde_json::from_str(body).map_err(decode)?),
            Self::Untag(_) => ApiReply::Untagged(if body.trim().is_empty() {
                UntagResponse::default()
            } else {
                serde_json::from_str(body).map_err(decode)?
            }),
        })
    }
}

/// A decoded backend reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    Created(CreateTagResponse),
    Retagged(RetagResponse),
    Renamed(RenameResponse),
    Untagged(UntagResponse),
}

/// What a request targets locally, so its reply can be merged (or dropped)
/// after arbitrary intervening edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ticket {
    /// Create from the pending box `box_id`, whose bounds were `rect` when sent.
    Create { box_id: Uuid, rect: Rect },
    Retag { tag_id: TagId },
    Rename { tag_id: TagId },
    Untag { tag_id: TagId },
}

/// A call paired with the ticket its reply must be merged under.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncRequest {
    pub ticket: Ticket,
    pub call: ApiCall,
}

// =============================================================================
// CLIENT
// =============================================================================

/// JSON-over-HTTP client for the tagging endpoints.
///
/// Uses `fetch` under WebAssembly and hyper natively.
#[derive(Debug, Clone)]
pub struct TagClient {
    http: reqwest::Client,
    base_url: String,
}

impl TagClient {
    /// Client for endpoints under `base_url` (e.g. `https://gallery.local`).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_string() }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue `call` and decode its reply.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Request`] on transport failure, [`SyncError::Status`]
    /// for non-2xx responses, and [`SyncError::Decode`] for unexpected bodies.
    pub async fn send(&self, call: &ApiCall) -> Result<ApiReply, SyncError> {
        let url = format!("{}{}", self.base_url, call.path());
        let response = self
            .http
            .post(&url)
            .json(call)
            .send()
            .await
            .map_err(|e| SyncError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| SyncError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(SyncError::Status { status, body: text });
        }

        call.decode_reply(&text)
    }
}
