//! Document model: face tags and the ordered in-memory tag store.
//!
//! Tags arrive from the host page's embedded data (`TagRecord`) and from
//! successful create replies. Each tag carries two identities: the backend's
//! opaque `FaceId`, and a locally minted `TagId` that never changes while the
//! editor lives. Positions in the store are only draw/iteration order; late
//! network replies find their target by `TagId`, so deleting an earlier tag
//! cannot redirect a reply to the wrong face.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::REPRESENTATIVE_POINT_OFFSET_PX;
use crate::geom::{Point, Rect};

/// Stable local identifier for a tag.
pub type TagId = Uuid;

/// Opaque backend identifier linking a tag to a recognized face entity.
///
/// The gallery backend currently hands out integers, but nothing here
/// depends on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaceId {
    Int(i64),
    Text(String),
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A named rectangular region over a face in the photo.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// Local identity; survives reordering and deletion of other tags.
    pub id: TagId,
    /// Backend face identity. `None` while the backend has not assigned one.
    pub face_id: Option<FaceId>,
    /// Display name drawn above the rectangle.
    pub name: String,
    /// Image-local bounds.
    pub rect: Rect,
}

impl Tag {
    /// Create a tag with a freshly minted local id.
    #[must_use]
    pub fn new(face_id: Option<FaceId>, name: impl Into<String>, rect: Rect) -> Self {
        Self { id: Uuid::new_v4(), face_id, name: name.into(), rect }
    }

    /// A point strictly inside the tag that the backend uses to locate the face.
    #[must_use]
    pub fn representative_point(&self) -> Point {
        Point::new(
            self.rect.left + REPRESENTATIVE_POINT_OFFSET_PX,
            self.rect.top + REPRESENTATIVE_POINT_OFFSET_PX,
        )
    }
}

/// A tag as embedded by the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    #[serde(default)]
    pub face_id: Option<FaceId>,
    pub name: String,
    #[serde(flatten)]
    pub rect: Rect,
}

/// Ordered store of tags. Later tags draw on top of earlier ones.
#[derive(Debug, Clone, Default)]
pub struct TagStore {
    tags: Vec<Tag>,
}

impl TagStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Build a store from host records, dropping records without area.
    #[must_use]
    pub fn from_records(records: Vec<TagRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            if record.rect.is_empty() {
                log::debug!("skipping tag '{}' with empty bounds", record.name);
                continue;
            }
            store.push(Tag::new(record.face_id, record.name, record.rect));
        }
        store
    }

    /// Append a tag at the end of the draw order.
    pub fn push(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    /// Remove a tag by id, shifting every later tag down one position.
    pub fn remove(&mut self, id: &TagId) -> Option<Tag> {
        let index = self.position(id)?;
        Some(self.tags.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| &t.id == id)
    }

    pub fn get_mut(&mut self, id: &TagId) -> Option<&mut Tag> {
        self.tags.iter_mut().find(|t| &t.id == id)
    }

    /// Current position of a tag in draw order.
    #[must_use]
    pub fn position(&self, id: &TagId) -> Option<usize> {
        self.tags.iter().position(|t| &t.id == id)
    }

    /// Tag at a draw-order position.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
