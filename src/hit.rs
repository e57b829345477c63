#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::doc::{TagId, TagStore};
use crate::geom::{Point, Rect, near_handle, point_in_rect};

/// Which part of the pending box was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Handle(Corner),
}

/// Corner handle of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Handles in the order they are tested after the body.
    pub const ALL: [Self; 4] = [Self::TopLeft, Self::TopRight, Self::BottomLeft, Self::BottomRight];

    /// Position of this corner on `rect`.
    #[must_use]
    pub fn point(self, rect: &Rect) -> Point {
        match self {
            Self::TopLeft => rect.top_left(),
            Self::TopRight => rect.top_right(),
            Self::BottomLeft => rect.bottom_left(),
            Self::BottomRight => rect.bottom_right(),
        }
    }
}

/// How a click over several overlapping tags picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// The last matching tag in draw order wins (it is drawn on top).
    #[default]
    TopMost,
    /// The first matching tag in draw order wins and the scan stops.
    FirstMatch,
}

/// Test `pt` against the pending box: body first, then each corner handle.
#[must_use]
pub fn hit_box(pt: Point, rect: &Rect, handle_radius: f64) -> Option<HitPart> {
    if point_in_rect(pt.x, pt.y, rect) {
        return Some(HitPart::Body);
    }
    Corner::ALL
        .into_iter()
        .find(|corner| near_handle(pt.x, pt.y, corner.point(rect), handle_radius))
        .map(HitPart::Handle)
}

/// Test `pt` against every tag, resolving overlaps with `policy`.
#[must_use]
pub fn hit_tag(pt: Point, tags: &TagStore, policy: HitPolicy) -> Option<TagId> {
    let mut hits = tags.iter().filter(|t| point_in_rect(pt.x, pt.y, &t.rect));
    match policy {
        HitPolicy::TopMost => hits.last(),
        HitPolicy::FirstMatch => hits.next(),
    }
    .map(|t| t.id)
}
