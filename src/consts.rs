//! Shared numeric and string defaults for the facetag crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Handle detection tolerance in pixels; also the drawn handle radius.
pub const HANDLE_RADIUS_PX: f64 = 10.0;

/// Smallest width or height a box can be resized to.
pub const MIN_BOX_SIZE_PX: f64 = 25.0;

/// Side length of the box inserted from the keyboard.
pub const NEW_BOX_SIZE_PX: f64 = 20.0;

/// Offset from a tag's top-left corner used as the point "inside" the tag
/// when asking the backend to retag or untag it.
pub const REPRESENTATIVE_POINT_OFFSET_PX: f64 = 1.0;

// ── Rendering ───────────────────────────────────────────────────

pub const BOX_COLOR: &str = "#05c4a9";
pub const PENDING_FILL: &str = "rgba(199, 87, 231, 0.2)";
pub const LABEL_FONT: &str = "14px Verdana";
pub const LINE_WIDTH: f64 = 2.0;
pub const SELECTED_LINE_WIDTH: f64 = 4.0;
pub const PENDING_LINE_WIDTH: f64 = 4.0;

// ── Recent names ────────────────────────────────────────────────

/// Number of recent names kept; digit keys 0–9 address these slots.
pub const RECENT_NAMES_CAPACITY: usize = 10;

/// Default `localStorage` key for the serialized recent-names list.
pub const RECENT_NAMES_STORAGE_KEY: &str = "facetag.recent_names";
