//! Editor engine: the browser-free state machine behind the overlay.
//!
//! `EditorCore` owns the tags, the selection, the pending box, the drag state
//! and the recent-names cache. Every input handler returns a list of
//! [`Action`]s that the host carries out: redraw, ask the user for a name,
//! send a backend request, or persist the recent names. Backend replies come
//! back through [`EditorCore::apply_reply`], which re-resolves the target by
//! its stable id and drops replies whose target is gone.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use uuid::Uuid;

use crate::config::{EditorConfig, PageData};
use crate::doc::{Tag, TagId, TagRecord, TagStore};
use crate::geom::{Point, Rect};
use crate::hit::{self, HitPart};
use crate::input::{DragState, KeyCommand, PointerPhase, PointerSample, TouchTracker};
use crate::recent::RecentNames;
use crate::sync::{
    ApiCall, ApiReply, CreateStatus, CreateTagRequest, RenameRequest, RetagRequest, SyncError, SyncRequest, Ticket,
    UntagRequest,
};

/// Errors from user-initiated edits, raised before any request is built.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("name is empty")]
    EmptyName,

    #[error("no tag is selected")]
    NoSelection,

    #[error("no pending box to tag")]
    NoPendingBox,

    /// The tag was removed after the prompt was opened.
    #[error("tag {0} no longer exists")]
    StaleTag(TagId),

    /// The tag has no backend face id to address.
    #[error("tag {0} has no face id yet")]
    Unsynced(TagId),
}

/// What a name prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePrompt {
    /// Name the pending box and create a tag from it.
    NewTag,
    /// Change the display name of a face, keeping its identity.
    Rename { tag_id: TagId },
    /// Reassign a tag to the face with the given name.
    Retag { tag_id: TagId },
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    /// Ask the user for a name, then call [`EditorCore::submit_name`].
    PromptName(NamePrompt),
    /// Issue a backend request, then call [`EditorCore::apply_reply`].
    Send(SyncRequest),
    /// Persist the recent-names list.
    RecentNamesChanged(Vec<String>),
}

/// A not-yet-committed box being drawn or adjusted before naming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingBox {
    /// Identity of this box, so a late create reply only clears the box it was sent for.
    pub id: Uuid,
    pub rect: Rect,
}

impl PendingBox {
    fn new(rect: Rect) -> Self {
        Self { id: Uuid::new_v4(), rect }
    }
}

/// Core editor state for one photo.
pub struct EditorCore {
    pub config: EditorConfig,
    /// Backend identifier of the photo.
    pub src_filename: String,
    pub tags: TagStore,
    pub selected: Option<TagId>,
    pub pending: Option<PendingBox>,
    pub drag: DragState,
    /// Finger driving the current touch gesture.
    pub touch: TouchTracker,
    pub recent: RecentNames,
    /// Names known to the backend, for prompt suggestions.
    pub known_names: Vec<String>,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl EditorCore {
    /// Empty editor for a `width` x `height` photo.
    #[must_use]
    pub fn new(src_filename: impl Into<String>, width: f64, height: f64, config: EditorConfig) -> Self {
        Self {
            config,
            src_filename: src_filename.into(),
            tags: TagStore::new(),
            selected: None,
            pending: None,
            drag: DragState::Idle,
            touch: TouchTracker::default(),
            recent: RecentNames::new(),
            known_names: Vec::new(),
            canvas_width: width,
            canvas_height: height,
        }
    }

    /// Editor hydrated from host page data.
    #[must_use]
    pub fn from_page(page: PageData, config: EditorConfig, recent: RecentNames) -> Self {
        let mut core = Self::new(page.src_filename, page.width, page.height, config);
        core.load_tags(page.tags);
        core.known_names = page.names;
        core.recent = recent;
        core
    }

    /// Replace all tags, clearing selection and any gesture.
    pub fn load_tags(&mut self, records: Vec<TagRecord>) {
        self.tags = TagStore::from_records(records);
        self.selected = None;
        self.pending = None;
        self.drag = DragState::Idle;
        self.touch = TouchTracker::default();
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<TagId> {
        self.selected
    }

    /// Draw-order position of the selected tag.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|id| self.tags.position(&id))
    }

    #[must_use]
    pub fn pending_rect(&self) -> Option<Rect> {
        self.pending.map(|b| b.rect)
    }

    // --- Selection ---

    /// Select a tag by draw-order position.
    pub fn select_index(&mut self, index: usize) -> Vec<Action> {
        let Some(id) = self.tags.at(index).map(|t| t.id) else {
            return Vec::new();
        };
        self.selected = Some(id);
        vec![Action::RenderNeeded]
    }

    /// Select the next tag in draw order, wrapping; selects the first when none is selected.
    pub fn cycle_selection(&mut self) -> Vec<Action> {
        if self.tags.is_empty() {
            return Vec::new();
        }
        let next = self.selected_index().map_or(0, |i| (i + 1) % self.tags.len());
        self.select_index(next)
    }

    // --- Pending box ---

    /// Place a fresh pending box centered on the canvas, no smaller than the resize floor.
    pub fn new_box(&mut self) -> Vec<Action> {
        let size = self.config.new_box_size.max(self.config.min_box_size);
        let rect = Rect::new(
            self.canvas_width / 2.0 - size / 2.0,
            self.canvas_height / 2.0 - size / 2.0,
            size,
            size,
        );
        self.pending = Some(PendingBox::new(rect));
        self.drag = DragState::Idle;
        vec![Action::RenderNeeded]
    }

    /// Discard the pending box and end any gesture.
    pub fn cancel_box(&mut self) -> Vec<Action> {
        if self.pending.is_none() && self.drag.is_idle() {
            return Vec::new();
        }
        self.pending = None;
        self.drag = DragState::Idle;
        vec![Action::RenderNeeded]
    }

    // --- Pointer input ---

    /// Route a raw mouse or touch sample to the matching pointer handler.
    ///
    /// `origin` is the canvas's client-space top-left. Touches from fingers
    /// other than the one that started the gesture are ignored.
    pub fn on_pointer(&mut self, phase: PointerPhase, sample: &PointerSample, origin: Point) -> Vec<Action> {
        let Some(pt) = sample.canvas_point(phase, &mut self.touch, origin) else {
            return Vec::new();
        };
        match phase {
            PointerPhase::Down => self.on_pointer_down(pt),
            PointerPhase::Move => self.on_pointer_move(pt),
            PointerPhase::Up => self.on_pointer_up(pt),
        }
    }

    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        if let Some(pending) = self.pending {
            return match hit::hit_box(pt, &pending.rect, self.config.handle_radius) {
                Some(HitPart::Body) => {
                    self.drag = DragState::MovingWholeBox { last: pt };
                    vec![Action::RenderNeeded]
                }
                Some(HitPart::Handle(corner)) => {
                    self.drag = DragState::resizing(corner);
                    vec![Action::RenderNeeded]
                }
                None => Vec::new(),
            };
        }

        if let Some(id) = hit::hit_tag(pt, &self.tags, self.config.hit_policy) {
            self.selected = Some(id);
            self.drag = DragState::Idle;
            return vec![Action::RenderNeeded];
        }

        if self.config.drag_to_create {
            self.pending = Some(PendingBox::new(Rect::new(pt.x, pt.y, 0.0, 0.0)));
            self.drag = DragState::DraggingNewBox { start: pt };
            return vec![Action::RenderNeeded];
        }

        Vec::new()
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let Some(pending) = self.pending.as_mut() else {
            return Vec::new();
        };
        let min = self.config.min_box_size;
        let r = &mut pending.rect;

        match self.drag {
            DragState::Idle => return Vec::new(),
            DragState::MovingWholeBox { last } => {
                *r = r.translated_within(pt.x - last.x, pt.y - last.y, self.canvas_width, self.canvas_height);
                self.drag = DragState::MovingWholeBox { last: pt };
            }
            DragState::ResizingTopLeft => {
                drag_left_edge(r, pt.x, min);
                drag_top_edge(r, pt.y, min);
            }
            DragState::ResizingTopRight => {
                drag_right_edge(r, pt.x, min);
                drag_top_edge(r, pt.y, min);
            }
            DragState::ResizingBottomLeft => {
                drag_left_edge(r, pt.x, min);
                drag_bottom_edge(r, pt.y, min);
            }
            DragState::ResizingBottomRight => {
                // This corner floors to the minimum rather than anchoring.
                r.width = (pt.x - r.left).max(min);
                r.height = (pt.y - r.top).max(min);
            }
            DragState::DraggingNewBox { start } => {
                *r = Rect::from_corners(start, pt);
            }
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        match std::mem::take(&mut self.drag) {
            DragState::Idle => Vec::new(),
            DragState::DraggingNewBox { start } => {
                let rect = Rect::from_corners(start, pt);
                if rect.is_empty() {
                    self.pending = None;
                    return vec![Action::RenderNeeded];
                }
                if let Some(pending) = self.pending.as_mut() {
                    pending.rect = rect;
                }
                vec![Action::RenderNeeded, Action::PromptName(NamePrompt::NewTag)]
            }
            DragState::MovingWholeBox { .. }
            | DragState::ResizingTopLeft
            | DragState::ResizingTopRight
            | DragState::ResizingBottomLeft
            | DragState::ResizingBottomRight => vec![Action::RenderNeeded],
        }
    }

    // --- Keyboard input ---

    /// Handle a browser key name. Unbound keys and commands whose
    /// precondition is unmet are no-ops.
    pub fn on_key_down(&mut self, key: &str) -> Vec<Action> {
        let Some(command) = self.config.keymap.command_for(key) else {
            return Vec::new();
        };
        match command {
            KeyCommand::NewBox => self.new_box(),
            KeyCommand::CancelBox => self.cancel_box(),
            KeyCommand::CycleSelection => self.cycle_selection(),
            KeyCommand::CommitBox => {
                if self.pending.is_none() {
                    return Vec::new();
                }
                vec![Action::PromptName(NamePrompt::NewTag)]
            }
            KeyCommand::Rename => self
                .selected
                .map(|tag_id| vec![Action::PromptName(NamePrompt::Rename { tag_id })])
                .unwrap_or_default(),
            KeyCommand::Retag => self
                .selected
                .map(|tag_id| vec![Action::PromptName(NamePrompt::Retag { tag_id })])
                .unwrap_or_default(),
            KeyCommand::Delete => {
                let Some(tag_id) = self.selected else {
                    return Vec::new();
                };
                send_or_log(self.request_untag(tag_id))
            }
            KeyCommand::RecentName(slot) => {
                let Some(tag_id) = self.selected else {
                    return Vec::new();
                };
                let Some(name) = self.recent.get(slot).map(str::to_owned) else {
                    return Vec::new();
                };
                send_or_log(self.request_retag(tag_id, &name))
            }
        }
    }

    // --- Name submission ---

    /// Complete a prompt with the user's input and build the matching request.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::EmptyName`] for blank input, and the errors of the
    /// underlying request builder when its target is missing.
    pub fn submit_name(&mut self, prompt: NamePrompt, raw: &str) -> Result<Vec<Action>, EditError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(EditError::EmptyName);
        }
        let request = match prompt {
            NamePrompt::NewTag => self.request_create(name)?,
            NamePrompt::Rename { tag_id } => self.request_rename(tag_id, name)?,
            NamePrompt::Retag { tag_id } => self.request_retag(tag_id, name)?,
        };
        Ok(vec![Action::Send(request)])
    }

    /// Build a create request for the pending box.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoPendingBox`] when there is no box to tag.
    pub fn request_create(&self, name: &str) -> Result<SyncRequest, EditError> {
        let pending = self.pending.ok_or(EditError::NoPendingBox)?;
        let rect = pending.rect;
        Ok(SyncRequest {
            ticket: Ticket::Create { box_id: pending.id, rect },
            call: ApiCall::Create(CreateTagRequest {
                src_filename: self.src_filename.clone(),
                name: name.to_owned(),
                left: rect.left,
                top: rect.top,
                width: rect.width,
                height: rect.height,
            }),
        })
    }

    /// Build a request reassigning `tag_id` to the face called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::StaleTag`] or [`EditError::Unsynced`].
    pub fn request_retag(&self, tag_id: TagId, name: &str) -> Result<SyncRequest, EditError> {
        let tag = self.synced_tag(tag_id)?;
        let face_id = tag.face_id.clone().ok_or(EditError::Unsynced(tag_id))?;
        let at = tag.representative_point();
        Ok(SyncRequest {
            ticket: Ticket::Retag { tag_id },
            call: ApiCall::Retag(RetagRequest {
                src_filename: self.src_filename.clone(),
                face_id,
                name: name.to_owned(),
                x: at.x,
                y: at.y,
            }),
        })
    }

    /// Build a request renaming the face behind `tag_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::StaleTag`] or [`EditError::Unsynced`].
    pub fn request_rename(&self, tag_id: TagId, name: &str) -> Result<SyncRequest, EditError> {
        let tag = self.synced_tag(tag_id)?;
        let face_id = tag.face_id.clone().ok_or(EditError::Unsynced(tag_id))?;
        Ok(SyncRequest {
            ticket: Ticket::Rename { tag_id },
            call: ApiCall::Rename(RenameRequest { face_id, name: name.to_owned() }),
        })
    }

    /// Build a request removing `tag_id` from the photo.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::StaleTag`] or [`EditError::Unsynced`].
    pub fn request_untag(&self, tag_id: TagId) -> Result<SyncRequest, EditError> {
        let tag = self.synced_tag(tag_id)?;
        let face_id = tag.face_id.clone().ok_or(EditError::Unsynced(tag_id))?;
        let at = tag.representative_point();
        Ok(SyncRequest {
            ticket: Ticket::Untag { tag_id },
            call: ApiCall::Untag(UntagRequest { src_filename: self.src_filename.clone(), face_id, x: at.x, y: at.y }),
        })
    }

    fn synced_tag(&self, tag_id: TagId) -> Result<&Tag, EditError> {
        self.tags.get(&tag_id).ok_or(EditError::StaleTag(tag_id))
    }

    // --- Backend replies ---

    /// Merge the outcome of `request` into local state.
    ///
    /// Failures and replies whose target has since disappeared are logged and
    /// leave state untouched.
    pub fn apply_reply(&mut self, request: &SyncRequest, result: Result<ApiReply, SyncError>) -> Vec<Action> {
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("{} failed, local state left unchanged: {e}", request.call.path());
                return Vec::new();
            }
        };

        match (request.ticket, reply) {
            (Ticket::Create { box_id, rect }, ApiReply::Created(resp)) => match resp.status {
                CreateStatus::Ok => {
                    let name = match (&resp.name, &request.call) {
                        (Some(name), _) => name.clone(),
                        (None, ApiCall::Create(call)) => call.name.clone(),
                        (None, _) => String::new(),
                    };
                    self.tags.push(Tag::new(resp.face_id, name.clone(), rect));
                    if self.pending.is_some_and(|p| p.id == box_id) {
                        self.pending = None;
                        self.drag = DragState::Idle;
                    }
                    self.remember(&name)
                }
                CreateStatus::Pending => {
                    log::info!("backend could not resolve a face in the box; nothing tagged");
                    Vec::new()
                }
                CreateStatus::Unknown => {
                    log::warn!("create returned an unrecognized status; nothing tagged");
                    Vec::new()
                }
            },
            (Ticket::Retag { tag_id }, ApiReply::Retagged(resp)) => {
                let Some(tag) = self.tags.get_mut(&tag_id) else {
                    log::debug!("dropping retag reply for removed tag {tag_id}");
                    return Vec::new();
                };
                tag.face_id = Some(resp.new_face_id);
                tag.name.clone_from(&resp.name);
                self.remember(&resp.name)
            }
            (Ticket::Rename { tag_id }, ApiReply::Renamed(resp)) => {
                let Some(tag) = self.tags.get_mut(&tag_id) else {
                    log::debug!("dropping rename reply for removed tag {tag_id}");
                    return Vec::new();
                };
                tag.name.clone_from(&resp.name);
                self.remember(&resp.name)
            }
            (Ticket::Untag { tag_id }, ApiReply::Untagged(_)) => {
                if self.tags.remove(&tag_id).is_none() {
                    log::debug!("dropping untag reply for removed tag {tag_id}");
                    return Vec::new();
                }
                if self.selected == Some(tag_id) {
                    self.selected = None;
                }
                vec![Action::RenderNeeded]
            }
            (ticket, reply) => {
                log::warn!("{}: {ticket:?} answered by {reply:?}", SyncError::Mismatch);
                Vec::new()
            }
        }
    }

    /// Record `name` as recently used and request a redraw.
    fn remember(&mut self, name: &str) -> Vec<Action> {
        let mut actions = vec![Action::RenderNeeded];
        if !name.is_empty() && self.recent.add(name) {
            actions.push(Action::RecentNamesChanged(self.recent.list().to_vec()));
        }
        actions
    }
}

fn send_or_log(request: Result<SyncRequest, EditError>) -> Vec<Action> {
    match request {
        Ok(request) => vec![Action::Send(request)],
        Err(e) => {
            log::warn!("request not sent: {e}");
            Vec::new()
        }
    }
}

// The three anchoring edges move only while the box stays at least `min`
// wide/tall; otherwise the edge stays put.

fn drag_left_edge(r: &mut Rect, x: f64, min: f64) {
    let right = r.right();
    if x < right - min {
        r.left = x;
        r.width = right - x;
    }
}

fn drag_top_edge(r: &mut Rect, y: f64, min: f64) {
    let bottom = r.bottom();
    if y < bottom - min {
        r.top = y;
        r.height = bottom - y;
    }
}

fn drag_right_edge(r: &mut Rect, x: f64, min: f64) {
    if x > r.left + min {
        r.width = x - r.left;
    }
}

fn drag_bottom_edge(r: &mut Rect, y: f64, min: f64) {
    if y > r.top + min {
        r.height = y - r.top;
    }
}
