use super::*;

// =============================================================
// DragState
// =============================================================

#[test]
fn drag_state_default_is_idle() {
    assert!(DragState::default().is_idle());
}

#[test]
fn drag_state_resizing_maps_each_corner() {
    assert_eq!(DragState::resizing(Corner::TopLeft), DragState::ResizingTopLeft);
    assert_eq!(DragState::resizing(Corner::TopRight), DragState::ResizingTopRight);
    assert_eq!(DragState::resizing(Corner::BottomLeft), DragState::ResizingBottomLeft);
    assert_eq!(DragState::resizing(Corner::BottomRight), DragState::ResizingBottomRight);
}

#[test]
fn drag_state_active_variants_are_not_idle() {
    assert!(!DragState::MovingWholeBox { last: Point::new(0.0, 0.0) }.is_idle());
    assert!(!DragState::DraggingNewBox { start: Point::new(0.0, 0.0) }.is_idle());
    assert!(!DragState::ResizingBottomRight.is_idle());
}

// =============================================================
// PointerSample
// =============================================================

fn finger(id: i32, x: f64, y: f64) -> TouchPoint {
    TouchPoint { id, client: Point::new(x, y) }
}

const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

#[test]
fn mouse_sample_is_offset_by_canvas_origin() {
    let s = PointerSample::Mouse { client: Point::new(120.0, 80.0) };
    let mut tracker = TouchTracker::default();
    assert_eq!(
        s.canvas_point(PointerPhase::Down, &mut tracker, Point::new(20.0, 30.0)),
        Some(Point::new(100.0, 50.0))
    );
    assert_eq!(tracker.finger(), None);
}

#[test]
fn mouse_and_single_touch_agree() {
    let origin = Point::new(5.0, 5.0);
    let mouse = PointerSample::Mouse { client: Point::new(40.0, 60.0) };
    let touch = PointerSample::Touch { touches: vec![finger(1, 40.0, 60.0)] };
    let mut tracker = TouchTracker::default();
    assert_eq!(
        mouse.canvas_point(PointerPhase::Down, &mut tracker, origin),
        touch.canvas_point(PointerPhase::Down, &mut tracker, origin)
    );
}

#[test]
fn touch_sample_without_touches_is_ignored() {
    let s = PointerSample::Touch { touches: Vec::new() };
    let mut tracker = TouchTracker::default();
    assert_eq!(s.canvas_point(PointerPhase::Down, &mut tracker, ORIGIN), None);
    assert_eq!(s.canvas_point(PointerPhase::Move, &mut tracker, ORIGIN), None);
}

// =============================================================
// TouchTracker
// =============================================================

#[test]
fn single_finger_gesture_is_followed_to_the_end() {
    let mut t = TouchTracker::default();
    assert_eq!(t.track(PointerPhase::Down, &[finger(7, 10.0, 10.0)]), Some(Point::new(10.0, 10.0)));
    assert_eq!(t.finger(), Some(7));
    assert_eq!(t.track(PointerPhase::Move, &[finger(7, 30.0, 40.0)]), Some(Point::new(30.0, 40.0)));
    assert_eq!(t.track(PointerPhase::Up, &[finger(7, 35.0, 45.0)]), Some(Point::new(35.0, 45.0)));
    assert_eq!(t.finger(), None);
}

#[test]
fn gesture_cannot_start_with_two_fingers() {
    let mut t = TouchTracker::default();
    assert_eq!(t.track(PointerPhase::Down, &[finger(1, 0.0, 0.0), finger(2, 9.0, 9.0)]), None);
    assert_eq!(t.finger(), None);
    assert_eq!(t.track(PointerPhase::Move, &[finger(1, 5.0, 5.0)]), None);
}

#[test]
fn second_finger_is_ignored_while_first_is_down() {
    let mut t = TouchTracker::default();
    t.track(PointerPhase::Down, &[finger(1, 10.0, 10.0)]);

    assert_eq!(t.track(PointerPhase::Down, &[finger(1, 60.0, 60.0), finger(2, 200.0, 200.0)]), None);
    assert_eq!(t.finger(), Some(1));

    // Moves report every active finger; only the tracked one counts.
    assert_eq!(
        t.track(PointerPhase::Move, &[finger(2, 210.0, 210.0), finger(1, 70.0, 70.0)]),
        Some(Point::new(70.0, 70.0))
    );
    assert_eq!(t.track(PointerPhase::Move, &[finger(2, 220.0, 220.0)]), None);

    assert_eq!(t.track(PointerPhase::Up, &[finger(2, 220.0, 220.0)]), None);
    assert_eq!(t.finger(), Some(1));
}

#[test]
fn lost_finger_does_not_block_next_gesture() {
    let mut t = TouchTracker::default();
    t.track(PointerPhase::Down, &[finger(1, 10.0, 10.0)]);
    assert_eq!(t.track(PointerPhase::Down, &[finger(4, 50.0, 50.0)]), Some(Point::new(50.0, 50.0)));
    assert_eq!(t.finger(), Some(4));
}

// =============================================================
// Keymap
// =============================================================

#[test]
fn default_keymap_bindings() {
    let km = Keymap::default();
    assert_eq!(km.command_for("Insert"), Some(KeyCommand::NewBox));
    assert_eq!(km.command_for("+"), Some(KeyCommand::CommitBox));
    assert_eq!(km.command_for("Escape"), Some(KeyCommand::CancelBox));
    assert_eq!(km.command_for("Delete"), Some(KeyCommand::Delete));
    assert_eq!(km.command_for("r"), Some(KeyCommand::Rename));
    assert_eq!(km.command_for("F2"), Some(KeyCommand::Retag));
    assert_eq!(km.command_for("Tab"), Some(KeyCommand::CycleSelection));
}

#[test]
fn digits_map_to_recent_slots() {
    let km = Keymap::default();
    assert_eq!(km.command_for("0"), Some(KeyCommand::RecentName(0)));
    assert_eq!(km.command_for("9"), Some(KeyCommand::RecentName(9)));
}

#[test]
fn multi_char_digit_strings_are_not_slots() {
    let km = Keymap::default();
    assert_eq!(km.command_for("10"), None);
}

#[test]
fn unknown_key_is_unbound() {
    let km = Keymap::default();
    assert_eq!(km.command_for("q"), None);
    assert_eq!(km.command_for("R"), None);
}

#[test]
fn keymap_partial_json_keeps_defaults() {
    let km: Keymap = serde_json::from_str(r#"{"rename":"n"}"#).unwrap();
    assert_eq!(km.command_for("n"), Some(KeyCommand::Rename));
    assert_eq!(km.command_for("r"), None);
    assert_eq!(km.command_for("F2"), Some(KeyCommand::Retag));
}

// =============================================================
// Text entry targets
// =============================================================

#[test]
fn form_fields_and_editable_elements_are_text_entry() {
    assert!(is_text_entry("INPUT", false));
    assert!(is_text_entry("textarea", false));
    assert!(is_text_entry("SELECT", false));
    assert!(is_text_entry("DIV", true));
}

#[test]
fn canvas_and_body_are_not_text_entry() {
    assert!(!is_text_entry("CANVAS", false));
    assert!(!is_text_entry("BODY", false));
}
