#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn tag(name: &str, left: f64) -> Tag {
    Tag::new(Some(FaceId::Int(1)), name, Rect::new(left, 0.0, 10.0, 10.0))
}

// =============================================================
// FaceId
// =============================================================

#[test]
fn face_id_accepts_integers_and_strings() {
    let n: FaceId = serde_json::from_value(json!(42)).unwrap();
    let s: FaceId = serde_json::from_value(json!("abc")).unwrap();
    assert_eq!(n, FaceId::Int(42));
    assert_eq!(s, FaceId::Text("abc".into()));
}

#[test]
fn face_id_serializes_back_to_bare_value() {
    assert_eq!(serde_json::to_value(FaceId::Int(7)).unwrap(), json!(7));
    assert_eq!(serde_json::to_value(FaceId::Text("x".into())).unwrap(), json!("x"));
}

#[test]
fn face_id_display() {
    assert_eq!(FaceId::Int(12).to_string(), "12");
    assert_eq!(FaceId::Text("f-3".into()).to_string(), "f-3");
}

// =============================================================
// Tag
// =============================================================

#[test]
fn new_tags_get_distinct_ids() {
    let a = tag("a", 0.0);
    let b = tag("a", 0.0);
    assert_ne!(a.id, b.id);
}

#[test]
fn representative_point_is_inside_tag() {
    let t = Tag::new(None, "x", Rect::new(5.0, 6.0, 30.0, 30.0));
    let p = t.representative_point();
    assert_eq!(p, Point::new(6.0, 7.0));
    assert!(crate::geom::point_in_rect(p.x, p.y, &t.rect));
}

// =============================================================
// TagRecord
// =============================================================

#[test]
fn tag_record_parses_flat_page_json() {
    let rec: TagRecord = serde_json::from_value(json!({
        "face_id": 3, "name": "Ann", "left": 1, "top": 2, "width": 3, "height": 4
    }))
    .unwrap();
    assert_eq!(rec.face_id, Some(FaceId::Int(3)));
    assert_eq!(rec.name, "Ann");
    assert_eq!(rec.rect, Rect::new(1.0, 2.0, 3.0, 4.0));
}

#[test]
fn tag_record_face_id_may_be_missing_or_null() {
    let missing: TagRecord =
        serde_json::from_value(json!({"name": "a", "left": 0, "top": 0, "width": 1, "height": 1})).unwrap();
    let null: TagRecord =
        serde_json::from_value(json!({"face_id": null, "name": "a", "left": 0, "top": 0, "width": 1, "height": 1}))
            .unwrap();
    assert!(missing.face_id.is_none());
    assert!(null.face_id.is_none());
}

// =============================================================
// TagStore
// =============================================================

#[test]
fn from_records_skips_empty_bounds() {
    let records = vec![
        TagRecord { face_id: None, name: "ok".into(), rect: Rect::new(0.0, 0.0, 5.0, 5.0) },
        TagRecord { face_id: None, name: "flat".into(), rect: Rect::new(0.0, 0.0, 5.0, 0.0) },
        TagRecord { face_id: None, name: "neg".into(), rect: Rect::new(0.0, 0.0, -1.0, 5.0) },
    ];
    let store = TagStore::from_records(records);
    assert_eq!(store.len(), 1);
    assert_eq!(store.at(0).map(|t| t.name.as_str()), Some("ok"));
}

#[test]
fn push_appends_in_order() {
    let mut store = TagStore::new();
    store.push(tag("a", 0.0));
    store.push(tag("b", 10.0));
    let names: Vec<&str> = store.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn remove_shifts_later_positions_down() {
    let mut store = TagStore::new();
    let a = tag("a", 0.0);
    let b = tag("b", 10.0);
    let c = tag("c", 20.0);
    let (a_id, b_id, c_id) = (a.id, b.id, c.id);
    store.push(a);
    store.push(b);
    store.push(c);

    let removed = store.remove(&b_id).unwrap();
    assert_eq!(removed.name, "b");
    assert_eq!(store.len(), 2);
    assert_eq!(store.position(&a_id), Some(0));
    assert_eq!(store.position(&c_id), Some(1));
    assert!(store.get(&b_id).is_none());
}

#[test]
fn remove_unknown_id_is_none() {
    let mut store = TagStore::new();
    store.push(tag("a", 0.0));
    assert!(store.remove(&Uuid::new_v4()).is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn get_mut_edits_in_place() {
    let mut store = TagStore::new();
    let t = tag("a", 0.0);
    let id = t.id;
    store.push(t);
    if let Some(t) = store.get_mut(&id) {
        t.name = "z".into();
    }
    assert_eq!(store.get(&id).map(|t| t.name.as_str()), Some("z"));
}

#[test]
fn empty_store() {
    let store = TagStore::default();
    assert!(store.is_empty());
    assert!(store.at(0).is_none());
}
