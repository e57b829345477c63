//! Face-tag overlay editor for the photo gallery viewer.
//!
//! This crate is compiled to WebAssembly and runs in the browser on top of a
//! displayed photo. It owns the full lifecycle of the tagging overlay:
//! translating raw DOM pointer and keyboard events into tag edits, hit-testing
//! tags and the pending box, rendering the overlay, and turning edits into
//! backend requests whose replies are merged back into local state. The host
//! page only embeds the photo's tags and mounts a canvas.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EditorCore`] and the [`engine::Action`]s it emits |
//! | [`doc`] | Tag types and the ordered in-memory tag store |
//! | [`geom`] | Points, rectangles, and point/handle proximity tests |
//! | [`hit`] | Hit-testing against the pending box and existing tags |
//! | [`input`] | Drag state machine, unified pointer samples, and the keymap |
//! | [`render`] | Display-list construction and replay onto a 2D context |
//! | [`sync`] | Backend wire types and the HTTP [`sync::TagClient`] |
//! | [`recent`] | Recently used names cache and its persistence |
//! | [`config`] | Editor configuration and host-embedded page data |
//! | [`host`] | `wasm-bindgen` entry point wiring the editor to the DOM |
//! | [`consts`] | Shared numeric and string defaults |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod host;
pub mod input;
pub mod recent;
pub mod render;
pub mod sync;
