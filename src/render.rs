//! Rendering: turns editor state into a display list and replays it onto a 2D context.
//!
//! [`scene`] is a pure function of [`EditorCore`] and never mutates it, so it
//! can be called at any time and tested without a browser. [`draw`] is the
//! only place that touches [`web_sys::CanvasRenderingContext2d`].
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::engine::EditorCore;
use crate::geom::{Point, Rect};
use crate::hit::Corner;

/// One drawing primitive. Colors and fonts are CSS strings.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Clear the whole canvas.
    Clear { width: f64, height: f64 },
    StrokeRect { rect: Rect, color: String, line_width: f64 },
    FillRect { rect: Rect, color: String },
    /// Text centered horizontally on `at`, sitting on it (bottom baseline).
    Label { text: String, at: Point, color: String, font: String },
    /// Filled circle marking a resize handle.
    Handle { center: Point, radius: f64, color: String },
}

/// Build the display list for the current state: tags in draw order, then the pending box.
#[must_use]
pub fn scene(core: &EditorCore) -> Vec<DrawOp> {
    let cfg = &core.config;
    let mut ops = vec![DrawOp::Clear { width: core.canvas_width, height: core.canvas_height }];

    for tag in core.tags.iter() {
        let line_width = if core.selected == Some(tag.id) { cfg.selected_line_width } else { cfg.line_width };
        ops.push(DrawOp::StrokeRect { rect: tag.rect, color: cfg.box_color.clone(), line_width });
        ops.push(DrawOp::Label {
            text: tag.name.clone(),
            at: tag.rect.top_center(),
            color: cfg.box_color.clone(),
            font: cfg.label_font.clone(),
        });
    }

    if let Some(rect) = core.pending_rect() {
        ops.push(DrawOp::FillRect { rect, color: cfg.pending_fill.clone() });
        ops.push(DrawOp::StrokeRect { rect, color: cfg.box_color.clone(), line_width: cfg.pending_line_width });
        for corner in Corner::ALL {
            ops.push(DrawOp::Handle {
                center: corner.point(&rect),
                radius: cfg.handle_radius,
                color: cfg.box_color.clone(),
            });
        }
    }

    ops
}

/// Replay a display list onto `ctx`.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(ctx: &CanvasRenderingContext2d, ops: &[DrawOp]) -> Result<(), JsValue> {
    for op in ops {
        match op {
            DrawOp::Clear { width, height } => ctx.clear_rect(0.0, 0.0, *width, *height),
            DrawOp::StrokeRect { rect, color, line_width } => {
                ctx.set_line_width(*line_width);
                ctx.set_stroke_style_str(color);
                ctx.stroke_rect(rect.left, rect.top, rect.width, rect.height);
            }
            DrawOp::FillRect { rect, color } => {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(rect.left, rect.top, rect.width, rect.height);
            }
            DrawOp::Label { text, at, color, font } => {
                ctx.set_font(font);
                ctx.set_text_align("center");
                ctx.set_text_baseline("bottom");
                ctx.set_fill_style_str(color);
                ctx.fill_text(text, at.x, at.y)?;
            }
            DrawOp::Handle { center, radius, color } => {
                ctx.set_fill_style_str(color);
                ctx.begin_path();
                ctx.arc(center.x, center.y, *radius, 0.0, 2.0 * PI)?;
                ctx.fill();
            }
        }
    }
    Ok(())
}

/// Build and draw the scene in one step.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn render(ctx: &CanvasRenderingContext2d, core: &EditorCore) -> Result<(), JsValue> {
    draw(ctx, &scene(core))
}
